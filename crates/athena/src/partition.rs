use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::error::AthenaError;

/// Ordered partition column → value mapping.
///
/// Column order is kept exactly as given: Athena requires the partition spec
/// to list columns in table DDL order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    columns: IndexMap<String, String>,
}

impl Partition {
    /// Build a partition from `(column, value)` pairs in DDL order.
    ///
    /// Fails on an empty list, an empty or repeated column name, or a value
    /// containing a double quote.
    pub fn new<I, K, V>(pairs: I) -> Result<Self, AthenaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut columns = IndexMap::new();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            if key.trim().is_empty() {
                return Err(AthenaError::InvalidPartition("empty column name".into()));
            }
            if value.contains('"') {
                return Err(AthenaError::InvalidPartition(format!(
                    "value for {key} contains a double quote"
                )));
            }
            if columns.contains_key(&key) {
                return Err(AthenaError::InvalidPartition(format!(
                    "duplicate column {key}"
                )));
            }
            columns.insert(key, value);
        }

        if columns.is_empty() {
            return Err(AthenaError::InvalidPartition(
                "at least one column is required".into(),
            ));
        }
        Ok(Self { columns })
    }

    /// The `(created_at, type)` layout used by daily exports.
    pub fn daily(created_at: NaiveDate, kind: impl Into<String>) -> Result<Self, AthenaError> {
        Self::new([
            ("created_at".to_string(), created_at.format("%Y-%m-%d").to_string()),
            ("type".to_string(), kind.into()),
        ])
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as `k1="v1", k2="v2"` for an `ADD PARTITION (...)` clause.
    pub fn render(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{k}=\"{v}\""))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
