//! Tests for ResultTable: header extraction, NULLs and display.

use athena_kit::*;

#[test]
fn test_table_from_raw_result() {
    let raw = ResultSet {
        columns: vec![
            ResultColumn {
                name: "id".to_string(),
                data_type: "bigint".to_string(),
            },
            ResultColumn {
                name: "name".to_string(),
                data_type: "varchar".to_string(),
            },
        ],
        rows: vec![
            vec![Some("id".to_string()), Some("name".to_string())],
            vec![Some("123".to_string()), Some("Alice".to_string())],
            vec![Some("456".to_string()), None],
        ],
    };

    let table = ResultTable::from_result_set(raw).unwrap();

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.get_value(0, "name"), Some("Alice"));
    // NULL handling
    assert_eq!(table.get_value(1, "name"), None);

    let records = table.records();
    assert_eq!(records[1].get("name"), Some(&None));
}

#[test]
fn test_table_display() {
    let raw = ResultSet::from_rows(vec![
        vec!["id", "value"],
        vec!["1", "alpha"],
        vec!["2", "beta"],
    ]);
    let output = ResultTable::from_result_set(raw).unwrap().to_string();

    let lines: Vec<&str> = output.lines().collect();
    assert!(lines[0].starts_with("id"));
    assert!(lines[1].contains("-+-"));
    assert!(lines[2].contains("alpha"));
    assert!(output.ends_with("(2 rows)"));
}

#[test]
fn test_table_serde_roundtrip() {
    let raw = ResultSet::from_rows(vec![vec!["k"], vec!["v"]]);
    let table = ResultTable::from_result_set(raw).unwrap();

    let json = serde_json::to_string(&table).expect("serialize");
    let back: ResultTable = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, table);
}
