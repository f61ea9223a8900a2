use super::*;

const SAMPLE: &str = "\
Equipment Name,Type,Flowrate,Pressure,Temperature
Pump-1,Pump,10,5,20
Pump-2,Pump,20,,30
";

#[test]
fn parses_header_and_rows() {
    let dataset = Dataset::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
    assert_eq!(
        dataset.columns(),
        ["Equipment Name", "Type", "Flowrate", "Pressure", "Temperature"]
    );
    assert_eq!(dataset.len(), 2);
    assert_eq!(
        dataset.cell(0, "Type"),
        Some(&CellValue::Text("Pump".to_string()))
    );
}

#[test]
fn empty_fields_are_missing() {
    let dataset = Dataset::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
    assert_eq!(dataset.cell(1, "Pressure"), Some(&CellValue::Missing));
}

#[test]
fn header_names_are_trimmed_but_values_are_not() {
    let dataset = Dataset::from_csv_bytes(b"  Type ,Flowrate\n Pump ,1\n").unwrap();
    assert!(dataset.has_column("Type"));
    assert_eq!(
        dataset.cell(0, "Type"),
        Some(&CellValue::Text(" Pump ".to_string()))
    );
}

#[test]
fn duplicate_headers_get_suffixes() {
    let dataset = Dataset::from_csv_bytes(b"A,A,B,A\n1,2,3,4\n").unwrap();
    assert_eq!(dataset.columns(), ["A", "A.1", "B", "A.2"]);
}

#[test]
fn short_rows_are_padded_with_missing() {
    let dataset = Dataset::from_csv_bytes(b"A,B,C\n1\n").unwrap();
    assert_eq!(dataset.cell(0, "C"), Some(&CellValue::Missing));
}

#[test]
fn long_rows_are_rejected() {
    let err = Dataset::from_csv_bytes(b"A,B\n1,2\n1,2,3\n").unwrap_err();
    assert_eq!(err.error_type(), "Parse");
    assert!(err.to_string().contains("line 3"), "{err}");
}

#[test]
fn empty_input_is_a_parse_error() {
    let err = Dataset::from_csv_bytes(b"").unwrap_err();
    assert!(matches!(err, ReportError::Parse { .. }));
}

#[test]
fn invalid_utf8_is_a_parse_error() {
    let err = Dataset::from_csv_bytes(b"A,B\n\xff\xfe,1\n").unwrap_err();
    assert!(matches!(err, ReportError::Parse { .. }));
}

#[test]
fn header_only_yields_empty_dataset() {
    let dataset = Dataset::from_csv_bytes(b"A,B\n").unwrap();
    assert!(dataset.is_empty());
    assert_eq!(dataset.columns().len(), 2);
}

#[test]
fn head_preserves_column_order_and_raw_values() {
    let dataset = Dataset::from_csv_bytes(SAMPLE.as_bytes()).unwrap();
    let rows = dataset.head(8);
    assert_eq!(rows.len(), 2);
    let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
    assert_eq!(keys, dataset.columns());
    assert_eq!(rows[0]["Flowrate"], CellValue::Text("10".to_string()));
}

#[test]
fn as_f64_coerces_text_and_rejects_junk() {
    assert_eq!(CellValue::Text(" 12.5 ".to_string()).as_f64(), Some(12.5));
    assert_eq!(CellValue::Number(3.0).as_f64(), Some(3.0));
    assert_eq!(CellValue::Text("n/a".to_string()).as_f64(), None);
    assert_eq!(CellValue::Text("NaN".to_string()).as_f64(), None);
    assert_eq!(CellValue::Text("inf".to_string()).as_f64(), None);
    assert_eq!(CellValue::Bool(true).as_f64(), None);
    assert_eq!(CellValue::Missing.as_f64(), None);
}

#[test]
fn cell_values_round_trip_through_json() {
    let json = r#"{"a": null, "b": 1.5, "c": "x", "d": true}"#;
    let row: Row = serde_json::from_str(json).unwrap();
    assert_eq!(row["a"], CellValue::Missing);
    assert_eq!(row["b"], CellValue::Number(1.5));
    assert_eq!(row["c"], CellValue::Text("x".to_string()));
    assert_eq!(row["d"], CellValue::Bool(true));
    let back = serde_json::to_string(&row).unwrap();
    assert_eq!(back, r#"{"a":null,"b":1.5,"c":"x","d":true}"#);
}

#[test]
fn from_rows_uses_first_row_columns() {
    let first: Row = serde_json::from_str(r#"{"Type": "Pump", "Flowrate": 10}"#).unwrap();
    let second: Row = serde_json::from_str(r#"{"Type": "Valve"}"#).unwrap();
    let dataset = Dataset::from_rows(&[first, second]);
    assert_eq!(dataset.columns(), ["Type", "Flowrate"]);
    assert_eq!(dataset.cell(1, "Flowrate"), Some(&CellValue::Missing));
}

#[test]
fn display_renders_missing_as_empty() {
    assert_eq!(CellValue::Missing.to_string(), "");
    assert_eq!(CellValue::Number(10.0).to_string(), "10");
    assert_eq!(CellValue::Text("Pump".to_string()).to_string(), "Pump");
}
