use super::*;

const SCENARIO: &str = "\
Equipment Name,Type,Flowrate,Pressure,Temperature
P1,Pump,10,5,20
P2,Pump,20,,30
V1,Valve,,15,
";

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("value should be available");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn scenario_counts_and_averages() {
    let result = summarize_csv(SCENARIO.as_bytes()).unwrap();
    let summary = &result.summary;

    assert_eq!(summary.total_count, 3);
    assert_close(summary.averages["Flowrate"], 15.0);
    assert_close(summary.averages["Pressure"], 10.0);
    assert_close(summary.averages["Temperature"], 25.0);
    assert_eq!(summary.type_distribution["Pump"], 2);
    assert_eq!(summary.type_distribution["Valve"], 1);
}

#[test]
fn scenario_per_type_averages() {
    let summary = summarize_csv(SCENARIO.as_bytes()).unwrap().summary;
    let per_type = &summary.per_type_averages;

    assert_close(per_type["Flowrate"]["Pump"], 15.0);
    assert_eq!(per_type["Flowrate"]["Valve"], None);
    assert_close(per_type["Pressure"]["Pump"], 5.0);
    assert_close(per_type["Pressure"]["Valve"], 15.0);
    assert_close(per_type["Temperature"]["Pump"], 25.0);
    assert_eq!(per_type["Temperature"]["Valve"], None);
}

#[test]
fn distribution_sums_to_total() {
    let csv = "\
Equipment Name,Type,Flowrate,Pressure,Temperature
a,Pump,1,1,1
b,,2,2,2
c,Valve,x,y,z
d,Pump,4,4,4
e, Pump,5,5,5
";
    let summary = summarize_csv(csv.as_bytes()).unwrap().summary;
    let sum: usize = summary.type_distribution.values().sum();
    assert_eq!(sum, summary.total_count);
    assert_eq!(summary.total_count, 5);
}

#[test]
fn missing_type_is_grouped_under_its_own_key() {
    let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\na,,1,2,3\nb,Pump,1,2,3\n";
    let summary = summarize_csv(csv.as_bytes()).unwrap().summary;
    assert_eq!(summary.type_distribution[MISSING_TYPE_KEY], 1);
    assert_close(summary.per_type_averages["Flowrate"][MISSING_TYPE_KEY], 1.0);
}

#[test]
fn literal_missing_label_is_a_separate_type() {
    let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\n\
               a,,1,2,3\n\
               b,(missing),5,2,3\n\
               c,(missing),7,2,3\n";
    let summary = summarize_csv(csv.as_bytes()).unwrap().summary;
    assert_eq!(summary.type_distribution[MISSING_TYPE_KEY], 1);
    assert_eq!(summary.type_distribution[MISSING_TYPE_LABEL], 2);
    assert_close(summary.per_type_averages["Flowrate"][MISSING_TYPE_KEY], 1.0);
    assert_close(summary.per_type_averages["Flowrate"][MISSING_TYPE_LABEL], 6.0);

    assert_eq!(summary.type_label(MISSING_TYPE_LABEL), MISSING_TYPE_LABEL);
    assert_eq!(summary.type_label(MISSING_TYPE_KEY), MISSING_TYPE_KEY);
}

#[test]
fn missing_type_prints_as_label() {
    let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\na,,1,2,3\nb,Pump,1,2,3\n";
    let summary = summarize_csv(csv.as_bytes()).unwrap().summary;
    assert_eq!(summary.type_label(MISSING_TYPE_KEY), MISSING_TYPE_LABEL);
    assert_eq!(summary.type_label("Pump"), "Pump");
}

#[test]
fn type_values_are_not_normalized() {
    let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\na,Pump,1,2,3\nb, Pump,1,2,3\nc,pump,1,2,3\n";
    let summary = summarize_csv(csv.as_bytes()).unwrap().summary;
    assert_eq!(summary.type_count(), 3);
    assert!(summary.type_distribution.contains_key(" Pump"));
}

#[test]
fn all_missing_column_is_unavailable_not_zero() {
    let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\na,Pump,,abc,1\nb,Pump,,,2\n";
    let summary = summarize_csv(csv.as_bytes()).unwrap().summary;
    assert_eq!(summary.averages["Flowrate"], None);
    assert_eq!(summary.averages["Pressure"], None);
    assert_close(summary.averages["Temperature"], 1.5);
    assert_eq!(summary.per_type_averages["Flowrate"]["Pump"], None);
}

#[test]
fn empty_dataset_has_unavailable_averages() {
    let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\n";
    let result = summarize_csv(csv.as_bytes()).unwrap();
    assert_eq!(result.summary.total_count, 0);
    assert!(result.summary.averages.values().all(Option::is_none));
    assert!(result.summary.type_distribution.is_empty());
    assert!(result.preview_rows.is_empty());
}

#[test]
fn missing_columns_are_a_schema_error() {
    let err = summarize_csv(b"Equipment Name,Type,Flowrate\na,Pump,1\n").unwrap_err();
    match err {
        ReportError::Schema { required, found } => {
            assert_eq!(required.len(), 5);
            assert_eq!(found, ["Equipment Name", "Type", "Flowrate"]);
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn column_names_match_after_trimming_only() {
    let ok = summarize_csv(b" Equipment Name , Type ,Flowrate,Pressure, Temperature\na,b,1,2,3\n");
    assert!(ok.is_ok());
    let wrong_case = summarize_csv(b"equipment name,Type,Flowrate,Pressure,Temperature\na,b,1,2,3\n");
    assert!(matches!(wrong_case, Err(ReportError::Schema { .. })));
}

#[test]
fn extra_columns_only_appear_in_preview() {
    let csv = "Site,Equipment Name,Type,Flowrate,Pressure,Temperature\nA,a,Pump,1,2,3\n";
    let result = summarize_csv(csv.as_bytes()).unwrap();
    assert_eq!(result.summary.averages.len(), 3);
    let keys: Vec<&str> = result.preview_rows[0].keys().map(String::as_str).collect();
    assert_eq!(keys[0], "Site");
}

#[test]
fn preview_is_capped_and_uncoerced() {
    let mut csv = String::from("Equipment Name,Type,Flowrate,Pressure,Temperature\n");
    for i in 0..12 {
        csv.push_str(&format!("e{i},Pump,{i}.50,x,\n"));
    }
    let result = summarize_csv(csv.as_bytes()).unwrap();
    assert_eq!(result.summary.total_count, 12);
    assert_eq!(result.preview_rows.len(), SUMMARY_PREVIEW_ROWS);
    assert_eq!(
        result.preview_rows[0]["Flowrate"],
        CellValue::Text("0.50".to_string())
    );
    assert_eq!(
        result.preview_rows[7]["Equipment Name"],
        CellValue::Text("e7".to_string())
    );
}

#[test]
fn summarizing_twice_is_byte_identical() {
    let first = serde_json::to_string(&summarize_csv(SCENARIO.as_bytes()).unwrap().summary).unwrap();
    let second = serde_json::to_string(&summarize_csv(SCENARIO.as_bytes()).unwrap().summary).unwrap();
    assert_eq!(first, second);
}

#[test]
fn summary_json_round_trip() {
    let summary = summarize_csv(SCENARIO.as_bytes()).unwrap().summary;
    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"Valve\":null"));
    let parsed: Summary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, summary);
}

#[test]
fn huge_values_average_without_overflow() {
    let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\n\
               A,Pump,1e308,1,1\n\
               B,Pump,1e308,1,1\n\
               C,Valve,-1e308,1,1\n";
    let summary = summarize_csv(csv.as_bytes()).unwrap().summary;

    let flow = summary.averages["Flowrate"].unwrap();
    assert!(flow.is_finite());
    assert!((flow - 1e308 / 3.0).abs() <= 1e293);
    let pump = summary.per_type_averages["Flowrate"]["Pump"].unwrap();
    assert!((pump - 1e308).abs() <= 1e293);

    let json = serde_json::to_string(&summary).unwrap();
    let parsed: Summary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.averages["Flowrate"], summary.averages["Flowrate"]);
    assert_eq!(parsed, summary);
}

#[test]
fn summary_json_field_set() {
    let summary = summarize_csv(SCENARIO.as_bytes()).unwrap().summary;
    let value = serde_json::to_value(&summary).unwrap();
    let mut keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    keys.sort();
    assert_eq!(
        keys,
        ["averages", "per_type_averages", "total_count", "type_distribution"]
    );
}

#[test]
fn summarize_from_structured_rows() {
    let rows: Vec<Row> = serde_json::from_str(
        r#"[
            {"Equipment Name": "P1", "Type": "Pump", "Flowrate": 10, "Pressure": 5, "Temperature": 20},
            {"Equipment Name": "P2", "Type": "Pump", "Flowrate": 20, "Pressure": null, "Temperature": 30},
            {"Equipment Name": "V1", "Type": "Valve", "Flowrate": null, "Pressure": 15, "Temperature": null}
        ]"#,
    )
    .unwrap();
    let summary = summarize(&Dataset::from_rows(&rows)).unwrap().summary;
    assert_close(summary.averages["Pressure"], 10.0);
    assert_eq!(summary.per_type_averages["Temperature"]["Valve"], None);
}

#[test]
fn summary_helpers() {
    let summary = summarize_csv(SCENARIO.as_bytes()).unwrap().summary;
    assert_eq!(summary.type_count(), 2);
    assert_eq!(
        summary.numeric_columns().collect::<Vec<_>>(),
        NUMERIC_COLUMNS
    );
    assert_close(summary.average("Flowrate"), 15.0);
    assert_eq!(summary.average("Unknown"), None);
}
