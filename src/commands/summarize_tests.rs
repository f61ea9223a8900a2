use std::fs;

use tempfile::TempDir;

use super::*;
use crate::error::ReportError;
use crate::{EXIT_INPUT_ERROR, EXIT_RUNTIME_ERROR};

const CSV: &str = "\
Equipment Name,Type,Flowrate,Pressure,Temperature
P1,Pump,10,5,20
P2,Pump,20,,30
V1,Valve,,15,
";

fn args_for(dir: &TempDir, content: &str) -> SummarizeArgs {
    let input = dir.path().join("plant.csv");
    fs::write(&input, content).unwrap();
    SummarizeArgs { input, output: None }
}

#[test]
fn summarizes_csv_file() {
    let dir = TempDir::new().unwrap();
    let result = run_summarize_impl(&args_for(&dir, CSV)).unwrap();
    assert_eq!(result.summary.total_count, 3);
    assert_eq!(result.preview_rows.len(), 3);
}

#[test]
fn writes_json_to_output_file() {
    let dir = TempDir::new().unwrap();
    let mut args = args_for(&dir, CSV);
    let output = dir.path().join("summary.json");
    args.output = Some(output.clone());

    run_summarize_impl(&args).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(json["summary"]["total_count"], 3);
    assert_eq!(json["summary"]["type_distribution"]["Pump"], 2);
    assert_eq!(json["preview_rows"][0]["Equipment Name"], "P1");
}

#[test]
fn missing_column_is_schema_error() {
    let dir = TempDir::new().unwrap();
    let args = args_for(&dir, "Equipment Name,Type,Flowrate\nP1,Pump,1\n");
    let err = run_summarize_impl(&args).unwrap_err();
    assert!(matches!(err, ReportError::Schema { .. }));
    assert_eq!(run_summarize(&args), EXIT_INPUT_ERROR);
}

#[test]
fn missing_input_is_runtime_error() {
    let args = SummarizeArgs {
        input: "/no/such/plant.csv".into(),
        output: None,
    };
    assert_eq!(run_summarize(&args), EXIT_RUNTIME_ERROR);
}
