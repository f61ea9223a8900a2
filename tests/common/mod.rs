#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the equipment-report binary.
#[macro_export]
macro_rules! equipment_report {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("equipment-report"))
    };
}

/// Pump/Pump/Valve dataset with a few missing values.
pub const PLANT_CSV: &str = "\
Equipment Name,Type,Flowrate,Pressure,Temperature
P1,Pump,10,5,20
P2,Pump,20,,30
V1,Valve,,15,
";

/// An ad-hoc report request exercising every section.
pub const REQUEST_JSON: &str = r#"{
    "summary": {
        "total_count": 3,
        "averages": {"Flowrate": 15.0, "Pressure": 10.0, "Temperature": 25.0},
        "type_distribution": {"Pump": 2, "Valve": 1},
        "per_type_averages": {"Flowrate": {"Pump": 15.0, "Valve": null}}
    },
    "preview_rows": [{"Equipment Name": "P1", "Type": "Pump"}],
    "filename": "adhoc",
    "include": {"type_chart_type": "pie", "analysis": {"include": true}}
}"#;

/// Temp working directory with an isolated dataset store.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> PathBuf {
        self.dir.path().join("store")
    }

    /// Flags that keep a run away from user config and data directories.
    pub fn isolation_args(&self) -> Vec<String> {
        vec![
            "--no-config".to_string(),
            "--store".to_string(),
            self.store().display().to_string(),
        ]
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
