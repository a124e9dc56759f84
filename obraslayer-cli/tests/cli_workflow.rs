//! Integration tests for the CLI commands.
//!
//! These tests run the built binary against datasets written to a
//! temporary directory, with `HOME` pointed at a scratch directory so the
//! user's real configuration is never read or written.
//!
//! # Running Integration Tests
//!
//! Integration tests are excluded from regular test runs. Use:
//! ```bash
//! cargo test --test '*' -- --ignored --nocapture
//! ```

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const EQUIPAMIENTOS: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature",
     "geometry": {"type": "Point", "coordinates": [-76.52, 3.41]},
     "properties": {"upid": "UNP-1", "nickname": "Centro Cultural", "estado": "En ejecución",
                    "comuna_corregimiento": "Comuna 3", "barrio_vereda": "San Antonio",
                    "presupuesto_base": 1250000}},
    {"type": "Feature",
     "geometry": {"type": "Point", "coordinates": [3.45, -76.53]},
     "properties": {"upid": "UNP-2", "nickname": "Parque Alameda", "estado": "Terminado",
                    "comuna_corregimiento": "Comuna 9", "barrio_vereda": "Alameda"}}
]}"#;

/// Scratch home plus a data directory holding one dataset.
struct Workspace {
    home: TempDir,
    data: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let home = TempDir::new().expect("Failed to create temp home");
        let data = TempDir::new().expect("Failed to create temp data dir");
        fs::write(data.path().join("equipamientos.geojson"), EQUIPAMIENTOS)
            .expect("Failed to write dataset");
        Self { home, data }
    }

    fn data_dir(&self) -> &Path {
        self.data.path()
    }

    /// Run the CLI with `--base` pointing at the data directory.
    fn run(&self, args: &[&str]) -> Output {
        let base = self.data_dir().to_str().expect("temp path is UTF-8");
        Command::new(env!("CARGO_BIN_EXE_obraslayer"))
            .env("HOME", self.home.path())
            .arg("--base")
            .arg(base)
            .args(args)
            .output()
            .expect("Failed to execute CLI command")
    }
}

/// Assert a command succeeded and return its stdout.
fn assert_success(output: &Output, context: &str) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("{} failed:\nstdout: {}\nstderr: {}", context, stdout, stderr);
    }
    stdout
}

#[test]
#[ignore = "integration test - run with --ignored"]
fn test_summary_reports_loaded_dataset() {
    let ws = Workspace::new();

    let output = ws.run(&["summary", "equipamientos.geojson"]);
    let stdout = assert_success(&output, "summary");

    assert!(stdout.contains("equipamientos.geojson"));
    assert!(stdout.contains("2 units"));
    assert!(stdout.contains("$ 1.250.000"));
}

#[test]
#[ignore = "integration test - run with --ignored"]
fn test_list_filters_by_comuna() {
    let ws = Workspace::new();

    let output = ws.run(&["list", "equipamientos.geojson", "--comuna", "Comuna 3"]);
    let stdout = assert_success(&output, "list --comuna");

    assert!(stdout.contains("UNP-1"));
    assert!(!stdout.contains("UNP-2"));
}

#[test]
#[ignore = "integration test - run with --ignored"]
fn test_list_json_output() {
    let ws = Workspace::new();

    let output = ws.run(&["list", "equipamientos.geojson", "--estado", "Completado", "--json"]);
    let stdout = assert_success(&output, "list --json");

    let units: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    let units = units.as_array().expect("JSON array");
    assert_eq!(units.len(), 1);
    assert_eq!(units[0]["id"], "UNP-2");
    assert_eq!(units[0]["lng"], -76.53);
}

#[test]
#[ignore = "integration test - run with --ignored"]
fn test_missing_dataset_fails() {
    let ws = Workspace::new();

    let output = ws.run(&["summary", "no_existe.geojson"]);
    assert!(!output.status.success());
}

#[test]
#[ignore = "integration test - run with --ignored"]
fn test_config_init_writes_file() {
    let ws = Workspace::new();

    let output = ws.run(&["config", "init"]);
    assert_success(&output, "config init");

    let config_path = ws.home.path().join(".obraslayer").join("config.ini");
    let content = fs::read_to_string(&config_path).expect("Failed to read config");
    assert!(content.contains("[sources]"));
    assert!(content.contains("[loader]"));
}
