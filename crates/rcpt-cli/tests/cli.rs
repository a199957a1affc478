use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RECEIPT: &str = "BIG MART
Shop 12, MG Road
Bangalore 560001

Receipt No: RCP-2024-001
Date: 15/01/2024

MILK 2L  2x  25.00  50.00
BREAD        15.00

Subtotal   65.00
Tax (5%)     3.25
Total      68.25

Payment: CASH
";

fn rcpt() -> Command {
    Command::cargo_bin("rcpt").unwrap()
}

/// A config file with defaults so the user's config never leaks in.
fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, "{}").unwrap();
    path
}

#[test]
fn parse_text_file_to_json() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let input = dir.path().join("receipt.txt");
    fs::write(&input, RECEIPT).unwrap();

    let output = rcpt()
        .arg("--config")
        .arg(&config)
        .arg("parse")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["store_name"], "BIG MART");
    assert_eq!(json["purchase_date"], "2024-01-15");
    assert_eq!(json["receipt_number"], "RCP-2024-001");
    assert_eq!(json["payment_method"], "CASH");
    assert_eq!(json["currency"], "USD");
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["items"][1]["serial_no"], 2);
}

#[test]
fn parse_ocr_json_document() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let input = dir.path().join("ocr.json");
    let document = serde_json::json!({
        "text": "",
        "pages": [{"page": 1, "lines": [{"text": "CORNER STORE"}, {"text": "Total ₹450.00"}]}],
        "average_confidence": 91.5
    });
    fs::write(&input, document.to_string()).unwrap();

    rcpt()
        .arg("--config")
        .arg(&config)
        .arg("parse")
        .arg(&input)
        .arg("--format")
        .arg("text")
        .assert()
        .success()
        .stdout(predicate::str::contains("Store: CORNER STORE"))
        .stdout(predicate::str::contains("Total: 450.00 INR"));
}

#[test]
fn parse_empty_ocr_document_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let input = dir.path().join("empty.json");
    fs::write(&input, r#"{"text": "  ", "pages": []}"#).unwrap();

    rcpt()
        .arg("--config")
        .arg(&config)
        .arg("parse")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to extract text"));
}

#[test]
fn parse_stdin_csv() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    rcpt()
        .arg("--config")
        .arg(&config)
        .args(["parse", "-", "--format", "csv"])
        .write_stdin(RECEIPT)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("receipt_number,purchase_date"))
        .stdout(predicate::str::contains("RCP-2024-001,2024-01-15,BIG MART"))
        .stdout(predicate::str::contains("serial_no,description,quantity"))
        .stdout(predicate::str::contains("1,MILK 2L,2,25.00,50.00"));
}

#[test]
fn parse_unsupported_extension_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let input = dir.path().join("receipt.png");
    fs::write(&input, [0u8, 1, 2]).unwrap();

    rcpt()
        .arg("--config")
        .arg(&config)
        .arg("parse")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported input format"));
}

#[test]
fn parse_missing_file_fails() {
    rcpt()
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), RECEIPT).unwrap();
    fs::write(inputs.join("b.txt"), "SMALL SHOP\nTotal $9.99\n").unwrap();
    fs::write(inputs.join("ignored.png"), "x").unwrap();

    rcpt()
        .arg("--config")
        .arg(&config)
        .arg("batch")
        .arg(format!("{}/*", inputs.display()))
        .arg("--output-dir")
        .arg(&outputs)
        .arg("--summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    assert!(outputs.join("a.json").exists());
    assert!(outputs.join("b.json").exists());

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.contains("a.txt,success,RCP-2024-001"));
    assert!(summary.contains("b.txt,success"));
}

#[test]
fn batch_keeps_outputs_with_same_stem() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), RECEIPT).unwrap();
    fs::write(inputs.join("a.json"), r#"{"text": "CORNER STORE\nTotal 4.50"}"#).unwrap();

    rcpt()
        .arg("--config")
        .arg(&config)
        .arg("batch")
        .arg(format!("{}/*", inputs.display()))
        .arg("--output-dir")
        .arg(&outputs)
        .assert()
        .success();

    let from_json = fs::read_to_string(outputs.join("a.json")).unwrap();
    let from_txt = fs::read_to_string(outputs.join("a.txt.json")).unwrap();
    assert!(from_json.contains("CORNER STORE"));
    assert!(from_txt.contains("RCP-2024-001"));
}

#[test]
fn batch_stops_on_error_unless_asked() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let inputs = dir.path().join("in");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("bad.json"), "not json").unwrap();
    fs::write(inputs.join("empty.json"), r#"{"text": ""}"#).unwrap();
    fs::write(inputs.join("good.txt"), RECEIPT).unwrap();
    let pattern = format!("{}/*", inputs.display());

    rcpt()
        .arg("--config")
        .arg(&config)
        .arg("batch")
        .arg(&pattern)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));

    rcpt()
        .arg("--config")
        .arg(&config)
        .arg("batch")
        .arg(&pattern)
        .arg("--continue-on-error")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful"))
        .stdout(predicate::str::contains("Failed files:"))
        .stdout(predicate::str::contains("empty.json"));
}

#[test]
fn config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rcpt").join("config.json");

    rcpt()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(path.exists());

    rcpt()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    rcpt()
        .arg("--config")
        .arg(&path)
        .args(["config", "set", "extraction.default_currency", "EUR"])
        .assert()
        .success();

    rcpt()
        .arg("--config")
        .arg(&path)
        .args(["config", "get", "extraction.default_currency"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"EUR\""));

    rcpt()
        .arg("--config")
        .arg(&path)
        .args(["config", "set", "extraction.default_currency", "euro"])
        .assert()
        .failure();

    rcpt()
        .arg("--config")
        .arg(&path)
        .args(["config", "get", "extraction.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn config_default_currency_applies_to_parse() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    fs::write(
        &config,
        r#"{"extraction": {"default_currency": "GBP"}, "output": {"include_raw_text": false}}"#,
    )
    .unwrap();

    let output = rcpt()
        .arg("--config")
        .arg(&config)
        .args(["parse", "-"])
        .write_stdin("Total 12.00")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["currency"], "GBP");
    assert!(json.get("raw_text").is_none());
}
