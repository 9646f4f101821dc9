//! Integration tests for the idcr binary.
//!
//! None of these load OCR models: `extract` works on text files and the
//! image commands are exercised on inputs rejected before the engine starts.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_idcr"))
}

fn write_card_text(dir: &Path) -> (PathBuf, PathBuf) {
    let front = dir.join("front.txt");
    let back = dir.join("back.txt");
    fs::write(&front, "Name: Rajeev Kumar\n1234 5678 9123\nDOB: 15/08/1990").unwrap();
    fs::write(&back, "Address: 12 MG Road, City\nMale\n560001").unwrap();
    (front, back)
}

// ============ EXTRACT COMMAND TESTS ============

#[test]
fn test_extract_json() {
    let dir = TempDir::new().unwrap();
    let (front, back) = write_card_text(dir.path());

    cli()
        .arg("extract")
        .arg("--front-text")
        .arg(&front)
        .arg("--back-text")
        .arg(&back)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Rajeev Kumar\""))
        .stdout(predicate::str::contains("\"idNumber\": \"123456789123\""))
        .stdout(predicate::str::contains("\"postalCode\": \"560001\""));
}

#[test]
fn test_extract_csv() {
    let dir = TempDir::new().unwrap();
    let (front, back) = write_card_text(dir.path());

    cli()
        .args(["extract", "-f", "csv", "--front-text"])
        .arg(&front)
        .arg("--back-text")
        .arg(&back)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "name,idNumber,dateOfBirth,address,gender,postalCode\n",
        ))
        .stdout(predicate::str::contains("15/08/1990"));
}

#[test]
fn test_extract_show_warnings() {
    let dir = TempDir::new().unwrap();
    let front = dir.path().join("front.txt");
    let back = dir.path().join("back.txt");
    fs::write(&front, "@@@ ###").unwrap();
    fs::write(&back, "~~ ** ^^").unwrap();

    cli()
        .arg("extract")
        .arg("--front-text")
        .arg(&front)
        .arg("--back-text")
        .arg(&back)
        .arg("--show-warnings")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"gender\": \"Not found\""))
        .stderr(predicate::str::contains("Could not extract name"));
}

#[test]
fn test_extract_document_check_rejects_unrelated_text() {
    let dir = TempDir::new().unwrap();
    let front = dir.path().join("front.txt");
    let back = dir.path().join("back.txt");
    fs::write(&front, "Grocery list\nmilk, eggs").unwrap();
    fs::write(&back, "Call back later").unwrap();

    cli()
        .arg("extract")
        .arg("--front-text")
        .arg(&front)
        .arg("--back-text")
        .arg(&back)
        .arg("--require-document-match")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not look like an identity card"));
}

#[test]
fn test_extract_missing_file() {
    cli()
        .args(["extract", "--front-text", "nope.txt", "--back-text", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot read"));
}

// ============ PROCESS COMMAND TESTS ============

#[test]
fn test_process_rejects_gif() {
    let dir = TempDir::new().unwrap();
    let front = dir.path().join("front.gif");
    let back = dir.path().join("back.gif");
    fs::write(&front, b"GIF89a").unwrap();
    fs::write(&back, b"GIF89a").unwrap();

    cli()
        .arg("process")
        .arg(&front)
        .arg(&back)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported MIME type"));
}

#[test]
fn test_process_missing_image() {
    let dir = TempDir::new().unwrap();

    cli()
        .arg("process")
        .arg(dir.path().join("front.png"))
        .arg(dir.path().join("back.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("front image file not found"));
}

// ============ BATCH COMMAND TESTS ============

#[test]
fn test_batch_without_pairs() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("card_front.png"), b"").unwrap();

    cli()
        .arg("batch")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No front/back image pairs found"));
}

// ============ CONFIG COMMAND TESTS ============

#[test]
fn test_config_path() {
    cli()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"));
}

#[test]
fn test_config_init_and_use() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("idcr.json");

    cli()
        .args(["config", "init", "-o"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    assert!(config_path.exists());

    cli()
        .args(["config", "init", "-o"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    cli()
        .arg("--config")
        .arg(&config_path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"require_document_match\": false"));

    let (front, back) = write_card_text(dir.path());
    cli()
        .arg("--config")
        .arg(&config_path)
        .arg("extract")
        .arg("--front-text")
        .arg(&front)
        .arg("--back-text")
        .arg(&back)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rajeev Kumar"));
}
