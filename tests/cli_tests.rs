//! E2E tests for the bib2csv and paperstats CLIs

#![allow(deprecated)] // cargo_bin deprecation - will update when assert_cmd stabilizes replacement

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn bib2csv() -> Command {
    Command::cargo_bin("bib2csv").unwrap()
}

fn paperstats() -> Command {
    let mut cmd = Command::cargo_bin("paperstats").unwrap();
    cmd.env_remove("SERPAPI_KEY")
        .env_remove("CROSSREF_URL")
        .env_remove("SERPAPI_URL");
    cmd
}

const BIB: &str = r#"
@article{smith2020,
  title = "{Deep Learning}",
  author = "Smith, J. and Doe, A.",
  journal = "Nature",
  year = "2020",
  doi = "10.1/xyz"
}

@inproceedings{roe2019,
  title = {Graph {N}etworks},
  author = {Roe, R.},
  booktitle = {Proceedings of ICML},
  year = {2019},
  publisher = {PMLR}
}

@misc{lee2021preprint,
  title = {A Preprint},
  archivePrefix = {arXiv},
  year = {2021}
}
"#;

#[test]
fn test_bib2csv_help() {
    bib2csv()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("INPUT_FILE"))
        .stdout(predicate::str::contains("OUTPUT_FILE"));
}

#[test]
fn test_paperstats_help() {
    paperstats()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--api-key"))
        .stdout(predicate::str::contains("--concurrency"))
        .stdout(predicate::str::contains("--timeout"));
}

#[test]
fn test_version() {
    bib2csv()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bib2csv"));
}

#[test]
fn test_bib2csv_wrong_arity() {
    bib2csv()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));

    bib2csv()
        .arg("only-input.bib")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));

    bib2csv()
        .args(["a.bib", "b.csv", "c.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_paperstats_wrong_arity() {
    paperstats()
        .env("SERPAPI_KEY", "test-key")
        .arg("only-input.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_bib2csv_file_not_found() {
    let dir = tempdir().unwrap();
    bib2csv()
        .args([
            "nonexistent.bib",
            dir.path().join("out.csv").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_bib2csv_converts_entries() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("refs.bib");
    let output = dir.path().join("refs.csv");
    fs::write(&input, BIB).unwrap();

    bib2csv()
        .args([input.to_str().unwrap(), output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""entries":3"#));

    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "title,author,publication,year,publisher,doi,arxiv_id",
            "Deep Learning,\"Smith, J.\",Nature,2020,,10.1/xyz,",
            "Graph Networks,\"Roe, R.\",Proceedings of ICML,2019,PMLR,,",
            "A Preprint,,arXiv,2021,,,lee2021preprint",
        ]
    );
}

#[test]
fn test_bib2csv_malformed_input() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.bib");
    let output = dir.path().join("out.csv");
    fs::write(&input, "@article{broken, title = {never closed").unwrap();

    bib2csv()
        .args([input.to_str().unwrap(), output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to convert"));

    assert!(!output.exists());
}

#[test]
fn test_paperstats_missing_api_key() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.csv");

    // Input is never opened when the key is missing
    paperstats()
        .current_dir(dir.path())
        .args(["does-not-exist.csv", output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SERPAPI_KEY"));

    assert!(!output.exists());
}

#[test]
fn test_paperstats_reads_key_from_dotenv() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".env"), "SERPAPI_KEY=from-dotenv\n").unwrap();

    // Key is found, so the failure is about the missing input file
    paperstats()
        .current_dir(dir.path())
        .args(["does-not-exist.csv", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_concurrency_validation() {
    paperstats()
        .env("SERPAPI_KEY", "test-key")
        .args(["--concurrency", "0", "in.csv", "out.csv"])
        .assert()
        .failure();

    paperstats()
        .env("SERPAPI_KEY", "test-key")
        .args(["--concurrency", "17", "in.csv", "out.csv"])
        .assert()
        .failure();
}
