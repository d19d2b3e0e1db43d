use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("remtrans"))
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn sample_database(name: &str) -> std::path::PathBuf {
    repo_root()
        .join("tests")
        .join("golden")
        .join(name)
        .join("input.rem")
}

#[test]
fn help_covers_import() {
    cmd()
        .arg("rem")
        .arg("import")
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.rem");
    let report = temp.path().join("remotes.json");

    cmd()
        .arg("rem")
        .arg("import")
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn wrong_extension_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("devices.txt");
    std::fs::write(&input, "[REMOTE]\n[NAME]x\n").expect("write input");

    cmd()
        .arg("rem")
        .arg("import")
        .arg(input)
        .arg("--stdout")
        .assert()
        .failure()
        .stderr(contains("unsupported input format").and(contains(".rem")));
}

#[test]
fn stdout_outputs_json_remote_set() {
    let assert = cmd()
        .arg("rem")
        .arg("import")
        .arg(sample_database("basic"))
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["remotes"][0]["name"], "office-tv");
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("remotes.json");

    cmd()
        .arg("rem")
        .arg("import")
        .arg(sample_database("basic"))
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    cmd()
        .arg("rem")
        .arg("import")
        .arg(sample_database("basic"))
        .arg("--stdout")
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn report_file_is_written() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("out").join("remotes.json");

    cmd()
        .arg("rem")
        .arg("import")
        .arg(sample_database("basic"))
        .arg("-o")
        .arg(&report)
        .assert()
        .success()
        .stderr(contains("OK: remote set written"));

    let json = std::fs::read_to_string(&report).expect("read report");
    let value: Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["tool"]["name"], "remtrans");
}

#[test]
fn strict_passes_on_clean_input() {
    cmd()
        .arg("rem")
        .arg("import")
        .arg(sample_database("basic"))
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .success();
}

#[test]
fn strict_fails_when_import_recovered() {
    cmd()
        .arg("rem")
        .arg("import")
        .arg(sample_database("protocols"))
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("recovered").and(contains("hint:")));
}

#[test]
fn list_failures_prints_diagnostics() {
    cmd()
        .arg("rem")
        .arg("import")
        .arg(sample_database("protocols"))
        .arg("--stdout")
        .arg("--list-failures")
        .assert()
        .success()
        .stderr(
            contains("Import diagnostics:")
                .and(contains("discarded remote block"))
                .and(contains("commands skipped: 1")),
        );
}

#[test]
fn creator_is_recorded() {
    let assert = cmd()
        .arg("rem")
        .arg("import")
        .arg(sample_database("basic"))
        .arg("--stdout")
        .arg("--creator")
        .arg("alex")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["creating_user"], "alex");
}
