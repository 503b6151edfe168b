#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use taskgen_core::types::{EngineeringTask, TaskCategory};
use taskgen_core::{FeatureRequest, FileStore, GeneratedBreakdown, SpecStore, StoredSpec};
use tempfile::TempDir;

fn taskgen(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("taskgen").unwrap();
    cmd.current_dir(dir.path())
        .env("TASKGEN_DATA_DIR", dir.path().join("data"))
        .env("TASKGEN_CONFIG", dir.path().join("taskgen.yaml"))
        .env_remove("GEMINI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn seed(dir: &TempDir, goal: &str) -> StoredSpec {
    let store = FileStore::open(&dir.path().join("data")).unwrap();
    let feature = FeatureRequest::new(goal, "shop owners", None, None).unwrap();
    let generated = GeneratedBreakdown {
        engineering_tasks: vec![EngineeringTask {
            id: "TASK-1".into(),
            title: "Renderer".into(),
            category: TaskCategory::Backend,
            estimated_hours: 6.0,
            ..Default::default()
        }],
        ..Default::default()
    };
    store.save(feature, generated).unwrap()
}

// ---------------------------------------------------------------------------
// taskgen list
// ---------------------------------------------------------------------------

#[test]
fn list_with_no_data_dir() {
    let dir = TempDir::new().unwrap();
    taskgen(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No specs stored."));
}

#[test]
fn list_shows_seeded_specs() {
    let dir = TempDir::new().unwrap();
    let spec = seed(&dir, "Let customers export invoices");

    taskgen(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(spec.id.as_str()))
        .stdout(predicate::str::contains("Let customers export invoices"))
        .stdout(predicate::str::contains("6h"));
}

#[test]
fn list_json_has_count() {
    let dir = TempDir::new().unwrap();
    seed(&dir, "First feature goal");
    seed(&dir, "Second feature goal");

    let output = taskgen(&dir).args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["count"], 2);
    assert_eq!(json["specs"][0]["feature"]["goal"], "Second feature goal");
}

// ---------------------------------------------------------------------------
// taskgen show / delete
// ---------------------------------------------------------------------------

#[test]
fn show_existing_spec() {
    let dir = TempDir::new().unwrap();
    let spec = seed(&dir, "Let customers export invoices");

    taskgen(&dir)
        .args(["show", &spec.id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal:     Let customers export invoices"))
        .stdout(predicate::str::contains("TASK-1"));
}

#[test]
fn show_unknown_spec_fails() {
    let dir = TempDir::new().unwrap();
    taskgen(&dir)
        .args(["show", "spec_1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("spec 'spec_1' not found"));
}

#[test]
fn delete_removes_spec() {
    let dir = TempDir::new().unwrap();
    let spec = seed(&dir, "Let customers export invoices");

    taskgen(&dir)
        .args(["delete", &spec.id])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Deleted {}", spec.id)));

    taskgen(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No specs stored."));
}

#[test]
fn delete_unknown_spec_fails() {
    let dir = TempDir::new().unwrap();
    seed(&dir, "Let customers export invoices");

    taskgen(&dir)
        .args(["delete", "spec_missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ---------------------------------------------------------------------------
// taskgen export
// ---------------------------------------------------------------------------

#[test]
fn export_markdown_to_stdout() {
    let dir = TempDir::new().unwrap();
    let spec = seed(&dir, "Let customers export invoices");

    taskgen(&dir)
        .args(["export", &spec.id])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Tasks Specification"))
        .stdout(predicate::str::contains("#### TASK-1: Renderer (6h)"));
}

#[test]
fn export_text_to_file() {
    let dir = TempDir::new().unwrap();
    let spec = seed(&dir, "Let customers export invoices");
    let out = dir.path().join("spec.txt");

    taskgen(&dir)
        .args(["export", &spec.id, "--format", "text", "--output"])
        .arg(&out)
        .assert()
        .success();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("Goal: Let customers export invoices"));
    assert!(!text.contains('#'));
}

#[test]
fn export_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    let spec = seed(&dir, "Let customers export invoices");

    taskgen(&dir)
        .args(["export", &spec.id, "--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pdf"));
}

// ---------------------------------------------------------------------------
// taskgen generate / status (offline paths)
// ---------------------------------------------------------------------------

#[test]
fn generate_validates_before_calling_provider() {
    let dir = TempDir::new().unwrap();
    taskgen(&dir)
        .args(["generate", "--goal", "short", "--users", "admins"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Goal must be at least 10 characters"));
    assert!(!dir.path().join("data/specs.json").exists());
}

#[test]
fn generate_without_api_key_fails() {
    let dir = TempDir::new().unwrap();
    taskgen(&dir)
        .args([
            "generate",
            "--goal",
            "Let customers export invoices",
            "--users",
            "shop owners",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY is not set"));
}

#[test]
fn status_reports_missing_api_key() {
    let dir = TempDir::new().unwrap();
    seed(&dir, "Let customers export invoices");

    let output = taskgen(&dir).args(["status", "--json"]).output().unwrap();
    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["checks"]["storage"]["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["specsCount"], 1);
    assert_eq!(json["checks"]["llm"]["status"], "unhealthy");
    assert_eq!(json["checks"]["llm"]["message"], "GEMINI_API_KEY is not set");
    assert_eq!(json["overall"], "unhealthy");
}

#[test]
fn config_file_sets_data_dir() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join("elsewhere");
    std::fs::write(
        dir.path().join("taskgen.yaml"),
        format!("data_dir: {}\n", other.display()),
    )
    .unwrap();
    let store = FileStore::open(&other).unwrap();
    let feature = FeatureRequest::new("Configured data directory", "ops", None, None).unwrap();
    let spec = store.save(feature, GeneratedBreakdown::default()).unwrap();

    let mut cmd = Command::cargo_bin("taskgen").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("TASKGEN_DATA_DIR")
        .env_remove("TASKGEN_CONFIG")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(spec.id.as_str()));
}
