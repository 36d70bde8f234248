use std::process::Command;
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_rusty-portboard");

fn run_once(dir: &TempDir, extra: &[&str]) -> std::process::Output {
    Command::new(BIN)
        .current_dir(dir.path())
        .args([
            "--once",
            "--runtime",
            "definitely-not-a-container-runtime-xyz",
            "--web-root",
            "no-web-root",
        ])
        .args(extra)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_help_lists_flags() {
    let output = Command::new(BIN)
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--interval"));
    assert!(stdout.contains("--enable-web"));
    assert!(stdout.contains("--once"));
}

#[test]
fn test_once_without_runtime_writes_empty_dashboard_and_config() {
    let dir = TempDir::new().unwrap();
    let output = run_once(&dir, &[]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let html = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(html.contains("No Services Found"));
    assert!(html.contains("Last updated: "));

    let config: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("config.json")).unwrap())
            .unwrap();
    assert_eq!(config["hostname"], "localhost");
    assert!(dir.path().join("logs").is_dir());
}

#[test]
fn test_once_honours_output_path() {
    let dir = TempDir::new().unwrap();
    let output = run_once(&dir, &["--output", "site/dash.html"]);

    assert!(output.status.success());
    assert!(dir.path().join("site").join("dash.html").exists());
}

#[test]
fn test_once_fails_when_output_unwritable() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("index.html")).unwrap();

    let output = run_once(&dir, &[]);
    assert!(!output.status.success());
}
