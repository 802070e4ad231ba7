use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn advdir_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("advdir");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/advdir.sqlite"

[server]
bind = "127.0.0.1:7340"

[pagination]
page_size_options = [5, 10, 25, 50]
max_page_size = 100
"#,
        root.display()
    );

    let config_path = config_dir.join("advdir.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_advdir(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = advdir_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run advdir binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_advdir(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data").join("advdir.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_advdir(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_advdir(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_seed_and_list_first_page() {
    let (_tmp, config_path) = setup_test_env();

    run_advdir(&config_path, &["init"]);
    let (stdout, stderr, success) = run_advdir(&config_path, &["seed"]);
    assert!(success, "seed failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Seeded 16 advocates."));

    let (stdout, _, success) = run_advdir(&config_path, &["search"]);
    assert!(success);
    assert!(stdout.contains("Page 1 of 4 (16 matching advocates)"));
    assert!(stdout.contains("John Doe"));
    assert!(!stdout.contains("Laura Clark"));
}

#[test]
fn test_search_by_name() {
    let (_tmp, config_path) = setup_test_env();

    run_advdir(&config_path, &["seed"]);
    let (stdout, _, success) = run_advdir(&config_path, &["search", "smith"]);
    assert!(success);
    assert!(stdout.contains("(1 matching advocate)"));
    assert!(stdout.contains("Jane Smith / Los Angeles"));
}

#[test]
fn test_search_by_city_prefix() {
    let (_tmp, config_path) = setup_test_env();

    run_advdir(&config_path, &["seed"]);
    let (stdout, _, success) = run_advdir(&config_path, &["search", "san"]);
    assert!(success);
    // San Antonio, San Diego, San Jose, San Francisco
    assert!(stdout.contains("(4 matching advocates)"));
}

#[test]
fn test_search_special_characters() {
    let (_tmp, config_path) = setup_test_env();

    run_advdir(&config_path, &["seed"]);
    for text in ["O'Brien", "50%", "\"unmatched", "NEAR(", "*"] {
        let (stdout, stderr, success) = run_advdir(&config_path, &["search", text]);
        assert!(
            success,
            "search {:?} failed: stdout={}, stderr={}",
            text, stdout, stderr
        );
    }

    let (stdout, _, _) = run_advdir(&config_path, &["search", "O'Brien"]);
    assert!(stdout.contains("Patrick O'Brien"));
}

#[test]
fn test_search_no_results() {
    let (_tmp, config_path) = setup_test_env();

    run_advdir(&config_path, &["seed"]);
    let (stdout, _, success) = run_advdir(&config_path, &["search", "zzzzqqq"]);
    assert!(success);
    assert!(stdout.contains("No results match your search criteria."));
}

#[test]
fn test_page_past_end_is_not_an_error() {
    let (_tmp, config_path) = setup_test_env();

    run_advdir(&config_path, &["seed"]);
    let (stdout, _, success) = run_advdir(&config_path, &["search", "--page", "9"]);
    assert!(success);
    assert!(stdout.contains("Page 9 of 4"));
    assert!(stdout.contains("past the last result"));
}

#[test]
fn test_invalid_page_rejected() {
    let (_tmp, config_path) = setup_test_env();

    run_advdir(&config_path, &["init"]);
    let (_, stderr, success) = run_advdir(&config_path, &["search", "--page", "0"]);
    assert!(!success, "page 0 should be rejected");
    assert!(stderr.contains("page must be >= 1"), "got: {}", stderr);

    let (_, stderr, success) = run_advdir(&config_path, &["search", "--page-size", "500"]);
    assert!(!success);
    assert!(stderr.contains("pageSize must be between 1 and 100"), "got: {}", stderr);
}

#[test]
fn test_unknown_order_rejected() {
    let (_tmp, config_path) = setup_test_env();

    run_advdir(&config_path, &["init"]);
    let (_, stderr, success) = run_advdir(&config_path, &["search", "--order-by", "name"]);
    assert!(!success);
    assert!(stderr.contains("orderBy must be"), "got: {}", stderr);
}

#[test]
fn test_relevance_order() {
    let (_tmp, config_path) = setup_test_env();

    run_advdir(&config_path, &["seed"]);
    let (stdout, _, success) = run_advdir(
        &config_path,
        &["search", "jane", "--order-by", "relevance"],
    );
    assert!(success);
    assert!(stdout.contains("Jane Smith"));
}
