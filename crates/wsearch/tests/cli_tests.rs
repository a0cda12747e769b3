use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use wsearch_testkit::{temp_dir_in_workspace, write_sample_workspace};

fn wsearch() -> Command {
    Command::new(env!("CARGO_BIN_EXE_wsearch"))
}

#[test]
fn test_grep_plain_output() {
    let temp = temp_dir_in_workspace();
    write_sample_workspace(temp.path());

    wsearch()
        .current_dir(temp.path())
        .args(["grep", "app"])
        .assert()
        .success()
        .stdout(predicate::eq("src/App.tsx:10: const App = () => {\n"));
}

#[test]
fn test_grep_json_output() {
    let temp = temp_dir_in_workspace();
    write_sample_workspace(temp.path());

    let assert = wsearch()
        .arg("grep")
        .arg("function")
        .arg("--root")
        .arg(temp.path())
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let value: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "results",
            "results": [{
                "file": "src/components/Editor.tsx",
                "line": 42,
                "preview": "function handleSave() {"
            }]
        })
    );
}

#[test]
fn test_grep_respects_config_limits() {
    let temp = temp_dir_in_workspace();
    write_sample_workspace(temp.path());
    std::fs::write(
        temp.path().join("wsearch.toml"),
        "[search]\nexclude_dirs = [\"components\"]\n",
    )
    .unwrap();

    wsearch()
        .current_dir(temp.path())
        .args(["grep", "function"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_grep_invalid_root_fails() {
    let temp = temp_dir_in_workspace();

    wsearch()
        .current_dir(temp.path())
        .args(["grep", "x", "--root", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("INVALID_ROOT"));
}

#[test]
fn test_serve_invalid_root_fails_at_startup() {
    let temp = temp_dir_in_workspace();

    wsearch()
        .current_dir(temp.path())
        .args(["serve", "--root", "missing", "--bind", "127.0.0.1:0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot search"));
}

#[test]
fn test_query_without_server_fails() {
    let temp = temp_dir_in_workspace();
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    wsearch()
        .current_dir(temp.path())
        .args(["query", "App", "--url", &format!("ws://127.0.0.1:{}", port)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Search did not complete"));
}
