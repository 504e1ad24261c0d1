/// CLI binary integration tests using assert_cmd
///
/// These tests invoke the actual binary and verify command-line behavior
mod common;

use std::fs;
use std::io::{Cursor, Write};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

use common::{
    ClaudeCodeLogBuilder, HomeBuilder, chatgpt_forked_export, claude_web_export, codex_rollout,
    collection_files, write_document,
};

fn palimpsest(home: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_palimpsest"));
    cmd.env("HOME", home).env_remove("PALIMPSEST_VAULT").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_lists_commands() {
    let temp = TempDir::new().unwrap();
    palimpsest(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ingest"))
        .stdout(predicate::str::contains("tag"))
        .stdout(predicate::str::contains("backlink"))
        .stdout(predicate::str::contains("sync"));
}

#[test]
fn test_cli_version_flag() {
    let temp = TempDir::new().unwrap();
    palimpsest(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_cli_invalid_command() {
    let temp = TempDir::new().unwrap();
    palimpsest(temp.path()).arg("invalid-command").assert().failure();
}

#[test]
fn test_cli_rejects_unknown_source() {
    let temp = TempDir::new().unwrap();
    palimpsest(temp.path())
        .args(["ingest", "--source", "gemini"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("claude-web"));
}

#[test]
fn test_cli_ingest_export_then_reingest() {
    let temp = TempDir::new().unwrap();
    let export = temp.path().join("conversations.json");
    fs::write(&export, claude_web_export(2)).unwrap();
    let vault = temp.path().join("vault");

    palimpsest(temp.path())
        .args(["ingest", "--source", "claude-web", "--input"])
        .arg(&export)
        .arg("--vault")
        .arg(&vault)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "claude-web: 2 conversations parsed from 1 files: 2 written, 0 already",
        ));

    palimpsest(temp.path())
        .args(["ingest", "--source", "claude-web", "--input"])
        .arg(&export)
        .arg("--vault")
        .arg(&vault)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 written, 2 already in collection"));

    assert_eq!(collection_files(&vault).len(), 2);
}

#[test]
fn test_cli_vault_from_environment() {
    let temp = TempDir::new().unwrap();
    let export = temp.path().join("conversations.json");
    fs::write(&export, claude_web_export(1)).unwrap();
    let vault = temp.path().join("env-vault");

    palimpsest(temp.path())
        .env("PALIMPSEST_VAULT", &vault)
        .args(["ingest", "--source", "claude-web", "--input"])
        .arg(&export)
        .assert()
        .success();

    assert_eq!(collection_files(&vault).len(), 1);
}

#[test]
fn test_cli_ingest_chatgpt_zip() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("export.zip");
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut buffer);
        writer.start_file("conversations.json", zip::write::SimpleFileOptions::default()).unwrap();
        writer.write_all(chatgpt_forked_export().as_bytes()).unwrap();
        writer.finish().unwrap();
    }
    fs::write(&archive, buffer.into_inner()).unwrap();
    let vault = temp.path().join("vault");

    palimpsest(temp.path())
        .args(["ingest", "--source", "chatgpt", "--input"])
        .arg(&archive)
        .arg("--vault")
        .arg(&vault)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 written"));

    let text = fs::read_to_string(&collection_files(&vault)[0]).unwrap();
    assert!(!text.contains("DISCARDED BRANCH C"));
}

#[test]
fn test_cli_export_without_input_fails() {
    let temp = TempDir::new().unwrap();
    palimpsest(temp.path())
        .args(["ingest", "--source", "chatgpt", "--vault"])
        .arg(temp.path().join("vault"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input is required"));
}

#[test]
fn test_cli_malformed_export_fails() {
    let temp = TempDir::new().unwrap();
    let export = temp.path().join("conversations.json");
    fs::write(&export, r#"{"title":"not an export"}"#).unwrap();

    palimpsest(temp.path())
        .args(["ingest", "--source", "chatgpt", "--input"])
        .arg(&export)
        .arg("--vault")
        .arg(temp.path().join("vault"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse chatgpt export"));
}

#[test]
fn test_cli_ingest_claude_code_default_location() {
    let home = HomeBuilder::new()
        .with_claude_code_session(
            "-home-dev-api",
            &ClaudeCodeLogBuilder::new("cc-1")
                .cwd("/home/dev/api")
                .user("Write a test")
                .assistant("Done"),
        )
        .with_claude_code_session(
            "-home-dev-api",
            &ClaudeCodeLogBuilder::new("cc-2")
                .raw_line(serde_json::json!({"type": "summary", "summary": "x"}))
                .user("Second session")
                .assistant("ok"),
        )
        .build();
    let vault = home.path().join("vault");

    palimpsest(home.path())
        .args(["ingest", "--source", "claude-code", "--vault"])
        .arg(&vault)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 conversations parsed from 2 files: 2 written"));

    let names: Vec<String> = collection_files(&vault)
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().any(|n| n.ends_with("_api-write-a-test.md")), "{:?}", names);
}

#[test]
fn test_cli_ingest_sessions_with_missing_defaults_is_empty() {
    let temp = TempDir::new().unwrap();
    palimpsest(temp.path())
        .args(["ingest", "--source", "codex", "--vault"])
        .arg(temp.path().join("vault"))
        .assert()
        .success()
        .stdout(predicate::str::contains("0 conversations parsed from 0 files"));
}

#[test]
fn test_cli_ingest_warns_on_garbage_lines() {
    let home = HomeBuilder::new()
        .with_file(
            "logs/rollout.jsonl",
            format!("{}\nnot json at all", codex_rollout("cx", "q", "a")).as_bytes(),
        )
        .build();

    palimpsest(home.path())
        .args(["ingest", "--source", "codex", "--input"])
        .arg(home.path().join("logs"))
        .arg("--vault")
        .arg(home.path().join("vault"))
        .assert()
        .success()
        .stdout(predicate::str::contains("1 written"))
        .stderr(predicate::str::contains("Skipping unparseable JSON line"));
}

#[test]
fn test_cli_tag_and_backlink() {
    let temp = TempDir::new().unwrap();
    let vault = temp.path().join("vault");
    write_document(&vault, "a", "Alpha", &["x", "y"]);
    write_document(&vault, "b", "Beta", &["x", "y"]);
    write_document(&vault, "c", "Gamma", &["z"]);

    palimpsest(temp.path())
        .arg("backlink")
        .arg("--vault")
        .arg(&vault)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added backlinks to 2 documents"));

    palimpsest(temp.path())
        .arg("tag")
        .arg("--vault")
        .arg(&vault)
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated tags in 3 documents"));

    palimpsest(temp.path())
        .arg("tag")
        .arg("--vault")
        .arg(&vault)
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated tags in 0 documents"));
}

#[test]
fn test_cli_backlink_missing_vault() {
    let temp = TempDir::new().unwrap();
    palimpsest(temp.path())
        .arg("backlink")
        .arg("--vault")
        .arg(temp.path().join("nothing-here"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Added backlinks to 0 documents"));
}

#[test]
fn test_cli_sync_ingests_everything_and_links() {
    let home = HomeBuilder::new()
        .with_claude_code_session(
            "-home-dev-app",
            &ClaudeCodeLogBuilder::new("cc-1").user("rust question").assistant("cargo answer"),
        )
        .with_codex_session(
            "2025/08/01/rollout-a.jsonl",
            &codex_rollout("cx-1", "rust cargo build", "done"),
        )
        .with_file("exports/claude.json", claude_web_export(2).as_bytes())
        .build();
    let vault = home.path().join("vault");

    palimpsest(home.path())
        .arg("sync")
        .arg("--vault")
        .arg(&vault)
        .arg("--claude-web")
        .arg(home.path().join("exports/claude.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("4 conversations parsed from 3 files: 4 written"))
        .stdout(predicate::str::contains("Added backlinks to"));

    assert_eq!(collection_files(&vault).len(), 4);
    let linked = collection_files(&vault)
        .iter()
        .filter(|p| fs::read_to_string(p).unwrap().contains("## Related\n\n- [["))
        .count();
    assert!(linked > 0);
}
