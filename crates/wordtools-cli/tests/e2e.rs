//! End-to-end tests for the wordtools CLI.
//!
//! Tests invoke the `wordtools` binary as a subprocess and verify its
//! output and the history file it leaves behind.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const DAY: &str = "2025/3/1";
const NEXT_DAY: &str = "2025/3/2";

fn wordtools_in(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wordtools"));
    cmd.current_dir(dir).env_remove("WORDTOOLS_CONFIG");
    cmd
}

fn run_ok(dir: &Path, args: &[&str]) -> Output {
    let output = wordtools_in(dir).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

fn history_file(dir: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(dir.join(".wordtools").join("history.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn vault_with(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
    dir
}

// === count ===

#[test]
fn e2e_count_reports_words_and_chars() {
    let dir = vault_with(&[(
        "note.md",
        "---\ntitle: ignored here\n---\nHello [[Some Page|world]]!",
    )]);
    let output = run_ok(dir.path(), &["count", "note.md", "--json"]);
    let result = json(&output);
    assert_eq!(result["words"], 2);
    assert_eq!(result["chars"], "Hello world!".chars().count());

    let output = run_ok(dir.path(), &["count", "note.md"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 words"));
}

#[test]
fn e2e_count_reads_stdin() {
    let dir = TempDir::new().unwrap();
    let mut child = wordtools_in(dir.path())
        .args(["count", "-", "--json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"one two %%hidden words%% three")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(json(&output)["words"], 3);
}

#[test]
fn e2e_count_honors_config() {
    let dir = vault_with(&[
        ("note.md", "one %%two three%%"),
        ("config.toml", "[count]\ncount_comments = true\n"),
    ]);
    let output = run_ok(dir.path(), &["count", "note.md", "--json"]);
    assert_eq!(json(&output)["words"], 1);

    let output = run_ok(
        dir.path(),
        &["--config", "config.toml", "count", "note.md", "--json"],
    );
    assert_eq!(json(&output)["words"], 3);
}

#[test]
fn e2e_count_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let output = wordtools_in(dir.path())
        .args(["count", "nope.md"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.md"));
}

// === record / today ===

#[test]
fn e2e_record_tracks_words_written_today() {
    let dir = vault_with(&[("notes/draft.md", "one two three")]);

    let first = json(&run_ok(
        dir.path(),
        &["--day", DAY, "record", "notes/draft.md", "--json"],
    ));
    assert_eq!(first["path"], "notes/draft.md");
    assert_eq!(first["words"], 3);
    assert_eq!(first["daily_total"], 0);

    std::fs::write(dir.path().join("notes/draft.md"), "one two three four five").unwrap();
    let second = json(&run_ok(
        dir.path(),
        &["--day", DAY, "record", "notes/draft.md", "--json"],
    ));
    assert_eq!(second["daily_total"], 2);

    let history = history_file(dir.path());
    let tracker = &history[DAY]["files"]["notes/draft.md"];
    assert_eq!(tracker["initialCount"], 3);
    assert_eq!(tracker["currentCount"], 5);
    assert_eq!(history[DAY]["total"], 2);
    assert_eq!(history[DAY]["goal"], 500);

    let output = run_ok(dir.path(), &["--day", DAY, "today"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "2/500 words today");
}

#[test]
fn e2e_today_clamps_deletions() {
    let dir = vault_with(&[("a.md", "one two three four")]);
    run_ok(dir.path(), &["--day", DAY, "record", "a.md"]);
    std::fs::write(dir.path().join("a.md"), "one").unwrap();
    run_ok(dir.path(), &["--day", DAY, "record", "a.md"]);

    let today = json(&run_ok(dir.path(), &["--day", DAY, "today", "--json"]));
    assert_eq!(today["total"], -3);
    assert_eq!(today["display"], 0);
}

#[test]
fn e2e_today_hides_goal() {
    let dir = vault_with(&[(".wordtools/config.toml", "show_goal = false\n")]);
    let output = run_ok(dir.path(), &["--day", DAY, "today"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "0 words today");
}

#[test]
fn e2e_open_seeds_without_counting() {
    let dir = vault_with(&[("a.md", "one two three")]);
    run_ok(dir.path(), &["--day", DAY, "open", "a.md"]);
    run_ok(dir.path(), &["--day", DAY, "open", "a.md"]);

    let history = history_file(dir.path());
    assert_eq!(history[DAY]["files"]["a.md"]["initialCount"], 3);
    assert_eq!(history[DAY]["total"], 0);
}

#[test]
fn e2e_new_day_freezes_previous_day() {
    let dir = vault_with(&[("a.md", "one")]);
    run_ok(dir.path(), &["--day", DAY, "record", "a.md"]);
    std::fs::write(dir.path().join("a.md"), "one two three").unwrap();
    run_ok(dir.path(), &["--day", DAY, "record", "a.md"]);
    run_ok(dir.path(), &["--day", NEXT_DAY, "record", "a.md"]);

    let history = history_file(dir.path());
    assert!(history[DAY].get("files").is_none());
    assert_eq!(history[DAY]["total"], 2);

    // A late event for the frozen day changes nothing.
    std::fs::write(dir.path().join("a.md"), "one two three four five six").unwrap();
    let late = json(&run_ok(dir.path(), &["--day", DAY, "record", "a.md", "--json"]));
    assert_eq!(late["frozen"], true);
    assert_eq!(history_file(dir.path())[DAY]["total"], 2);
}

#[test]
fn e2e_invalid_day_fails() {
    let dir = TempDir::new().unwrap();
    let output = wordtools_in(dir.path())
        .args(["--day", "2025-03-01", "today"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--day"));
}

#[test]
fn e2e_custom_history_path() {
    let dir = vault_with(&[("a.md", "one")]);
    let history = dir.path().join("elsewhere.json");
    run_ok(
        dir.path(),
        &["--history", history.to_str().unwrap(), "--day", DAY, "record", "a.md"],
    );
    assert!(history.exists());
    assert!(!dir.path().join(".wordtools").exists());
}

// === rename ===

#[test]
fn e2e_rename_moves_tracker() {
    let dir = vault_with(&[("old.md", "one two")]);
    run_ok(dir.path(), &["--day", DAY, "record", "old.md"]);
    std::fs::rename(dir.path().join("old.md"), dir.path().join("new.md")).unwrap();

    let output = run_ok(dir.path(), &["--day", DAY, "rename", "old.md", "new.md"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("old.md -> new.md"));

    let history = history_file(dir.path());
    assert!(history[DAY]["files"].get("old.md").is_none());
    assert_eq!(history[DAY]["files"]["new.md"]["initialCount"], 2);
}

#[test]
fn e2e_rename_untracked_fails() {
    let dir = vault_with(&[("a.md", "x")]);
    let output = wordtools_in(dir.path())
        .args(["--day", DAY, "rename", "a.md", "b.md"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not tracked"));
}

// === history ===

#[test]
fn e2e_history_lists_days_in_order() {
    let dir = vault_with(&[("a.md", "one")]);
    for day in ["2025/2/28", "2025/3/10", "2025/3/9"] {
        std::fs::write(dir.path().join("a.md"), "one").unwrap();
        run_ok(dir.path(), &["--day", day, "record", "a.md"]);
        std::fs::write(dir.path().join("a.md"), "one two").unwrap();
        run_ok(dir.path(), &["--day", day, "record", "a.md"]);
    }

    let rows = json(&run_ok(dir.path(), &["history", "--json"]));
    let days: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["day"].as_str().unwrap())
        .collect();
    assert_eq!(days, ["2025/2/28", "2025/3/9", "2025/3/10"]);
    assert!(rows
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["total"] == 1));
}

#[test]
fn e2e_history_empty() {
    let dir = TempDir::new().unwrap();
    let output = run_ok(dir.path(), &["history"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("No history yet"));
}

// === vault ===

#[test]
fn e2e_vault_totals_markdown_files() {
    let dir = vault_with(&[
        ("a.md", "one two"),
        ("sub/b.md", "three [[Page|four]]"),
        ("sub/c.txt", "not counted"),
        (".obsidian/d.md", "hidden words here"),
    ]);
    let totals = json(&run_ok(dir.path(), &["vault", "--json"]));
    assert_eq!(totals["files"], 2);
    assert_eq!(totals["words"], 4);

    let other = TempDir::new().unwrap();
    let root = dir.path().to_str().unwrap();
    let output = run_ok(other.path(), &["vault", root]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("4 words"));
}

#[test]
fn e2e_vault_missing_root_fails() {
    let dir = TempDir::new().unwrap();
    let output = wordtools_in(dir.path())
        .args(["vault", "does-not-exist"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

// === config ===

#[test]
fn e2e_config_prints_effective_settings() {
    let dir = vault_with(&[(".wordtools/config.toml", "daily_word_goal = 750\n")]);
    let output = run_ok(dir.path(), &["config"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("daily_word_goal = 750"));
    assert!(stdout.contains("remove_frontmatter = true"));
}

#[test]
fn e2e_bad_config_fails() {
    let dir = vault_with(&[(".wordtools/config.toml", "daily_word_goal = -5\n")]);
    let output = wordtools_in(dir.path()).arg("config").output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("config"));
}

// === completions ===

#[test]
fn e2e_completions_bash() {
    let dir = TempDir::new().unwrap();
    let output = run_ok(dir.path(), &["completions", "bash"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("wordtools"));
}
