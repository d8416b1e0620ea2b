use assert_cmd::Command;
use predicates::prelude::*;

fn notesearch_cmd() -> Command {
    let mut cmd = Command::cargo_bin("notesearch").unwrap();
    cmd.env_remove("NOTESEARCH_PROXY_URL")
        .env_remove("NOTESEARCH_MAX_PAGES")
        .env_remove("NOTESEARCH_MIN_BATCH")
        .env_remove("NOTESEARCH_TIMEOUT_SECS")
        .env_remove("NOTESEARCH_UTC_OFFSET_HOURS");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    notesearch_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("sources"));
}

#[test]
fn test_fetch_help_shows_format_options() {
    notesearch_cmd()
        .arg("fetch")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--filter"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("tsv"))
        .stdout(predicate::str::contains("csv"));
}

#[test]
fn test_sources_lists_all_platforms() {
    notesearch_cmd()
        .arg("sources")
        .assert()
        .success()
        .stdout(predicate::str::contains("note (note)"))
        .stdout(predicate::str::contains("zenn (Zenn)"))
        .stdout(predicate::str::contains("qiita (Qiita)"))
        .stdout(predicate::str::contains("https://qiita.com/api/v2/items"));
}

#[test]
fn test_unknown_source_fails() {
    notesearch_cmd()
        .args(["fetch", "medium", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported source: medium"));
}

#[test]
fn test_blank_user_id_fails_without_fetching() {
    notesearch_cmd()
        .args(["fetch", "zenn", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User ID must not be empty"));
}

#[test]
fn test_invalid_config_is_reported() {
    notesearch_cmd()
        .args(["fetch", "qiita", "alice"])
        .env("NOTESEARCH_MAX_PAGES", "many")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_unreachable_proxy_is_hard_failure() {
    notesearch_cmd()
        .args(["fetch", "note", "alice"])
        .env("NOTESEARCH_PROXY_URL", "http://127.0.0.1:9/?")
        .env("NOTESEARCH_TIMEOUT_SECS", "2")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: HTTP request failed"))
        .stderr(predicate::str::contains("Fetch failed").not());
}
