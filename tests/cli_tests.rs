//! CLI surface tests
//!
//! Exercises the binary end to end: exit codes, report output, and the
//! warm-up abort path against an address nothing listens on.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn doc_file(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::with_suffix(".md")?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test]
fn check_passes_on_clean_document() -> Result<()> {
    let doc = doc_file(
        "# API\n\n```bash\ncurl -X GET http://host/api/v1/health\ncurl 'http://host/api/v1/outputs?page=1&page_size=5'\n```\n",
    )?;

    Command::cargo_bin("doccheck")?
        .arg("check")
        .arg(doc.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("health: 1"))
        .stdout(predicate::str::contains("file_ops: 1"))
        .stdout(predicate::str::contains("total: 2"))
        .stdout(predicate::str::contains("passed: 2"))
        .stdout(predicate::str::contains("success rate: 100.0%"));
    Ok(())
}

#[test]
fn check_fails_on_unparseable_example() -> Result<()> {
    let doc = doc_file("```bash\ncurl -d '{\"unterminated\n```\n")?;

    Command::cargo_bin("doccheck")?
        .arg("check")
        .arg(doc.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("failed: 1"))
        .stdout(predicate::str::contains("parse failed"));
    Ok(())
}

#[test]
fn check_reports_zero_totals_for_empty_document() -> Result<()> {
    let doc = doc_file("# Nothing here\n\nJust prose.\n")?;

    Command::cargo_bin("doccheck")?
        .arg("check")
        .arg(doc.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("total: 0"))
        .stdout(predicate::str::contains("success rate: 0.0%"));
    Ok(())
}

#[test]
fn missing_file_exits_with_cli_args_code() -> Result<()> {
    Command::cargo_bin("doccheck")?
        .arg("check")
        .arg("definitely-not-a-real-file.md")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read"));
    Ok(())
}

#[test]
fn invalid_base_url_exits_with_cli_args_code() -> Result<()> {
    let doc = doc_file("```bash\ncurl http://host/api/v1/health\n```\n")?;

    Command::cargo_bin("doccheck")?
        .arg("run")
        .arg(doc.path())
        .args(["--base-url", "localhost:7860"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("http://"));
    Ok(())
}

#[test]
fn unknown_skip_category_is_rejected() -> Result<()> {
    let doc = doc_file("```bash\ncurl http://host/api/v1/health\n```\n")?;

    Command::cargo_bin("doccheck")?
        .arg("run")
        .arg(doc.path())
        .args(["--skip", "bogus_category"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown category"));
    Ok(())
}

#[test]
fn unreachable_server_aborts_with_server_unreachable_code() -> Result<()> {
    let doc = doc_file(
        "```bash\ncurl /api/v1/health\ncurl /api/v1/voices\ncurl /api/v1/outputs\n```\n",
    )?;

    // Port 1 on loopback: connection refused, so the warm-up request fails at
    // the transport level and the run aborts after the first attempt
    Command::cargo_bin("doccheck")?
        .arg("run")
        .arg(doc.path())
        .args(["--base-url", "http://127.0.0.1:1", "--timeout", "2", "--warmup-timeout", "2"])
        .assert()
        .code(70)
        .stdout(predicate::str::contains("total: 1"))
        .stdout(predicate::str::contains("server unreachable"))
        .stderr(predicate::str::contains("server unreachable"));
    Ok(())
}

#[test]
fn env_base_url_is_used_when_no_flag() -> Result<()> {
    let doc = doc_file("```bash\ncurl /api/v1/health\n```\n")?;

    // Invalid scheme from the environment proves the variable was read
    Command::cargo_bin("doccheck")?
        .arg("run")
        .arg(doc.path())
        .env("DOCCHECK_BASE_URL", "ftp://wrong")
        .assert()
        .code(2);
    Ok(())
}

#[test]
fn help_names_both_subcommands() -> Result<()> {
    Command::cargo_bin("doccheck")?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("run"));
    Ok(())
}
