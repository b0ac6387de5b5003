//! # Pipeline Sequence Integration Tests / 流水线顺序集成测试
//!
//! Drives the real binary against a stub toolchain that records every
//! invocation, asserting the exact external call order, the fail-fast
//! behavior and the phase tagging of errors. The stubs stand in for git,
//! make and perl through the `REV_COMPARE_*` overrides.
//!
//! 使用记录每次调用的桩工具链驱动真实的二进制文件，
//! 断言外部调用的确切顺序、快速失败行为以及错误的阶段标签。
//! 桩程序通过 `REV_COMPARE_*` 覆盖替代 git、make 和 perl。

#![cfg(unix)]

mod common;

use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::{tempdir, TempDir};

struct Fixture {
    _root: TempDir,
    log: PathBuf,
    work: PathBuf,
    program: PathBuf,
    tools: PathBuf,
}

fn fixture() -> Result<Fixture> {
    let root = tempdir().context("Failed to create temporary directory")?;
    let log = root.path().join("calls.log");

    let work = root.path().join("work");
    fs::create_dir(&work).context("Failed to create workdir")?;
    fs::write(work.join("Makefile"), "all:\n\ttrue\n").context("Failed to write Makefile")?;

    let program = work.join("t.sh");
    common::write_executable(
        &program,
        &format!(
            "#!/bin/sh\nprintf '%s\\n' \"program $*\" >> \"{log}\"\nexit 0\n",
            log = log.display()
        ),
    )?;

    let tools = root.path().join("tools");
    fs::create_dir(&tools).context("Failed to create tools dir")?;
    common::stub_toolchain(&tools, &log)?;

    Ok(Fixture {
        _root: root,
        log,
        work,
        program,
        tools,
    })
}

fn rev_compare(fx: &Fixture) -> Result<Command> {
    let mut cmd = Command::cargo_bin("rev-compare").context("Failed to locate binary")?;
    cmd.env("REV_COMPARE_GIT", fx.tools.join("git"))
        .env("REV_COMPARE_MAKE", fx.tools.join("make"))
        .env("REV_COMPARE_PERL", fx.tools.join("perl"))
        .arg("--lang")
        .arg("en")
        .arg("--workdir")
        .arg(&fx.work)
        .arg("--program")
        .arg(&fx.program)
        .arg("--before")
        .arg("v1")
        .arg("--after")
        .arg("v2");
    Ok(cmd)
}

/// The canonical scenario: with a build descriptor present and
/// `--tests-only`, the external calls happen in exactly the documented
/// order and the run exits zero.
#[test]
fn test_full_sequence_tests_only() -> Result<()> {
    let fx = fixture()?;

    rev_compare(&fx)?
        .arg("--tests-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("COMPARISON COMPLETED SUCCESSFULLY"));

    let expected = vec![
        "make clean",
        "git checkout v1",
        "perl Makefile.PL",
        "make",
        "program --tests-only",
        "make clean",
        "git checkout v2",
        "perl Makefile.PL",
        "make",
        "program --tests-only",
        "make clean",
    ];
    assert_eq!(common::read_log(&fx.log), expected);
    Ok(())
}

/// Without a build descriptor the initial clean is skipped; the mid-run
/// and final cleans still happen.
#[test]
fn test_missing_build_descriptor_skips_initial_clean() -> Result<()> {
    let fx = fixture()?;
    fs::remove_file(fx.work.join("Makefile")).context("Failed to remove Makefile")?;

    rev_compare(&fx)?.assert().success();

    let log = common::read_log(&fx.log);
    assert_eq!(log.first().map(String::as_str), Some("git checkout v1"));
    assert_eq!(log.iter().filter(|line| *line == "make clean").count(), 2);
    Ok(())
}

/// A failing program run in the before phase aborts the whole run: the
/// after revision is never checked out and the error names the phase.
///
/// before 阶段程序运行失败会中止整个运行：
/// after 修订版本永远不会被检出，且错误中指明了阶段。
#[test]
fn test_before_program_failure_stops_run() -> Result<()> {
    let fx = fixture()?;
    common::write_executable(
        &fx.program,
        &format!(
            "#!/bin/sh\nprintf '%s\\n' \"program $*\" >> \"{log}\"\nexit 1\n",
            log = fx.log.display()
        ),
    )?;

    rev_compare(&fx)?
        .arg("--tests-only")
        .assert()
        .failure()
        .stderr(predicate::str::contains("before phase"));

    let log = common::read_log(&fx.log);
    assert!(log.contains(&"git checkout v1".to_string()));
    assert!(!log.contains(&"git checkout v2".to_string()));
    Ok(())
}

/// A program failure in the after phase is tagged "after"; the final clean
/// never runs.
#[test]
fn test_after_program_failure_tagged_after() -> Result<()> {
    let fx = fixture()?;
    common::write_executable(
        &fx.program,
        &format!(
            "#!/bin/sh\nprintf '%s\\n' \"program $*\" >> \"{log}\"\nif [ -f .ran_once ]; then exit 1; fi\ntouch .ran_once\nexit 0\n",
            log = fx.log.display()
        ),
    )?;

    rev_compare(&fx)?
        .assert()
        .failure()
        .stderr(predicate::str::contains("after phase"));

    let log = common::read_log(&fx.log);
    assert!(log.contains(&"git checkout v2".to_string()));
    assert_eq!(log.iter().filter(|line| *line == "make clean").count(), 2);
    Ok(())
}

/// A failed checkout is a version-control error naming the revision.
#[test]
fn test_checkout_failure() -> Result<()> {
    let fx = fixture()?;
    common::stub_tool(&fx.tools, "git", &fx.log, "", 1)?;

    rev_compare(&fx)?
        .assert()
        .failure()
        .stderr(predicate::str::contains("checkout of 'v1' failed"))
        .stderr(predicate::str::contains("before phase"));

    let log = common::read_log(&fx.log);
    assert_eq!(log.last().map(String::as_str), Some("git checkout v1"));
    assert!(!log.contains(&"perl Makefile.PL".to_string()));
    Ok(())
}

/// A failing clean stops the run before anything is checked out.
#[test]
fn test_clean_failure_aborts_run() -> Result<()> {
    let fx = fixture()?;
    common::stub_tool(&fx.tools, "make", &fx.log, "", 1)?;

    rev_compare(&fx)?
        .assert()
        .failure()
        .stderr(predicate::str::contains("'clean' failed"));

    assert_eq!(common::read_log(&fx.log), vec!["make clean"]);
    Ok(())
}

/// If the build chain does not produce the library output directory, the
/// run fails before the program is ever invoked.
#[test]
fn test_missing_build_output_directory() -> Result<()> {
    let fx = fixture()?;
    // make succeeds but leaves no blib/arch behind
    common::stub_tool(&fx.tools, "make", &fx.log, "", 0)?;

    rev_compare(&fx)?
        .assert()
        .failure()
        .stderr(predicate::str::contains("build output directory not found"));

    let log = common::read_log(&fx.log);
    assert!(!log.iter().any(|line| line.starts_with("program")));
    Ok(())
}

/// `--verbose` echoes the exact constructed command line before each
/// program invocation, in both phases, and forwards the flag.
#[test]
fn test_verbose_echoes_constructed_command() -> Result<()> {
    let fx = fixture()?;
    let canonical_program =
        fs::canonicalize(&fx.program).context("program should canonicalize")?;
    let echoed = format!("{} --tests-only --verbose", canonical_program.display());

    rev_compare(&fx)?
        .arg("--tests-only")
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains(echoed).count(2));

    let log = common::read_log(&fx.log);
    assert_eq!(
        log.iter()
            .filter(|line| *line == "program --tests-only --verbose")
            .count(),
        2
    );
    Ok(())
}

/// `--report` writes a JSON document describing both phases.
#[test]
fn test_json_report() -> Result<()> {
    let fx = fixture()?;
    let report_path = fx.work.join("report.json");

    rev_compare(&fx)?
        .arg("--benchmarks-only")
        .arg("--report")
        .arg(&report_path)
        .assert()
        .success();

    let raw = fs::read_to_string(&report_path).context("report should exist")?;
    let report: serde_json::Value =
        serde_json::from_str(&raw).context("report should be JSON")?;

    let phases = report["phases"].as_array().context("phases array")?;
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0]["phase"], "before");
    assert_eq!(phases[0]["revision"], "v1");
    assert_eq!(phases[1]["phase"], "after");
    assert_eq!(phases[1]["revision"], "v2");
    assert_eq!(report["mode"], "benchmarks only");
    assert!(report["total_secs"].as_f64().unwrap_or(-1.0) >= 0.0);
    Ok(())
}
