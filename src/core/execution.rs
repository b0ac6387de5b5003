//! # Comparison Pipeline Module / 对比流水线模块
//!
//! The ordered, fail-fast sequence at the heart of the tool: clean the
//! working tree, then for each of the two revisions check it out, configure
//! and build it, and run the direct program against the built library.
//! Every external process is waited on before the next step begins; the
//! first non-zero exit aborts the whole run.
//!
//! 工具核心的有序、快速失败序列：清理工作树，然后对两个修订版本分别
//! 执行检出、配置和构建，并针对构建出的库运行直接程序。
//! 每个外部进程都会在下一步开始前等待完成；第一个非零退出会中止整个运行。

use anyhow::{Context, Result};
use colored::*;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::process::Command;

use crate::core::config::RunConfig;
use crate::core::models::{BuildStep, CompareError, Phase, PhaseReport, RunReport};
use crate::infra::{command, t};

/// Build descriptor whose presence in the working directory enables the
/// initial clean. The mid-run and final cleans are unconditional.
pub const BUILD_DESCRIPTOR: &str = "Makefile";

/// Where the build chain leaves the library artifacts, relative to the
/// working directory.
pub const BUILD_OUTPUT_DIR: &str = "blib/arch";

/// The environment variable augmented with the build output directory when
/// the direct program runs.
#[cfg(target_os = "macos")]
pub const LIBRARY_PATH_VAR: &str = "DYLD_LIBRARY_PATH";
#[cfg(windows)]
pub const LIBRARY_PATH_VAR: &str = "PATH";
#[cfg(not(any(target_os = "macos", windows)))]
pub const LIBRARY_PATH_VAR: &str = "LD_LIBRARY_PATH";

/// Names of the external tools the pipeline shells out to. Overridable
/// through the environment for unusual installations; the integration
/// tests substitute recording stubs the same way.
///
/// 流水线调用的外部工具名称。可通过环境变量覆盖以适应特殊安装；
/// 集成测试也以同样的方式替换为记录用的桩程序。
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub git: String,
    pub make: String,
    pub perl: String,
}

impl Toolchain {
    pub fn from_env() -> Self {
        Self {
            git: env::var("REV_COMPARE_GIT").unwrap_or_else(|_| "git".to_string()),
            make: env::var("REV_COMPARE_MAKE").unwrap_or_else(|_| "make".to_string()),
            perl: env::var("REV_COMPARE_PERL").unwrap_or_else(|_| "perl".to_string()),
        }
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Runs the full before/after comparison for a validated configuration.
///
/// The "after" phase never starts unless the "before" phase fully
/// succeeded, because both phases mutate the same checkout in place.
/// Nothing is rolled back on failure: a run that dies mid-way leaves the
/// working tree at whatever revision it had reached.
///
/// 为经过验证的配置运行完整的前后对比。
/// 只有 "before" 阶段完全成功后，"after" 阶段才会开始，
/// 因为两个阶段就地修改同一个检出目录。
/// 失败时不会回滚：中途终止的运行会将工作树留在它到达的任何修订版本上。
pub async fn run_comparison(config: &RunConfig) -> Result<RunReport> {
    let tools = Toolchain::from_env();
    let started = Instant::now();

    if config.work_dir.join(BUILD_DESCRIPTOR).exists() {
        clean(&tools, config, None).await?;
    }

    let before = run_phase(&tools, config, Phase::Before, &config.before).await?;
    clean(&tools, config, Some(Phase::Before)).await?;

    let after = run_phase(&tools, config, Phase::After, &config.after).await?;
    clean(&tools, config, Some(Phase::After)).await?;

    Ok(RunReport {
        phases: vec![before, after],
        total_duration: started.elapsed(),
    })
}

/// Checkout, configure+build, locate the library output, run the program.
async fn run_phase(
    tools: &Toolchain,
    config: &RunConfig,
    phase: Phase,
    revision: &str,
) -> Result<PhaseReport> {
    let checkout_started = Instant::now();
    checkout(tools, config, phase, revision).await?;
    let checkout_duration = checkout_started.elapsed();

    let build_started = Instant::now();
    configure(tools, config, phase).await?;
    build(tools, config, phase).await?;
    let build_duration = build_started.elapsed();

    let lib_dir = locate_build_output(config, phase)?;

    let run_started = Instant::now();
    run_direct_program(config, phase, &lib_dir).await?;
    let run_duration = run_started.elapsed();

    println!(
        "{}",
        t!(
            "run.phase_complete",
            phase = phase.as_str(),
            revision = revision
        )
        .green()
    );

    Ok(PhaseReport {
        phase,
        revision: revision.to_string(),
        checkout_duration,
        build_duration,
        run_duration,
    })
}

async fn checkout(
    tools: &Toolchain,
    config: &RunConfig,
    phase: Phase,
    revision: &str,
) -> Result<()> {
    println!(
        "{}",
        t!(
            "run.checking_out",
            phase = phase.as_str(),
            revision = revision
        )
        .blue()
    );

    let mut cmd = Command::new(&tools.git);
    cmd.arg("checkout")
        .arg(revision)
        .kill_on_drop(true)
        .current_dir(&config.work_dir);

    let result = command::capture(cmd)
        .await
        .with_context(|| format!("Failed to execute '{}'", tools.git))?;
    relay(&result.output);

    if !result.status.success() {
        return Err(CompareError::Checkout {
            phase,
            revision: revision.to_string(),
            code: result.status.code(),
        }
        .into());
    }
    Ok(())
}

async fn clean(tools: &Toolchain, config: &RunConfig, phase: Option<Phase>) -> Result<()> {
    println!("{}", t!("run.cleaning").blue());

    let mut cmd = Command::new(&tools.make);
    cmd.arg("clean")
        .kill_on_drop(true)
        .current_dir(&config.work_dir);

    run_build_step(cmd, &tools.make, BuildStep::Clean, phase).await
}

async fn configure(tools: &Toolchain, config: &RunConfig, phase: Phase) -> Result<()> {
    println!("{}", t!("run.configuring", phase = phase.as_str()).blue());

    let mut cmd = Command::new(&tools.perl);
    cmd.arg("Makefile.PL")
        .kill_on_drop(true)
        .current_dir(&config.work_dir);

    run_build_step(cmd, &tools.perl, BuildStep::Configure, Some(phase)).await
}

async fn build(tools: &Toolchain, config: &RunConfig, phase: Phase) -> Result<()> {
    println!("{}", t!("run.building", phase = phase.as_str()).blue());

    let mut cmd = Command::new(&tools.make);
    cmd.kill_on_drop(true).current_dir(&config.work_dir);

    run_build_step(cmd, &tools.make, BuildStep::Build, Some(phase)).await
}

/// Shared tail of every build-system invocation: capture, relay, check.
async fn run_build_step(
    cmd: Command,
    tool: &str,
    step: BuildStep,
    phase: Option<Phase>,
) -> Result<()> {
    let result = command::capture(cmd)
        .await
        .with_context(|| format!("Failed to execute '{}'", tool))?;
    relay(&result.output);

    if !result.status.success() {
        return Err(CompareError::Build {
            phase,
            step,
            code: result.status.code(),
        }
        .into());
    }
    Ok(())
}

/// The build output directory is a fixed relative path; its absence after a
/// successful build means the build chain did not produce the library.
fn locate_build_output(config: &RunConfig, phase: Phase) -> Result<PathBuf, CompareError> {
    let path = config.work_dir.join(BUILD_OUTPUT_DIR);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(CompareError::MissingBuildOutput { phase, path })
    }
}

/// Prepends the library directory to the platform's library search path,
/// keeping whatever the caller's environment already had.
///
/// 将库目录前置到平台的库搜索路径中，保留调用者环境中已有的内容。
pub fn augmented_library_path(lib_dir: &Path) -> OsString {
    let mut paths = vec![lib_dir.to_path_buf()];
    if let Some(existing) = env::var_os(LIBRARY_PATH_VAR) {
        paths.extend(env::split_paths(&existing));
    }
    env::join_paths(paths).unwrap_or_else(|_| lib_dir.as_os_str().to_os_string())
}

/// Builds the direct program's argument list from the run configuration:
/// the mode selector flag (if any) and `--verbose` are passed through.
pub fn direct_program_args(config: &RunConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::new();
    if let Some(flag) = config.mode.flag() {
        args.push(flag.into());
    }
    if config.verbose {
        args.push("--verbose".into());
    }
    args
}

/// Runs the direct program with the library search path augmented and its
/// output inherited, so test and benchmark results stream straight through.
/// The program's output is relayed, never interpreted; only the exit status
/// matters.
async fn run_direct_program(config: &RunConfig, phase: Phase, lib_dir: &Path) -> Result<()> {
    let args = direct_program_args(config);

    println!(
        "{}",
        t!(
            "run.running_program",
            phase = phase.as_str(),
            program = config.program.display()
        )
        .blue()
    );
    if config.verbose {
        println!(
            "{} {}",
            t!("run.command_prefix").blue(),
            command::render(config.program.as_os_str(), &args)
        );
    }

    let mut cmd = Command::new(&config.program);
    cmd.args(&args)
        .env(LIBRARY_PATH_VAR, augmented_library_path(lib_dir))
        .kill_on_drop(true)
        .current_dir(&config.work_dir);

    let status = cmd
        .status()
        .await
        .with_context(|| format!("Failed to execute '{}'", config.program.display()))?;

    if !status.success() {
        return Err(CompareError::Execution {
            phase,
            code: status.code(),
        }
        .into());
    }
    Ok(())
}

fn relay(output: &str) {
    if !output.trim().is_empty() {
        println!("{}", output.trim_end());
    }
}
