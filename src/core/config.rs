//! # Run Configuration Module / 运行配置模块
//!
//! Turns raw command-line values into a validated [`RunConfig`].
//! Validation is ordered the way the run needs it: every missing flag is
//! collected into a single error, contradictory mode flags are rejected
//! before any filesystem access, and path checks come last.
//!
//! 将原始命令行值转换为经过验证的 [`RunConfig`]。
//! 验证按运行所需的顺序进行：所有缺失的标志被收集到一个错误中，
//! 矛盾的模式标志在任何文件系统访问之前被拒绝，路径检查放在最后。

use std::path::PathBuf;

use crate::core::models::CompareError;
use crate::infra::fs;

/// Raw values as collected by the CLI layer, before any validation.
#[derive(Debug, Default, Clone)]
pub struct CompareArgs {
    pub workdir: Option<PathBuf>,
    pub program: Option<PathBuf>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub tests_only: bool,
    pub benchmarks_only: bool,
    pub verbose: bool,
    pub report: Option<PathBuf>,
}

/// What the direct program is asked to run.
/// 要求直接程序运行的内容。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Neither selector flag was given: the program runs everything.
    Both,
    TestsOnly,
    BenchmarksOnly,
}

impl Mode {
    /// The flag forwarded to the direct program, if any.
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            Mode::Both => None,
            Mode::TestsOnly => Some("--tests-only"),
            Mode::BenchmarksOnly => Some("--benchmarks-only"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Both => "tests and benchmarks",
            Mode::TestsOnly => "tests only",
            Mode::BenchmarksOnly => "benchmarks only",
        }
    }
}

/// A fully validated run configuration. Paths are absolute; the working
/// directory is an existing directory and the program an existing regular
/// file by construction.
///
/// 经过完整验证的运行配置。路径为绝对路径；
/// 构造时已保证工作目录是存在的目录、程序是存在的常规文件。
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub work_dir: PathBuf,
    pub program: PathBuf,
    pub before: String,
    pub after: String,
    pub mode: Mode,
    pub verbose: bool,
    pub report: Option<PathBuf>,
}

impl RunConfig {
    /// Validates raw CLI values into a [`RunConfig`].
    ///
    /// Checks run in contract order: missing flags (all of them reported at
    /// once), then the mode conflict, then path existence. `~` is expanded
    /// in both path flags before they are checked.
    pub fn from_args(args: CompareArgs) -> Result<Self, CompareError> {
        let mut missing = Vec::new();
        if args.workdir.is_none() {
            missing.push("--workdir");
        }
        if args.program.is_none() {
            missing.push("--program");
        }
        if args.before.as_deref().is_none_or(str::is_empty) {
            missing.push("--before");
        }
        if args.after.as_deref().is_none_or(str::is_empty) {
            missing.push("--after");
        }
        if !missing.is_empty() {
            return Err(CompareError::MissingFlags(missing));
        }

        let mode = match (args.tests_only, args.benchmarks_only) {
            (true, true) => return Err(CompareError::ConflictingModes),
            (true, false) => Mode::TestsOnly,
            (false, true) => Mode::BenchmarksOnly,
            (false, false) => Mode::Both,
        };

        // All four are present past the missing-flags check above.
        let (Some(workdir), Some(program), Some(before), Some(after)) =
            (args.workdir, args.program, args.before, args.after)
        else {
            return Err(CompareError::MissingFlags(missing));
        };

        let work_dir = fs::expand(&workdir);
        if !fs::is_directory(&work_dir) {
            return Err(CompareError::WorkDirMissing(work_dir));
        }
        let program = fs::expand(&program);
        if !fs::is_regular_file(&program) {
            return Err(CompareError::ProgramMissing(program));
        }

        // Resolve to absolute paths: subprocesses run with the working
        // directory as their cwd, so a relative program path would no
        // longer resolve from inside them.
        let work_dir =
            fs::absolute_path(&work_dir).map_err(|_| CompareError::WorkDirMissing(work_dir))?;
        let program =
            fs::absolute_path(&program).map_err(|_| CompareError::ProgramMissing(program))?;

        Ok(Self {
            work_dir,
            program,
            before,
            after,
            mode,
            verbose: args.verbose,
            report: args.report,
        })
    }
}
