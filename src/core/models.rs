//! # Core Models Module / 核心模型模块
//!
//! Data types shared across the comparison pipeline: the phase tag, the
//! error taxonomy and the per-phase timing reports.
//!
//! 对比流水线共享的数据类型：阶段标签、错误分类和每个阶段的计时报告。

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::infra::t;

/// Identifies which half of the comparison an operation belongs to.
/// Errors and reports are tagged with the phase so the user can tell
/// which revision was being exercised when something failed.
///
/// 标识一个操作属于对比的哪一半。
/// 错误和报告都带有阶段标签，以便用户知道失败时正在处理哪个修订版本。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The first revision checked out and exercised.
    /// 第一个检出并运行的修订版本。
    Before,
    /// The second revision. Never starts before the first fully completes.
    /// 第二个修订版本。在第一个完全成功之前绝不会开始。
    After,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Before => "before",
            Phase::After => "after",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The build-system step that was running when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Clean,
    Configure,
    Build,
}

impl BuildStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStep::Clean => "clean",
            BuildStep::Configure => "configure",
            BuildStep::Build => "build",
        }
    }
}

/// Coarse error categories, mirroring the failure surface of the run:
/// bad input, missing paths, version control, the build chain, and the
/// direct program itself.
///
/// 粗粒度的错误类别，对应运行的失败面：
/// 错误的输入、缺失的路径、版本控制、构建链，以及直接程序本身。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Environment,
    Vcs,
    Build,
    Execution,
}

/// Every fatal condition the run can stop on. There is no retry and no
/// rollback: the first error aborts the whole comparison.
///
/// 运行可能中止的每一种致命情况。没有重试也没有回滚：
/// 第一个错误就会中止整个对比。
#[derive(Debug)]
pub enum CompareError {
    /// One or more required flags were absent or empty. Carries every
    /// missing flag, not just the first one encountered.
    MissingFlags(Vec<&'static str>),
    /// `--tests-only` and `--benchmarks-only` were both given.
    ConflictingModes,
    /// The working directory does not exist or is not a directory.
    WorkDirMissing(PathBuf),
    /// The direct program does not exist or is not a regular file.
    ProgramMissing(PathBuf),
    /// The build completed but the library output directory is absent.
    MissingBuildOutput { phase: Phase, path: PathBuf },
    /// `git checkout` exited non-zero.
    Checkout {
        phase: Phase,
        revision: String,
        code: Option<i32>,
    },
    /// A clean, configure or build step exited non-zero. The initial clean
    /// runs before any phase starts, hence the optional tag.
    Build {
        phase: Option<Phase>,
        step: BuildStep,
        code: Option<i32>,
    },
    /// The direct program exited non-zero.
    Execution { phase: Phase, code: Option<i32> },
}

impl CompareError {
    /// Maps the error onto its coarse category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompareError::MissingFlags(_) | CompareError::ConflictingModes => ErrorKind::Config,
            CompareError::WorkDirMissing(_)
            | CompareError::ProgramMissing(_)
            | CompareError::MissingBuildOutput { .. } => ErrorKind::Environment,
            CompareError::Checkout { .. } => ErrorKind::Vcs,
            CompareError::Build { .. } => ErrorKind::Build,
            CompareError::Execution { .. } => ErrorKind::Execution,
        }
    }
}

/// Formats an exit code for display. `None` means the process was killed
/// by a signal rather than exiting.
fn code_str(code: Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            CompareError::MissingFlags(flags) => {
                t!("error.missing_flags", flags = flags.join(", "))
            }
            CompareError::ConflictingModes => t!("error.conflicting_modes"),
            CompareError::WorkDirMissing(path) => {
                t!("error.workdir_missing", path = path.display())
            }
            CompareError::ProgramMissing(path) => {
                t!("error.program_missing", path = path.display())
            }
            CompareError::MissingBuildOutput { phase, path } => t!(
                "error.missing_build_output",
                phase = phase.as_str(),
                path = path.display()
            ),
            CompareError::Checkout {
                phase,
                revision,
                code,
            } => t!(
                "error.checkout_failed",
                revision = revision,
                phase = phase.as_str(),
                code = code_str(*code)
            ),
            CompareError::Build { phase, step, code } => match phase {
                Some(phase) => t!(
                    "error.build_failed_phase",
                    step = step.as_str(),
                    phase = phase.as_str(),
                    code = code_str(*code)
                ),
                None => t!(
                    "error.build_failed",
                    step = step.as_str(),
                    code = code_str(*code)
                ),
            },
            CompareError::Execution { phase, code } => t!(
                "error.execution_failed",
                phase = phase.as_str(),
                code = code_str(*code)
            ),
        };
        f.write_str(&message)
    }
}

impl std::error::Error for CompareError {}

/// Timings collected for one successfully completed phase.
/// 为一个成功完成的阶段收集的计时。
#[derive(Debug, Clone)]
pub struct PhaseReport {
    pub phase: Phase,
    /// The revision that was checked out for this phase.
    pub revision: String,
    pub checkout_duration: Duration,
    /// Configure and build combined.
    pub build_duration: Duration,
    pub run_duration: Duration,
}

impl PhaseReport {
    /// Total wall-clock time spent in this phase.
    pub fn total(&self) -> Duration {
        self.checkout_duration + self.build_duration + self.run_duration
    }
}

/// The outcome of a full before/after run. Only produced when both phases
/// completed successfully.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub phases: Vec<PhaseReport>,
    pub total_duration: Duration,
}
