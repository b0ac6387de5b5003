//! # Console Reporting Module / 控制台报告模块
//!
//! Prints the per-phase timing summary after a successful comparison.
//! The point of the whole exercise is to eyeball how the two revisions
//! compare, so the two rows are aligned for easy side-by-side reading.
//!
//! 在对比成功后打印分阶段计时摘要。
//! 整个工具的目的就是直观比较两个修订版本，
//! 因此两行对齐排列以便并排阅读。

use colored::*;
use std::time::Duration;

use crate::core::models::{PhaseReport, RunReport};
use crate::infra::t;

/// Prints a formatted summary of both phases to the console.
///
/// # Output Format / 输出格式
/// ```text
/// --- Comparison Summary ---
///   - before | v1.1.0       | checkout   0.11s | build  12.40s | run  33.02s
///   - after  | refactor-wip | checkout   0.09s | build  11.87s | run  28.55s
/// Total: 86.04s
/// ```
pub fn print_summary(report: &RunReport) {
    println!("\n{}", t!("summary.banner").bold());

    for phase in &report.phases {
        println!("{}", phase_line(phase));
    }

    println!(
        "{}",
        t!(
            "summary.total",
            duration = format_duration(report.total_duration)
        )
    );
}

/// Formats a single summary row. The phase label is padded before it is
/// colorized, so ANSI escape sequences do not count against the column
/// width and both rows stay aligned on color terminals.
pub fn phase_line(phase: &PhaseReport) -> String {
    format!(
        "  - {} | {:<24} | checkout {:>7} | build {:>7} | run {:>7}",
        format!("{:<6}", phase.phase.as_str()).cyan(),
        phase.revision,
        format_duration(phase.checkout_duration),
        format_duration(phase.build_duration),
        format_duration(phase.run_duration),
    )
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}
