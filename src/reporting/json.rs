//! # JSON Reporting Module / JSON 报告模块
//!
//! Writes a machine-readable report of a completed comparison, for CI jobs
//! or scripts that want to track timings across runs.
//!
//! 为已完成的对比写入机器可读的报告，供希望跨运行跟踪耗时的 CI 任务或脚本使用。

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::config::RunConfig;
use crate::core::models::{PhaseReport, RunReport};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Local>,
    work_dir: String,
    program: String,
    mode: &'a str,
    phases: Vec<JsonPhase<'a>>,
    total_secs: f64,
}

#[derive(Serialize)]
struct JsonPhase<'a> {
    phase: &'a str,
    revision: &'a str,
    checkout_secs: f64,
    build_secs: f64,
    run_secs: f64,
}

impl<'a> From<&'a PhaseReport> for JsonPhase<'a> {
    fn from(report: &'a PhaseReport) -> Self {
        Self {
            phase: report.phase.as_str(),
            revision: &report.revision,
            checkout_secs: report.checkout_duration.as_secs_f64(),
            build_secs: report.build_duration.as_secs_f64(),
            run_secs: report.run_duration.as_secs_f64(),
        }
    }
}

/// Serializes the run report as pretty-printed JSON at `path`.
pub fn write_json_report(report: &RunReport, config: &RunConfig, path: &Path) -> Result<()> {
    let document = JsonReport {
        generated_at: Local::now(),
        work_dir: config.work_dir.display().to_string(),
        program: config.program.display().to_string(),
        mode: config.mode.as_str(),
        phases: report.phases.iter().map(JsonPhase::from).collect(),
        total_secs: report.total_duration.as_secs_f64(),
    };

    let rendered =
        serde_json::to_string_pretty(&document).context("Failed to serialize the run report")?;
    fs::write(path, rendered)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}
