// src/commands/compare.rs

use anyhow::Result;
use colored::*;

use crate::{
    core::{
        config::{CompareArgs, RunConfig},
        execution,
    },
    infra::t,
    reporting,
};

/// Validates the raw CLI values, runs the full before/after comparison and
/// presents the results.
pub async fn execute(args: CompareArgs) -> Result<()> {
    let config = RunConfig::from_args(args)?;

    println!(
        "{}",
        t!(
            "compare.header",
            before = &config.before,
            after = &config.after
        )
        .bold()
    );
    println!(
        "{}",
        t!("compare.workdir", path = config.work_dir.display())
    );
    println!(
        "{}",
        t!("compare.program", path = config.program.display())
    );
    println!("{}", t!("compare.mode", mode = config.mode.as_str()).cyan());

    let report = execution::run_comparison(&config).await?;

    reporting::print_summary(&report);

    if let Some(path) = &config.report {
        reporting::write_json_report(&report, &config, path)?;
        println!(
            "{}",
            t!("compare.report_written", path = path.display()).green()
        );
    }

    println!("\n{}", t!("compare.success").green().bold());
    Ok(())
}
