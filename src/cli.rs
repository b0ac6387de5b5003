// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::{env, path::PathBuf};

use crate::{commands, config::CompareArgs, infra::t};

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        if let Some(lang) = args.get(pos + 1) {
            return Some(lang.clone());
        }
    }
    None
}

fn build_cli(locale: &str) -> Command {
    Command::new("rev-compare")
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("workdir")
                .long("workdir")
                .help(t!("arg_workdir", locale = locale).to_string())
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("program")
                .long("program")
                .help(t!("arg_program", locale = locale).to_string())
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("before")
                .long("before")
                .help(t!("arg_before", locale = locale).to_string())
                .value_name("REV")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("after")
                .long("after")
                .help(t!("arg_after", locale = locale).to_string())
                .value_name("REV")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("tests-only")
                .long("tests-only")
                .help(t!("arg_tests_only", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("benchmarks-only")
                .long("benchmarks-only")
                .help(t!("arg_benchmarks_only", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help(t!("arg_verbose", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help(t!("arg_report", locale = locale).to_string())
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
}

pub async fn run() -> Result<()> {
    // An explicit --lang wins; otherwise fall back to system locale detection.
    let language = match pre_parse_language() {
        Some(lang) => {
            rust_i18n::set_locale(&lang);
            lang
        }
        None => {
            crate::init();
            rust_i18n::locale().to_string()
        }
    };

    let matches = build_cli(&language).get_matches();

    // Required flags are deliberately not marked as required in clap: the
    // configuration layer collects every missing flag into a single error.
    let args = CompareArgs {
        workdir: matches.get_one::<PathBuf>("workdir").cloned(),
        program: matches.get_one::<PathBuf>("program").cloned(),
        before: matches.get_one::<String>("before").cloned(),
        after: matches.get_one::<String>("after").cloned(),
        tests_only: matches.get_flag("tests-only"),
        benchmarks_only: matches.get_flag("benchmarks-only"),
        verbose: matches.get_flag("verbose"),
        report: matches.get_one::<PathBuf>("report").cloned(),
    };

    commands::compare::execute(args).await
}
