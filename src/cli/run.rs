//! Command dispatch
//!
//! `run()` owns ALL user-facing output and returns the exit code on failure;
//! `main.rs` only maps it to `process::exit`.

use clap::Parser;
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

use crate::cli::args::{Cli, Commands};
use crate::config::{CliOverrides, Config};
use crate::error::DocCheckError;
use crate::executor::{Executor, HttpTransport};
use crate::exit_codes::{codes, error_to_exit_code};
use crate::report::RunLog;
use crate::runner::{analyze, record_check_results, run_live};
use crate::types::Category;

/// Parse arguments, resolve configuration, and dispatch.
pub fn run() -> Result<(), i32> {
    let cli = Cli::parse();

    if let Err(e) = crate::logging::init_tracing(cli.verbose) {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let (warmup_timeout, timeout) = match &cli.command {
        Commands::Run {
            warmup_timeout,
            timeout,
            ..
        } => (*warmup_timeout, *timeout),
        Commands::Check { .. } => (None, None),
    };

    let overrides = CliOverrides {
        config: cli.config.clone(),
        base_url: cli.base_url.clone(),
        warmup_timeout_secs: warmup_timeout,
        timeout_secs: timeout,
    };
    let config = Config::discover(&overrides).map_err(|e| report_error(&e))?;

    match cli.command {
        Commands::Check { file } => check(&file, &config),
        Commands::Run { file, skip, .. } => {
            let skip = parse_skip(&skip)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| {
                    eprintln!("Error: failed to start runtime: {e}");
                    codes::CLI_ARGS
                })?;
            runtime.block_on(live(&file, &config, &skip))
        }
    }
}

/// Offline validation: every example must parse.
fn check(file: &Path, config: &Config) -> Result<(), i32> {
    let text = read_doc(file)?;
    let examples = analyze(&text, &config.rules);

    let mut log = RunLog::new();
    record_check_results(&examples, &mut log);

    let report = log.report();
    print!("{}", report.render_text());

    if report.all_passed() {
        Ok(())
    } else {
        Err(codes::EXAMPLES_FAILED)
    }
}

/// Live run: execute every non-skipped example sequentially.
async fn live(file: &Path, config: &Config, skip: &HashSet<Category>) -> Result<(), i32> {
    let text = read_doc(file)?;
    let examples = analyze(&text, &config.rules);

    let transport = HttpTransport::new().map_err(|e| report_error(&e))?;
    let mut executor = Executor::new(
        transport,
        config.base_url.clone(),
        config.warmup_timeout,
        config.request_timeout,
    );

    let mut log = RunLog::new();
    let outcome = run_live(&examples, &mut executor, skip, &config.base_url, &mut log).await;

    // The report covers everything recorded, including an aborted warm-up
    let report = log.report();
    print!("{}", report.render_text());

    match outcome {
        Err(e) => Err(report_error(&e)),
        Ok(()) if report.all_passed() => Ok(()),
        Ok(()) => Err(codes::EXAMPLES_FAILED),
    }
}

fn read_doc(file: &Path) -> Result<String, i32> {
    std::fs::read_to_string(file).map_err(|e| {
        report_error(&DocCheckError::Io {
            path: file.to_path_buf(),
            source: e,
        })
    })
}

fn parse_skip(names: &[String]) -> Result<HashSet<Category>, i32> {
    let mut skip = HashSet::new();
    for name in names {
        match Category::parse(name) {
            Some(category) => {
                skip.insert(category);
            }
            None => {
                eprintln!(
                    "Error: unknown category '{name}' (expected one of: {})",
                    Category::ALL.map(|c| c.as_str()).join(", ")
                );
                return Err(codes::CLI_ARGS);
            }
        }
    }
    if !skip.is_empty() {
        warn!(skipped = skip.len(), "categories excluded from execution");
    }
    Ok(skip)
}

fn report_error(error: &DocCheckError) -> i32 {
    eprintln!("{}", error.display_for_user());
    error_to_exit_code(error)
}
