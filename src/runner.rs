//! Pipeline driver: documentation text in, run log out
//!
//! `analyze` performs the offline half of the pipeline (extract → parse →
//! classify → annotate); `run_live` drives analyzed examples through the
//! executor, strictly sequentially and in source order, recording one
//! [`TestResult`] per example. Examples are independent units of work: one
//! failing request never blocks or skips the next. The only exception is the
//! warm-up transport failure, which aborts the run after recording the
//! aborted attempt.

use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info};

use crate::classify::{classify, file_reference_notes};
use crate::config::ClassifyRules;
use crate::error::DocCheckError;
use crate::executor::{ExecuteError, Executor, Transport};
use crate::extraction::extract_examples;
use crate::parser::parse_command;
use crate::report::RunLog;
use crate::types::{Category, ParseOutcome, RawExample, TestResult};

/// One fully-analyzed example, ready for reporting or execution.
#[derive(Debug, Clone)]
pub struct AnalyzedExample {
    pub raw: RawExample,
    pub outcome: ParseOutcome,
    pub category: Category,
    /// File-reference annotations, independent of parse success
    pub notes: Vec<String>,
}

impl AnalyzedExample {
    /// Stable identifier used in reports
    #[must_use]
    pub fn name(&self) -> String {
        match &self.outcome {
            ParseOutcome::Parsed(d) => format!("#{} {} {}", self.raw.index, d.method, d.url),
            ParseOutcome::Failed { .. } => format!("#{} <unparsed>", self.raw.index),
        }
    }
}

/// Run the offline pipeline over a documentation text blob.
///
/// Every extracted example maps to exactly one analyzed entry; nothing is
/// silently dropped.
#[must_use]
pub fn analyze(text: &str, rules: &ClassifyRules) -> Vec<AnalyzedExample> {
    extract_examples(text)
        .into_iter()
        .map(|raw| {
            let outcome = parse_command(&raw.text);
            let category = classify(&raw, &outcome, rules);
            let notes = outcome
                .descriptor()
                .map(|d| file_reference_notes(d, rules))
                .unwrap_or_default();
            debug!(
                index = raw.index,
                category = %category,
                parsed = outcome.is_parsed(),
                "analyzed example"
            );
            AnalyzedExample {
                raw,
                outcome,
                category,
                notes,
            }
        })
        .collect()
}

/// Record offline results only: an example passes the check when it parses.
pub fn record_check_results(examples: &[AnalyzedExample], log: &mut RunLog) {
    for example in examples {
        let (success, error) = match &example.outcome {
            ParseOutcome::Parsed(_) => (true, None),
            ParseOutcome::Failed { reason } => (false, Some(format!("parse failed: {reason}"))),
        };
        log.record(TestResult {
            name: example.name(),
            category: example.category,
            success,
            error,
            duration: std::time::Duration::ZERO,
            notes: example.notes.clone(),
        });
    }
}

/// Execute analyzed examples against the live server.
///
/// Parse failures and skipped categories never reach the transport. A
/// warm-up transport failure records the aborted attempt and returns
/// [`DocCheckError::ServerUnreachable`]; any other failure is per-example
/// and the run continues.
pub async fn run_live<T: Transport>(
    examples: &[AnalyzedExample],
    executor: &mut Executor<T>,
    skip: &HashSet<Category>,
    base_url: &str,
    log: &mut RunLog,
) -> Result<(), DocCheckError> {
    for example in examples {
        if skip.contains(&example.category) {
            debug!(name = %example.name(), category = %example.category, "skipping category");
            continue;
        }

        let descriptor = match &example.outcome {
            ParseOutcome::Parsed(d) => d,
            ParseOutcome::Failed { reason } => {
                log.record(TestResult {
                    name: example.name(),
                    category: example.category,
                    success: false,
                    error: Some(format!("parse failed: {reason}")),
                    duration: std::time::Duration::ZERO,
                    notes: example.notes.clone(),
                });
                continue;
            }
        };

        let started = Instant::now();
        match executor.execute(descriptor).await {
            Ok(exchange) => {
                let (success, error) = judge(example.category, exchange.status);
                info!(
                    name = %example.name(),
                    status = exchange.status,
                    success,
                    "example executed"
                );
                log.record(TestResult {
                    name: example.name(),
                    category: example.category,
                    success,
                    error,
                    duration: started.elapsed(),
                    notes: example.notes.clone(),
                });
            }
            Err(ExecuteError::Unreachable(e)) => {
                log.record(TestResult {
                    name: example.name(),
                    category: example.category,
                    success: false,
                    error: Some(format!("server unreachable: {e}")),
                    duration: started.elapsed(),
                    notes: example.notes.clone(),
                });
                return Err(DocCheckError::ServerUnreachable {
                    base_url: base_url.to_string(),
                    detail: e.to_string(),
                });
            }
            Err(ExecuteError::Request(e)) => {
                log.record(TestResult {
                    name: example.name(),
                    category: example.category,
                    success: false,
                    error: Some(e.to_string()),
                    duration: started.elapsed(),
                    notes: example.notes.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Pass criteria per category: ordinary examples expect 2xx; an error demo
/// documents a failure, so a non-2xx response is the expected outcome and a
/// 2xx means the documented error no longer happens.
fn judge(category: Category, status: u16) -> (bool, Option<String>) {
    let is_2xx = (200..300).contains(&status);
    match category {
        Category::ErrorDemo => {
            if is_2xx {
                (
                    false,
                    Some(format!("expected an error response, got HTTP {status}")),
                )
            } else {
                (true, None)
            }
        }
        _ => {
            if is_2xx {
                (true, None)
            } else {
                (false, Some(format!("HTTP {status}")))
            }
        }
    }
}
