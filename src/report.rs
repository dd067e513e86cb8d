//! Result aggregation and report rendering
//!
//! [`RunLog`] accumulates [`TestResult`] values one at a time, in the order
//! tests run; it is append-only and nothing revises a result after it has
//! been recorded. [`Report`] is a read-only view derived from the log on
//! demand: totals, pass/fail counts, success rate, per-category counts, and
//! the failure listing with diagnostics.

use std::collections::BTreeMap;

use crate::types::{Category, TestResult};

/// Append-only accumulator for one run's results.
#[derive(Debug, Default)]
pub struct RunLog {
    results: Vec<TestResult>,
}

impl RunLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed test. Results are never mutated afterwards.
    pub fn record(&mut self, result: TestResult) {
        self.results.push(result);
    }

    #[must_use]
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Derive the summary view over everything recorded so far.
    #[must_use]
    pub fn report(&self) -> Report {
        let total = self.results.len();
        let passed = self.results.iter().filter(|r| r.success).count();
        let failed = total - passed;

        let mut by_category: BTreeMap<&'static str, usize> = BTreeMap::new();
        for result in &self.results {
            *by_category.entry(result.category.as_str()).or_default() += 1;
        }

        let failures = self
            .results
            .iter()
            .filter(|r| !r.success)
            .map(|r| Failure {
                name: r.name.clone(),
                category: r.category,
                diagnostic: r
                    .error
                    .clone()
                    .unwrap_or_else(|| "failed without diagnostic".to_string()),
                notes: r.notes.clone(),
            })
            .collect();

        Report {
            total,
            passed,
            failed,
            success_rate: if total == 0 {
                0.0
            } else {
                passed as f64 / total as f64
            },
            by_category,
            failures,
        }
    }
}

/// One failed example with its diagnostic, for the report listing.
#[derive(Debug, Clone)]
pub struct Failure {
    pub name: String,
    pub category: Category,
    pub diagnostic: String,
    pub notes: Vec<String>,
}

/// Read-only summary derived from a [`RunLog`].
#[derive(Debug)]
pub struct Report {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// passed/total; 0 when nothing ran
    pub success_rate: f64,
    pub by_category: BTreeMap<&'static str, usize>,
    pub failures: Vec<Failure>,
}

impl Report {
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Render the human-readable stdout report: one line per category count
    /// and summary metric, then the failure listing.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for category in Category::ALL {
            if let Some(count) = self.by_category.get(category.as_str()) {
                out.push_str(&format!("{}: {}\n", category.as_str(), count));
            }
        }

        out.push_str(&format!("total: {}\n", self.total));
        out.push_str(&format!("passed: {}\n", self.passed));
        out.push_str(&format!("failed: {}\n", self.failed));
        out.push_str(&format!("success rate: {:.1}%\n", self.success_rate * 100.0));

        if !self.failures.is_empty() {
            out.push_str("\nfailures:\n");
            for failure in &self.failures {
                out.push_str(&format!(
                    "  [{}] {}: {}\n",
                    failure.category, failure.name, failure.diagnostic
                ));
                for note in &failure.notes {
                    out.push_str(&format!("    note: {note}\n"));
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn result(name: &str, category: Category, success: bool, error: Option<&str>) -> TestResult {
        TestResult {
            name: name.to_string(),
            category,
            success,
            error: error.map(String::from),
            duration: Duration::from_millis(10),
            notes: Vec::new(),
        }
    }

    #[test]
    fn empty_log_reports_zero_rate() {
        let log = RunLog::new();
        let report = log.report();
        assert_eq!(report.total, 0);
        assert_eq!(report.passed, 0);
        assert_eq!(report.failed, 0);
        assert_eq!(report.success_rate, 0.0);
        assert!(report.all_passed());
    }

    #[test]
    fn counts_and_rate() {
        let mut log = RunLog::new();
        log.record(result("ex-0 /health", Category::Health, true, None));
        log.record(result("ex-1 /tts", Category::Tts, true, None));
        log.record(result("ex-2 /tts", Category::Tts, false, Some("HTTP 500")));
        log.record(result("ex-3 /voices", Category::VoiceMgmt, true, None));

        let report = log.report();
        assert_eq!(report.total, 4);
        assert_eq!(report.passed, 3);
        assert_eq!(report.failed, 1);
        assert!((report.success_rate - 0.75).abs() < f64::EPSILON);
        assert_eq!(report.by_category.get("tts"), Some(&2));
        assert!(!report.all_passed());
    }

    #[test]
    fn failures_carry_category_and_diagnostic() {
        let mut log = RunLog::new();
        log.record(result("ex-0 /tts", Category::Tts, false, Some("HTTP 422")));
        let report = log.report();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].category, Category::Tts);
        assert_eq!(report.failures[0].diagnostic, "HTTP 422");
    }

    #[test]
    fn rendered_text_has_one_line_per_metric() {
        let mut log = RunLog::new();
        log.record(result("ex-0 /health", Category::Health, true, None));
        log.record(result("ex-1 /tts", Category::Tts, false, Some("HTTP 500")));

        let text = log.report().render_text();
        assert!(text.contains("health: 1\n"));
        assert!(text.contains("tts: 1\n"));
        assert!(text.contains("total: 2\n"));
        assert!(text.contains("passed: 1\n"));
        assert!(text.contains("failed: 1\n"));
        assert!(text.contains("success rate: 50.0%\n"));
        assert!(text.contains("[tts] ex-1 /tts: HTTP 500"));
    }

    #[test]
    fn recorded_results_are_not_revised() {
        let mut log = RunLog::new();
        log.record(result("ex-0 /health", Category::Health, true, None));
        let before = log.results()[0].clone();
        log.record(result("ex-1 /tts", Category::Tts, false, None));
        assert_eq!(log.results()[0].name, before.name);
        assert_eq!(log.results()[0].success, before.success);
    }
}
