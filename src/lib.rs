//! doccheck - validates documentation examples against a live API
//!
//! This crate catches drift between the command examples written in API
//! documentation and actual API behavior. It extracts `curl` examples from
//! markdown, reconstructs the HTTP request each one represents, optionally
//! issues the requests against a live service, and reports pass/fail with
//! categorized diagnostics.
//!
//! # Quick Start (CLI)
//!
//! ```bash
//! # Validate that every example in a document parses
//! doccheck check docs/API.md
//!
//! # Execute every example against the service
//! doccheck run docs/API.md --base-url http://localhost:7860
//! ```
//!
//! # Quick Start (Library)
//!
//! ```rust
//! use doccheck::config::ClassifyRules;
//! use doccheck::runner::analyze;
//!
//! let md = "```bash\ncurl -X GET http://host/api/v1/health\n```\n";
//! let examples = analyze(md, &ClassifyRules::default());
//! assert_eq!(examples.len(), 1);
//! assert_eq!(examples[0].category.as_str(), "health");
//! ```
//!
//! # Pipeline
//!
//! documentation text → [`extraction`] → [`parser`] → [`classify`] →
//! [`executor`] → [`report`]. The offline half (everything before the
//! executor) is pure and deterministic; the executor owns the warm-up
//! timeout state machine and the single run-aborting condition (an
//! unreachable server during warm-up).
//!
//! Exit codes are stable CI contract; see [`exit_codes::codes`].

pub mod classify;
pub mod config;
pub mod error;
pub mod executor;
pub mod exit_codes;
pub mod extraction;
pub mod logging;
pub mod parser;
pub mod report;
pub mod runner;
pub mod types;

// CLI module - used by main.rs; exported for white-box testing of flag
// parsing, not part of the stable library surface
#[doc(hidden)]
pub mod cli;

pub use config::Config;
pub use error::DocCheckError;
pub use types::{Category, ParseOutcome, RawExample, RequestDescriptor, TestResult};
