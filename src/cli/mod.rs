//! CLI layer for doccheck
//!
//! Thin surface over the library: argument parsing in [`args`], command
//! dispatch in [`run`]. The report goes to stdout; diagnostics go to stderr
//! via tracing; the process exit code summarizes overall pass/fail for CI.

pub mod args;
pub mod run;

pub use run::run;
