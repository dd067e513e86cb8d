//! Library-level error type for doccheck
//!
//! Per-example problems (parse failures, failed requests) are data, not
//! errors: they live in [`crate::types::ParseOutcome`] and
//! [`crate::types::TestResult`] and flow into the report. `DocCheckError` is
//! reserved for conditions that stop a command outright — bad configuration,
//! unreadable input, or an unreachable server during warm-up.
//!
//! Library code returns `DocCheckError` and does NOT call
//! `std::process::exit()`; only `main.rs` maps errors to exit codes.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocCheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The warm-up request failed at the transport level. This is the single
    /// run-aborting condition: proceeding example-by-example against an
    /// unreachable server would report every example as failed for the same
    /// underlying reason.
    #[error("Server unreachable at {base_url}: {detail}")]
    ServerUnreachable { base_url: String, detail: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {detail}")]
    FileRead { path: PathBuf, detail: String },

    #[error("Invalid config file {path}: {detail}")]
    FileParse { path: PathBuf, detail: String },

    #[error("Invalid base URL '{url}': {detail}")]
    InvalidBaseUrl { url: String, detail: String },

    #[error("Invalid value for {field}: {detail}")]
    InvalidValue { field: String, detail: String },
}

impl DocCheckError {
    /// User-facing message with a suggestion where one applies
    #[must_use]
    pub fn display_for_user(&self) -> String {
        match self {
            Self::ServerUnreachable { base_url, detail } => format!(
                "Error: server unreachable at {base_url}\n  {detail}\n  \
                 Check that the service is running, or pass --base-url."
            ),
            Self::Config(e) => format!("Error: {e}"),
            other => format!("Error: {other}"),
        }
    }
}

/// Transport-level failure from the HTTP collaborator, distinct from an
/// application-level non-2xx response (which arrives as a normal exchange).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport failure: {0}")]
    Other(String),
}
