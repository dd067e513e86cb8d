//! Exit code constants and error mapping for doccheck
//!
//! Exit codes are part of the CI contract: pipelines gate on them, so the
//! numeric values are stable.

use crate::error::DocCheckError;

/// Exit code constants for doccheck
pub mod codes {
    /// Success - every executed example passed
    pub const SUCCESS: i32 = 0;

    /// One or more examples failed to parse or failed against the server
    pub const EXAMPLES_FAILED: i32 = 1;

    /// CLI arguments or configuration error
    pub const CLI_ARGS: i32 = 2;

    /// Warm-up request failed at the transport level; run aborted
    pub const SERVER_UNREACHABLE: i32 = 70;
}

/// Map a run-aborting error to its exit code
#[must_use]
pub fn error_to_exit_code(error: &DocCheckError) -> i32 {
    match error {
        DocCheckError::Config(_) => codes::CLI_ARGS,
        DocCheckError::Io { .. } => codes::CLI_ARGS,
        DocCheckError::ServerUnreachable { .. } => codes::SERVER_UNREACHABLE,
        DocCheckError::Transport(_) => codes::SERVER_UNREACHABLE,
    }
}
