//! CLI argument definitions
//!
//! One subcommand per workflow: `check` validates examples offline, `run`
//! executes them against a live service.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// doccheck - validate documentation examples against a live API
#[derive(Parser)]
#[command(name = "doccheck")]
#[command(about = "Validates command examples in API documentation against a live service")]
#[command(long_about = r#"
doccheck extracts curl examples from markdown documentation, reconstructs the
HTTP request each example represents, and checks that the examples still work.

EXAMPLES:
  # Validate that every example in a document parses
  doccheck check docs/API.md

  # Execute every example against the default service (http://localhost:7860)
  doccheck run docs/API.md

  # Target a different deployment
  doccheck run docs/API.md --base-url http://staging:7860

  # Skip the deliberately-failing error demos
  doccheck run docs/API.md --skip error_demo

CONFIGURATION:
  Precedence: CLI flags > DOCCHECK_BASE_URL environment variable > config
  file > defaults. The config file is doccheck.toml in the current directory
  or an explicit --config path; it can also override the classifier's route
  and sentinel lists.

EXIT CODES:
  0   every executed example passed
  1   one or more examples failed
  2   CLI arguments or configuration error
  70  server unreachable during warm-up; run aborted
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL that relative example URLs resolve against
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable verbose diagnostic output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract, parse, and classify examples without touching the network
    Check {
        /// Markdown documentation file to check
        file: PathBuf,
    },

    /// Execute examples against the live service and report pass/fail
    Run {
        /// Markdown documentation file to test
        file: PathBuf,

        /// Categories to exclude from execution (repeatable)
        #[arg(long, value_name = "CATEGORY")]
        skip: Vec<String>,

        /// Timeout in seconds for the first (warm-up) request
        #[arg(long, value_name = "SECS")]
        warmup_timeout: Option<u64>,

        /// Timeout in seconds for requests after warm-up
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
}
