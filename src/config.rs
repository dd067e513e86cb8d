//! Configuration for doccheck
//!
//! Hierarchical precedence: CLI flags > `DOCCHECK_BASE_URL` environment
//! variable > TOML config file > built-in defaults. The config file is either
//! given explicitly via `--config` or discovered as `doccheck.toml` in the
//! current directory.
//!
//! Classifier trigger lists (path segments, parameter ranges, bogus resource
//! tokens, missing-file markers) are configuration data rather than hard
//! logic: they are tied to the content of the documented service's examples
//! and are neither complete nor stable across services.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, DocCheckError};
use crate::types::Category;

/// Default target service base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:7860";

/// Default timeout for the first (warm-up) request of a run
pub const DEFAULT_WARMUP_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for every request after warm-up
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Resolved configuration for one invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL that relative example URLs resolve against
    pub base_url: String,
    /// Extended timeout for the first request of a run
    pub warmup_timeout: Duration,
    /// Timeout for every subsequent request
    pub request_timeout: Duration,
    pub rules: ClassifyRules,
}

/// One ordered route rule: URL containing `needle` maps to `category`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteRule {
    pub needle: String,
    pub category: Category,
}

/// Closed range of acceptable values for a named JSON body parameter.
/// A value outside the range marks the example as a deliberate error demo.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RangeRule {
    pub param: String,
    pub min: f64,
    pub max: f64,
}

/// Classifier trigger lists, evaluated by `classify` in declaration order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifyRules {
    /// Ordered URL route table; first match wins
    pub routes: Vec<RouteRule>,
    /// Body parameter ranges whose violation signals an error demo
    pub ranges: Vec<RangeRule>,
    /// Substrings marking a deliberately nonexistent resource reference
    pub bogus_tokens: Vec<String>,
    /// Substrings in attachment paths that flag a file-reference issue
    pub missing_file_markers: Vec<String>,
}

impl Default for ClassifyRules {
    fn default() -> Self {
        Self {
            routes: vec![
                RouteRule {
                    needle: "/health".to_string(),
                    category: Category::Health,
                },
                RouteRule {
                    needle: "/tts".to_string(),
                    category: Category::Tts,
                },
                RouteRule {
                    needle: "/vc".to_string(),
                    category: Category::Vc,
                },
                RouteRule {
                    needle: "/voices".to_string(),
                    category: Category::VoiceMgmt,
                },
                RouteRule {
                    needle: "/outputs".to_string(),
                    category: Category::FileOps,
                },
            ],
            ranges: vec![
                RangeRule {
                    param: "temperature".to_string(),
                    min: 0.0,
                    max: 1.0,
                },
                RangeRule {
                    param: "speed".to_string(),
                    min: 0.5,
                    max: 2.0,
                },
            ],
            bogus_tokens: vec!["nonexistent".to_string()],
            missing_file_markers: vec![
                "nonexistent".to_string(),
                "does_not_exist".to_string(),
            ],
        }
    }
}

/// CLI-sourced overrides, highest precedence
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub base_url: Option<String>,
    pub warmup_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
}

/// On-disk config file shape; every field optional
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    warmup_timeout_secs: Option<u64>,
    timeout_secs: Option<u64>,
    rules: Option<ClassifyRulesFile>,
}

/// Partial rules section; unset lists keep their defaults
#[derive(Debug, Clone, Default, Deserialize)]
struct ClassifyRulesFile {
    routes: Option<Vec<RouteRule>>,
    ranges: Option<Vec<RangeRule>>,
    bogus_tokens: Option<Vec<String>>,
    missing_file_markers: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            warmup_timeout: DEFAULT_WARMUP_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            rules: ClassifyRules::default(),
        }
    }
}

impl Config {
    /// Resolve configuration with CLI > env > file > defaults precedence
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when an explicitly-given config file is missing
    /// or malformed, or when a resolved value fails validation.
    pub fn discover(cli: &CliOverrides) -> Result<Self, DocCheckError> {
        let mut config = Self::default();

        if let Some(path) = Self::config_file_path(cli) {
            let file = load_config_file(&path)?;
            config.apply_file(file);
        }

        if let Ok(url) = env::var("DOCCHECK_BASE_URL")
            && !url.is_empty()
        {
            config.base_url = url;
        }

        if let Some(url) = &cli.base_url {
            config.base_url = url.clone();
        }
        if let Some(secs) = cli.warmup_timeout_secs {
            config.warmup_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = cli.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Explicit `--config` path, or `doccheck.toml` in CWD when present
    fn config_file_path(cli: &CliOverrides) -> Option<PathBuf> {
        if let Some(path) = &cli.config {
            return Some(path.clone());
        }
        let discovered = PathBuf::from("doccheck.toml");
        discovered.exists().then_some(discovered)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(url) = file.base_url {
            self.base_url = url;
        }
        if let Some(secs) = file.warmup_timeout_secs {
            self.warmup_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(rules) = file.rules {
            if let Some(routes) = rules.routes {
                self.rules.routes = routes;
            }
            if let Some(ranges) = rules.ranges {
                self.rules.ranges = ranges;
            }
            if let Some(tokens) = rules.bogus_tokens {
                self.rules.bogus_tokens = tokens;
            }
            if let Some(markers) = rules.missing_file_markers {
                self.rules.missing_file_markers = markers;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                detail: "must start with http:// or https://".to_string(),
            });
        }
        if self.warmup_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "warmup_timeout_secs".to_string(),
                detail: "must be positive".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs".to_string(),
                detail: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

fn load_config_file(path: &Path) -> Result<ConfigFile, DocCheckError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::FileParse {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    Ok(file)
}
