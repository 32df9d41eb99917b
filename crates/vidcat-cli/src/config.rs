//! Environment configuration for the `vidcat` binary.
//!
//! Environment variables:
//!   VIDCAT_CATALOG   - default catalog file (YAML or JSON)
//!   VIDCAT_PAGE_SIZE - listing page size (default: 20)
//!   LOG_FORMAT       - "json" or "text" (default: "text")
//!   LOG_ANSI         - "true"/"false" override ANSI colors (auto-detected by default)
//!   RUST_LOG         - standard env filter (default: "vidcat=info,vidcat_db=info")

use std::path::PathBuf;

use vidcat_core::defaults::PAGE_LIMIT;
use vidcat_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub catalog: Option<PathBuf>,
    pub page_size: i64,
    pub log_format: String,
    pub log_ansi: Option<bool>,
}

impl CliConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let page_size = match lookup("VIDCAT_PAGE_SIZE") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                Error::Config(format!("VIDCAT_PAGE_SIZE is not a number: {}", raw))
            })?,
            None => PAGE_LIMIT,
        };
        if page_size <= 0 {
            return Err(Error::Config(format!(
                "VIDCAT_PAGE_SIZE must be positive, got {}",
                page_size
            )));
        }

        let log_format = lookup("LOG_FORMAT").unwrap_or_else(|| "text".to_string());
        if log_format != "text" && log_format != "json" {
            return Err(Error::Config(format!(
                "LOG_FORMAT must be \"text\" or \"json\", got {:?}",
                log_format
            )));
        }

        Ok(Self {
            catalog: lookup("VIDCAT_CATALOG")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            page_size,
            log_format,
            log_ansi: lookup("LOG_ANSI").map(|v| v == "true" || v == "1"),
        })
    }
}
