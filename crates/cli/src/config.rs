use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bookclub_http::{DEFAULT_MEMBER_COUNT, DEFAULT_MEMBER_ELEMENT, DEFAULT_TIMEOUT_SECS};

/// Configuration loaded from environment variables.
///
/// A `.env` file in the working directory is loaded at startup via dotenvy.
/// Command-line flags take precedence over anything set here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory of CSV/TSV sheets or an `.xlsx` workbook (BOOKCLUB_SOURCE).
    pub source: Option<PathBuf>,
    /// Id of the element on the Meetup page holding the member count.
    pub member_element: String,
    /// Member count shown when the page gives nothing usable.
    pub default_members: u64,
    pub http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            source: var("BOOKCLUB_SOURCE")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            member_element: var("BOOKCLUB_MEMBER_ELEMENT")
                .unwrap_or_else(|| DEFAULT_MEMBER_ELEMENT.to_string()),
            default_members: parse_var(&var, "BOOKCLUB_DEFAULT_MEMBERS", DEFAULT_MEMBER_COUNT)?,
            http_timeout_secs: parse_var(&var, "BOOKCLUB_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
        })
    }

    /// The data source, with `--source` overriding BOOKCLUB_SOURCE.
    pub fn require_source(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        match flag.or_else(|| self.source.clone()) {
            Some(path) => Ok(path),
            None => anyhow::bail!(
                "No data source. Pass --source or set BOOKCLUB_SOURCE in your .env file."
            ),
        }
    }
}

fn parse_var<F>(var: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        None => Ok(default),
    }
}
