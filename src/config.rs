//! Runtime configuration.
//!
//! Values come from the environment (after `.env` is loaded) and may be
//! overridden by command-line flags:
//!
//! | variable                  | default |
//! |---------------------------|---------|
//! | `BIKESHARE_DATA_DIR`      | `.`     |
//! | `BIKESHARE_SKIP_MALFORMED`| `false` |
//! | `BIKESHARE_PAGE_SIZE`     | `5`     |

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::loader::MalformedPolicy;
use crate::paging::DEFAULT_PAGE_SIZE;

pub const DATA_DIR_VAR: &str = "BIKESHARE_DATA_DIR";
pub const SKIP_MALFORMED_VAR: &str = "BIKESHARE_SKIP_MALFORMED";
pub const PAGE_SIZE_VAR: &str = "BIKESHARE_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub malformed_policy: MalformedPolicy,
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            malformed_policy: MalformedPolicy::Reject,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup(SKIP_MALFORMED_VAR) {
            if parse_bool(&flag).with_context(|| format!("{SKIP_MALFORMED_VAR}={flag}"))? {
                config.malformed_policy = MalformedPolicy::Skip;
            }
        }
        if let Some(size) = lookup(PAGE_SIZE_VAR) {
            config.page_size = size
                .trim()
                .parse()
                .with_context(|| format!("{PAGE_SIZE_VAR} must be a positive integer, got {size:?}"))?;
            if config.page_size == 0 {
                bail!("{PAGE_SIZE_VAR} must be a positive integer, got 0");
            }
        }

        Ok(config)
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("expected a boolean, got {other:?}"),
    }
}
