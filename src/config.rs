//! Runtime configuration read from the environment.
//!
//! `.env` files are picked up by the binaries through `dotenvy` before
//! [`AppConfig::from_env`] is called.

use std::env;
use std::path::PathBuf;

use crate::error::{DataError, DataResult};
use crate::models::LegacyDeadlineRule;

pub const DEFAULT_DATA_DIR: &str = "data/conferences";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory of per-conference YAML files, or a single YAML file
    pub data_dir: PathBuf,
    pub bind_addr: String,
    /// Type given to the legacy single `deadline` field
    pub legacy_deadline_rule: LegacyDeadlineRule,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            legacy_deadline_rule: LegacyDeadlineRule::default(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Read `DATA_DIR`, `BIND_ADDR` and `LEGACY_DEADLINE_TYPE`.
    pub fn from_env() -> DataResult<Self> {
        let defaults = AppConfig::default();

        let legacy_deadline_rule = match non_empty_var("LEGACY_DEADLINE_TYPE") {
            Some(raw) => raw
                .parse()
                .map_err(|e| DataError::Config(format!("LEGACY_DEADLINE_TYPE: {e}")))?,
            None => defaults.legacy_deadline_rule,
        };

        Ok(Self {
            data_dir: non_empty_var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            bind_addr: non_empty_var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            legacy_deadline_rule,
        })
    }
}
