use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_DATA_DIR, EPHEMERAL_ENV, HISTORY_DIR_ENV};

/// Where the server keeps its search history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryLocation {
    Directory(PathBuf),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub history: HistoryLocation,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let ephemeral = lookup(EPHEMERAL_ENV)
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);
        if ephemeral {
            return Self {
                history: HistoryLocation::Memory,
            };
        }

        let dir = lookup(HISTORY_DIR_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| match lookup("HOME") {
                Some(home) => PathBuf::from(home).join(DEFAULT_DATA_DIR),
                None => PathBuf::from(DEFAULT_DATA_DIR),
            });

        Self {
            history: HistoryLocation::Directory(dir),
        }
    }
}
