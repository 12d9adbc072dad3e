//! `[watch]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [watch]
//! root = "."                      # Directory holding problem files
//! subdir_prefixes = ["AoC"]       # Also watch ./AoC2023, ./AoC2024, ...
//! debounce_ms = 1000              # Collapse repeated saves of one file
//! sweep_ms = 250                  # Background expiry sweep interval
//! ```
//!
//! Only subdirectories present at startup are watched. Create the folder and
//! touch `cpwatch.toml` (which restarts the program) to pick up a new one.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// File watching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Watch root, relative to the config file.
    pub root: PathBuf,

    /// Immediate subdirectories of `root` whose names start with one of these
    /// prefixes are watched as well.
    pub subdir_prefixes: Vec<String>,

    /// Suppression window for repeated events on one path.
    pub debounce_ms: u64,

    /// Interval of the background sweep that expires suppressed paths.
    pub sweep_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            subdir_prefixes: vec!["AoC".into()],
            debounce_ms: 1000,
            sweep_ms: 250,
        }
    }
}

impl WatchConfig {
    const DEBOUNCE_MS: FieldPath = FieldPath::new("watch.debounce_ms");
    const SWEEP_MS: FieldPath = FieldPath::new("watch.sweep_ms");
    const SUBDIR_PREFIXES: FieldPath = FieldPath::new("watch.subdir_prefixes");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.debounce_ms == 0 {
            diag.error_with_hint(
                Self::DEBOUNCE_MS,
                "must be greater than 0",
                "editors write a file several times per save; 1000 is a good default",
            );
        }
        if self.sweep_ms == 0 {
            diag.error(Self::SWEEP_MS, "must be greater than 0");
        }
        if self.subdir_prefixes.iter().any(String::is_empty) {
            diag.error_with_hint(
                Self::SUBDIR_PREFIXES,
                "empty prefix would match every subdirectory",
                "remove the empty entry",
            );
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_ms)
    }

    /// Check whether a directory name matches one of the configured prefixes.
    pub fn matches_subdir(&self, name: &str) -> bool {
        self.subdir_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }
}
