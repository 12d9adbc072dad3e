//! `[precompile]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [precompile]
//! enable = true
//! header = "bits/stdc++.h"
//! search = ["/usr/include"]
//! fresh_hours = 3
//! cache_dir = ".cpwatch"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Precompiled header cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrecompileConfig {
    /// Warm the cache on startup and pass `-I <cache_dir>` to C++ compiles.
    pub enable: bool,

    /// Header to precompile, relative to a search root.
    pub header: PathBuf,

    /// Directories searched (recursively) for `header`.
    pub search: Vec<PathBuf>,

    /// A precompiled header younger than this is reused.
    pub fresh_hours: u64,

    /// Cache directory, relative to the watch root.
    pub cache_dir: PathBuf,
}

impl Default for PrecompileConfig {
    fn default() -> Self {
        Self {
            enable: true,
            header: PathBuf::from("bits/stdc++.h"),
            search: vec![PathBuf::from("/usr/include")],
            fresh_hours: 3,
            cache_dir: PathBuf::from(".cpwatch"),
        }
    }
}

impl PrecompileConfig {
    const HEADER: FieldPath = FieldPath::new("precompile.header");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.enable && (self.header.as_os_str().is_empty() || self.header.is_absolute()) {
            diag.error_with_hint(
                Self::HEADER,
                "must be a relative include path",
                "e.g. \"bits/stdc++.h\"",
            );
        }
    }

    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.fresh_hours * 3600)
    }
}
