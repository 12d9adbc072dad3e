//! Configuration management for `cpwatch.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── watch      # [watch]
//! │   ├── serve      # [serve]
//! │   ├── lang       # [lang] and per-language toolchains
//! │   ├── template   # [template]
//! │   └── precompile # [precompile]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # Config (this file)
//! ```
//!
//! # Sections
//!
//! | Section        | Purpose                                          |
//! |----------------|--------------------------------------------------|
//! | `[watch]`      | Watch root, subdirectory prefixes, debounce      |
//! | `[serve]`      | Control endpoint (interface, fixed port, handoff)|
//! | `[lang]`       | Toolchains and flags per language                |
//! | `[template]`   | Problem file templates and editor command        |
//! | `[precompile]` | Precompiled `bits/stdc++.h` cache                |

pub mod section;
pub mod types;
mod util;

use util::{expand_path, find_config_file};

pub use section::{LangConfig, PrecompileConfig, ServeConfig, TemplateConfig, WatchConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{cli::Cli, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, searched upward from the working directory.
pub const CONFIG_FILE: &str = "cpwatch.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing cpwatch.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Absolute path to the config file (internal use only).
    /// May not exist when running on defaults.
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory containing the config file (internal use only)
    #[serde(skip)]
    pub base: PathBuf,

    /// File watching settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// Control endpoint settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Toolchains per language
    #[serde(default)]
    pub lang: LangConfig,

    /// Problem file templates
    #[serde(default)]
    pub template: TemplateConfig,

    /// Header precompilation
    #[serde(default)]
    pub precompile: PrecompileConfig,
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. When none is found the
    /// defaults are used, rooted at cwd.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let (mut config, config_path) = match find_config_file(&cli.config) {
            Some(path) => (Self::from_path(&path)?, path),
            None => {
                crate::debug!("config"; "no {} found, using defaults", cli.config.display());
                (Self::default(), cwd.join(&cli.config))
            }
        };

        config.config_path = crate::utils::path::normalize_path(&config_path);
        config.finalize();
        config.apply_cli(cli);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    ///
    /// The watcher worker runs without a usable stdin, so unknown fields never
    /// prompt; they are reported and ignored.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored):", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve every configured path against the config file's directory.
    fn finalize(&mut self) {
        let base = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.base = base.clone();

        let root = crate::utils::path::normalize_path(&base.join(expand_path(&self.watch.root)));
        self.watch.root = root.clone();

        self.lang.out_dir = root.join(expand_path(&self.lang.out_dir));
        self.template.dir = root.join(expand_path(&self.template.dir));
        self.precompile.cache_dir = root.join(expand_path(&self.precompile.cache_dir));
        self.precompile.search = self
            .precompile
            .search
            .iter()
            .map(|p| root.join(expand_path(p)))
            .collect();
    }

    /// Apply command-line overrides.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(port) = cli.port_override() {
            self.serve.port = port;
        }
    }

    /// Watch root directory
    pub fn get_root(&self) -> &Path {
        &self.watch.root
    }

    /// Join a path with the watch root.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.watch.root.join(path)
    }

    /// Get path relative to the watch root (for display)
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.watch.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the configuration, collecting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.watch.validate(&mut diag);
        self.serve.validate(&mut diag);
        self.lang.validate(&mut diag);
        self.template.validate(&mut diag);
        self.precompile.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config and panic on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Build a finalized config rooted at `root`, as if `cpwatch.toml` lived there.
#[cfg(test)]
pub fn test_config_at(root: &Path, content: &str) -> Config {
    let mut config = test_parse_config(content);
    config.config_path = root.join(CONFIG_FILE);
    config.finalize();
    config
}

// ============================================================================
// tests
// ============================================================================
