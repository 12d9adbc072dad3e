use std::fs;
use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use super::WatchError;
use crate::config::WatchConfig;

/// Directories under observation, fixed at startup.
///
/// The root plus every immediate subdirectory whose name starts with one of
/// the configured prefixes. Directories created later are not picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTargets {
    dirs: Vec<PathBuf>,
}

impl WatchTargets {
    pub fn collect(config: &WatchConfig) -> Result<Self, WatchError> {
        let root = &config.root;
        if !root.is_dir() {
            return Err(WatchError::MissingRoot(root.clone()));
        }

        let mut dirs = vec![root.clone()];
        let entries = fs::read_dir(root).map_err(|e| WatchError::Io(root.clone(), e))?;
        let mut subdirs: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| config.matches_subdir(name))
            })
            .map(|entry| entry.path())
            .collect();
        subdirs.sort();
        dirs.extend(subdirs);

        Ok(Self { dirs })
    }

    /// Register every directory, non-recursively. Any failure is fatal.
    pub fn attach(&self, watcher: &mut RecommendedWatcher) -> Result<(), WatchError> {
        for dir in &self.dirs {
            watcher
                .watch(dir, RecursiveMode::NonRecursive)
                .map_err(|source| WatchError::Notify {
                    path: dir.clone(),
                    source,
                })?;
            crate::debug!("watch"; "watching {}", dir.display());
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Whether `path` sits directly inside one of the targets.
    pub fn covers(&self, path: &Path) -> bool {
        path.parent()
            .is_some_and(|parent| self.dirs.iter().any(|dir| dir == parent))
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }
}
