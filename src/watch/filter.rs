use std::fs;
use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::{AccessKind, AccessMode};

use super::WatchTargets;
use crate::config::Config;
use crate::runner::LanguageKind;
use crate::utils::path::{is_within, normalize_path};

/// What a qualifying close-write asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Compile and run this source file.
    Run(PathBuf),
    /// The config file or our own executable changed.
    Restart(PathBuf),
}

/// Turns raw notify events into actions.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Build products and caches; never dispatched.
    excluded: Vec<PathBuf>,
    /// Files whose change restarts the whole program.
    restart_files: Vec<PathBuf>,
}

impl EventFilter {
    pub fn new(config: &Config, targets: &WatchTargets) -> Self {
        let mut restart_files = vec![config.config_path.clone()];
        if let Ok(exe) = std::env::current_exe() {
            let exe = normalize_path(&exe);
            if targets.covers(&exe) {
                restart_files.push(exe);
            }
        }

        Self {
            excluded: vec![
                config.lang.out_dir.clone(),
                config.precompile.cache_dir.clone(),
            ],
            restart_files,
        }
    }

    /// Only "closed after writing" counts as a save.
    pub fn is_close_write(kind: &EventKind) -> bool {
        matches!(kind, EventKind::Access(AccessKind::Close(AccessMode::Write)))
    }

    /// Paths of a close-write event that are worth looking at.
    pub fn candidates<'a>(&'a self, event: &'a notify::Event) -> impl Iterator<Item = &'a Path> {
        let relevant = Self::is_close_write(&event.kind);
        event
            .paths
            .iter()
            .filter(move |_| relevant)
            .map(PathBuf::as_path)
            .filter(|path| !is_temp_file(path))
            .filter(move |path| !self.excluded.iter().any(|dir| is_within(path, dir)))
    }

    /// Decide what to do with a debounced path.
    ///
    /// Zero-byte files are half-written saves and produce nothing.
    pub fn classify(&self, path: &Path) -> Option<Action> {
        let len = fs::metadata(path).ok()?.len();
        if len == 0 {
            crate::debug!("watch"; "skip empty file: {}", path.display());
            return None;
        }

        if self.restart_files.iter().any(|f| f == path) {
            return Some(Action::Restart(path.to_path_buf()));
        }

        LanguageKind::from_path(path).map(|_| Action::Run(path.to_path_buf()))
    }
}

/// Check if path is a temp/backup file (editor artifacts).
pub fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bak" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}
