//! Precompiled `bits/stdc++.h` cache.
//!
//! The header is copied into `<cache_dir>/bits/` and compiled there with the
//! C++ flags, leaving `stdc++.h.gch` next to it. C++ runs put `-I<cache_dir>`
//! first, so `#include <bits/stdc++.h>` resolves to the cached copy and GCC
//! picks up the `.gch`.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::utils::exec::Cmd;
use crate::{debug, log, logger};

/// Directory levels searched below each search root.
const MAX_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The cached header is younger than the freshness window.
    Fresh,
    Built(Duration),
    MissingCompiler,
    MissingHeader,
    Failed,
}

/// Warm the cache and report the result. Never fails.
pub fn run(config: &Config, force: bool) -> Outcome {
    match warm(config, force) {
        Ok(Outcome::Fresh) => {
            log!("precompile"; "headers were recently precompiled, skipping");
            Outcome::Fresh
        }
        Ok(Outcome::Built(elapsed)) => {
            logger::status_success(&format!(
                "precompiled {} ({:.2}s)",
                config.precompile.header.display(),
                elapsed.as_secs_f64()
            ));
            Outcome::Built(elapsed)
        }
        Ok(Outcome::MissingCompiler) => {
            logger::status_warning(&format!(
                "{} not found, skipping header precompilation",
                config.lang.cpp.compiler
            ));
            Outcome::MissingCompiler
        }
        Ok(Outcome::MissingHeader) => {
            logger::status_warning(&format!(
                "could not find {}",
                config.precompile.header.display()
            ));
            Outcome::MissingHeader
        }
        Ok(Outcome::Failed) => Outcome::Failed,
        Err(e) => {
            logger::status_error("header precompilation failed", &format!("{e:#}"));
            Outcome::Failed
        }
    }
}

/// Copy and compile the header unless the cached one is fresh.
pub fn warm(config: &Config, force: bool) -> Result<Outcome> {
    let settings = &config.precompile;
    let cached = settings.cache_dir.join(&settings.header);
    let gch = gch_path(&cached);

    if !force && is_fresh(&gch, settings.freshness(), SystemTime::now()) {
        return Ok(Outcome::Fresh);
    }
    if which::which(&config.lang.cpp.compiler).is_err() {
        return Ok(Outcome::MissingCompiler);
    }
    let Some(source) = find_header(&settings.search, &settings.header) else {
        return Ok(Outcome::MissingHeader);
    };
    debug!("precompile"; "using {}", source.display());

    let dest_dir = cached
        .parent()
        .context("header path has no parent directory")?;
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("failed to create {}", dest_dir.display()))?;
    fs::copy(&source, &cached)
        .with_context(|| format!("failed to copy {}", source.display()))?;

    let file_name = cached
        .file_name()
        .context("header path has no file name")?;
    let start = Instant::now();
    Cmd::new(&config.lang.cpp.compiler)
        .args(&config.lang.cpp.flags)
        .arg(file_name)
        .cwd(dest_dir)
        .output()?;

    Ok(Outcome::Built(start.elapsed()))
}

/// `stdc++.h` → `stdc++.h.gch`.
fn gch_path(header: &Path) -> PathBuf {
    let mut name = header.as_os_str().to_owned();
    name.push(OsString::from(".gch"));
    PathBuf::from(name)
}

/// Whether `path` exists and was modified less than `window` before `now`.
fn is_fresh(path: &Path, window: Duration, now: SystemTime) -> bool {
    let Ok(modified) = path.metadata().and_then(|m| m.modified()) else {
        return false;
    };
    match now.duration_since(modified) {
        Ok(age) => age < window,
        // Modified in the future
        Err(_) => true,
    }
}

/// Find `header` below any search root, breadth first.
///
/// Directories named `*32` hold the 32-bit multilib variant and are skipped.
fn find_header(roots: &[PathBuf], header: &Path) -> Option<PathBuf> {
    let mut level: Vec<PathBuf> = roots.iter().filter(|r| r.is_dir()).cloned().collect();

    for _ in 0..=MAX_DEPTH {
        let mut next = Vec::new();
        for dir in &level {
            let candidate = dir.join(header);
            if candidate.is_file() {
                return Some(candidate);
            }
            next.extend(subdirs(dir));
        }
        if next.is_empty() {
            break;
        }
        level = next;
    }
    None
}

fn subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .filter(|e| !e.file_name().to_string_lossy().ends_with("32"))
        .map(|e| e.path())
        .collect();
    dirs.sort();
    dirs
}
