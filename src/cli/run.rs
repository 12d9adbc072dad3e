//! `cpwatch run <file>`: one pass of the compile/run pipeline.
//!
//! This is also the process image the watcher starts for every save, so the
//! compiler and each execution share one process group.

use std::path::Path;

use crate::config::Config;
use crate::runner::{RunError, RunRequest};
use crate::utils::path::normalize_path;
use crate::utils::process::stdin_is_terminal;
use crate::logger;

/// Run `file` once. Returns whether every step succeeded.
///
/// Without scripted inputs the program reads the terminal only when the run
/// owns it (`interactive`, or started by hand from a terminal); otherwise
/// stdin is `/dev/null`.
pub fn run_file(file: &Path, interactive: bool, config: &Config) -> bool {
    let path = normalize_path(file);
    let display = config.root_relative(&path);

    let request = match RunRequest::new(&path, config) {
        Ok(request) => request,
        Err(e) => {
            logger::status_error(&format!("cannot run {}", display.display()), &e.to_string());
            return false;
        }
    };

    let owns_terminal = interactive || stdin_is_terminal();
    match request.execute(config, owns_terminal) {
        Ok(outcome) => outcome.success(),
        Err(e @ RunError::Toolchain { .. }) => {
            logger::status_error(&format!("compile failed: {}", display.display()), &e.to_string());
            false
        }
        Err(e) => {
            logger::status_error(&format!("cannot run {}", display.display()), &e.to_string());
            false
        }
    }
}
