//! How a run's process image is built.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::runner::RunRequest;

/// Produces the command for one run.
///
/// The supervisor adds process-group isolation and the parent-death guard;
/// implementors only describe what to execute.
pub trait Launch {
    fn command(&self, request: &RunRequest, foreground: bool) -> Command;
}

/// Runs the pipeline in a fresh copy of ourselves: `cpwatch run <file>`.
///
/// The compiler and every execution then live in one process group, so a
/// single `killpg` stops all of them.
#[derive(Debug, Clone)]
pub struct SelfLauncher {
    exe: PathBuf,
    config: PathBuf,
    verbose: bool,
}

impl SelfLauncher {
    pub fn new(exe: PathBuf, config: PathBuf, verbose: bool) -> Self {
        Self {
            exe,
            config,
            verbose,
        }
    }
}

impl Launch for SelfLauncher {
    fn command(&self, request: &RunRequest, foreground: bool) -> Command {
        let mut cmd = Command::new(&self.exe);
        cmd.arg("run").arg(&request.path).arg("-C").arg(&self.config);
        if foreground {
            cmd.arg("--interactive");
        }
        if self.verbose {
            cmd.arg("--verbose");
        }
        if !foreground {
            cmd.stdin(Stdio::null());
        }
        cmd
    }
}
