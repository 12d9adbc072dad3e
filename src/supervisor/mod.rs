//! Process supervisor: owns at most one running process group.
//!
//! ```text
//!            start(req)                 start(req')
//!   Idle ───────────────► Running ──────────────────► Running'
//!    ▲                      │  killpg(SIGKILL) + reap first
//!    │   exit / stop()      │
//!    └──────────────────────┘
//! ```
//!
//! Every run gets a fresh process group (so the compiler, the program and
//! anything they spawn die together) and a parent-death guard. Interactive
//! runs additionally take over the terminal's foreground group; the
//! [`ForegroundGuard`] hands it back on every exit path.

mod launch;

pub use launch::{Launch, SelfLauncher};

use std::future::pending;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use crate::logger;
use crate::runner::RunRequest;
use crate::utils::process::{
    self, ForegroundGuard, isolate_process_group, join_own_group, kill_group,
    set_parent_death_guard,
};

/// The single live run.
#[derive(Debug)]
pub struct ActiveRun {
    pgid: i32,
    child: tokio::process::Child,
    path: PathBuf,
    /// Dropped after the child is reaped.
    _foreground: Option<ForegroundGuard>,
}

#[cfg(test)]
impl ActiveRun {
    pub fn pgid(&self) -> i32 {
        self.pgid
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

pub struct Supervisor<L> {
    launcher: L,
    active: Option<ActiveRun>,
    /// Whether we may hand the terminal to interactive runs.
    terminal: bool,
}

impl<L: Launch> Supervisor<L> {
    pub fn new(launcher: L) -> Self {
        Self::with_terminal(launcher, process::stdin_is_terminal())
    }

    pub fn with_terminal(launcher: L, terminal: bool) -> Self {
        Self {
            launcher,
            active: None,
            terminal,
        }
    }

    /// Start a run, preempting the current one.
    ///
    /// The previous group is killed and reaped before the new process exists.
    pub async fn start(&mut self, request: &RunRequest) -> io::Result<()> {
        if self.stop().await {
            logger::status_warning("terminated previous run");
        }

        let foreground = self.terminal && request.is_interactive();
        let mut cmd = self.launcher.command(request, foreground);
        set_parent_death_guard(&mut cmd);
        isolate_process_group(&mut cmd, foreground);

        // Created first so a failed spawn still restores the terminal
        let guard = foreground.then(ForegroundGuard::new);

        let mut child = tokio::process::Command::from(cmd)
            .kill_on_drop(true)
            .spawn()?;
        let Some(pid) = child.id() else {
            // Already reaped; nothing left to supervise.
            let _ = child.wait().await;
            return Ok(());
        };
        join_own_group(pid);

        crate::debug!("run"; "started pgid {} for {}", pid, request.path.display());
        self.active = Some(ActiveRun {
            pgid: pid as i32,
            child,
            path: request.path.clone(),
            _foreground: guard,
        });
        Ok(())
    }

    /// Kill and reap the active run. Returns whether there was one.
    pub async fn stop(&mut self) -> bool {
        let Some(mut run) = self.active.take() else {
            return false;
        };

        if let Err(e) = kill_group(run.pgid) {
            crate::debug!("run"; "killpg {} failed: {}", run.pgid, e);
            let _ = run.child.start_kill();
        }
        if let Err(e) = run.child.wait().await {
            crate::debug!("run"; "failed to reap {}: {}", run.pgid, e);
        }
        // `run` drops here, returning the terminal
        true
    }

    /// Resolve when the active run exits; never resolves while idle.
    ///
    /// Cancel-safe, so it can sit in a `select!` next to new events.
    pub async fn wait_active(&mut self) -> io::Result<ExitStatus> {
        match self.active.as_mut() {
            Some(run) => run.child.wait().await,
            None => pending().await,
        }
    }

    /// Clear the slot after `wait_active` resolved.
    ///
    /// The leader is already reaped, so its pgid may belong to someone else
    /// by now; the group is not signalled.
    pub fn finish(&mut self, status: io::Result<ExitStatus>) -> Option<PathBuf> {
        let run = self.active.take()?;
        match status {
            Ok(status) => crate::debug!("run"; "{} finished: {}", run.path.display(), status),
            Err(e) => crate::debug!("run"; "{} wait failed: {}", run.path.display(), e),
        }
        Some(run.path.clone())
    }
}

#[cfg(test)]
impl<L> Supervisor<L> {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveRun> {
        self.active.as_ref()
    }
}

#[cfg(test)]
mod tests;
