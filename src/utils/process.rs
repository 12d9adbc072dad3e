//! Process groups, terminal foreground, and signal delivery.
//!
//! Everything here is Unix-only. The closures handed to `pre_exec` run between
//! `fork` and `exec`, so they only call async-signal-safe libc functions.

use nix::{
    errno::Errno,
    libc,
    sys::signal::{self, SigHandler, Signal},
    unistd::{self, Pid},
};
use std::{
    io::{self, IsTerminal},
    os::unix::process::CommandExt,
    process::Command,
};

/// Kill the child with SIGKILL when the spawning process dies.
///
/// No-op outside Linux.
pub fn set_parent_death_guard(cmd: &mut Command) {
    // SAFETY: only async-signal-safe calls in the closure.
    unsafe {
        cmd.pre_exec(|| {
            #[cfg(target_os = "linux")]
            if libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGKILL) == -1 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }
}

/// Put the child in a fresh process group whose id equals its pid.
///
/// With `foreground`, the new group also takes over the controlling terminal,
/// so terminal-generated signals (Ctrl-C) reach the child instead of us.
/// Job-control stop signals are reset to default in the child, since the
/// caller ignores them.
pub fn isolate_process_group(cmd: &mut Command, foreground: bool) {
    // SAFETY: only async-signal-safe calls in the closure.
    unsafe {
        cmd.pre_exec(move || {
            if libc::setpgid(0, 0) == -1 {
                return Err(io::Error::last_os_error());
            }
            if foreground {
                // The caller ignores SIGTTOU, which this call would otherwise raise.
                libc::tcsetpgrp(libc::STDIN_FILENO, libc::getpid());
            }
            libc::signal(libc::SIGTTOU, libc::SIG_DFL);
            libc::signal(libc::SIGTTIN, libc::SIG_DFL);
            libc::signal(libc::SIGINT, libc::SIG_DFL);
            Ok(())
        });
    }
}

/// Mirror of the child's own `setpgid`, closing the race before exec.
pub fn join_own_group(pid: u32) {
    let pid = Pid::from_raw(pid as i32);
    // EACCES once the child has exec'd; the child already did it then.
    let _ = unistd::setpgid(pid, pid);
}

/// Send SIGKILL to every process in the group.
pub fn kill_group(pgid: i32) -> nix::Result<()> {
    match signal::killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        Err(Errno::ESRCH) => Ok(()),
        other => other,
    }
}

/// Deliver `sig` to `pid`.
pub fn send_signal(pid: Pid, sig: Signal) -> nix::Result<()> {
    signal::kill(pid, sig)
}

/// Ask the parent process to act (SIGTERM: shut down, SIGUSR1: restart).
pub fn signal_parent(sig: Signal) -> nix::Result<()> {
    send_signal(unistd::getppid(), sig)
}

/// Deliver `sig` to ourselves.
pub fn signal_self(sig: Signal) -> nix::Result<()> {
    send_signal(unistd::getpid(), sig)
}

/// Ignore the job-control signals a background process gets when it touches
/// the terminal (needed to hand the foreground back and forth).
pub fn ignore_job_control_signals() -> nix::Result<()> {
    // SAFETY: SigIgn installs no handler code.
    unsafe {
        signal::signal(Signal::SIGTTOU, SigHandler::SigIgn)?;
        signal::signal(Signal::SIGTTIN, SigHandler::SigIgn)?;
    }
    Ok(())
}

/// Whether stdin is a terminal we could hand to a child.
pub fn stdin_is_terminal() -> bool {
    io::stdin().is_terminal()
}

// ============================================================================
// ForegroundGuard
// ============================================================================

/// Returns the terminal foreground to our own process group on drop.
///
/// Created when a child was started with `isolate_process_group(_, true)`.
#[derive(Debug)]
pub struct ForegroundGuard {
    owner: Pid,
}

impl ForegroundGuard {
    pub fn new() -> Self {
        Self {
            owner: unistd::getpgrp(),
        }
    }

    fn restore(&self) -> nix::Result<()> {
        // SAFETY: plain syscall on a valid descriptor.
        Errno::result(unsafe { libc::tcsetpgrp(libc::STDIN_FILENO, self.owner.as_raw()) })
            .map(drop)
    }
}

impl Default for ForegroundGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ForegroundGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            crate::debug!("run"; "failed to reclaim terminal: {}", e);
        }
    }
}
