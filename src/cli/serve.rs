//! `cpwatch serve`: the lifecycle controller.
//!
//! Startup order:
//! 1. Ask a previous instance on the fixed port to exit.
//! 2. Bind the control endpoint (retrying while the old instance lets go).
//! 3. Start the watcher worker process and the header warmer.
//! 4. Wait for SIGUSR1 (restart), SIGTERM (shut down) or the worker's exit.
//!
//! SIGINT is swallowed here; the worker decides what an interrupt means.

use std::os::unix::process::CommandExt;
use std::process::{Command, ExitStatus};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use tokio::process::Child;
use tokio::signal::unix::{Signal as SignalStream, SignalKind, signal};

use super::Cli;
use crate::config::{Config, cfg};
use crate::endpoint::{Endpoint, Handoff, request_exit};
use crate::utils::process::{self, set_parent_death_guard};
use crate::{core, debug, log, logger, precompile};

/// Grace period for the worker to stop its run and exit.
const WORKER_STOP_TIMEOUT: Duration = Duration::from_secs(2);

/// Why the controller's wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Shutdown,
    Restart,
    /// The worker died on its own.
    WorkerExited(Option<i32>),
}

struct Signals {
    restart: SignalStream,
    terminate: SignalStream,
    interrupt: SignalStream,
}

impl Signals {
    /// Must run inside the runtime, before anything can signal us.
    fn install() -> Result<Self> {
        Ok(Self {
            restart: signal(SignalKind::user_defined1())
                .context("Failed to install SIGUSR1 handler")?,
            terminate: signal(SignalKind::terminate())
                .context("Failed to install SIGTERM handler")?,
            interrupt: signal(SignalKind::interrupt())
                .context("Failed to install SIGINT handler")?,
        })
    }
}

pub fn serve(config: Arc<Config>, cli: &Cli) -> Result<()> {
    let addr = config.serve.addr();
    if request_exit(addr, config.serve.handoff_timeout()) == Handoff::Replaced {
        log!("serve"; "asked the previous instance on {} to exit", addr);
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    let mut signals = {
        let _enter = rt.enter();
        Signals::install()?
    };

    let endpoint = Endpoint::bind_with_retry(
        addr,
        config.serve.bind_retries,
        config.serve.bind_retry_delay(),
    )
    .context("Is another program using the port? Change [serve] port")?;
    core::register_server(endpoint.server());
    log!("serve"; "listening on http://{}", endpoint.addr());

    let mut worker = {
        let _enter = rt.enter();
        spawn_worker(&config, cli).context("Failed to start the watcher")?
    };
    let endpoint_thread = spawn_endpoint(endpoint, Arc::clone(&config));

    if config.precompile.enable {
        let config_arc = cfg();
        thread::spawn(move || precompile::run(&config_arc, false));
    }

    let exit = rt.block_on(wait(&mut signals, &mut worker));
    debug!("serve"; "wait ended: {:?}", exit);

    core::begin_shutdown();
    rt.block_on(stop_worker(&mut worker));
    let _ = endpoint_thread.join();

    match exit {
        Exit::Shutdown | Exit::WorkerExited(Some(0)) => {
            log!("serve"; "bye");
            Ok(())
        }
        Exit::Restart => restart(),
        Exit::WorkerExited(code) => bail!(
            "watcher exited unexpectedly (code {})",
            code.map_or_else(|| "none".to_string(), |c| c.to_string())
        ),
    }
}

/// `<exe> watch -C <config>` with a parent-death guard.
fn spawn_worker(config: &Config, cli: &Cli) -> Result<Child> {
    let exe = std::env::current_exe()?;
    let mut cmd = Command::new(exe);
    cmd.arg("watch")
        .arg("-C")
        .arg(&config.config_path)
        .arg("--color")
        .arg(cli.color.to_string());
    if cli.verbose {
        cmd.arg("--verbose");
    }
    set_parent_death_guard(&mut cmd);

    let child = tokio::process::Command::from(cmd)
        .kill_on_drop(true)
        .spawn()?;
    Ok(child)
}

/// Serve requests on a thread; `/exit` sends us SIGTERM once answered.
fn spawn_endpoint(endpoint: Endpoint, config: Arc<Config>) -> JoinHandle<()> {
    thread::spawn(move || {
        endpoint.serve(&config, || {
            if let Err(e) = process::signal_self(Signal::SIGTERM) {
                log!("error"; "failed to schedule exit: {}", e);
            }
        });
    })
}

async fn wait(signals: &mut Signals, worker: &mut Child) -> Exit {
    loop {
        tokio::select! {
            _ = signals.restart.recv() => return Exit::Restart,
            _ = signals.terminate.recv() => return Exit::Shutdown,
            _ = signals.interrupt.recv() => {
                debug!("serve"; "interrupt left to the watcher");
            }
            status = worker.wait() => {
                return Exit::WorkerExited(status.ok().and_then(|s| s.code()));
            }
        }
    }
}

/// SIGTERM the worker, then SIGKILL it if it lingers.
async fn stop_worker(worker: &mut Child) {
    let Some(pid) = worker.id() else {
        return;
    };
    if let Err(e) = process::send_signal(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        debug!("serve"; "failed to signal watcher: {}", e);
    }

    match tokio::time::timeout(WORKER_STOP_TIMEOUT, worker.wait()).await {
        Ok(status) => report_worker_exit(status.ok()),
        Err(_) => {
            logger::status_warning("watcher did not stop in time, killing it");
            let _ = worker.kill().await;
        }
    }
}

fn report_worker_exit(status: Option<ExitStatus>) {
    if let Some(status) = status.filter(|s| !s.success()) {
        debug!("serve"; "watcher exited with {}", status);
    }
}

/// Replace this process with a fresh copy of itself. Only returns on error.
fn restart() -> Result<()> {
    log!("serve"; "restarting");
    let exe = std::env::current_exe().context("Failed to locate own executable")?;
    let err = Command::new(exe).args(std::env::args_os().skip(1)).exec();
    Err(err).context("Failed to re-execute")
}
