//! Watcher loop: the worker process that turns saves into runs.
//!
//! Architecture:
//! ```text
//! inotify close-write → EventFilter (kind, temp files, out dirs)
//!                     → TimedSet (one event per path per window)
//!                     → EventFilter::classify (zero-byte guard, restart files)
//!                     → Supervisor::start (preempts the previous run)
//! ```
//!
//! The worker owns the supervisor; the controller only talks to it through
//! signals and process exit.

mod debouncer;
mod filter;
mod targets;

#[cfg(test)]
mod tests;

pub use debouncer::TimedSet;
pub use filter::{Action, EventFilter};
pub use targets::WatchTargets;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use nix::sys::signal::Signal;
use notify::RecommendedWatcher;
use thiserror::Error;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::runner::RunRequest;
use crate::supervisor::{Launch, Supervisor};
use crate::utils::process;
use crate::{debug, log, logger};

/// Watch setup failures. Fatal at startup.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("watch root `{}` does not exist", .0.display())]
    MissingRoot(PathBuf),

    #[error("cannot watch `{}`", path.display())]
    Notify {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("IO error on `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
}

/// What the loop asks of its environment besides running programs.
pub trait Controller {
    /// Ask for a full restart (config or executable changed).
    fn request_restart(&self);
    /// Ask for a shutdown (interrupt while idle).
    fn request_shutdown(&self);
}

/// Signals the parent `serve` process.
pub struct ParentController;

impl Controller for ParentController {
    fn request_restart(&self) {
        if let Err(e) = process::signal_parent(Signal::SIGUSR1) {
            log!("error"; "failed to request restart: {}", e);
        }
    }

    fn request_shutdown(&self) {
        if let Err(e) = process::signal_parent(Signal::SIGTERM) {
            log!("error"; "failed to request shutdown: {}", e);
        }
    }
}

pub struct WatchLoop<L, C> {
    events: mpsc::Receiver<notify::Event>,
    /// Kept alive for the lifetime of the loop.
    _watcher: RecommendedWatcher,
    filter: EventFilter,
    debouncer: TimedSet<PathBuf>,
    supervisor: Supervisor<L>,
    controller: C,
    config: Arc<Config>,
}

impl<L: Launch, C: Controller> WatchLoop<L, C> {
    /// Attach every target; a missing or unwatchable directory is fatal.
    pub fn new(
        config: Arc<Config>,
        supervisor: Supervisor<L>,
        controller: C,
    ) -> Result<Self, WatchError> {
        let targets = WatchTargets::collect(&config.watch)?;
        let (tx, events) = mpsc::channel(256);

        // The callback runs on notify's own thread, outside the runtime.
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    let _ = tx.blocking_send(event);
                }
                Err(e) => crate::log!("watch"; "notify error: {}", e),
            }
        })
        .map_err(|source| WatchError::Notify {
            path: config.watch.root.clone(),
            source,
        })?;
        targets.attach(&mut watcher)?;

        log!(
            "watch";
            "watching {} directories under {}",
            targets.len(),
            config.get_root().display()
        );

        Ok(Self {
            events,
            _watcher: watcher,
            filter: EventFilter::new(&config, &targets),
            debouncer: TimedSet::new(config.watch.debounce()),
            supervisor,
            controller,
            config,
        })
    }

    /// Run until SIGTERM (or the event source closes).
    ///
    /// SIGINT kills the active run; with nothing running it asks the
    /// controller to shut down.
    pub async fn run(mut self) -> Result<()> {
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
        let mut sweep = tokio::time::interval(self.config.watch.sweep_interval());

        loop {
            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => self.handle_event(&event).await,
                    None => break,
                },
                status = self.supervisor.wait_active() => {
                    self.supervisor.finish(status);
                }
                _ = sweep.tick() => self.debouncer.sweep(),
                _ = sigint.recv() => self.interrupt().await,
                _ = sigterm.recv() => break,
            }
        }

        self.supervisor.stop().await;
        log!("watch"; "closing watch");
        Ok(())
    }

    async fn interrupt(&mut self) {
        if self.supervisor.stop().await {
            logger::status_warning("terminating current process");
        } else {
            debug!("watch"; "interrupt while idle, shutting down");
            self.controller.request_shutdown();
        }
    }

    /// Handle one raw event. Dispatches at most one action per path.
    pub async fn handle_event(&mut self, event: &notify::Event) {
        let paths: Vec<PathBuf> = self
            .filter
            .candidates(event)
            .map(|p| p.to_path_buf())
            .collect();

        for path in paths {
            if !self.debouncer.should_process(&path) {
                continue;
            }
            let Some(action) = self.filter.classify(&path) else {
                continue;
            };
            self.dispatch(action).await;
        }
    }

    async fn dispatch(&mut self, action: Action) {
        match action {
            Action::Restart(path) => {
                let name = self.config.root_relative(&path);
                log!("watch"; "{} changed, restarting", name.display());
                self.supervisor.stop().await;
                self.controller.request_restart();
            }
            Action::Run(path) => {
                let request = match RunRequest::new(&path, &self.config) {
                    Ok(request) => request,
                    Err(e) => {
                        let summary = format!("cannot run {}", path.display());
                        logger::status_error(&summary, &e.to_string());
                        return;
                    }
                };
                debug!(
                    "watch";
                    "{} ({}, {} scripted inputs)",
                    self.config.root_relative(&path).display(),
                    request.kind,
                    request.inputs.len()
                );
                if let Err(e) = self.supervisor.start(&request).await {
                    let summary = format!("failed to start run for {}", path.display());
                    logger::status_error(&summary, &e.to_string());
                }
            }
        }
    }

    #[cfg(test)]
    pub fn supervisor(&self) -> &Supervisor<L> {
        &self.supervisor
    }
}
