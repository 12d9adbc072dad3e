//! `cpwatch watch`: the watcher worker process.
//!
//! Spawned by `serve`. Owns the supervisor; talks back to the controller
//! only through signals (SIGUSR1: restart, SIGTERM: shut down).

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::supervisor::{SelfLauncher, Supervisor};
use crate::utils::process;
use crate::watch::{ParentController, WatchLoop};

pub fn run_worker(config: Arc<Config>, verbose: bool) -> Result<()> {
    // We reclaim the terminal from background runs
    process::ignore_job_control_signals().context("Failed to ignore job-control signals")?;

    let exe = std::env::current_exe().context("Failed to locate own executable")?;
    let launcher = SelfLauncher::new(exe, config.config_path.clone(), verbose);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(async move {
        let watch = WatchLoop::new(config, Supervisor::new(launcher), ParentController)?;
        watch.run().await
    })
}
