//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads. The config is never edited in place:
//! a change to `cpwatch.toml` restarts the whole program, which loads a fresh
//! copy and publishes it here.

use crate::config::Config;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<Config>> =
    LazyLock::new(|| ArcSwap::from_pointee(Config::default()));

#[inline]
pub fn cfg() -> Arc<Config> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: Config) -> Arc<Config> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
