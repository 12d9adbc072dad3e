//! Run pipeline errors.

use std::{path::PathBuf, process::ExitStatus, time::Duration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    /// The compiler ran and rejected the source.
    #[error("{program} failed with {status} after {}ms", elapsed.as_millis())]
    Toolchain {
        program: String,
        status: ExitStatus,
        elapsed: Duration,
    },

    #[error("no class declaration found in `{}`", path.display())]
    EntryPointNotFound { path: PathBuf },

    #[error("unsupported file type: `{}`", path.display())]
    UnsupportedLanguage { path: PathBuf },

    #[error("failed to start `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error on `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
}
