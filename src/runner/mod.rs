//! Language runners: map a source file to a compile/execute pipeline.
//!
//! ```text
//! RunRequest ──► runner_for(kind) ──► Runner::prepare(path) ──► Pipeline
//!                 ├── CompiledRunner    (cpp, c, java)            ├── compile (optional)
//!                 └── InterpretedRunner (python)                  └── execute × scripted inputs
//! ```

mod compiled;
mod error;
mod interpreted;
mod kind;
mod pipeline;
mod scripted;

pub use compiled::CompiledRunner;
pub use error::RunError;
pub use interpreted::InterpretedRunner;
pub use kind::LanguageKind;
pub use pipeline::{Pipeline, RunOutcome};
pub use scripted::extract_scripted_inputs;

use crate::config::Config;
use crate::utils::exec::Input;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Turns a source path into a runnable pipeline.
pub trait Runner {
    fn kind(&self) -> LanguageKind;

    fn prepare(&self, source: &Path) -> Result<Pipeline, RunError>;

    /// Stdin payloads embedded at the end of the file.
    fn scripted_inputs(&self, source: &Path) -> Result<Vec<String>, RunError> {
        if !self.kind().has_block_comments() {
            return Ok(Vec::new());
        }
        let text =
            fs::read_to_string(source).map_err(|e| RunError::Io(source.to_path_buf(), e))?;
        Ok(extract_scripted_inputs(&text))
    }
}

/// Select the runner for a language.
pub fn runner_for(kind: LanguageKind, config: &Config) -> Box<dyn Runner> {
    match kind {
        LanguageKind::Cpp => Box::new(CompiledRunner::cpp(config)),
        LanguageKind::C => Box::new(CompiledRunner::c(config)),
        LanguageKind::Java => Box::new(CompiledRunner::java(config)),
        LanguageKind::Python => Box::new(InterpretedRunner::python(config)),
    }
}

/// One qualifying save, ready to be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub path: PathBuf,
    pub kind: LanguageKind,
    pub inputs: Vec<String>,
}

impl RunRequest {
    /// Detect the language and read scripted inputs.
    pub fn new(path: &Path, config: &Config) -> Result<Self, RunError> {
        let kind = LanguageKind::from_path(path).ok_or_else(|| RunError::UnsupportedLanguage {
            path: path.to_path_buf(),
        })?;
        let inputs = runner_for(kind, config).scripted_inputs(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            kind,
            inputs,
        })
    }

    /// Without scripted inputs the program reads from the terminal.
    pub fn is_interactive(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Prepare and run the whole pipeline in the current process.
    ///
    /// `owns_terminal` decides where stdin comes from when there are no
    /// scripted inputs: the terminal, or `/dev/null`.
    pub fn execute(&self, config: &Config, owns_terminal: bool) -> Result<RunOutcome, RunError> {
        let pipeline = runner_for(self.kind, config).prepare(&self.path)?;
        let stdin = if owns_terminal {
            Input::Inherit
        } else {
            Input::Null
        };
        pipeline.run(&self.inputs, stdin)
    }
}
