//! Compile (optional) → execute, once per scripted input.

use super::RunError;
use crate::logger;
use crate::utils::exec::{Cmd, Input};
use crate::{debug, log};
use std::{
    path::{Path, PathBuf},
    process::ExitStatus,
    time::{Duration, Instant},
};

/// Prepared steps for one source file.
#[derive(Debug, Clone)]
pub struct Pipeline {
    source: PathBuf,
    compile: Option<Cmd>,
    execute: Cmd,
}

/// What happened during the execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Number of times the program was started.
    pub invocations: usize,
    /// Status of the run that stopped the sequence, if any failed.
    pub failure: Option<ExitStatus>,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }
}

impl Pipeline {
    pub(super) fn compiled(source: &Path, compile: Cmd, execute: Cmd) -> Self {
        Self {
            source: source.to_path_buf(),
            compile: Some(compile),
            execute,
        }
    }

    pub(super) fn interpreted(source: &Path, execute: Cmd) -> Self {
        Self {
            source: source.to_path_buf(),
            compile: None,
            execute,
        }
    }

    #[cfg(test)]
    /// Build a pipeline from explicit steps.
    pub fn from_steps(source: &Path, compile: Option<Cmd>, execute: Cmd) -> Self {
        Self {
            source: source.to_path_buf(),
            compile,
            execute,
        }
    }

    #[cfg(test)]
    pub fn compile_step(&self) -> Option<&Cmd> {
        self.compile.as_ref()
    }

    #[cfg(test)]
    pub fn execute_step(&self) -> &Cmd {
        &self.execute
    }

    fn name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    /// Run the compile step, if any. Output goes straight to the terminal.
    ///
    /// Returns the elapsed time, or `None` when there was nothing to compile.
    pub fn compile(&self) -> Result<Option<Duration>, RunError> {
        let Some(compile) = &self.compile else {
            return Ok(None);
        };

        let name = self.name();
        log!("compile"; "{}", name);
        debug!("compile"; "{}", compile.display());

        let start = Instant::now();
        let status = compile.status().map_err(|source| RunError::Spawn {
            program: compile.program_name(),
            source,
        })?;
        let elapsed = start.elapsed();

        if !status.success() {
            return Err(RunError::Toolchain {
                program: compile.program_name(),
                status,
                elapsed,
            });
        }

        logger::status_success(&format!("compiled {name} ({}ms)", elapsed.as_millis()));
        Ok(Some(elapsed))
    }

    /// Run the program once per scripted input, stopping at the first
    /// non-zero exit. Without inputs it runs once reading from `stdin`.
    pub fn execute(&self, inputs: &[String], stdin: Input) -> Result<RunOutcome, RunError> {
        let name = self.name();
        let mut outcome = RunOutcome {
            invocations: 0,
            failure: None,
        };

        if inputs.is_empty() {
            log!("run"; "{}", name);
            let status = self.spawn_once(stdin)?;
            outcome.invocations = 1;
            if !status.success() {
                logger::status_error(&format!("{name} exited with {status}"), "");
                outcome.failure = Some(status);
            }
            return Ok(outcome);
        }

        log!("run"; "{} ({} scripted inputs)", name, inputs.len());
        for (i, input) in inputs.iter().enumerate() {
            debug!("run"; "input #{}:\n{}", i + 1, input.trim_end());

            let status = self.spawn_once(Input::Data(input.clone().into_bytes()))?;
            outcome.invocations += 1;

            if !status.success() {
                let skipped = inputs.len() - i - 1;
                let detail = if skipped > 0 {
                    format!("skipped {skipped} remaining input(s)")
                } else {
                    String::new()
                };
                logger::status_error(
                    &format!("{name} exited with {status} on input #{}", i + 1),
                    &detail,
                );
                outcome.failure = Some(status);
                break;
            }
        }

        Ok(outcome)
    }

    /// Compile, then execute.
    pub fn run(&self, inputs: &[String], stdin: Input) -> Result<RunOutcome, RunError> {
        self.compile()?;
        self.execute(inputs, stdin)
    }

    fn spawn_once(&self, input: Input) -> Result<ExitStatus, RunError> {
        self.execute
            .clone()
            .input(input)
            .status()
            .map_err(|source| RunError::Spawn {
                program: self.execute.program_name(),
                source,
            })
    }
}
