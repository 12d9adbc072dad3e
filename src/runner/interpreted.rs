//! Runner for interpreted languages: a single execution step.

use super::{LanguageKind, Pipeline, RunError, Runner};
use crate::config::Config;
use crate::utils::exec::Cmd;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct InterpretedRunner {
    kind: LanguageKind,
    interpreter: String,
    flags: Vec<String>,
}

impl InterpretedRunner {
    pub fn python(config: &Config) -> Self {
        Self {
            kind: LanguageKind::Python,
            interpreter: config.lang.python.interpreter.clone(),
            flags: config.lang.python.flags.clone(),
        }
    }
}

impl Runner for InterpretedRunner {
    fn kind(&self) -> LanguageKind {
        self.kind
    }

    fn prepare(&self, source: &Path) -> Result<Pipeline, RunError> {
        let mut execute = Cmd::new(&self.interpreter).args(&self.flags).arg(source);
        if let Some(dir) = source.parent() {
            execute = execute.cwd(dir);
        }
        Ok(Pipeline::interpreted(source, execute))
    }
}
