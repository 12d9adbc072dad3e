//! Errors raised while loading `cpwatch.toml`.

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid TOML")]
    Toml(#[from] toml::de::Error),

    // Display already carries every problem; no #[source] to avoid repeating it.
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One rejected setting.
#[derive(Debug, Clone)]
pub struct Problem {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {} {}", self.field, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " {}", format_args!("({hint})").dimmed())?;
        }
        Ok(())
    }
}

/// Every rejected setting of one validation pass.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    problems: Vec<Problem>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field, message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: FieldPath, message: String, hint: Option<String>) {
        self.problems.push(Problem {
            field,
            message,
            hint,
        });
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    #[cfg(test)]
    pub fn errors(&self) -> &[Problem] {
        &self.problems
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.problems.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.problems.len();
        let noun = if count == 1 { "setting" } else { "settings" };
        write!(f, "{}", format_args!("{count} invalid {noun}:").red().bold())?;
        for problem in &self.problems {
            write!(f, "\n{problem}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_names_file() {
        let err = ConfigError::Io(
            PathBuf::from("cpwatch.toml"),
            Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "cannot read `cpwatch.toml`");
    }

    #[test]
    fn test_diagnostics_list_every_problem() {
        assert!(ConfigDiagnostics::new().into_result().is_ok());

        let mut diag = ConfigDiagnostics::new();
        diag.error_with_hint(
            FieldPath::new("serve.port"),
            "must not be 0",
            "the control endpoint needs a fixed port",
        );
        diag.error(FieldPath::new("watch.sweep_ms"), "must be greater than 0");
        let err = diag.into_result().unwrap_err();

        assert_eq!(err.len(), 2);
        assert_eq!(err.errors()[0].field.as_str(), "serve.port");
        let text = err.to_string();
        assert!(text.contains("2 invalid settings:"));
        assert!(text.contains("must not be 0"));
        assert!(text.contains("(the control endpoint needs a fixed port)"));
        assert!(text.contains("must be greater than 0"));
    }
}
