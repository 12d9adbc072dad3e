//! Problem description as sent by the browser companion.

use serde::{Deserialize, Serialize};

use super::EndpointError;
use crate::utils::path::sanitize_file_name;

/// One sample test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// `POST /` body. Unknown fields (group, memory limit, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemInfo {
    pub name: String,
    #[serde(default)]
    pub url: String,
    /// Milliseconds.
    #[serde(rename = "timeLimit", default)]
    pub time_limit: u64,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

impl ProblemInfo {
    /// Parse a request body. A name that sanitizes to nothing is rejected,
    /// since it cannot become a source file.
    pub fn from_json(body: &[u8]) -> Result<Self, EndpointError> {
        let problem: Self = serde_json::from_slice(body)?;
        if problem.file_stem().is_empty() {
            return Err(EndpointError::Unnamed);
        }
        Ok(problem)
    }

    /// File name without extension.
    pub fn file_stem(&self) -> String {
        sanitize_file_name(&self.name)
    }

    /// Time limit in seconds, without a trailing `.0`.
    pub fn time_limit_display(&self) -> String {
        let secs = self.time_limit as f64 / 1000.0;
        format!("{secs}s")
    }
}
