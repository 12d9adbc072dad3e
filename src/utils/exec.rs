//! External command execution utilities.
//!
//! Provides a Builder-based API for running toolchains and user programs with
//! inherited terminal output, optional stdin piping, and a parent-death guard.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::{Cmd, Input};
//!
//! // Compiler: output goes straight to the terminal
//! let status = Cmd::new("g++").args(["-std=c++20", "a.cpp", "-o", "out/a"]).status()?;
//!
//! // Program fed a scripted input
//! let status = Cmd::new("out/a").input(Input::Data(b"3\n1 2 3\n".to_vec())).status()?;
//!
//! // Quiet command, output captured
//! let output = Cmd::new("g++").arg("stdc++.h").cwd(cache).output()?;
//! ```

use anyhow::{Context, Result};
use std::{
    ffi::{OsStr, OsString},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Output, Stdio},
};

// ============================================================================
// Builder API
// ============================================================================

/// Where a command's stdin comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Input {
    /// Inherit the caller's stdin (the terminal, for interactive runs).
    #[default]
    Inherit,
    /// Read from `/dev/null`.
    Null,
    /// Pipe a fixed payload, then close.
    Data(Vec<u8>),
}

/// Command builder for external process execution.
///
/// Provides a fluent API for configuring and running external commands.
/// Every spawned process gets a parent-death guard, so nothing outlives the
/// process that started it.
#[derive(Debug, Clone, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    input: Input,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Create from a command array (e.g., `["code", "-a", "."]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        let args: Vec<_> = iter.map(|s| s.as_ref().to_owned()).collect();
        Self {
            program,
            args,
            ..Default::default()
        }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            let arg = arg.as_ref();
            if !arg.is_empty() {
                self.args.push(arg.to_owned());
            }
        }
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set the stdin source.
    pub fn input(mut self, input: Input) -> Self {
        self.input = input;
        self
    }

    /// Pipe `data` to the process's stdin.
    #[cfg(test)]
    pub fn stdin_data<D: AsRef<[u8]>>(self, data: D) -> Self {
        self.input(Input::Data(data.as_ref().to_vec()))
    }

    /// Program name for messages.
    pub fn program_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .unwrap_or(&self.program)
            .to_string_lossy()
            .to_string()
    }

    #[cfg(test)]
    pub fn get_program(&self) -> &OsStr {
        &self.program
    }

    #[cfg(test)]
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    #[cfg(test)]
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Shell-like rendering for logs.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build the `std::process::Command` (stdio left to the caller).
    pub fn build(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        super::process::set_parent_death_guard(&mut cmd);
        cmd
    }

    /// Run to completion with stdout/stderr inherited from the caller.
    pub fn status(&self) -> Result<ExitStatus> {
        let name = self.program_name();
        let mut cmd = self.build();
        cmd.stdin(self.stdin_stdio());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn `{name}`"))?;

        if let Input::Data(data) = &self.input
            && let Some(mut stdin) = child.stdin.take()
        {
            // A program may exit without reading all of its input
            if let Err(e) = stdin.write_all(data)
                && e.kind() != ErrorKind::BrokenPipe
            {
                return Err(e).with_context(|| format!("Failed to write stdin to `{name}`"));
            }
        }

        child
            .wait()
            .with_context(|| format!("Failed to wait for `{name}`"))
    }

    /// Run to completion capturing stdout/stderr. Fails on non-zero exit.
    pub fn output(&self) -> Result<Output> {
        let name = self.program_name();
        let mut cmd = self.build();
        cmd.stdin(self.stdin_stdio())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn `{name}`"))?;

        if let Input::Data(data) = &self.input
            && let Some(mut stdin) = child.stdin.take()
        {
            stdin
                .write_all(data)
                .with_context(|| format!("Failed to write stdin to `{name}`"))?;
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for `{name}`"))?;

        if !output.status.success() {
            anyhow::bail!(format_error(&name, &output));
        }

        Ok(output)
    }

    fn stdin_stdio(&self) -> Stdio {
        match self.input {
            Input::Inherit => Stdio::inherit(),
            Input::Null => Stdio::null(),
            Input::Data(_) => Stdio::piped(),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Format error message for failed command.
fn format_error(name: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut msg = format!("Command `{name}` failed with {}\n", output.status);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        msg.push_str(stderr);
    }

    let stdout = stdout.trim();
    if !stdout.is_empty() {
        msg.push_str("\nStdout:\n");
        msg.push_str(stdout);
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_builder() {
        let cmd = Cmd::new("echo")
            .arg("hello")
            .args(["world", "!"])
            .cwd("/tmp");

        assert_eq!(cmd.program, OsString::from("echo"));
        assert_eq!(cmd.args.len(), 3);
        assert_eq!(cmd.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(cmd.display(), "echo hello world !");
    }

    #[test]
    fn test_empty_args_filtered() {
        let cmd = Cmd::new("echo").arg("").args(["a", "", "b"]);
        assert_eq!(cmd.args.len(), 2);
    }

    #[test]
    fn test_from_slice() {
        let cmd = Cmd::from_slice(&["code", "-a", "/cp"]);
        assert_eq!(cmd.program_name(), "code");
        assert_eq!(cmd.get_args().len(), 2);
    }

    #[test]
    fn test_program_name_strips_directories() {
        let cmd = Cmd::new("/tmp/out/a");
        assert_eq!(cmd.program_name(), "a");
    }

    #[test]
    fn test_simple_command() {
        let output = Cmd::new("echo").arg("hello").output().unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("hello"));
    }

    #[test]
    fn test_stdin_pipe() {
        let output = Cmd::new("cat").stdin_data(b"test data").output().unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, b"test data");
    }

    #[test]
    fn test_status_with_data_reports_exit_code() {
        let status = Cmd::new("sh")
            .args(["-c", "read x; test \"$x\" = ok"])
            .stdin_data("ok\n")
            .status()
            .unwrap();
        assert!(status.success());

        let status = Cmd::new("sh")
            .args(["-c", "read x; test \"$x\" = ok"])
            .stdin_data("nope\n")
            .status()
            .unwrap();
        assert!(!status.success());
    }

    #[test]
    fn test_status_ignores_unread_input() {
        let big = "x".repeat(1 << 20);
        let status = Cmd::new("true").stdin_data(big).status().unwrap();
        assert!(status.success());
    }

    #[test]
    fn test_failed_output_is_error() {
        let err = Cmd::new("sh")
            .args(["-c", "echo broken >&2; exit 3"])
            .output()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("failed"));
        assert!(msg.contains("broken"));
    }

    #[test]
    fn test_null_input() {
        let output = Cmd::new("cat").input(Input::Null).output().unwrap();
        assert!(output.stdout.is_empty());
    }
}
