//! Shared utilities.
//!
//! - [`exec`]: command builder used for toolchains, user programs and the editor
//! - [`path`]: path normalization and file-name helpers
//! - [`process`]: process groups, terminal foreground, signal delivery

pub mod exec;
pub mod path;
pub mod process;
