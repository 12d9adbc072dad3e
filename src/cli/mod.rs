//! Command-line interface module.

mod args;
pub mod run;
pub mod serve;
pub mod stop;
pub mod watch;

pub use args::{Cli, Commands};
