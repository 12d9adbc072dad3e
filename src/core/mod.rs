//! Process-wide controller state.

mod state;

pub use state::{begin_shutdown, is_shutdown, register_server};
