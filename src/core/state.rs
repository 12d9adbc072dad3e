//! Controller shutdown state.
//!
//! Two pieces of process-wide state:
//! - `SHUTDOWN`: has the controller started tearing down?
//! - `SERVER`: the control endpoint, unblocked on shutdown so its request
//!   loop returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tiny_http::Server;

/// Shutdown or restart has been requested
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server reference for graceful shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Register the HTTP server for graceful shutdown
///
/// Call this after binding the server, before entering the request loop
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

/// Mark shutdown as started and stop accepting requests.
///
/// Returns `false` if shutdown was already under way.
pub fn begin_shutdown() -> bool {
    if SHUTDOWN.swap(true, Ordering::SeqCst) {
        return false;
    }
    if let Some(server) = SERVER.get() {
        server.unblock();
    }
    true
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
