//! Singleton handoff: ask whoever holds the port to exit.

use std::net::SocketAddr;
use std::time::Duration;

use crate::debug;

/// Outcome of the startup probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handoff {
    /// A previous instance acknowledged the exit request.
    Replaced,
    /// Nobody answered (refused, timed out, or not one of us).
    NoInstance,
}

/// Send `GET /exit` to `addr`. Never fails: anything but a 200 means no
/// instance was running.
pub fn request_exit(addr: SocketAddr, timeout: Duration) -> Handoff {
    let client = match reqwest::blocking::Client::builder()
        .timeout(timeout)
        .no_proxy()
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            debug!("serve"; "handoff client unavailable: {}", e);
            return Handoff::NoInstance;
        }
    };

    match client.get(format!("http://{addr}/exit")).send() {
        Ok(resp) if resp.status().is_success() => Handoff::Replaced,
        Ok(resp) => {
            debug!("serve"; "{} answered exit with {}", addr, resp.status());
            Handoff::NoInstance
        }
        Err(e) => {
            debug!("serve"; "no instance on {}: {}", addr, e);
            Handoff::NoInstance
        }
    }
}
