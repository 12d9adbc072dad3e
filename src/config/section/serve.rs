//! `[serve]` section configuration.
//!
//! Contains control endpoint settings.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Loopback only
//! port = 10043                # Fixed port, doubles as the singleton token
//! bind_retries = 20           # Attempts while a previous instance exits
//! bind_retry_ms = 100
//! handoff_timeout_ms = 1000   # Timeout of the startup exit request
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Control endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind. Must be a loopback address.
    pub interface: IpAddr,

    /// HTTP port number. Every instance uses the same port.
    pub port: u16,

    /// Bind attempts before giving up.
    pub bind_retries: u16,

    /// Delay between bind attempts.
    pub bind_retry_ms: u64,

    /// Timeout of the exit request sent to a previous instance.
    pub handoff_timeout_ms: u64,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 10043,
            bind_retries: 20,
            bind_retry_ms: 100,
            handoff_timeout_ms: 1000,
        }
    }
}

impl ServeConfig {
    const INTERFACE: FieldPath = FieldPath::new("serve.interface");
    const PORT: FieldPath = FieldPath::new("serve.port");
    const BIND_RETRIES: FieldPath = FieldPath::new("serve.bind_retries");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.interface.is_loopback() {
            diag.error_with_hint(
                Self::INTERFACE,
                format!("`{}` is not a loopback address", self.interface),
                "the control endpoint writes files on request; keep it on 127.0.0.1",
            );
        }
        if self.port == 0 {
            diag.error_with_hint(
                Self::PORT,
                "must not be 0",
                "instances find each other through a fixed port",
            );
        }
        if self.bind_retries == 0 {
            diag.error(Self::BIND_RETRIES, "must be at least 1");
        }
    }

    /// Socket address of the control endpoint.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.interface, self.port)
    }

    pub fn bind_retry_delay(&self) -> Duration {
        Duration::from_millis(self.bind_retry_ms)
    }

    pub fn handoff_timeout(&self) -> Duration {
        Duration::from_millis(self.handoff_timeout_ms)
    }
}
