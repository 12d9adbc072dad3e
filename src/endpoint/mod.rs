//! Loopback control endpoint.
//!
//! Two operations, served one request at a time:
//!
//! | Request      | Effect                                               |
//! |--------------|------------------------------------------------------|
//! | `POST /`     | Materialize a problem file, maybe open the editor    |
//! | `GET /exit`  | Acknowledge, then ask this instance to terminate     |
//!
//! The fixed port doubles as the singleton token: a new instance sends
//! `GET /exit` to whoever holds it (see [`handoff`]) and then binds it.

mod handoff;
mod materialize;
mod problem;
mod response;

pub use handoff::{Handoff, request_exit};
pub use materialize::{materialize, open_in_editor};
pub use problem::ProblemInfo;

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tiny_http::{Method, Request, Server};

use crate::config::Config;
use crate::{debug, log, logger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: BoxError,
    },

    #[error("malformed problem description: {0}")]
    BadRequest(#[from] serde_json::Error),

    #[error("problem name is empty")]
    Unnamed,

    #[error("I/O error on {0}: {1}")]
    Io(PathBuf, #[source] io::Error),
}

/// Bound control endpoint.
pub struct Endpoint {
    server: Arc<Server>,
    addr: SocketAddr,
}

impl Endpoint {
    pub fn bind(addr: SocketAddr) -> Result<Self, EndpointError> {
        let server = Server::http(addr).map_err(|source| EndpointError::Bind { addr, source })?;
        let addr = server.server_addr().to_ip().unwrap_or(addr);
        Ok(Self {
            server: Arc::new(server),
            addr,
        })
    }

    /// Bind the fixed port, waiting for a previous instance to let go of it.
    pub fn bind_with_retry(
        addr: SocketAddr,
        attempts: u16,
        delay: Duration,
    ) -> Result<Self, EndpointError> {
        let mut attempt = 1;
        loop {
            match Self::bind(addr) {
                Ok(endpoint) => {
                    if attempt > 1 {
                        debug!("serve"; "bound {} after {} attempts", addr, attempt);
                    }
                    return Ok(endpoint);
                }
                Err(e) if attempt >= attempts => return Err(e),
                Err(_) => {
                    attempt += 1;
                    thread::sleep(delay);
                }
            }
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Shared server handle; `unblock()` on it ends [`Endpoint::serve`].
    pub fn server(&self) -> Arc<Server> {
        Arc::clone(&self.server)
    }

    /// Request loop. Returns once the server is unblocked.
    ///
    /// `on_exit` runs after the `/exit` acknowledgement has been sent.
    pub fn serve(&self, config: &Config, on_exit: impl Fn()) {
        for request in self.server.incoming_requests() {
            if let Err(e) = handle(request, config, &on_exit) {
                debug!("serve"; "request failed: {:#}", e);
            }
        }
    }
}

fn handle(mut request: Request, config: &Config, on_exit: &dyn Fn()) -> anyhow::Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let method = request.method().clone();
    let path = request.url().split('?').next().unwrap_or("/").to_string();
    debug!("serve"; "{} {}", method, path);

    match (method, path.as_str()) {
        (Method::Post, "/") => {
            let mut body = Vec::new();
            request.as_reader().read_to_end(&mut body)?;

            let problem = match ProblemInfo::from_json(&body) {
                Ok(problem) => problem,
                Err(e) => {
                    logger::status_error("rejected problem", &e.to_string());
                    return response::respond_bad_request(request, &e.to_string());
                }
            };
            log!("serve"; "received {}", problem.name);

            let created = match materialize(&problem, config) {
                Ok(created) => Some(created),
                Err(e) => {
                    let summary = format!("failed to create {}", problem.name);
                    logger::status_error(&summary, &e.to_string());
                    None
                }
            };
            response::respond_text(request, 200, response::THANKS)?;

            if let Some(created) = created {
                open_in_editor(config, created.path());
            }
            Ok(())
        }
        (Method::Get, "/exit") => {
            log!("serve"; "exit requested");
            response::respond_text(request, 200, response::EXIT_ACK)?;
            on_exit();
            Ok(())
        }
        _ => response::respond_not_found(request),
    }
}
