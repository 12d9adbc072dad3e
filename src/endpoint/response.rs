//! HTTP response helpers.

use anyhow::Result;
use tiny_http::{Header, Request, Response, StatusCode};

pub const THANKS: &str = "Thanks :)";
pub const EXIT_ACK: &str = "Request received.";

const PLAIN: &str = "text/plain; charset=utf-8";

pub fn respond_text(request: Request, status: u16, body: &str) -> Result<()> {
    let response = Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", PLAIN));
    request.respond(response)?;
    Ok(())
}

pub fn respond_not_found(request: Request) -> Result<()> {
    respond_text(request, 404, "404 Not Found")
}

pub fn respond_unavailable(request: Request) -> Result<()> {
    respond_text(request, 503, "Shutting down")
}

pub fn respond_bad_request(request: Request, reason: &str) -> Result<()> {
    respond_text(request, 400, reason)
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}
