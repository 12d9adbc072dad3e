//! `cpwatch stop`: manual singleton handoff.

use crate::config::Config;
use crate::endpoint::{Handoff, request_exit};
use crate::log;

pub fn stop_instance(config: &Config) -> Handoff {
    let addr = config.serve.addr();
    let handoff = request_exit(addr, config.serve.handoff_timeout());
    match handoff {
        Handoff::Replaced => log!("serve"; "instance on {} is shutting down", addr),
        Handoff::NoInstance => log!("serve"; "no instance listening on {}", addr),
    }
    handoff
}
