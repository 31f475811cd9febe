// SPDX-License-Identifier: MIT

//! Local IP discovery (spec §4.2 "local IP discovery"): enumerate the
//! host's network interfaces via `nix::ifaddrs` (already a workspace
//! dependency for signal handling, so no new crate is pulled in for this),
//! and either pick the first non-loopback address or validate a configured
//! one against what the host actually has.

use crate::error::AgentError;
use nix::ifaddrs::getifaddrs;
use nix::sys::socket::SockaddrLike;
use std::net::IpAddr;

pub fn discover_non_loopback_addresses() -> Result<Vec<IpAddr>, AgentError> {
    let interfaces = getifaddrs().map_err(|e| AgentError::Fatal(format!("failed to enumerate network interfaces: {e}")))?;
    let mut addrs = Vec::new();
    for interface in interfaces {
        let Some(address) = interface.address else { continue };
        let ip = if let Some(sin) = address.as_sockaddr_in() {
            IpAddr::V4(sin.ip())
        } else if let Some(sin6) = address.as_sockaddr_in6() {
            IpAddr::V6(sin6.ip())
        } else {
            continue;
        };
        if !ip.is_loopback() {
            addrs.push(ip);
        }
    }
    Ok(addrs)
}

/// Resolve the address the agent should report to the control plane: the
/// first discovered non-loopback address when `configured` is `None`,
/// otherwise `configured` itself after confirming it matches a real address
/// on this host — fatal either way if it can't be satisfied.
pub fn resolve_local_ip(configured: Option<&str>) -> Result<String, AgentError> {
    let discovered = discover_non_loopback_addresses()?;
    match configured {
        None => discovered
            .into_iter()
            .next()
            .map(|ip| ip.to_string())
            .ok_or_else(|| AgentError::Fatal("no non-loopback network address found on this host".to_string())),
        Some(addr) => {
            let parsed: IpAddr =
                addr.parse().map_err(|_| AgentError::Fatal(format!("configured address {addr:?} is not a valid IP")))?;
            if discovered.contains(&parsed) {
                Ok(addr.to_string())
            } else {
                Err(AgentError::Fatal(format!("configured address {addr} does not match any address on this host")))
            }
        }
    }
}

#[cfg(test)]
#[path = "localip_tests.rs"]
mod tests;
