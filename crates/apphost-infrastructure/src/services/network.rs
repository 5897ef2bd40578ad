//! Platform network layer

use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, ToSocketAddrs};

use apphost_domain::error::{Error, Result};
use apphost_domain::ports::{Component, NetworkManager};
use tracing::debug;

use crate::error_ext::ErrorContext;

/// Network information from the operating system resolver
#[derive(Debug, Default)]
pub struct DefaultNetworkManager;

impl DefaultNetworkManager {
    /// Create the network manager
    pub fn new() -> Self {
        Self
    }

    fn resolve(host: &str) -> Vec<IpAddr> {
        match (host, 0).to_socket_addrs() {
            Ok(addresses) => addresses.map(|address| address.ip()).collect(),
            Err(e) => {
                debug!(host, error = %e, "Address resolution failed");
                Vec::new()
            }
        }
    }
}

impl Component for DefaultNetworkManager {}

impl NetworkManager for DefaultNetworkManager {
    fn hostname(&self) -> Result<String> {
        hostname::get()
            .io_context("Failed to read host name")?
            .into_string()
            .map_err(|name| Error::network(format!("Host name is not valid UTF-8: {}", name.to_string_lossy())))
    }

    fn local_ip_addresses(&self) -> Vec<IpAddr> {
        let mut addresses: BTreeSet<IpAddr> = self
            .hostname()
            .map(|name| Self::resolve(&name))
            .unwrap_or_default()
            .into_iter()
            .collect();
        if addresses.is_empty() {
            addresses.insert(IpAddr::V4(Ipv4Addr::LOCALHOST));
        }
        addresses.into_iter().collect()
    }

    fn is_in_local_network(&self, address: &str) -> bool {
        let candidates = match address.parse::<IpAddr>() {
            Ok(ip) => vec![ip],
            Err(_) => Self::resolve(address),
        };
        !candidates.is_empty() && candidates.iter().all(|ip| is_local_address(*ip))
    }
}

/// Loopback, private, link-local or unique-local address
pub fn is_local_address(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback() || v4.is_private() || v4.is_link_local(),
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_local_address(IpAddr::V4(v4));
            }
            v6.is_loopback() || is_unique_local(v6) || is_unicast_link_local(v6)
        }
    }
}

fn is_unique_local(ip: Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xfe00) == 0xfc00
}

fn is_unicast_link_local(ip: Ipv6Addr) -> bool {
    (ip.segments()[0] & 0xffc0) == 0xfe80
}
