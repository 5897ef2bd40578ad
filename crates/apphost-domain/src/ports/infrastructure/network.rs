//! Network layer port

use crate::error::Result;
use crate::ports::lifecycle::Component;
use std::net::IpAddr;

/// Platform network information
pub trait NetworkManager: Component {
    /// Host name of this machine
    fn hostname(&self) -> Result<String>;

    /// Addresses this machine is reachable at
    fn local_ip_addresses(&self) -> Vec<IpAddr>;

    /// Whether an address belongs to a private or loopback network
    fn is_in_local_network(&self, address: &str) -> bool;
}
