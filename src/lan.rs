//! Membership of an address in the subnets of the local interfaces.

use crate::address::{Address, AsAddress, Mask, Network};
use crate::error::{Error, Result};
use if_addrs::{get_if_addrs, IfAddr, Interface};
use log::{debug, trace};

/// Whether `ip` falls inside a subnet assigned to a local interface.
///
/// Failing to list the interfaces is reported as a fatal [`Error::Interfaces`].
pub fn is_lan(ip: &Address) -> Result<bool> {
    let interfaces = get_if_addrs().map_err(Error::Interfaces)?;
    Ok(in_subnets(interfaces.iter().filter_map(subnet), ip))
}

fn in_subnets<I: IntoIterator<Item = Network>>(subnets: I, ip: &Address) -> bool {
    for net in subnets {
        if net.contains(ip) {
            debug!("{} is inside local subnet {}", ip, net);
            return true;
        }
    }
    false
}

fn subnet(iface: &Interface) -> Option<Network> {
    let (ip, mask) = match &iface.addr {
        IfAddr::V4(v) => (Address::from(v.ip), Mask::new(&v.netmask.octets())),
        IfAddr::V6(v) => (Address::from(v.ip), Mask::new(&v.netmask.octets())),
    };
    match mask {
        Ok(mask) => Some(Network::new(ip, mask)),
        Err(e) => {
            trace!("skipping {} on {}: {}", ip, iface.name, e);
            None
        }
    }
}

impl AsAddress for IfAddr {
    fn as_address(&self) -> Option<Address> {
        match self {
            IfAddr::V4(v) => Some(v.ip.into()),
            IfAddr::V6(v) => Some(v.ip.into()),
        }
    }
}

impl AsAddress for Interface {
    fn as_address(&self) -> Option<Address> {
        self.addr.as_address()
    }
}
