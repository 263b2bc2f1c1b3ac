use crate::address::{Address, AsAddress, Mask, Network};
use crate::error::{Result, Version};
use crate::range::{self, List};
use lazy_static::lazy_static;
use log::trace;
use rand::Rng;

pub const IPV4_LEN: usize = 4;

/// /32 network mask
pub const MASK_32: Mask = Mask(Address::V4([0xff, 0xff, 0xff, 0xff]));
/// /31 network mask
pub const MASK_31: Mask = Mask(Address::V4([0xff, 0xff, 0xff, 0xfe]));

lazy_static! {
    /// IANA IPv4 special-purpose address blocks.
    ///
    /// <https://www.iana.org/assignments/iana-ipv4-special-registry/iana-ipv4-special-registry.xhtml>
    pub static ref RESERVED_IPV4: Vec<Network> = [
        "0.0.0.0/8",          // "This" network
        "10.0.0.0/8",         // Class A private network
        "100.64.0.0/10",      // Carrier-grade NAT
        "127.0.0.0/8",        // Loopback
        "169.254.0.0/16",     // Link local
        "172.16.0.0/12",      // Class B private network
        "192.0.0.0/24",       // IETF protocol assignments
        "192.0.2.0/24",       // TEST-NET-1
        "192.88.99.0/24",     // Formerly 6to4 relay anycast
        "192.168.0.0/16",     // Class C private network
        "198.18.0.0/15",      // Benchmarking
        "198.51.100.0/24",    // TEST-NET-2
        "203.0.113.0/24",     // TEST-NET-3
        "224.0.0.0/4",        // Multicast
        "233.252.0.0/24",     // MCAST-TEST-NET
        "240.0.0.0/4",        // Reserved for future use
        "255.255.255.255/32", // Broadcast
    ]
    .iter()
    .map(|s| s.parse::<Network>().expect("Not possible"))
    .collect();
}

/// Whether `ip` is an IPv4 address.
pub fn is_valid4<T: AsAddress>(ip: T) -> bool {
    matches!(ip.as_address(), Some(Address::V4(_)))
}

/// Whether `ip` is an IPv4 address inside a reserved block.
pub fn is_reserved4<T: AsAddress>(ip: T) -> bool {
    match ip.as_address() {
        Some(ip @ Address::V4(_)) => RESERVED_IPV4.iter().any(|net| net.contains(ip)),
        _ => false,
    }
}

/// A random IPv4 address, possibly a reserved one.
pub fn random4() -> Address {
    random4_with(&mut rand::thread_rng())
}

/// Uniform but not meant for anything security related.
pub fn random4_with<R: Rng + ?Sized>(rng: &mut R) -> Address {
    Address::V4(rng.gen())
}

/// A random IPv4 address outside every reserved block.
pub fn public4() -> Address {
    public4_with(&mut rand::thread_rng())
}

/// Draws until an address is not reserved. There is no bound on the number of draws.
pub fn public4_with<R: Rng + ?Sized>(rng: &mut R) -> Address {
    let mut draws = 1u64;
    loop {
        let ip = random4_with(rng);
        if !is_reserved4(ip) {
            trace!("public IPv4 address {} after {} draws", ip, draws);
            return ip;
        }
        draws += 1;
    }
}

/// Addresses of an IPv4 network, see [`crate::get_list`].
pub fn get_list4(net: &Network) -> Result<List> {
    range::list(net, Version::V4, &MASK_32, &MASK_31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::net::Ipv4Addr;

    #[test]
    fn valid4() {
        assert!(is_valid4("0.0.0.0"));
        assert!(is_valid4("255.255.255.255"));
        assert!(!is_valid4("0.0.0"));
        assert!(!is_valid4("0.0.0.256"));
        assert!(!is_valid4("::"));
        assert!(!is_valid4("::ffff:1.2.3.4"));
    }

    #[test]
    fn reserved4() {
        assert_eq!(17, RESERVED_IPV4.len());
        for net in RESERVED_IPV4.iter() {
            assert!(is_reserved4(net.addr()), "{}", net);
            assert!(is_reserved4(net.last().unwrap()), "{}", net);
        }
        for ip in &["10.0.0.1", "127.0.0.1", "192.168.1.1", "255.255.255.255", "100.127.0.1"] {
            assert!(is_reserved4(*ip), "{}", ip);
        }
        for ip in &["8.8.8.8", "1.1.1.1", "100.128.0.1", "172.32.0.1", "::1"] {
            assert!(!is_reserved4(*ip), "{}", ip);
        }
    }

    #[test]
    fn public4_skips_reserved() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..10_000 {
            let ip = public4_with(&mut rng);
            assert!(ip.is_v4());
            assert!(!is_reserved4(ip), "{}", ip);
        }
    }

    #[quickcheck]
    fn scan_matches_closed_form(ip: u32, len: u8) -> bool {
        // the host part is kept small so the scan stays cheap
        let len = 20 + len % 13;
        let net = Network::with_prefix(Ipv4Addr::from(ip).into(), len).unwrap();
        let first = net.network().unwrap();
        let mut last = first;
        let mut ip = first.next();
        while net.contains(ip) && ip != first {
            last = ip;
            ip = ip.next();
        }
        net.last() == Some(last)
    }
}
