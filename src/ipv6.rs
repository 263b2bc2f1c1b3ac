use crate::address::{Address, AsAddress, Mask, Network};
use crate::error::{Result, Version};
use crate::range::{self, List};
use lazy_static::lazy_static;
use log::trace;
use rand::Rng;

pub const IPV6_LEN: usize = 16;

/// /128 network mask
pub const MASK_128: Mask = Mask(Address::V6([0xff; IPV6_LEN]));
/// /127 network mask
pub const MASK_127: Mask = Mask(Address::V6([
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
]));

lazy_static! {
    /// IANA IPv6 special-purpose address blocks.
    pub static ref RESERVED_IPV6: Vec<Network> = [
        "::/128",          // Unspecified address
        "::1/128",         // Loopback address
        "::ffff:0:0/96",   // IPv4-mapped addresses
        "::ffff:0:0:0/96", // IPv4 translated addresses
        "64:ff9b::/96",    // IPv4-IPv6 translation
        "64:ff9b:1::/48",  // IPv4-IPv6 translation
        "100::/64",        // Discard-only address block
        "2001::/32",       // IETF protocol assignments
        "2001:20::/28",    // ORCHIDv2
        "2001:db8::/32",   // Documentation
        "2002::/16",       // 6to4
        "fc00::/7",        // Unique-local
        "fe80::/10",       // Link-local unicast
        "ff00::/8",        // Multicast
    ]
    .iter()
    .map(|s| s.parse::<Network>().expect("Not possible"))
    .collect();
}

/// Whether `ip` is an IPv6 address. IPv4-mapped text stays IPv6.
pub fn is_valid6<T: AsAddress>(ip: T) -> bool {
    matches!(ip.as_address(), Some(Address::V6(_)))
}

/// Whether `ip` is an IPv6 address inside a reserved block.
pub fn is_reserved6<T: AsAddress>(ip: T) -> bool {
    match ip.as_address() {
        Some(ip @ Address::V6(_)) => RESERVED_IPV6.iter().any(|net| net.contains(ip)),
        _ => false,
    }
}

/// A random IPv6 address, possibly a reserved one.
pub fn random6() -> Address {
    random6_with(&mut rand::thread_rng())
}

/// Uniform but not meant for anything security related.
pub fn random6_with<R: Rng + ?Sized>(rng: &mut R) -> Address {
    Address::V6(rng.gen())
}

/// A random IPv6 address outside every reserved block.
pub fn public6() -> Address {
    public6_with(&mut rand::thread_rng())
}

/// Draws until an address is not reserved. There is no bound on the number of draws.
pub fn public6_with<R: Rng + ?Sized>(rng: &mut R) -> Address {
    let mut draws = 1u64;
    loop {
        let ip = random6_with(rng);
        if !is_reserved6(ip) {
            trace!("public IPv6 address {} after {} draws", ip, draws);
            return ip;
        }
        draws += 1;
    }
}

/// Addresses of an IPv6 network, see [`crate::get_list`].
pub fn get_list6(net: &Network) -> Result<List> {
    range::list(net, Version::V6, &MASK_128, &MASK_127)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::net::Ipv6Addr;

    #[test]
    fn valid6() {
        assert!(is_valid6("::"));
        assert!(is_valid6("0::"));
        assert!(is_valid6("::ffff:1.2.3.4"));
        assert!(!is_valid6("::x"));
        assert!(!is_valid6(":"));
        assert!(!is_valid6("1.2.3.4"));
    }

    #[test]
    fn reserved6() {
        assert_eq!(14, RESERVED_IPV6.len());
        for net in RESERVED_IPV6.iter() {
            assert!(is_reserved6(net.addr()), "{}", net);
        }
        for ip in &["::", "::1", "::ffff:10.0.0.1", "2001:db8::1", "fd00::1", "fe80::1", "ff02::1"] {
            assert!(is_reserved6(*ip), "{}", ip);
        }
        for ip in &["2606:4700:4700::1111", "2a00:1450::1", "127.0.0.1"] {
            assert!(!is_reserved6(*ip), "{}", ip);
        }
    }

    #[test]
    fn public6_skips_reserved() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..10_000 {
            let ip = public6_with(&mut rng);
            assert!(ip.is_v6());
            assert!(!is_reserved6(ip), "{}", ip);
        }
    }

    #[test]
    fn list_127() {
        let net: Network = "2001:db8::1/127".parse().unwrap();
        let list = get_list6(&net).unwrap();
        assert_eq!("2001:db8::".parse::<Address>().unwrap(), list.first);
        assert_eq!(Some("2001:db8::1".parse().unwrap()), list.last);
        assert!(list.usable.is_none());
    }

    #[test]
    fn list_64_is_lazy() {
        let net: Network = "2001:db8:0:1::/64".parse().unwrap();
        let list = get_list6(&net).unwrap();
        assert_eq!(
            Some("2001:db8:0:1:ffff:ffff:ffff:ffff".parse().unwrap()),
            list.last
        );
        let head: Vec<String> = list.usable.unwrap().take(3).map(|ip| ip.to_string()).collect();
        assert_eq!(vec!["2001:db8:0:1::1", "2001:db8:0:1::2", "2001:db8:0:1::3"], head);
    }

    #[quickcheck]
    fn scan_matches_closed_form(ip: u128, len: u8) -> bool {
        let len = 116 + len % 13;
        let net = Network::with_prefix(Ipv6Addr::from(ip).into(), len).unwrap();
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
