//! IP address classification, random addresses, LAN membership and lazy
//! enumeration of the usable hosts of a CIDR block.
//!
//! ```
//! let net: ipkit::Network = "192.168.1.1/16".parse().unwrap();
//! let list = ipkit::get_list(&net).unwrap();
//! assert_eq!("192.168.0.0", list.first.to_string());
//! assert_eq!(65534, list.usable.unwrap().count());
//! ```

mod address;
mod error;
pub mod ipv4;
pub mod ipv6;
#[cfg(feature = "lan")]
mod lan;
mod range;

pub use address::{coerce, increment, Address, AsAddress, Mask, Network};
pub use error::{Error, Result, Version};
pub use ipv4::{get_list4, is_reserved4, is_valid4, public4, random4};
pub use ipv6::{get_list6, is_reserved6, is_valid6, public6, random6};
#[cfg(feature = "lan")]
pub use lan::is_lan;
pub use range::{List, Usable};

use rand::Rng;

/// Whether `ip` is an IPv4 or IPv6 address.
pub fn is_valid<T: AsAddress>(ip: T) -> bool {
    is_valid4(&ip) || is_valid6(&ip)
}

/// Whether `ip` is inside a reserved block of its protocol version.
pub fn is_reserved<T: AsAddress>(ip: T) -> bool {
    is_reserved4(&ip) || is_reserved6(&ip)
}

/// A random address of a random version. It can be a reserved address.
///
/// Uniform but not meant for anything security related.
pub fn random() -> Address {
    random_with(&mut rand::thread_rng())
}

/// [`random`] drawing from `rng`. The version is a fair coin flip.
///
/// Uniform but not meant for anything security related.
pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Address {
    if rng.gen_bool(0.5) {
        ipv4::random4_with(rng)
    } else {
        ipv6::random6_with(rng)
    }
}

/// A random non-reserved address of a random version.
pub fn public() -> Address {
    public_with(&mut rand::thread_rng())
}

/// [`public`] drawing from `rng`.
///
/// Draws until an address is not reserved. There is no bound on the number of draws.
///
/// ```
/// use rand::SeedableRng;
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let ip = ipkit::public_with(&mut rng);
/// assert!(ipkit::is_valid(ip) && !ipkit::is_reserved(ip));
/// ```
pub fn public_with<R: Rng + ?Sized>(rng: &mut R) -> Address {
    if rng.gen_bool(0.5) {
        ipv4::public4_with(rng)
    } else {
        ipv6::public6_with(rng)
    }
}

/// First (network) address, last (broadcast) address and the usable
/// addresses in between.
///
/// For a /32 or /128 the last address and the usable addresses are `None`.
/// For a /31 or /127 the usable addresses are `None`.
/// A mask of the other protocol version is an [`Error::InvalidMask`].
pub fn get_list(net: &Network) -> Result<List> {
    match net.addr() {
        Address::V4(_) => get_list4(net),
        Address::V6(_) => get_list6(net),
    }
}
