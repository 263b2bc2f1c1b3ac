//! Canonical address, mask and network types, and coercion from the
//! address-like types of `std::net`.

use crate::error::{Error, Result, Version};
use crate::ipv4::IPV4_LEN;
use crate::ipv6::IPV6_LEN;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::{Display, Error as FmtError, Formatter};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::str::FromStr;

/// An IP address as big-endian octets. The width decides the version.
///
/// Ordering compares IPv4 before IPv6, then by integer value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Address {
    V4([u8; IPV4_LEN]),
    V6([u8; IPV6_LEN]),
}

impl Address {
    /// Copies a raw 4 or 16 byte address. Any other width is not an address.
    pub fn from_octets(octets: &[u8]) -> Option<Self> {
        match octets.len() {
            IPV4_LEN => {
                let mut v = [0u8; IPV4_LEN];
                v.copy_from_slice(octets);
                Some(Address::V4(v))
            }
            IPV6_LEN => {
                let mut v = [0u8; IPV6_LEN];
                v.copy_from_slice(octets);
                Some(Address::V6(v))
            }
            _ => None,
        }
    }

    pub fn octets(&self) -> &[u8] {
        match self {
            Address::V4(v) => &v[..],
            Address::V6(v) => &v[..],
        }
    }

    fn octets_mut(&mut self) -> &mut [u8] {
        match self {
            Address::V4(v) => &mut v[..],
            Address::V6(v) => &mut v[..],
        }
    }

    pub fn version(&self) -> Version {
        match self {
            Address::V4(_) => Version::V4,
            Address::V6(_) => Version::V6,
        }
    }

    pub fn is_v4(&self) -> bool {
        self.version() == Version::V4
    }

    pub fn is_v6(&self) -> bool {
        self.version() == Version::V6
    }

    /// The following address, see [`increment`].
    pub fn next(&self) -> Address {
        increment(self)
    }

    /// Keeps only the bits set in `mask`, `None` when the widths differ.
    pub fn mask(&self, mask: &Mask) -> Option<Address> {
        self.combine(mask, |a, m| a & m)
    }

    /// Sets every bit not covered by `mask`, `None` when the widths differ.
    pub fn fill_host(&self, mask: &Mask) -> Option<Address> {
        self.combine(mask, |a, m| a | !m)
    }

    fn combine(&self, mask: &Mask, op: fn(u8, u8) -> u8) -> Option<Address> {
        if self.version() != mask.version() {
            return None;
        }
        let mut out = *self;
        for (a, m) in out.octets_mut().iter_mut().zip(mask.octets()) {
            *a = op(*a, *m);
        }
        Some(out)
    }
}

/// Adds one to the address read as a big-endian integer.
/// The carry runs from the last octet to the first and wraps past the top.
pub fn increment(ip: &Address) -> Address {
    let mut next = *ip;
    for v in next.octets_mut().iter_mut().rev() {
        *v = v.wrapping_add(1);
        if *v > 0 {
            break;
        }
    }
    next
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> std::result::Result<(), FmtError> {
        write!(f, "{}", IpAddr::from(*self))
    }
}

impl FromStr for Address {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        s.parse::<IpAddr>()
            .map(Address::from)
            .map_err(|_| Error::InvalidIp(s.to_owned()))
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Address::V4(ip.octets())
    }
}

impl From<Ipv6Addr> for Address {
    fn from(ip: Ipv6Addr) -> Self {
        Address::V6(ip.octets())
    }
}

impl From<IpAddr> for Address {
    fn from(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(v) => v.into(),
            IpAddr::V6(v) => v.into(),
        }
    }
}

impl From<Address> for IpAddr {
    fn from(ip: Address) -> Self {
        match ip {
            Address::V4(v) => IpAddr::V4(Ipv4Addr::from(v)),
            Address::V6(v) => IpAddr::V6(Ipv6Addr::from(v)),
        }
    }
}

/// A CIDR mask: the high `prefix_len` bits set, the rest clear.
///
/// Only contiguous masks can be built, so the last address of a network is
/// always its first address with the host bits set.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Mask(pub(crate) Address);

impl Mask {
    pub fn new(octets: &[u8]) -> Result<Self> {
        let bits =
            Address::from_octets(octets).ok_or_else(|| Error::InvalidMaskWidth(hex(octets)))?;
        let mask = Mask(bits);
        let width = mask.version().width() * 8;
        let host = !to_u128(&bits) & (u128::MAX >> (128 - width));
        if host & host.wrapping_add(1) != 0 {
            return Err(Error::InvalidMask {
                version: mask.version(),
                mask: mask.to_string(),
            });
        }
        Ok(mask)
    }

    /// Mask with the first `len` bits set.
    pub fn from_prefix(version: Version, len: u8) -> Result<Self> {
        let width = (version.width() * 8) as u32;
        let len = u32::from(len);
        if len > width {
            return Err(Error::InvalidMask {
                version,
                mask: format!("/{}", len),
            });
        }
        let value = if len == 0 { 0 } else { u128::MAX << (128 - len) };
        let octets = value.to_be_bytes();
        Ok(Mask(match version {
            Version::V4 => Address::V4([octets[0], octets[1], octets[2], octets[3]]),
            Version::V6 => Address::V6(octets),
        }))
    }

    pub fn prefix_len(&self) -> u8 {
        self.octets().iter().map(|v| v.count_ones() as u8).sum()
    }

    pub fn octets(&self) -> &[u8] {
        self.0.octets()
    }

    pub fn version(&self) -> Version {
        self.0.version()
    }
}

fn hex(octets: &[u8]) -> String {
    octets.iter().map(|v| format!("{:02x}", v)).collect()
}

pub(crate) fn to_u128(ip: &Address) -> u128 {
    ip.octets()
        .iter()
        .fold(0u128, |acc, v| (acc << 8) | u128::from(*v))
}

impl Display for Mask {
    fn fmt(&self, f: &mut Formatter) -> std::result::Result<(), FmtError> {
        write!(f, "{}", hex(self.octets()))
    }
}

/// An address paired with a mask.
///
/// The address keeps its host bits; [`Network::network`] clears them.
/// Widths are not checked here: enumeration rejects a mask of the wrong
/// version.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Network {
    addr: Address,
    mask: Mask,
}

impl Network {
    pub fn new(addr: Address, mask: Mask) -> Self {
        Network { addr, mask }
    }

    pub fn with_prefix(addr: Address, len: u8) -> Result<Self> {
        Ok(Network::new(addr, Mask::from_prefix(addr.version(), len)?))
    }

    /// Builds a network from raw octets, as found in socket structures.
    pub fn from_octets(ip: &[u8], mask: &[u8]) -> Result<Self> {
        let addr = Address::from_octets(ip).ok_or_else(|| Error::InvalidIp(hex(ip)))?;
        Ok(Network::new(addr, Mask::new(mask)?))
    }

    pub fn addr(&self) -> Address {
        self.addr
    }

    pub fn mask(&self) -> Mask {
        self.mask
    }

    pub fn prefix_len(&self) -> u8 {
        self.mask.prefix_len()
    }

    /// First address of the block, `None` when the mask has another width.
    pub fn network(&self) -> Option<Address> {
        self.addr.mask(&self.mask)
    }

    /// Last address of the block, `None` when the mask has another width.
    pub fn last(&self) -> Option<Address> {
        self.network().and_then(|ip| ip.fill_host(&self.mask))
    }

    pub fn contains<T: AsAddress>(&self, ip: T) -> bool {
        match (ip.as_address().and_then(|ip| ip.mask(&self.mask)), self.network()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl FromStr for Network {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        lazy_static! {
            static ref RE: Regex =
                Regex::new(r"^([0-9A-Fa-f:.]+)/([0-9]{1,3})$").expect("Not possible");
        }
        match RE.captures(s) {
            Some(ref v) => {
                let (ip, len) = match (v.get(1), v.get(2)) {
                    (Some(ip), Some(len)) => (ip.as_str(), len.as_str()),
                    _ => return Err(Error::InvalidNetwork(s.to_owned())),
                };
                let addr = ip.parse::<Address>()?;
                let len = len
                    .parse::<u8>()
                    .map_err(|_| Error::InvalidNetwork(s.to_owned()))?;
                Network::with_prefix(addr, len)
            }
            _ => Err(Error::InvalidNetwork(s.to_owned())),
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter) -> std::result::Result<(), FmtError> {
        write!(f, "{}/{}", self.addr, self.prefix_len())
    }
}

/// Anything that carries an IP address.
///
/// `None` means "not an address", which is a normal outcome and not an error.
pub trait AsAddress {
    fn as_address(&self) -> Option<Address>;
}

/// Normalises any address-like value to an [`Address`].
pub fn coerce<T: AsAddress>(ip: T) -> Option<Address> {
    ip.as_address()
}

impl AsAddress for Address {
    fn as_address(&self) -> Option<Address> {
        Some(*self)
    }
}

impl AsAddress for IpAddr {
    fn as_address(&self) -> Option<Address> {
        Some((*self).into())
    }
}

impl AsAddress for Ipv4Addr {
    fn as_address(&self) -> Option<Address> {
        Some((*self).into())
    }
}

impl AsAddress for Ipv6Addr {
    fn as_address(&self) -> Option<Address> {
        Some((*self).into())
    }
}

impl AsAddress for SocketAddr {
    fn as_address(&self) -> Option<Address> {
        Some(self.ip().into())
    }
}

impl AsAddress for SocketAddrV4 {
    fn as_address(&self) -> Option<Address> {
        Some((*self.ip()).into())
    }
}

impl AsAddress for SocketAddrV6 {
    fn as_address(&self) -> Option<Address> {
        Some((*self.ip()).into())
    }
}

impl AsAddress for Network {
    fn as_address(&self) -> Option<Address> {
        Some(self.addr)
    }
}

impl AsAddress for str {
    fn as_address(&self) -> Option<Address> {
        self.parse().ok()
    }
}

impl AsAddress for String {
    fn as_address(&self) -> Option<Address> {
        self.as_str().as_address()
    }
}

impl AsAddress for [u8] {
    fn as_address(&self) -> Option<Address> {
        Address::from_octets(self)
    }
}

impl AsAddress for [u8; IPV4_LEN] {
    fn as_address(&self) -> Option<Address> {
        Some(Address::V4(*self))
    }
}

impl AsAddress for [u8; IPV6_LEN] {
    fn as_address(&self) -> Option<Address> {
        Some(Address::V6(*self))
    }
}

impl<T: AsAddress> AsAddress for Option<T> {
    fn as_address(&self) -> Option<Address> {
        self.as_ref().and_then(AsAddress::as_address)
    }
}

impl<T: AsAddress + ?Sized> AsAddress for &T {
    fn as_address(&self) -> Option<Address> {
        (**self).as_address()
    }
}
