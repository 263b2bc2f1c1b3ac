use std::fmt::{Display, Error as FmtError, Formatter};
use std::io;
use thiserror::Error;

/// Protocol version of an address or mask.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Version {
    V4,
    V6,
}

impl Version {
    /// Width of the version's addresses in bytes.
    pub fn width(self) -> usize {
        match self {
            Version::V4 => crate::ipv4::IPV4_LEN,
            Version::V6 => crate::ipv6::IPV6_LEN,
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter) -> std::result::Result<(), FmtError> {
        match self {
            Version::V4 => write!(f, "IPv4"),
            Version::V6 => write!(f, "IPv6"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid IP address: {0}")]
    InvalidIp(String),
    #[error("invalid {version} address: {addr}")]
    InvalidAddress { version: Version, addr: String },
    #[error("invalid {version} mask: {mask}")]
    InvalidMask { version: Version, mask: String },
    #[error("invalid mask width: {0}")]
    InvalidMaskWidth(String),
    #[error("invalid network: {0}")]
    InvalidNetwork(String),
    #[error("failed to get interfaces: {0}")]
    Interfaces(#[source] io::Error),
}

impl Error {
    /// Errors the caller cannot fix by changing its input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Interfaces(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!("IPv4", Version::V4.to_string());
        assert_eq!("IPv6", Version::V6.to_string());
        let e = Error::InvalidAddress {
            version: Version::V4,
            addr: "::1".to_string(),
        };
        assert_eq!("invalid IPv4 address: ::1", e.to_string());
        let e = Error::InvalidMask {
            version: Version::V6,
            mask: "ffffff00".to_string(),
        };
        assert_eq!("invalid IPv6 mask: ffffff00", e.to_string());
        assert!(!e.is_fatal());
        assert_eq!(
            "invalid mask width: ffffffff00",
            Error::InvalidMaskWidth("ffffffff00".to_string()).to_string()
        );
        assert!(Error::Interfaces(io::Error::new(io::ErrorKind::Other, "boom")).is_fatal());
    }
}
