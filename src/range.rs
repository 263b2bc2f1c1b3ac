//! Network, last and usable addresses of a CIDR block.
//!
//! Usable addresses are produced one at a time by an iterator that only
//! holds the next address and the bound, so a /8 or a /64 costs no more
//! memory than a /30. Dropping the iterator early releases everything.

use crate::address::{to_u128, Address, Mask, Network};
use crate::error::{Error, Result, Version};
use log::trace;
use std::iter::FusedIterator;

/// The addresses of a network.
///
/// `last` is `None` for a single-address network (/32, /128). `usable` is
/// `None` whenever no address lies strictly between `first` and `last`
/// (/31, /127 and the single-address case).
#[derive(Debug)]
pub struct List {
    pub first: Address,
    pub last: Option<Address>,
    pub usable: Option<Usable>,
}

impl List {
    pub fn into_parts(self) -> (Address, Option<Address>, Option<Usable>) {
        (self.first, self.last, self.usable)
    }
}

/// Ascending addresses strictly between the network and last address.
///
/// Single pass: call [`crate::get_list`] again to start over.
#[derive(Debug)]
pub struct Usable {
    next: Address,
    last: Address,
}

impl Usable {
    fn new(first: Address, last: Address) -> Self {
        Usable {
            next: first.next(),
            last,
        }
    }

    /// Addresses left, which may exceed `usize` for IPv6.
    pub fn remaining(&self) -> u128 {
        to_u128(&self.last) - to_u128(&self.next)
    }
}

impl Iterator for Usable {
    type Item = Address;

    fn next(&mut self) -> Option<Address> {
        if self.next == self.last {
            return None;
        }
        let ip = self.next;
        self.next = ip.next();
        Some(ip)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Usable {}

pub(crate) fn list(net: &Network, version: Version, single: &Mask, pair: &Mask) -> Result<List> {
    if net.addr().version() != version {
        return Err(Error::InvalidAddress {
            version,
            addr: net.addr().to_string(),
        });
    }
    let mask = net.mask();
    let (first, last) = net
        .network()
        .zip(net.last())
        .ok_or_else(|| Error::InvalidMask {
            version,
            mask: mask.to_string(),
        })?;
    if mask == *single {
        trace!("{} holds a single address", net);
        return Ok(List {
            first,
            last: None,
            usable: None,
        });
    }
    if mask == *pair {
        trace!("{} holds two addresses and no usable one", net);
        return Ok(List {
            first,
            last: Some(last),
            usable: None,
        });
    }
    Ok(List {
        first,
        last: Some(last),
        usable: Some(Usable::new(first, last)),
    })
}
