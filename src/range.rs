//! IPv4 address range expansion.
//!
//! An [`AddressRange`] is either an explicit pair of bounds or a base address
//! combined with a subnet mask. Parsing happens up front, so a malformed input
//! is rejected before any address is produced. Iteration is lazy and can be
//! repeated any number of times.

use std::net::Ipv4Addr;
use std::ops::RangeInclusive;

use crate::error::RangeError;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AddressRange {
    /// Every address from `start` to `end`, both inclusive.
    Bounds { start: Ipv4Addr, end: Ipv4Addr },
    /// The block containing `base` under `mask`.
    Subnet {
        base: Ipv4Addr,
        mask: Ipv4Addr,
        include_network_and_broadcast: bool,
    },
}

impl AddressRange {
    /// Parses an explicit `start`..=`end` pair of dotted-quad addresses.
    pub fn parse_bounds(start: &str, end: &str) -> Result<Self, RangeError> {
        Ok(Self::Bounds {
            start: parse_address(start)?,
            end: parse_address(end)?,
        })
    }

    /// Parses a subnet given as a base address and a mask.
    ///
    /// The mask is either supplied separately as a dotted quad, or embedded in
    /// `base` as a CIDR prefix length (`192.168.1.0/24`). Supplying both, or
    /// neither, is an error.
    pub fn parse_subnet(
        base: &str,
        mask: Option<&str>,
        include_network_and_broadcast: bool,
    ) -> Result<Self, RangeError> {
        let (address, prefix) = match base.split_once('/') {
            Some((address, prefix)) => (address, Some(prefix)),
            None => (base, None),
        };
        let mask = match (prefix, mask) {
            (Some(_), Some(_)) => return Err(RangeError::AmbiguousMask),
            (None, None) => return Err(RangeError::MissingMask),
            (Some(prefix), None) => mask_from_prefix(prefix)?,
            (None, Some(mask)) => parse_mask(mask)?,
        };
        Ok(Self::Subnet {
            base: parse_address(address)?,
            mask,
            include_network_and_broadcast,
        })
    }

    /// Returns a fresh iterator over the range, in ascending order.
    pub fn iter(&self) -> Addresses {
        let (first, last) = self.bounds();
        Addresses {
            inner: first..=last,
        }
    }

    /// Number of addresses the range expands to.
    pub fn len(&self) -> u64 {
        let (first, last) = self.bounds();
        if first > last {
            0
        } else {
            u64::from(last - first) + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // An empty range is encoded as first > last.
    fn bounds(&self) -> (u32, u32) {
        match *self {
            Self::Bounds { start, end } => (u32::from(start), u32::from(end)),
            Self::Subnet {
                base,
                mask,
                include_network_and_broadcast,
            } => {
                let base = u32::from(base);
                let mask = u32::from(mask);
                let network = base & mask;
                let broadcast = base | !mask;
                if include_network_and_broadcast {
                    return (network, broadcast);
                }
                match (network.checked_add(1), broadcast.checked_sub(1)) {
                    (Some(first), Some(last)) => (first, last),
                    _ => (1, 0),
                }
            }
        }
    }
}

impl IntoIterator for &AddressRange {
    type Item = Ipv4Addr;
    type IntoIter = Addresses;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over the addresses of an [`AddressRange`].
#[derive(Clone, Debug)]
pub struct Addresses {
    inner: RangeInclusive<u32>,
}

impl Iterator for Addresses {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Ipv4Addr::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Addresses {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Ipv4Addr::from)
    }
}

fn parse_address(input: &str) -> Result<Ipv4Addr, RangeError> {
    input
        .trim()
        .parse()
        .map_err(|_| RangeError::InvalidAddress(input.to_string()))
}

fn parse_mask(input: &str) -> Result<Ipv4Addr, RangeError> {
    let mask: Ipv4Addr = input
        .trim()
        .parse()
        .map_err(|_| RangeError::InvalidMask(input.to_string()))?;
    let bits = u32::from(mask);
    // Contiguous masks are a run of ones followed by a run of zeros.
    if bits.leading_ones() + bits.trailing_zeros() != 32 {
        return Err(RangeError::NonContiguousMask(input.to_string()));
    }
    Ok(mask)
}

fn mask_from_prefix(input: &str) -> Result<Ipv4Addr, RangeError> {
    let prefix: u32 = input
        .trim()
        .parse()
        .map_err(|_| RangeError::InvalidPrefix(input.to_string()))?;
    let bits = match prefix {
        0 => 0,
        1..=32 => u32::MAX << (32 - prefix),
        _ => return Err(RangeError::InvalidPrefix(input.to_string())),
    };
    Ok(Ipv4Addr::from(bits))
}
