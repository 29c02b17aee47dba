//! CIDR parsing and interval arithmetic.
//!
//! Everything downstream -- parsers, reconciliation, overlap reporting --
//! goes through [`parse`] so that one normalization policy applies
//! everywhere: host bits are truncated to the network address, bare
//! addresses get a full-length prefix, and comparisons are exact interval
//! math on [`IpNet`], never string comparison.

use std::net::IpAddr;

use ipnet::IpNet;

use crate::error::CoreError;

/// Parse a CIDR string into a normalized network.
///
/// `10.0.0.7/24` normalizes to `10.0.0.0/24` (host bits truncated, prefix
/// retained). A bare address (`10.0.0.7`) becomes a host route (`/32` or
/// `/128`). Empty or malformed input fails with
/// [`CoreError::InvalidAddress`].
pub fn parse(address: &str) -> Result<IpNet, CoreError> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidAddress {
            value: address.into(),
        });
    }
    if let Ok(net) = trimmed.parse::<IpNet>() {
        return Ok(net.trunc());
    }
    trimmed
        .parse::<IpAddr>()
        .map(IpNet::from)
        .map_err(|_| CoreError::InvalidAddress {
            value: address.into(),
        })
}

/// True iff the two ranges share at least one address.
///
/// Equal ranges and strict super/subset ranges both overlap. Mixed
/// address families never overlap.
pub fn overlaps(a: &IpNet, b: &IpNet) -> bool {
    match (a, b) {
        (IpNet::V4(a), IpNet::V4(b)) => {
            a.network() <= b.broadcast() && b.network() <= a.broadcast()
        }
        (IpNet::V6(a), IpNet::V6(b)) => {
            a.network() <= b.broadcast() && b.network() <= a.broadcast()
        }
        _ => false,
    }
}

/// True iff every address of `b` lies inside `a`.
pub fn contains(a: &IpNet, b: &IpNet) -> bool {
    a.contains(b)
}
