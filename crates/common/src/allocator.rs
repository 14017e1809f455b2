//! Host address allocation
//!
//! Addresses are handled as plain integers (`u128` covers both families).
//! The host range of a block excludes its all-zeros and all-ones addresses,
//! so /31 and /32 (and /127, /128) have no usable host at all.

use crate::types::Network;
use crate::{Error, Result};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::debug;

fn to_u128(ip: IpAddr) -> u128 {
    match ip {
        IpAddr::V4(v4) => u32::from(v4) as u128,
        IpAddr::V6(v6) => u128::from(v6),
    }
}

fn from_u128(net: &Network, value: u128) -> IpAddr {
    if net.is_ipv4() {
        IpAddr::V4(Ipv4Addr::from(value as u32))
    } else {
        IpAddr::V6(Ipv6Addr::from(value))
    }
}

/// Network and broadcast addresses of the block, as integers
fn bounds(net: &Network) -> (u128, u128) {
    let width: u32 = if net.is_ipv4() { 32 } else { 128 };
    let host_bits = width - u32::from(net.prefix());
    let span = if host_bits >= 128 {
        u128::MAX
    } else {
        (1u128 << host_bits) - 1
    };
    let base = to_u128(net.address());
    (base, base | span)
}

/// Usable host range as inclusive integer bounds, `None` for degenerate blocks
fn host_bounds(net: &Network) -> Option<(u128, u128)> {
    let (base, broadcast) = bounds(net);
    if broadcast - base < 2 {
        None
    } else {
        Some((base + 1, broadcast - 1))
    }
}

/// Lowest usable host address
pub fn first_host(net: &Network) -> Option<IpAddr> {
    host_bounds(net).map(|(first, _)| from_u128(net, first))
}

/// Highest usable host address
pub fn last_host(net: &Network) -> Option<IpAddr> {
    host_bounds(net).map(|(_, last)| from_u128(net, last))
}

/// Number of usable host addresses
pub fn host_count(net: &Network) -> u128 {
    host_bounds(net).map_or(0, |(first, last)| last - first + 1)
}

/// Whether `ip` is a usable host address of `net`
pub fn contains_host(net: &Network, ip: IpAddr) -> bool {
    if !net.same_family(&ip) {
        return false;
    }
    let value = to_u128(ip);
    host_bounds(net).map_or(false, |(first, last)| (first..=last).contains(&value))
}

/// Lowest host address of `net` not present in `assigned`.
///
/// This is a query, not a reservation: called twice with the same inputs it
/// returns the same address. Assigned addresses outside the host range are
/// ignored.
pub fn next_free<'a, I>(net: &Network, assigned: I) -> Result<IpAddr>
where
    I: IntoIterator<Item = &'a IpAddr>,
{
    let exhausted = || Error::AddressSpaceExhausted(net.to_string());
    let (first, last) = host_bounds(net).ok_or_else(exhausted)?;

    let used: HashSet<u128> = assigned
        .into_iter()
        .filter(|ip| net.same_family(ip))
        .map(|ip| to_u128(*ip))
        .filter(|value| (first..=last).contains(value))
        .collect();

    // At most used.len() + 1 candidates need to be looked at
    let mut candidate = first;
    loop {
        if !used.contains(&candidate) {
            let ip = from_u128(net, candidate);
            debug!("Next free address in {} is {}", net, ip);
            return Ok(ip);
        }
        if candidate == last {
            return Err(exhausted());
        }
        candidate += 1;
    }
}
