//! Hostname classification helpers.

use std::net::Ipv4Addr;

/// Returns `true` if `host` is a dotted-quad IPv4 literal.
///
/// Passive DNS providers sometimes report the resolved address in the
/// hostname column; those entries are not subdomains.
pub fn is_ipv4_literal(host: &str) -> bool {
    host.parse::<Ipv4Addr>().is_ok()
}

/// Drop every IPv4 literal from `hosts`, leaving all other entries untouched
/// and in their original order.
pub fn without_ipv4_literals<I>(hosts: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    hosts.into_iter().filter(|h| !is_ipv4_literal(h)).collect()
}
