//! Host address values: IP addresses or hostnames.

use std::cmp::Ordering;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// An IP address or hostname, canonicalized on construction.
///
/// Hostnames are lower-cased; bracketed IPv6 literals are parsed to their
/// numeric form, so `[::1]` and `::1` are the same address. Equality and
/// hashing operate on the canonical form.
///
/// Ordering places IP addresses before hostnames; hostnames compare by their
/// labels from the TLD leftward, so `aoindustries.com` sorts before
/// `www.aoindustries.com` and every `.com` name sorts before every `.org`
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HostAddress {
    /// A literal IPv4 or IPv6 address.
    Ip(IpAddr),
    /// A hostname, stored lower-case.
    Name(String),
}

impl HostAddress {
    /// Parses an IP address (optionally bracketed IPv6) or hostname.
    pub fn new(host: &str) -> Result<Self, FieldError> {
        let unbracketed = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        if let Ok(ip) = unbracketed.parse::<IpAddr>() {
            return Ok(Self::Ip(ip));
        }
        if is_valid_name(host) {
            Ok(Self::Name(host.to_ascii_lowercase()))
        } else {
            Err(FieldError::InvalidHost(host.to_owned()))
        }
    }

    /// Renders the host for inclusion in a URL, bracketing IPv6 addresses.
    pub fn to_bracketed_string(&self) -> String {
        match self {
            Self::Ip(IpAddr::V6(ip)) => format!("[{ip}]"),
            Self::Ip(IpAddr::V4(ip)) => ip.to_string(),
            Self::Name(name) => name.clone(),
        }
    }
}

fn is_valid_name(host: &str) -> bool {
    if host.is_empty() || host.len() > 253 {
        return false;
    }
    host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

impl Ord for HostAddress {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Ip(a), Self::Ip(b)) => a.cmp(b),
            (Self::Ip(_), Self::Name(_)) => Ordering::Less,
            (Self::Name(_), Self::Ip(_)) => Ordering::Greater,
            // TLD-first: compare labels from the right
            (Self::Name(a), Self::Name(b)) => a.split('.').rev().cmp(b.split('.').rev()),
        }
    }
}

impl PartialOrd for HostAddress {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(ip) => ip.fmt(f),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl FromStr for HostAddress {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for HostAddress {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<HostAddress> for String {
    fn from(host: HostAddress) -> Self {
        host.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_lower_cased() {
        assert_eq!(
            HostAddress::new("AOREPO.ORG").unwrap(),
            HostAddress::new("aorepo.org").unwrap()
        );
    }

    #[test]
    fn bracketed_ipv6_is_canonical() {
        let bracketed = HostAddress::new("[::1]").unwrap();
        let bare = HostAddress::new("::1").unwrap();
        assert_eq!(bracketed, bare);
        assert_eq!(bracketed.to_bracketed_string(), "[::1]");
    }

    #[test]
    fn orders_by_tld_first() {
        let xyz_com = HostAddress::new("xyz.com").unwrap();
        let abc_org = HostAddress::new("abc.org").unwrap();
        assert!(xyz_com < abc_org);
    }

    #[test]
    fn orders_subdomains_after_parent() {
        let parent = HostAddress::new("aoindustries.com").unwrap();
        let www = HostAddress::new("www.aoindustries.com").unwrap();
        assert!(parent < www);
    }

    #[test]
    fn rejects_bad_names() {
        assert!(HostAddress::new("").is_err());
        assert!(HostAddress::new("bad..name").is_err());
        assert!(HostAddress::new("-leading.com").is_err());
    }
}
