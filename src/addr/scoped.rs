//! Scope-tagged address values and ordering arithmetic.

use std::cmp::Ordering;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An address family plus, for IPv6, an optional zone (interface) index.
///
/// Two addresses are comparable only when their scopes are equal. The derived
/// ordering (IPv4 before IPv6, IPv6 zones in numeric order with the unzoned
/// scope first) exists so scope partitions can be iterated deterministically;
/// it carries no semantic meaning across scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    /// The IPv4 address family.
    V4,
    /// The IPv6 address family, optionally qualified by a zone index.
    V6(Option<u32>),
}

/// An immutable network address tagged with its scope.
///
/// Wraps an [`IpAddr`] together with an optional numeric zone index for IPv6
/// (the `%3` in `fe80::1%3`). Zone indices are numeric only; resolving
/// interface names to indices is a host concern.
///
/// Serializes as its text form, so a TOML definition can simply say
/// `specifics = ["10.0.0.1", "fe80::1%3"]`.
///
/// # Examples
///
/// ```
/// use peerconf::addr::ScopedAddr;
///
/// let a: ScopedAddr = "10.0.0.1".parse().unwrap();
/// let b: ScopedAddr = "10.0.0.4".parse().unwrap();
///
/// assert!(a.same_scope(&b));
/// assert_eq!(a.difference(&b).unwrap(), 3);
/// assert_eq!(a.successor().unwrap(), "10.0.0.2".parse().unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ScopedAddr {
    addr: IpAddr,
    zone: Option<u32>,
}

/// Errors from ordering and arithmetic over scoped addresses.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AddrError {
    /// The two addresses are in different scopes and cannot be compared.
    #[error("scope mismatch: {a} and {b} are not in the same scope")]
    ScopeMismatch {
        /// Left-hand address
        a: ScopedAddr,
        /// Right-hand address
        b: ScopedAddr,
    },

    /// The successor of the highest address in the family was requested.
    #[error("address space overflow past {0}")]
    Overflow(ScopedAddr),

    /// The predecessor of the lowest address in the family was requested.
    #[error("address space underflow past {0}")]
    Underflow(ScopedAddr),
}

/// Errors from parsing a scoped address out of its text form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseAddrError {
    /// The address portion is not a valid IPv4 or IPv6 address.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// The zone suffix is not a decimal interface index.
    #[error("invalid zone index in '{0}'")]
    InvalidZone(String),

    /// A zone suffix was given on an IPv4 address.
    #[error("zone index is only valid on IPv6 addresses: '{0}'")]
    ZoneOnV4(String),
}

impl ScopedAddr {
    /// Creates a scoped address from an [`IpAddr`] with no zone.
    #[must_use]
    pub const fn new(addr: IpAddr) -> Self {
        Self { addr, zone: None }
    }

    /// Creates a zone-qualified IPv6 address.
    #[must_use]
    pub const fn zoned(addr: Ipv6Addr, zone: u32) -> Self {
        Self {
            addr: IpAddr::V6(addr),
            zone: Some(zone),
        }
    }

    /// Returns the underlying IP address.
    #[must_use]
    pub const fn addr(&self) -> IpAddr {
        self.addr
    }

    /// Returns the zone index, if any.
    #[must_use]
    pub const fn zone(&self) -> Option<u32> {
        self.zone
    }

    /// Returns the scope this address belongs to.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        match self.addr {
            IpAddr::V4(_) => Scope::V4,
            IpAddr::V6(_) => Scope::V6(self.zone),
        }
    }

    /// Returns `true` if both addresses are in the same scope. Never fails.
    #[must_use]
    pub fn same_scope(&self, other: &Self) -> bool {
        self.scope() == other.scope()
    }

    /// Totally orders two addresses within a scope.
    ///
    /// # Errors
    ///
    /// Returns [`AddrError::ScopeMismatch`] if the scopes differ.
    pub fn compare(&self, other: &Self) -> Result<Ordering, AddrError> {
        if !self.same_scope(other) {
            return Err(AddrError::ScopeMismatch { a: *self, b: *other });
        }
        Ok(self.value().cmp(&other.value()))
    }

    /// Returns the absolute numeric distance between two addresses.
    ///
    /// IPv4 maps to its 32-bit value and IPv6 to its 128-bit value, so `u128`
    /// represents every possible distance exactly.
    ///
    /// # Errors
    ///
    /// Returns [`AddrError::ScopeMismatch`] if the scopes differ.
    pub fn difference(&self, other: &Self) -> Result<u128, AddrError> {
        if !self.same_scope(other) {
            return Err(AddrError::ScopeMismatch { a: *self, b: *other });
        }
        Ok(self.value().abs_diff(other.value()))
    }

    /// Returns the next address in this scope.
    ///
    /// # Errors
    ///
    /// Returns [`AddrError::Overflow`] at the top of the address space.
    pub fn successor(&self) -> Result<Self, AddrError> {
        match self.addr {
            IpAddr::V4(v4) => u32::from(v4)
                .checked_add(1)
                .map(|v| Self::new(IpAddr::V4(Ipv4Addr::from(v))))
                .ok_or(AddrError::Overflow(*self)),
            IpAddr::V6(v6) => u128::from(v6)
                .checked_add(1)
                .map(|v| Self {
                    addr: IpAddr::V6(Ipv6Addr::from(v)),
                    zone: self.zone,
                })
                .ok_or(AddrError::Overflow(*self)),
        }
    }

    /// Returns the previous address in this scope.
    ///
    /// # Errors
    ///
    /// Returns [`AddrError::Underflow`] at the bottom of the address space.
    pub fn predecessor(&self) -> Result<Self, AddrError> {
        match self.addr {
            IpAddr::V4(v4) => u32::from(v4)
                .checked_sub(1)
                .map(|v| Self::new(IpAddr::V4(Ipv4Addr::from(v))))
                .ok_or(AddrError::Underflow(*self)),
            IpAddr::V6(v6) => u128::from(v6)
                .checked_sub(1)
                .map(|v| Self {
                    addr: IpAddr::V6(Ipv6Addr::from(v)),
                    zone: self.zone,
                })
                .ok_or(AddrError::Underflow(*self)),
        }
    }

    /// Numeric form of the address within its family.
    pub(crate) fn value(&self) -> u128 {
        match self.addr {
            IpAddr::V4(v4) => u128::from(u32::from(v4)),
            IpAddr::V6(v6) => u128::from(v6),
        }
    }

    /// Rebuilds an address from a scope and a numeric value.
    ///
    /// Callers must only feed back values obtained from [`Self::value`] of an
    /// address in the same scope, so a V4 value always fits in 32 bits.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn from_scope_value(scope: Scope, value: u128) -> Self {
        match scope {
            Scope::V4 => Self::new(IpAddr::V4(Ipv4Addr::from(value as u32))),
            Scope::V6(zone) => Self {
                addr: IpAddr::V6(Ipv6Addr::from(value)),
                zone,
            },
        }
    }
}

impl From<IpAddr> for ScopedAddr {
    fn from(addr: IpAddr) -> Self {
        Self::new(addr)
    }
}

impl From<Ipv4Addr> for ScopedAddr {
    fn from(addr: Ipv4Addr) -> Self {
        Self::new(IpAddr::V4(addr))
    }
}

impl From<Ipv6Addr> for ScopedAddr {
    fn from(addr: Ipv6Addr) -> Self {
        Self::new(IpAddr::V6(addr))
    }
}

impl fmt::Display for ScopedAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.zone {
            Some(zone) => write!(f, "{}%{zone}", self.addr),
            None => write!(f, "{}", self.addr),
        }
    }
}

impl FromStr for ScopedAddr {
    type Err = ParseAddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (body, zone) = match s.split_once('%') {
            Some((body, zone)) => {
                let zone: u32 = zone
                    .parse()
                    .map_err(|_| ParseAddrError::InvalidZone(s.to_string()))?;
                (body, Some(zone))
            }
            None => (s, None),
        };

        let addr: IpAddr = body
            .parse()
            .map_err(|_| ParseAddrError::InvalidAddress(s.to_string()))?;

        if zone.is_some() && addr.is_ipv4() {
            return Err(ParseAddrError::ZoneOnV4(s.to_string()));
        }

        Ok(Self { addr, zone })
    }
}

impl From<ScopedAddr> for String {
    fn from(addr: ScopedAddr) -> Self {
        addr.to_string()
    }
}

impl TryFrom<String> for ScopedAddr {
    type Error = ParseAddrError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
