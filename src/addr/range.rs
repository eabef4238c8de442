//! Closed address intervals.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::scoped::{Scope, ScopedAddr};

/// A closed interval `[begin, end]` of addresses in a single scope.
///
/// The invariants `begin.same_scope(end)` and `begin <= end` are enforced at
/// construction, including during deserialization, so every live range is
/// well formed. A list loaded from a store with an inverted or cross-scope
/// range fails at load time rather than being silently repaired.
///
/// # Examples
///
/// ```
/// use peerconf::addr::AddrRange;
///
/// let range = AddrRange::new(
///     "10.0.0.1".parse().unwrap(),
///     "10.0.0.10".parse().unwrap(),
/// )
/// .unwrap();
///
/// assert!(range.contains(&"10.0.0.5".parse().unwrap()));
/// assert!(!range.contains(&"10.0.1.5".parse().unwrap()));
/// // Cross-scope containment is simply false, never an error.
/// assert!(!range.contains(&"fe80::1".parse().unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct AddrRange {
    begin: ScopedAddr,
    end: ScopedAddr,
}

/// Unvalidated wire form; [`AddrRange`] deserializes through this.
#[derive(Debug, Deserialize)]
struct RawRange {
    begin: ScopedAddr,
    end: ScopedAddr,
}

/// Errors from constructing a range with violated invariants.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// `begin` and `end` are in different scopes.
    #[error("range endpoints {begin} and {end} are in different scopes")]
    ScopeMismatch {
        /// Requested begin address
        begin: ScopedAddr,
        /// Requested end address
        end: ScopedAddr,
    },

    /// `begin` is numerically greater than `end`.
    #[error("range begin {begin} is greater than end {end}")]
    Inverted {
        /// Requested begin address
        begin: ScopedAddr,
        /// Requested end address
        end: ScopedAddr,
    },
}

impl AddrRange {
    /// Creates a range after validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::ScopeMismatch`] if the endpoints are in different
    /// scopes, or [`RangeError::Inverted`] if `begin > end`.
    pub fn new(begin: ScopedAddr, end: ScopedAddr) -> Result<Self, RangeError> {
        if !begin.same_scope(&end) {
            return Err(RangeError::ScopeMismatch { begin, end });
        }
        if begin.value() > end.value() {
            return Err(RangeError::Inverted { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// Rebuilds a range from a scope and numeric endpoint values.
    ///
    /// Callers must guarantee `begin <= end`; values must come from
    /// [`ScopedAddr::value`] of addresses in the given scope.
    pub(crate) fn from_scope_values(scope: Scope, begin: u128, end: u128) -> Self {
        debug_assert!(begin <= end);
        Self {
            begin: ScopedAddr::from_scope_value(scope, begin),
            end: ScopedAddr::from_scope_value(scope, end),
        }
    }

    /// Returns the first address of the interval.
    #[must_use]
    pub const fn begin(&self) -> ScopedAddr {
        self.begin
    }

    /// Returns the last address of the interval.
    #[must_use]
    pub const fn end(&self) -> ScopedAddr {
        self.end
    }

    /// Returns the scope both endpoints share.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.begin.scope()
    }

    /// Returns `true` if the range covers exactly one address.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.begin == self.end
    }

    /// Returns `true` if `addr` lies within `[begin, end]`.
    ///
    /// An address in a different scope is simply not contained; this never
    /// fails.
    #[must_use]
    pub fn contains(&self, addr: &ScopedAddr) -> bool {
        addr.same_scope(&self.begin)
            && self.begin.value() <= addr.value()
            && addr.value() <= self.end.value()
    }
}

impl TryFrom<RawRange> for AddrRange {
    type Error = RangeError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Self::new(raw.begin, raw.end)
    }
}

impl fmt::Display for AddrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.begin, self.end)
    }
}
