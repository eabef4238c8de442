//! Scoped network addresses, ordering arithmetic, and closed address ranges.
//!
//! This module provides:
//! - Scope-tagged address values ([`ScopedAddr`], [`Scope`])
//! - Total ordering and integer arithmetic within a scope
//!   ([`ScopedAddr::compare`], [`ScopedAddr::difference`],
//!   [`ScopedAddr::successor`], [`ScopedAddr::predecessor`])
//! - Closed address intervals with construction-time invariants ([`AddrRange`])
//!
//! Addresses in different scopes (IPv4 vs. IPv6, or IPv6 with different zone
//! indices) are never ordered relative to each other: comparison and
//! arithmetic across scopes fail fast with [`AddrError::ScopeMismatch`].

mod range;
mod scoped;


pub use range::{AddrRange, RangeError};
pub use scoped::{AddrError, ParseAddrError, Scope, ScopedAddr};
