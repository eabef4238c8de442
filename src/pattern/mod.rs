//! Wildcard address patterns and the matcher collaborator seam.
//!
//! Pattern matching is delegated: the core only asks "does this pattern match
//! this address text?". This module provides:
//! - The opaque pattern text ([`WildcardPattern`])
//! - The collaborator trait ([`PatternMatcher`])
//! - An octet-wise glob matcher ([`IpLikeMatcher`])
//! - A regex-syntax matcher ([`RegexMatcher`])
//!
//! Matchers never fail: a malformed pattern simply matches nothing.

#[cfg(test)]
mod pattern_tests;

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Opaque wildcard pattern text from a definition.
///
/// The syntax is defined by whichever [`PatternMatcher`] the host injects;
/// the core stores and forwards the text untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WildcardPattern(String);

impl WildcardPattern {
    /// Creates a pattern from its text form.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WildcardPattern {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Decides whether a wildcard pattern matches an address's text form.
///
/// # Thread Safety
///
/// Matchers must be `Send + Sync`; resolution may run concurrently from
/// multiple threads.
pub trait PatternMatcher: Send + Sync {
    /// Returns `true` if `pattern` matches `address_text`.
    fn matches(&self, pattern: &WildcardPattern, address_text: &str) -> bool;
}

// ============================================================================
// IpLikeMatcher - octet-wise glob semantics
// ============================================================================

/// Octet-wise glob matcher.
///
/// The pattern is split on `.` (IPv4) or `:` (IPv6) and compared part by
/// part against the address text. Each pattern part is one of:
///
/// - `*` — matches any value
/// - a number — exact match (`192`, or hex for IPv6 parts)
/// - a range `lo-hi` — inclusive numeric match (`0-31`)
/// - a comma list mixing numbers and ranges (`1,5,8-10`)
///
/// IPv6 patterns match against the compressed text form the address displays
/// as; an empty part (from `::`) only matches `*` or another empty part. A
/// pattern with a `%zone` suffix requires the same zone on the address;
/// without one, the address's zone is ignored.
///
/// # Examples
///
/// ```
/// use peerconf::pattern::{IpLikeMatcher, PatternMatcher, WildcardPattern};
///
/// let matcher = IpLikeMatcher;
/// let pattern = WildcardPattern::new("192.168.0-31.*");
///
/// assert!(matcher.matches(&pattern, "192.168.4.255"));
/// assert!(!matcher.matches(&pattern, "192.168.32.1"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct IpLikeMatcher;

impl PatternMatcher for IpLikeMatcher {
    fn matches(&self, pattern: &WildcardPattern, address_text: &str) -> bool {
        ip_like_match(pattern.as_str(), address_text)
    }
}

fn ip_like_match(pattern: &str, address: &str) -> bool {
    let (pattern, pattern_zone) = split_zone(pattern);
    let (address, address_zone) = split_zone(address);

    if pattern_zone.is_some() && pattern_zone != address_zone {
        return false;
    }

    let v6 = address.contains(':');
    if pattern.contains(':') != v6 {
        return false;
    }

    let sep = if v6 { ':' } else { '.' };
    let radix = if v6 { 16 } else { 10 };

    let pattern_parts: Vec<&str> = pattern.split(sep).collect();
    let address_parts: Vec<&str> = address.split(sep).collect();
    if pattern_parts.len() != address_parts.len() {
        return false;
    }

    pattern_parts
        .iter()
        .zip(&address_parts)
        .all(|(p, a)| part_matches(p, a, radix))
}

/// Splits a trailing `%zone` qualifier off, if present.
fn split_zone(text: &str) -> (&str, Option<&str>) {
    match text.split_once('%') {
        Some((body, zone)) => (body, Some(zone)),
        None => (text, None),
    }
}

fn part_matches(pattern_part: &str, address_part: &str, radix: u32) -> bool {
    if pattern_part == "*" || pattern_part == address_part {
        return true;
    }
    let Ok(value) = u32::from_str_radix(address_part, radix) else {
        return false;
    };
    pattern_part
        .split(',')
        .any(|piece| piece_matches(piece, value, radix))
}

fn piece_matches(piece: &str, value: u32, radix: u32) -> bool {
    if let Some((lo, hi)) = piece.split_once('-') {
        match (u32::from_str_radix(lo, radix), u32::from_str_radix(hi, radix)) {
            (Ok(lo), Ok(hi)) => lo <= value && value <= hi,
            _ => false,
        }
    } else {
        u32::from_str_radix(piece, radix).is_ok_and(|p| p == value)
    }
}

// ============================================================================
// RegexMatcher - pattern text as an anchored regular expression
// ============================================================================

/// Treats the pattern text as an anchored regular expression.
///
/// The pattern is wrapped in `^(?:...)$` and matched against the full address
/// text. An invalid expression matches nothing.
///
/// Compiles the expression on every call; hosts resolving on a hot path
/// should wrap this in a matcher that caches compiled expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexMatcher;

impl PatternMatcher for RegexMatcher {
    fn matches(&self, pattern: &WildcardPattern, address_text: &str) -> bool {
        let anchored = format!("^(?:{})$", pattern.as_str());
        Regex::new(&anchored).is_ok_and(|re| re.is_match(address_text))
    }
}

// Blanket implementation: any &T where T: PatternMatcher also matches
impl<T: PatternMatcher + ?Sized> PatternMatcher for &T {
    fn matches(&self, pattern: &WildcardPattern, address_text: &str) -> bool {
        (*self).matches(pattern, address_text)
    }
}

impl PatternMatcher for Box<dyn PatternMatcher> {
    fn matches(&self, pattern: &WildcardPattern, address_text: &str) -> bool {
        self.as_ref().matches(pattern, address_text)
    }
}
