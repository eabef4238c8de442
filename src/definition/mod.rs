//! Definition data model: address-scoped parameter overrides.
//!
//! This module provides:
//! - A single address-scoped definition ([`Definition`])
//! - The ordered definition list ([`DefinitionList`])
//! - Sparse attribute overrides ([`AgentOverrides`])
//! - The store-level configuration root ([`PeerConfig`])
//! - Hard-coded protocol defaults ([`defaults`])
//!
//! A definition's position in its list is its match priority: during
//! resolution the first definition (lowest index) that matches the target
//! address wins, regardless of how specific later definitions are.

pub mod defaults;


use serde::{Deserialize, Serialize};

use crate::addr::{AddrRange, ScopedAddr};
use crate::pattern::WildcardPattern;

/// Sparse, optional-valued agent attribute overrides.
///
/// Doubles as a definition's override set and as the global defaults record:
/// both are "whatever is present here shadows the level below". The fallback
/// chain is always definition override → global default → hard-coded default
/// (see [`defaults`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentOverrides {
    /// Connection timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Number of connection retries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,

    /// Account used to authenticate against the agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password used to authenticate against the agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Domain or workgroup the account belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl AgentOverrides {
    /// Returns `true` if no attribute is overridden.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.timeout.is_none()
            && self.retries.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.domain.is_none()
    }
}

/// One address-scoped definition: the addresses it applies to plus the
/// attributes it overrides.
///
/// A definition matches a target address through any of three member sets:
/// `specifics` (exact addresses), `ranges` (closed intervals), or `patterns`
/// (wildcard text matched by an external
/// [`PatternMatcher`](crate::pattern::PatternMatcher)). A definition with all
/// three sets empty can never match and is dropped by
/// [`compact`](crate::compact::compact).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Individually listed addresses.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specifics: Vec<ScopedAddr>,

    /// Closed address intervals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<AddrRange>,

    /// Wildcard patterns, matched against the address text form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<WildcardPattern>,

    /// Attributes this definition overrides, flattened into the same table.
    #[serde(flatten)]
    pub overrides: AgentOverrides,
}

impl Definition {
    /// Returns `true` if the definition has no specifics, ranges, or
    /// patterns, i.e. it can never match any address.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specifics.is_empty() && self.ranges.is_empty() && self.patterns.is_empty()
    }
}

/// An ordered sequence of definitions.
///
/// Insertion order is match priority and is preserved by compaction except
/// where definitions are dropped entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionList(Vec<Definition>);

impl DefinitionList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the list holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a definition at the lowest priority (end of the list).
    pub fn push(&mut self, definition: Definition) {
        self.0.push(definition);
    }

    /// Returns the definition at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Definition> {
        self.0.get(index)
    }

    /// Iterates definitions in priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, Definition> {
        self.0.iter()
    }
}

impl From<Vec<Definition>> for DefinitionList {
    fn from(definitions: Vec<Definition>) -> Self {
        Self(definitions)
    }
}

impl FromIterator<Definition> for DefinitionList {
    fn from_iter<I: IntoIterator<Item = Definition>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DefinitionList {
    type Item = &'a Definition;
    type IntoIter = std::slice::Iter<'a, Definition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The store-level configuration root: global defaults plus the ordered
/// definition list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerConfig {
    /// Process-wide attribute defaults, shadowed by definition overrides.
    #[serde(default, skip_serializing_if = "AgentOverrides::is_empty")]
    pub defaults: AgentOverrides,

    /// Ordered definitions; serialized as `[[definition]]` tables.
    #[serde(
        default,
        rename = "definition",
        skip_serializing_if = "DefinitionList::is_empty"
    )]
    pub definitions: DefinitionList,
}
