//! First-match-wins resolution of agent parameters.
//!
//! [`resolve`] walks a definition list in priority order and returns a fully
//! populated [`AgentParams`] for a target address. The first definition whose
//! specifics, ranges, or patterns match wins; later definitions are never
//! consulted, even if they would match more specifically. Absence of a match
//! is not an error: the result is then built from the global defaults and the
//! hard-coded protocol defaults alone.


use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::addr::ScopedAddr;
use crate::definition::{AgentOverrides, Definition, DefinitionList, defaults};
use crate::pattern::PatternMatcher;

/// Fully populated agent connection parameters.
///
/// Every field carries a concrete value; the fallback chain (definition
/// override → global default → hard-coded default) is applied during
/// construction. Serializes with the timeout as milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentParams {
    /// Connection timeout.
    #[serde(serialize_with = "serialize_millis")]
    pub timeout: Duration,

    /// Number of connection retries.
    pub retries: u32,

    /// Account used to authenticate against the agent.
    pub username: String,

    /// Password used to authenticate against the agent.
    pub password: String,

    /// Domain or workgroup the account belongs to.
    pub domain: String,
}

fn serialize_millis<S: Serializer>(timeout: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
}

impl AgentParams {
    /// Builds parameters by applying the fallback chain attribute by
    /// attribute: the winning definition's override if present, else the
    /// global default, else the hard-coded default.
    #[must_use]
    pub fn resolve_from(winner: Option<&AgentOverrides>, globals: &AgentOverrides) -> Self {
        let timeout_ms = winner
            .and_then(|o| o.timeout)
            .or(globals.timeout)
            .unwrap_or(defaults::TIMEOUT_MS);
        let retries = winner
            .and_then(|o| o.retries)
            .or(globals.retries)
            .unwrap_or(defaults::RETRIES);
        let username = winner
            .and_then(|o| o.username.clone())
            .or_else(|| globals.username.clone())
            .unwrap_or_else(|| defaults::USERNAME.to_string());
        let password = winner
            .and_then(|o| o.password.clone())
            .or_else(|| globals.password.clone())
            .unwrap_or_else(|| defaults::PASSWORD.to_string());
        let domain = winner
            .and_then(|o| o.domain.clone())
            .or_else(|| globals.domain.clone())
            .unwrap_or_else(|| defaults::DOMAIN.to_string());

        Self {
            timeout: Duration::from_millis(timeout_ms),
            retries,
            username,
            password,
            domain,
        }
    }
}

impl fmt::Display for AgentParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "timeout: {}ms, retries: {}, username: {}, domain: {}, password: ***",
            self.timeout.as_millis(),
            self.retries,
            self.username,
            self.domain,
        )
    }
}

/// Resolves agent parameters for `target` against `list`.
///
/// Iterates definitions in list order and tests, in this priority: specifics
/// (exact match), ranges (containment; an address in another scope simply
/// does not match), then patterns (delegated to `matcher` against the
/// address's text form). Always succeeds.
///
/// # Examples
///
/// ```
/// use peerconf::definition::{AgentOverrides, Definition, DefinitionList};
/// use peerconf::pattern::IpLikeMatcher;
/// use peerconf::resolve::resolve;
///
/// let list = DefinitionList::from(vec![Definition {
///     specifics: vec!["10.0.0.1".parse().unwrap()],
///     overrides: AgentOverrides {
///         timeout: Some(500),
///         ..AgentOverrides::default()
///     },
///     ..Definition::default()
/// }]);
///
/// let params = resolve(
///     &list,
///     &"10.0.0.1".parse().unwrap(),
///     &AgentOverrides::default(),
///     &IpLikeMatcher,
/// );
/// assert_eq!(params.timeout.as_millis(), 500);
/// ```
#[must_use]
pub fn resolve<M: PatternMatcher + ?Sized>(
    list: &DefinitionList,
    target: &ScopedAddr,
    globals: &AgentOverrides,
    matcher: &M,
) -> AgentParams {
    let winner = list
        .iter()
        .enumerate()
        .find(|(_, definition)| definition_matches(definition, target, matcher));

    match winner {
        Some((index, _)) => debug!(%target, index, "resolve: definition matched"),
        None => debug!(%target, "resolve: no definition matched, using defaults"),
    }

    AgentParams::resolve_from(winner.map(|(_, d)| &d.overrides), globals)
}

fn definition_matches<M: PatternMatcher + ?Sized>(
    definition: &Definition,
    target: &ScopedAddr,
    matcher: &M,
) -> bool {
    if definition.specifics.iter().any(|s| s == target) {
        return true;
    }
    if definition.ranges.iter().any(|r| r.contains(target)) {
        return true;
    }
    if definition.patterns.is_empty() {
        return false;
    }
    let text = target.to_string();
    definition
        .patterns
        .iter()
        .any(|pattern| matcher.matches(pattern, &text))
}
