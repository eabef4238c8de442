//! Definition list compaction.
//!
//! [`compact`] rewrites a definition list into its canonical minimal form:
//! empty definitions dropped, single-address ranges demoted to specifics,
//! runs of consecutive specifics promoted to ranges, leftover specifics
//! absorbed into adjacent ranges, and touching or overlapping ranges merged.
//!
//! The transformation is pure (the input list is never mutated), idempotent
//! (`compact(compact(l)) == compact(l)`), deterministic (scope partitions are
//! iterated in order, sorts are stable with respect to the numeric address
//! value), and match-set preserving per definition: compaction never moves an
//! address from one definition to another, so resolution priority is
//! unaffected.
//!
//! Addresses in different scopes are never compared: each definition's
//! specifics and ranges are partitioned by scope, each partition is compacted
//! independently, and the partitions are re-unioned in scope order. Patterns
//! and overrides pass through untouched.


use std::collections::BTreeMap;

use tracing::debug;

use crate::addr::{AddrRange, Scope, ScopedAddr};
use crate::definition::{Definition, DefinitionList};

/// Returns the canonical equivalent of `list`.
///
/// Definitions with no specifics, ranges, and patterns are dropped; all other
/// definitions keep their relative order. Range invariants (`begin <= end`,
/// single scope) are enforced when an [`AddrRange`] is constructed, so a list
/// assembled through the public API is always well formed and compaction
/// cannot fail.
///
/// # Examples
///
/// ```
/// use peerconf::compact::compact;
/// use peerconf::definition::{Definition, DefinitionList};
///
/// let list = DefinitionList::from(vec![Definition {
///     specifics: vec![
///         "10.0.0.1".parse().unwrap(),
///         "10.0.0.2".parse().unwrap(),
///         "10.0.0.3".parse().unwrap(),
///     ],
///     ..Definition::default()
/// }]);
///
/// let compacted = compact(&list);
/// let def = compacted.get(0).unwrap();
/// assert!(def.specifics.is_empty());
/// assert_eq!(def.ranges.len(), 1);
/// ```
#[must_use]
pub fn compact(list: &DefinitionList) -> DefinitionList {
    let mut out = Vec::with_capacity(list.len());
    for definition in list {
        if definition.is_empty() {
            debug!("compact: dropping empty definition");
            continue;
        }
        out.push(compact_definition(definition));
    }
    DefinitionList::from(out)
}

fn compact_definition(definition: &Definition) -> Definition {
    // Partition by scope; degenerate ranges collapse to specifics here.
    let mut partitions: BTreeMap<Scope, Partition> = BTreeMap::new();
    for specific in &definition.specifics {
        partitions
            .entry(specific.scope())
            .or_default()
            .specifics
            .push(specific.value());
    }
    for range in &definition.ranges {
        let partition = partitions.entry(range.scope()).or_default();
        if range.is_degenerate() {
            partition.specifics.push(range.begin().value());
        } else {
            partition
                .ranges
                .push((range.begin().value(), range.end().value()));
        }
    }

    let mut specifics = Vec::new();
    let mut ranges = Vec::new();
    for (scope, partition) in partitions {
        let (partition_specifics, partition_ranges) = partition.compact();
        specifics.extend(
            partition_specifics
                .into_iter()
                .map(|value| ScopedAddr::from_scope_value(scope, value)),
        );
        ranges.extend(
            partition_ranges
                .into_iter()
                .map(|(begin, end)| AddrRange::from_scope_values(scope, begin, end)),
        );
    }

    Definition {
        specifics,
        ranges,
        patterns: definition.patterns.clone(),
        overrides: definition.overrides.clone(),
    }
}

/// One definition's specifics and ranges within a single scope, as numeric
/// address values. All arithmetic below is same-scope by construction.
#[derive(Debug, Default)]
struct Partition {
    specifics: Vec<u128>,
    ranges: Vec<(u128, u128)>,
}

impl Partition {
    fn compact(mut self) -> (Vec<u128>, Vec<(u128, u128)>) {
        self.specifics.sort_unstable();
        self.specifics.dedup();
        self.ranges.sort_unstable();
        self.coalesce_specifics();
        self.absorb_specifics();
        self.merge_ranges();
        (self.specifics, self.ranges)
    }

    /// Collapses each run of consecutive specifics into a single range.
    ///
    /// Expects sorted, deduplicated specifics. Two adjacent addresses already
    /// form a range; isolated addresses stay specifics.
    fn coalesce_specifics(&mut self) {
        let mut remaining = Vec::with_capacity(self.specifics.len());
        let mut i = 0;
        while i < self.specifics.len() {
            let start = self.specifics[i];
            let mut end = start;
            let mut j = i + 1;
            // Strictly ascending after dedup, so the subtraction cannot wrap.
            while j < self.specifics.len() && self.specifics[j] - end == 1 {
                end = self.specifics[j];
                j += 1;
            }
            if end > start {
                self.ranges.push((start, end));
            } else {
                remaining.push(start);
            }
            i = j;
        }
        self.specifics = remaining;
        self.ranges.sort_unstable();
    }

    /// Folds leftover specifics into the ranges they touch.
    ///
    /// For each specific, the first range in sorted order that covers it or
    /// sits exactly one address away wins: covered specifics are dropped,
    /// `begin - 1` extends the begin, `end + 1` extends the end. Ranges are
    /// re-sorted after an extension since a begin may have moved.
    fn absorb_specifics(&mut self) {
        let mut remaining = Vec::with_capacity(self.specifics.len());
        for &specific in &self.specifics {
            let mut absorbed = false;
            for range in &mut self.ranges {
                let (begin, end) = *range;
                if begin <= specific && specific <= end {
                    absorbed = true;
                } else if begin.checked_sub(1) == Some(specific) {
                    range.0 = specific;
                    absorbed = true;
                } else if end.checked_add(1) == Some(specific) {
                    range.1 = specific;
                    absorbed = true;
                }
                if absorbed {
                    break;
                }
            }
            if absorbed {
                self.ranges.sort_unstable();
            } else {
                remaining.push(specific);
            }
        }
        self.specifics = remaining;
    }

    /// Merges touching or overlapping ranges in one left-to-right pass.
    ///
    /// Expects ranges sorted by begin. `[b1, e1]` and `[b2, e2]` merge when
    /// `b2 <= e1 + 1`, i.e. the later range starts inside or exactly one
    /// address past the earlier one.
    fn merge_ranges(&mut self) {
        self.ranges.sort_unstable();
        let mut merged: Vec<(u128, u128)> = Vec::with_capacity(self.ranges.len());
        for &(begin, end) in &self.ranges {
            if let Some(prior) = merged.last_mut() {
                // begin >= prior.0 given the sort, so the merged begin is
                // already minimal; begin > prior.1 keeps the subtraction safe.
                if begin <= prior.1 || begin - prior.1 == 1 {
                    prior.1 = prior.1.max(end);
                    continue;
                }
            }
            merged.push((begin, end));
        }
        self.ranges = merged;
    }
}
