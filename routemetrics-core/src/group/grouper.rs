use crate::accumulate::{RawRouteGroup, RouteAccumulator};
use crate::group::GrouperKind;
use crate::group::key::KeyProperties;
use crate::group::template::GroupingRule;
use std::collections::BTreeMap;

/// A named group of route observations, sub-keyed by status label.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub name: String,
    pub origin: BucketOrigin,
    /// Observation arrays in ascending order, still in microseconds.
    pub statuses: BTreeMap<String, Vec<u64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketOrigin {
    /// Folded in by a template rule.
    Rule,
    /// Unmatched raw key; the bucket name is the key itself.
    Raw,
}

/// Grouper output: buckets in report order, plus the decoded
/// properties of every raw key for `meta.keyToProperties`.
#[derive(Debug)]
pub struct RouteBuckets {
    pub buckets: Vec<Bucket>,
    pub key_properties: Vec<(String, KeyProperties)>,
}

impl RouteBuckets {
    /// Total observations across every (bucket, status) pair.
    pub fn observation_count(&self) -> usize {
        self.buckets
            .iter()
            .flat_map(|b| b.statuses.values())
            .map(Vec::len)
            .sum()
    }
}

/// Fold raw route keys into buckets.
///
/// Rules are assumed validated. For each raw key, rules are scanned in
/// declaration order and the first whose method and matcher both agree
/// wins; the key's status arrays are concatenated (never deduplicated)
/// into the named bucket and the key stops contributing. Unmatched
/// keys become raw buckets. Output order is rule-named buckets in
/// declaration order, then raw buckets in first-sighting order; every
/// status array comes back sorted ascending.
pub fn group(
    routes: &RouteAccumulator,
    rules: &[GroupingRule],
    kind: GrouperKind,
) -> RouteBuckets {
    let raw = routes.grouped_by_key(kind);

    let mut named: Vec<Bucket> = rules
        .iter()
        .map(|rule| Bucket {
            name: rule.name.clone(),
            origin: BucketOrigin::Rule,
            statuses: BTreeMap::new(),
        })
        .collect();
    let mut raw_buckets: Vec<Bucket> = Vec::new();
    let mut key_properties: Vec<(String, KeyProperties)> = Vec::new();

    for group in raw {
        let RawRouteGroup {
            key,
            properties,
            statuses,
        } = group;

        let winner = rules
            .iter()
            .position(|rule| rule.matches(&properties.method, &properties.path));

        match winner {
            Some(index) => merge(&mut named[index].statuses, statuses),
            None => raw_buckets.push(Bucket {
                name: key.clone(),
                origin: BucketOrigin::Raw,
                statuses,
            }),
        }

        key_properties.push((key, properties));
    }

    // A rule matching nothing is fine; it just produces no bucket.
    let mut buckets: Vec<Bucket> = named
        .into_iter()
        .filter(|b| !b.statuses.is_empty())
        .chain(raw_buckets)
        .collect();

    for bucket in &mut buckets {
        for observations in bucket.statuses.values_mut() {
            observations.sort_unstable();
        }
    }

    RouteBuckets {
        buckets,
        key_properties,
    }
}

fn merge(into: &mut BTreeMap<String, Vec<u64>>, from: BTreeMap<String, Vec<u64>>) {
    for (status, mut observations) in from {
        into.entry(status).or_default().append(&mut observations);
    }
}
