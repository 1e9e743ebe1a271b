use crate::accumulate::span::TimeSpan;
use crate::group::GrouperKind;
use crate::group::key::{KeyProperties, encode_key};
use crate::record::RouteEntry;
use std::collections::{BTreeMap, HashMap};

/// One HTTP completion, kept verbatim until report time.
#[derive(Debug, Clone)]
pub struct RouteObservation {
    pub ts: i64,
    pub entry: RouteEntry,
}

/// All observations for one raw route key, sub-keyed by the status
/// label the selected grouper produces. Elapsed times stay in
/// microseconds here.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRouteGroup {
    pub key: String,
    pub properties: KeyProperties,
    pub statuses: BTreeMap<String, Vec<u64>>,
}

/// Retains every route completion record. The per-key grouping view
/// is materialized lazily for whichever grouper the caller selects.
#[derive(Debug, Default)]
pub struct RouteAccumulator {
    span: TimeSpan,
    records: Vec<RouteObservation>,
}

impl RouteAccumulator {
    pub fn add(&mut self, ts: i64, entry: RouteEntry) {
        self.span.observe(ts);
        self.records.push(RouteObservation { ts, entry });
    }

    pub fn span(&self) -> &TimeSpan {
        &self.span
    }

    pub fn records(&self) -> &[RouteObservation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Build the raw key -> statuses map the grouper consumes. Keys
    /// appear in first-sighting order; observation arrays keep log
    /// order (sorting happens in the grouper, after merging).
    pub fn grouped_by_key(&self, grouper: GrouperKind) -> Vec<RawRouteGroup> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<RawRouteGroup> = Vec::new();

        for record in &self.records {
            let key = encode_key(&record.entry);
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(RawRouteGroup {
                    key,
                    properties: KeyProperties {
                        method: record.entry.method.clone(),
                        path: record.entry.url.clone(),
                    },
                    statuses: BTreeMap::new(),
                });
                groups.len() - 1
            });

            let status = grouper.status_key(record.entry.status_code);
            groups[slot]
                .statuses
                .entry(status)
                .or_default()
                .push(record.entry.et);
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(method: &str, url: &str, status: i64, et: u64) -> RouteEntry {
        RouteEntry {
            method: method.to_string(),
            protocol: "http".to_string(),
            host: "x".to_string(),
            port: 80,
            url: url.to_string(),
            status_code: status,
            et,
        }
    }

    #[test]
    fn keys_appear_in_first_sighting_order() {
        let mut acc = RouteAccumulator::default();
        acc.add(1, entry("GET", "/b", 200, 10));
        acc.add(2, entry("GET", "/a", 200, 20));
        acc.add(3, entry("GET", "/b", 200, 30));

        let groups = acc.grouped_by_key(GrouperKind::ByStatusCode);

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["GET http://x:80/b", "GET http://x:80/a"]);
        assert_eq!(groups[0].statuses["200"], vec![10, 30]);
    }

    #[test]
    fn status_code_grouper_separates_codes() {
        let mut acc = RouteAccumulator::default();
        acc.add(1, entry("GET", "/a", 200, 10));
        acc.add(2, entry("GET", "/a", 500, 20));

        let groups = acc.grouped_by_key(GrouperKind::ByStatusCode);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].statuses["200"], vec![10]);
        assert_eq!(groups[0].statuses["500"], vec![20]);
    }

    #[test]
    fn success_failure_grouper_splits_at_400() {
        let mut acc = RouteAccumulator::default();
        acc.add(1, entry("GET", "/a", 200, 10));
        acc.add(2, entry("GET", "/a", 399, 20));
        acc.add(3, entry("GET", "/a", 400, 30));
        acc.add(4, entry("GET", "/a", 500, 40));

        let groups = acc.grouped_by_key(GrouperKind::BySuccessFailure);

        assert_eq!(groups[0].statuses["success"], vec![10, 20]);
        assert_eq!(groups[0].statuses["failure"], vec![30, 40]);
    }

    #[test]
    fn different_methods_are_different_keys() {
        let mut acc = RouteAccumulator::default();
        acc.add(1, entry("GET", "/a", 200, 10));
        acc.add(2, entry("POST", "/a", 200, 20));

        let groups = acc.grouped_by_key(GrouperKind::ByStatusCode);

        assert_eq!(groups.len(), 2);
    }
}
