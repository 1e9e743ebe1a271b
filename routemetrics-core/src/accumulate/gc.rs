use crate::accumulate::span::TimeSpan;
use crate::record::GcEntry;
use serde::Serialize;

/// Garbage-collection sample accumulator: total collections and total
/// pause time across the run.
#[derive(Debug, Default)]
pub struct GcAccumulator {
    span: TimeSpan,
    collections: u64,
    total_pause: f64,
}

impl GcAccumulator {
    pub fn add(&mut self, ts: i64, entry: &GcEntry) {
        self.span.observe(ts);
        self.collections += entry.count;
        self.total_pause += entry.total_time;
    }

    pub fn span(&self) -> &TimeSpan {
        &self.span
    }

    pub fn summary(&self) -> GcSummary {
        GcSummary {
            samples: self.span.count(),
            first_ts: self.span.first_ts(),
            last_ts: self.span.last_ts(),
            collections: self.collections,
            total_pause: self.total_pause,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GcSummary {
    pub samples: u64,
    pub first_ts: Option<i64>,
    pub last_ts: Option<i64>,
    pub collections: u64,
    pub total_pause: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sums_collections_and_pause_time() {
        let mut acc = GcAccumulator::default();

        acc.add(0, &GcEntry { count: 2, total_time: 1.5 });
        acc.add(100, &GcEntry { count: 3, total_time: 2.25 });

        let summary = acc.summary();
        assert_eq!(summary.samples, 2);
        assert_eq!(summary.collections, 5);
        assert_eq!(summary.total_pause, 3.75);
    }
}
