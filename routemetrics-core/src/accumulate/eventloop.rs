use crate::accumulate::span::TimeSpan;
use crate::record::EventLoopEntry;
use serde::Serialize;

/// Event-loop lag accumulator. Each sample carries a full percentile
/// ladder (nanoseconds, ascending); only the most recent ladder is
/// retained.
#[derive(Debug, Default)]
pub struct EventLoopAccumulator {
    span: TimeSpan,
    last: Option<EventLoopEntry>,
}

impl EventLoopAccumulator {
    pub fn add(&mut self, ts: i64, entry: EventLoopEntry) {
        self.span.observe(ts);
        self.last = Some(entry);
    }

    pub fn span(&self) -> &TimeSpan {
        &self.span
    }

    pub fn last(&self) -> Option<&EventLoopEntry> {
        self.last.as_ref()
    }

    pub fn summary(&self) -> EventLoopSummary {
        EventLoopSummary {
            samples: self.span.count(),
            first_ts: self.span.first_ts(),
            last_ts: self.span.last_ts(),
            last_percentiles: self
                .last
                .as_ref()
                .map(|e| e.percentiles.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventLoopSummary {
    pub samples: u64,
    pub first_ts: Option<i64>,
    pub last_ts: Option<i64>,
    /// `[label, nanoseconds]` pairs in ascending percentile order.
    pub last_percentiles: Vec<(String, f64)>,
}
