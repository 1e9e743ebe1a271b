use crate::accumulate::span::TimeSpan;

/// Append-only event log used for `patch`, `load`, and `status`
/// records. Deduplication, if wanted, is the caller's business.
#[derive(Debug)]
pub struct EventLog<T> {
    span: TimeSpan,
    entries: Vec<(i64, T)>,
}

impl<T> Default for EventLog<T> {
    fn default() -> Self {
        Self {
            span: TimeSpan::default(),
            entries: Vec::new(),
        }
    }
}

impl<T> EventLog<T> {
    pub fn push(&mut self, ts: i64, entry: T) {
        self.span.observe(ts);
        self.entries.push((ts, entry));
    }

    pub fn span(&self) -> &TimeSpan {
        &self.span
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(i64, T)] {
        &self.entries
    }
}
