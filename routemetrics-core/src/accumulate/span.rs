/// Record count plus earliest/latest timestamp, shared by every
/// accumulator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSpan {
    first_ts: Option<i64>,
    last_ts: Option<i64>,
    count: u64,
}

impl TimeSpan {
    pub fn observe(&mut self, ts: i64) {
        self.first_ts = Some(match self.first_ts {
            None => ts,
            Some(first) => first.min(ts),
        });
        self.last_ts = Some(match self.last_ts {
            None => ts,
            Some(last) => last.max(ts),
        });
        self.count += 1;
    }

    pub fn first_ts(&self) -> Option<i64> {
        self.first_ts
    }

    pub fn last_ts(&self) -> Option<i64> {
        self.last_ts
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Wall-clock span in milliseconds; zero until two distinct
    /// timestamps have been seen.
    pub fn elapsed_ms(&self) -> i64 {
        match (self.first_ts, self.last_ts) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }
}
