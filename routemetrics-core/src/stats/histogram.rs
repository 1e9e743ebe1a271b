use hdrhistogram::Histogram;

/// HdrHistogram range: 1 µs to 60 s at 3 significant figures.
const HIST_LOW: u64 = 1;
const HIST_HIGH: u64 = 60_000_000;
const HIST_SIGFIG: u8 = 3;

/// Streaming order statistics for high-cardinality routes.
///
/// O(1) amortized record, logarithmic percentile queries, no raw
/// sample retention. Values are clamped to the histogram range, so
/// answers agree with the flat-array nearest-rank definition only to
/// within the configured resolution.
pub struct StreamingPercentiles {
    hist: Histogram<u64>,
}

impl Default for StreamingPercentiles {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingPercentiles {
    pub fn new() -> Self {
        Self {
            hist: Histogram::<u64>::new_with_bounds(HIST_LOW, HIST_HIGH, HIST_SIGFIG)
                .expect("histogram creation"),
        }
    }

    pub fn record(&mut self, value_us: u64) {
        // Clamp to >= 1 µs; saturating_record clamps the high end.
        self.hist.saturating_record(value_us.max(HIST_LOW));
    }

    pub fn len(&self) -> u64 {
        self.hist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hist.is_empty()
    }

    pub fn mean(&self) -> f64 {
        if self.hist.is_empty() {
            0.0
        } else {
            self.hist.mean()
        }
    }

    /// Percentile in the 0.0..=1.0 convention used across the crate.
    pub fn percentile(&self, p: f64) -> u64 {
        if self.hist.is_empty() {
            return 0;
        }
        if p <= 0.0 {
            return self.hist.min();
        }
        self.hist.value_at_quantile(p)
    }
}
