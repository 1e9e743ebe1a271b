use crate::accumulate::span::TimeSpan;
use crate::record::ProcEntry;
use crate::stats::Ema;
use serde::Serialize;

/// Smoothing factor the agent applies to its CPU/memory trends; the
/// re-derived values must match, so do not change this independently.
const EMA_ALPHA: f64 = 0.1;

/// One memory gauge: running max, mean, and EMA trend.
#[derive(Debug)]
pub struct Gauge {
    max: u64,
    sum: u64,
    count: u64,
    ema: Ema,
}

impl Default for Gauge {
    fn default() -> Self {
        Self {
            max: 0,
            sum: 0,
            count: 0,
            ema: Ema::new(EMA_ALPHA),
        }
    }
}

impl Gauge {
    fn observe(&mut self, value: u64) {
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
        self.ema.record(value as f64);
    }

    fn summary(&self) -> GaugeSummary {
        GaugeSummary {
            max: self.max,
            mean: if self.count == 0 {
                0.0
            } else {
                self.sum as f64 / self.count as f64
            },
            trend: self.ema.value().unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GaugeSummary {
    pub max: u64,
    pub mean: f64,
    pub trend: f64,
}

/// Process CPU/memory sample accumulator.
#[derive(Debug, Default)]
pub struct ProcAccumulator {
    span: TimeSpan,
    cpu_user_us: u64,
    cpu_system_us: u64,
    rss: Gauge,
    heap_total: Gauge,
    heap_used: Gauge,
    external: Gauge,
    array_buffers: Gauge,
}

impl ProcAccumulator {
    pub fn add(&mut self, ts: i64, entry: &ProcEntry) {
        self.span.observe(ts);
        self.cpu_user_us += entry.cpu_user;
        self.cpu_system_us += entry.cpu_system;
        self.rss.observe(entry.rss);
        self.heap_total.observe(entry.heap_total);
        self.heap_used.observe(entry.heap_used);
        self.external.observe(entry.external);
        self.array_buffers.observe(entry.array_buffers);
    }

    pub fn span(&self) -> &TimeSpan {
        &self.span
    }

    /// Total CPU time over elapsed wall time, as a percentage. Zero
    /// until the sample span covers a non-zero wall interval.
    pub fn cpu_percent(&self) -> f64 {
        let wall_us = self.span.elapsed_ms() as f64 * 1000.0;
        if wall_us <= 0.0 {
            return 0.0;
        }
        (self.cpu_user_us + self.cpu_system_us) as f64 / wall_us * 100.0
    }

    pub fn summary(&self) -> ProcSummary {
        ProcSummary {
            samples: self.span.count(),
            first_ts: self.span.first_ts(),
            last_ts: self.span.last_ts(),
            cpu_user_us: self.cpu_user_us,
            cpu_system_us: self.cpu_system_us,
            cpu_percent: self.cpu_percent(),
            rss: self.rss.summary(),
            heap_total: self.heap_total.summary(),
            heap_used: self.heap_used.summary(),
            external: self.external.summary(),
            array_buffers: self.array_buffers.summary(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcSummary {
    pub samples: u64,
    pub first_ts: Option<i64>,
    pub last_ts: Option<i64>,
    pub cpu_user_us: u64,
    pub cpu_system_us: u64,
    pub cpu_percent: f64,
    pub rss: GaugeSummary,
    pub heap_total: GaugeSummary,
    pub heap_used: GaugeSummary,
    pub external: GaugeSummary,
    pub array_buffers: GaugeSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample(cpu_user: u64, cpu_system: u64, rss: u64) -> ProcEntry {
        ProcEntry {
            cpu_user,
            cpu_system,
            rss,
            heap_total: 2 * rss,
            heap_used: rss / 2,
            external: 10,
            array_buffers: 5,
        }
    }

    #[test]
    fn sums_cpu_time_and_tracks_gauge_maxima() {
        let mut acc = ProcAccumulator::default();

        acc.add(0, &sample(1000, 500, 100));
        acc.add(1000, &sample(2000, 500, 300));
        acc.add(2000, &sample(1000, 0, 200));

        let summary = acc.summary();
        assert_eq!(summary.samples, 3);
        assert_eq!(summary.cpu_user_us, 4000);
        assert_eq!(summary.cpu_system_us, 1000);
        assert_eq!(summary.rss.max, 300);
        assert_eq!(summary.rss.mean, 200.0);
    }

    #[test]
    fn cpu_percent_is_cpu_over_wall_time() {
        let mut acc = ProcAccumulator::default();

        // 5000 µs of CPU across 10 ms of wall time -> 50%.
        acc.add(0, &sample(2000, 1000, 1));
        acc.add(10, &sample(1500, 500, 1));

        assert!((acc.cpu_percent() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn cpu_percent_is_zero_without_elapsed_time() {
        let mut acc = ProcAccumulator::default();

        acc.add(5, &sample(1000, 1000, 1));

        assert_eq!(acc.cpu_percent(), 0.0);
    }

    #[test]
    fn gauge_trend_follows_the_agent_ema() {
        let mut acc = ProcAccumulator::default();

        acc.add(0, &sample(0, 0, 100));
        acc.add(1, &sample(0, 0, 200));

        // seed 100, then 0.9 * 100 + 0.1 * 200
        assert_eq!(acc.summary().rss.trend, 110.0);
    }
}
