//! Summary statistics over route observations.
//!
//! The canonical percentile definition everywhere in this crate is
//! nearest-rank over an ascending-sorted sample: rank `ceil(p * n)`,
//! no interpolation. [`StreamingPercentiles`] is the opt-in
//! high-cardinality alternative and must agree with the canonical
//! definition within histogram resolution.

mod ema;
mod histogram;

pub use ema::Ema;
pub use histogram::StreamingPercentiles;

/// Count/sum/mean/variance/stddev over one sample set.
///
/// Variance is the population variance (mean of squared deviations).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub n: usize,
    pub total: f64,
    pub mean: f64,
    pub variance: f64,
    pub stddev: f64,
}

pub fn stats(samples: &[u64]) -> SampleStats {
    let n = samples.len();
    if n == 0 {
        return SampleStats {
            n: 0,
            total: 0.0,
            mean: 0.0,
            variance: 0.0,
            stddev: 0.0,
        };
    }

    let total: f64 = samples.iter().map(|&s| s as f64).sum();
    let mean = total / n as f64;
    let variance = samples
        .iter()
        .map(|&s| {
            let d = s as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n as f64;

    SampleStats {
        n,
        total,
        mean,
        variance,
        stddev: variance.sqrt(),
    }
}

/// Nearest-rank percentile over a pre-sorted ascending sample.
///
/// `p == 0` selects the minimum; otherwise the element at index
/// `ceil(p * n) - 1`, clamped to the last element. Returns 0 for an
/// empty sample.
pub fn percentile(p: f64, sorted: &[u64]) -> u64 {
    let n = sorted.len();
    if n == 0 {
        return 0;
    }
    if p <= 0.0 {
        return sorted[0];
    }

    let rank = (p * n as f64).ceil() as usize;
    let index = rank.saturating_sub(1).min(n - 1);
    sorted[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stats_of_empty_sample_are_zero() {
        let s = stats(&[]);

        assert_eq!(s.n, 0);
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.stddev, 0.0);
    }

    #[test]
    fn stats_use_population_variance() {
        // mean 4, squared deviations (4, 0, 4) -> variance 8/3
        let s = stats(&[2, 4, 6]);

        assert_eq!(s.n, 3);
        assert_eq!(s.total, 12.0);
        assert_eq!(s.mean, 4.0);
        assert!((s.variance - 8.0 / 3.0).abs() < 1e-12);
        assert!((s.stddev - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn percentile_zero_is_the_minimum() {
        let sorted = [1, 5, 9, 12];

        assert_eq!(percentile(0.0, &sorted), 1);
    }

    #[test]
    fn top_percentile_is_the_maximum() {
        let sorted = [1, 5, 9, 12];

        assert_eq!(percentile(1.0, &sorted), 12);
        assert_eq!(percentile(0.999, &sorted), 12);
    }

    #[test]
    fn nearest_rank_has_no_interpolation() {
        let sorted = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100];

        // ceil(0.5 * 10) = 5 -> index 4
        assert_eq!(percentile(0.5, &sorted), 50);
        // ceil(0.95 * 10) = 10 -> index 9
        assert_eq!(percentile(0.95, &sorted), 100);
        // ceil(0.11 * 10) = 2 -> index 1
        assert_eq!(percentile(0.11, &sorted), 20);
    }

    #[test]
    fn single_sample_answers_every_percentile() {
        let sorted = [4000];

        for p in [0.0, 0.5, 0.7, 0.8, 0.9, 0.95, 1.0] {
            assert_eq!(percentile(p, &sorted), 4000);
        }
    }
}
