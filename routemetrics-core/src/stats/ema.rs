/// Streaming exponential moving average:
/// `mean_t = (1 - alpha) * mean_(t-1) + alpha * x_t`.
///
/// The first sample seeds the average. The agent smooths CPU/memory
/// trends with exactly this recurrence, so re-deriving those values
/// from the log must reproduce it bit for bit.
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, value: None }
    }

    pub fn record(&mut self, sample: f64) {
        self.value = Some(match self.value {
            None => sample,
            Some(prev) => (1.0 - self.alpha) * prev + self.alpha * sample,
        });
    }

    /// None until the first sample.
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}
