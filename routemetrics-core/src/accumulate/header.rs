use crate::accumulate::span::TimeSpan;
use crate::error::EngineError;
use crate::record::HeaderEntry;

/// Holds the single header record that opens a run. The run builder
/// finalizes the current run before another header can arrive, so a
/// second `add` is a wiring defect, not bad input.
#[derive(Debug, Default)]
pub struct HeaderAccumulator {
    span: TimeSpan,
    entry: Option<HeaderEntry>,
}

impl HeaderAccumulator {
    pub fn add(&mut self, ts: i64, entry: HeaderEntry) -> Result<(), EngineError> {
        if self.entry.is_some() {
            return Err(EngineError::wiring(
                "header accumulator received a second header record",
            ));
        }
        self.span.observe(ts);
        self.entry = Some(entry);
        Ok(())
    }

    /// Run/OS/app metadata; None for an implicit (headerless) run.
    pub fn entry(&self) -> Option<&HeaderEntry> {
        self.entry.as_ref()
    }

    pub fn agent_version(&self) -> Option<&str> {
        self.entry.as_ref()?.version.as_deref()
    }

    pub fn ts(&self) -> Option<i64> {
        self.span.first_ts()
    }
}
