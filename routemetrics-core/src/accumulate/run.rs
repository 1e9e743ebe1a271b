use crate::accumulate::eventloop::EventLoopAccumulator;
use crate::accumulate::gc::GcAccumulator;
use crate::accumulate::header::HeaderAccumulator;
use crate::accumulate::logs::EventLog;
use crate::accumulate::proc::ProcAccumulator;
use crate::accumulate::route::RouteAccumulator;
use crate::accumulate::span::TimeSpan;
use crate::error::EngineError;
use crate::record::{LogRecord, Payload};
use serde::Serialize;
use serde_json::Value;

/// A record whose type tag is outside the closed set. Kept visible in
/// the JSON report so wiring drift upstream does not go unnoticed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UnknownRecord {
    pub ts: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub line: u64,
}

/// Aggregate over one header-delimited run of the log. Finalized at
/// the next header (or EOF) and handed immutably to the reporter;
/// never merged with another run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub header: HeaderAccumulator,
    pub routes: RouteAccumulator,
    pub patches: EventLog<String>,
    pub loads: EventLog<String>,
    pub status_log: EventLog<Value>,
    pub proc: ProcAccumulator,
    pub gc: GcAccumulator,
    pub eventloop: EventLoopAccumulator,
    pub unknown: Vec<UnknownRecord>,
    span: TimeSpan,
}

impl RunSummary {
    /// Route a non-header record to its accumulator. Headers go
    /// through [`RunBuilder`]; one arriving here is a wiring defect.
    fn add(&mut self, record: LogRecord) -> Result<(), EngineError> {
        self.span.observe(record.ts);
        match record.payload {
            Payload::Header(_) => {
                return Err(EngineError::wiring(
                    "run summary received a header record outside the run builder",
                ));
            }
            Payload::Route(entry) => self.routes.add(record.ts, entry),
            Payload::Patch(entry) => self.patches.push(record.ts, entry.name),
            Payload::Load(entry) => self.loads.push(record.ts, entry.name),
            Payload::Status(entry) => self.status_log.push(record.ts, entry.status),
            Payload::Proc(entry) => self.proc.add(record.ts, &entry),
            Payload::Gc(entry) => self.gc.add(record.ts, &entry),
            Payload::EventLoop(entry) => self.eventloop.add(record.ts, entry),
        }
        Ok(())
    }

    /// Earliest/latest timestamp across every record in the run.
    pub fn span(&self) -> &TimeSpan {
        &self.span
    }

    /// Proc + gc + eventloop sample count, for the report info block.
    pub fn time_series_lines(&self) -> u64 {
        self.proc.span().count() + self.gc.span().count() + self.eventloop.span().count()
    }
}

/// Splits the record stream into header-delimited runs.
///
/// Header policy is lenient: records seen before any header open an
/// implicit run with absent header metadata (see DESIGN.md).
#[derive(Debug, Default)]
pub struct RunBuilder {
    finished: Vec<RunSummary>,
    current: Option<RunSummary>,
}

impl RunBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: LogRecord) -> Result<(), EngineError> {
        if let Payload::Header(entry) = record.payload {
            // A header closes the current run and opens the next.
            if let Some(run) = self.current.take() {
                self.finished.push(run);
            }
            let mut run = RunSummary::default();
            run.span.observe(record.ts);
            run.header.add(record.ts, entry)?;
            self.current = Some(run);
            return Ok(());
        }

        self.current.get_or_insert_with(RunSummary::default).add(record)
    }

    pub fn push_unknown(&mut self, ts: i64, kind: String, line: u64) {
        let run = self.current.get_or_insert_with(RunSummary::default);
        run.span.observe(ts);
        run.unknown.push(UnknownRecord { ts, kind, line });
    }

    /// Finalize at EOF.
    pub fn finish(mut self) -> Vec<RunSummary> {
        if let Some(run) = self.current.take() {
            self.finished.push(run);
        }
        self.finished
    }
}
