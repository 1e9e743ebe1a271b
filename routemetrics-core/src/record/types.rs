use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Closed set of record types the engine accumulates.
///
/// `unknown-config-items` is deliberately absent: it is recognized by
/// the parser and skipped. Any other tag is collected into the unknown
/// log rather than dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Header,
    Route,
    Patch,
    Load,
    Status,
    Proc,
    Gc,
    EventLoop,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Route => "route",
            Self::Patch => "patch",
            Self::Load => "load",
            Self::Status => "status",
            Self::Proc => "proc",
            Self::Gc => "gc",
            Self::EventLoop => "eventloop",
        }
    }
}

/// One parsed, immutable log record. Owned by exactly one accumulator
/// after classification.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Epoch milliseconds.
    pub ts: i64,
    pub tid: i64,
    pub payload: Payload,
}

impl LogRecord {
    pub fn kind(&self) -> RecordKind {
        match &self.payload {
            Payload::Header(_) => RecordKind::Header,
            Payload::Route(_) => RecordKind::Route,
            Payload::Patch(_) => RecordKind::Patch,
            Payload::Load(_) => RecordKind::Load,
            Payload::Status(_) => RecordKind::Status,
            Payload::Proc(_) => RecordKind::Proc,
            Payload::Gc(_) => RecordKind::Gc,
            Payload::EventLoop(_) => RecordKind::EventLoop,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Payload {
    Header(HeaderEntry),
    Route(RouteEntry),
    Patch(NameEntry),
    Load(NameEntry),
    Status(StatusEntry),
    Proc(ProcEntry),
    Gc(GcEntry),
    EventLoop(EventLoopEntry),
}

/// Run header: agent/app/OS metadata captured at process start.
///
/// Only `version` is interpreted; everything else passes through to
/// the JSON report untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HeaderEntry {
    pub version: Option<String>,

    #[serde(flatten)]
    pub meta: serde_json::Map<String, Value>,
}

/// One HTTP route completion. `et` is elapsed time in microseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub method: String,
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub url: String,
    pub status_code: i64,
    pub et: u64,
}

/// Payload shared by `patch` and `load` records.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NameEntry {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusEntry {
    pub status: Value,
}

/// Process CPU/memory sample. CPU times are microseconds, memory
/// gauges are bytes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcEntry {
    pub cpu_user: u64,
    pub cpu_system: u64,
    pub rss: u64,
    pub heap_total: u64,
    pub heap_used: u64,
    pub external: u64,
    pub array_buffers: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcEntry {
    pub count: u64,
    pub total_time: f64,
}

/// Event-loop lag sample: percentile label -> nanoseconds.
#[derive(Debug, Clone, Serialize)]
pub struct EventLoopEntry {
    /// Ladder in ascending percentile order.
    pub percentiles: Vec<(String, f64)>,
}

impl<'de> Deserialize<'de> for EventLoopEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = HashMap::<String, f64>::deserialize(deserializer)?;
        let mut percentiles: Vec<(String, f64)> = raw.into_iter().collect();

        // Labels are numeric ("50", "75", ...); order the ladder by
        // percentile value, with non-numeric labels last.
        percentiles.sort_by(|(a, _), (b, _)| {
            let pa = a.parse::<f64>().unwrap_or(f64::MAX);
            let pb = b.parse::<f64>().unwrap_or(f64::MAX);
            pa.partial_cmp(&pb).unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(Self { percentiles })
    }
}
