use crate::record::types::{
    EventLoopEntry, GcEntry, HeaderEntry, LogRecord, NameEntry, Payload, ProcEntry, RouteEntry,
    StatusEntry,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Synthetic tag emitted by the agent for configuration noise; always
/// tolerated and skipped.
const UNKNOWN_CONFIG_ITEMS: &str = "unknown-config-items";

/// Outcome of classifying one well-enveloped line.
#[derive(Debug)]
pub enum Classified {
    Record(LogRecord),
    /// `unknown-config-items`, dropped silently.
    Skipped,
    /// A type tag outside the closed set; kept visible in the report.
    UnknownType { ts: i64, kind: String },
}

/// A non-fatal per-line failure. Identical messages are folded
/// together in [`ParseErrorLog`], so messages stay stable and never
/// embed per-line detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    ts: i64,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    tid: i64,
    entry: Value,
}

/// Parse one raw line. Envelope or payload problems come back as
/// `Err(ParseError)`; they are recorded and processing continues.
pub fn parse_line(line: &str) -> Result<Classified, ParseError> {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(_) => return Err(ParseError::new("invalid JSON")),
    };

    // Check the envelope fields individually so each failure mode has
    // its own stable message.
    let Some(object) = value.as_object() else {
        return Err(ParseError::new("record is not a JSON object"));
    };
    for field in ["ts", "type", "entry"] {
        if !object.contains_key(field) {
            return Err(ParseError::new(format!("missing required field: {field}")));
        }
    }

    let envelope: Envelope = serde_json::from_value(value)
        .map_err(|_| ParseError::new("malformed record envelope"))?;

    if envelope.kind == UNKNOWN_CONFIG_ITEMS {
        return Ok(Classified::Skipped);
    }

    let payload = match envelope.kind.as_str() {
        "header" => Payload::Header(decode::<HeaderEntry>(&envelope)?),
        "route" => Payload::Route(decode::<RouteEntry>(&envelope)?),
        "patch" => Payload::Patch(decode::<NameEntry>(&envelope)?),
        "load" => Payload::Load(decode::<NameEntry>(&envelope)?),
        "status" => Payload::Status(decode::<StatusEntry>(&envelope)?),
        "proc" => Payload::Proc(decode::<ProcEntry>(&envelope)?),
        "gc" => Payload::Gc(decode::<GcEntry>(&envelope)?),
        "eventloop" => Payload::EventLoop(decode::<EventLoopEntry>(&envelope)?),
        _ => {
            return Ok(Classified::UnknownType {
                ts: envelope.ts,
                kind: envelope.kind,
            });
        }
    };

    Ok(Classified::Record(LogRecord {
        ts: envelope.ts,
        tid: envelope.tid,
        payload,
    }))
}

fn decode<T: for<'de> Deserialize<'de>>(envelope: &Envelope) -> Result<T, ParseError> {
    serde_json::from_value(envelope.entry.clone())
        .map_err(|_| ParseError::new(format!("malformed {} entry", envelope.kind)))
}

/// Per-run log of parse failures: message -> ordered 1-based line
/// numbers. Surfaced alongside the report, never instead of it.
#[derive(Debug, Default, Clone)]
pub struct ParseErrorLog {
    by_message: BTreeMap<String, Vec<u64>>,
    total: u64,
}

impl ParseErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, line_number: u64, error: ParseError) {
        self.by_message
            .entry(error.message)
            .or_default()
            .push(line_number);
        self.total += 1;
    }

    /// Total malformed lines seen.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn by_message(&self) -> &BTreeMap<String, Vec<u64>> {
        &self.by_message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;
    use pretty_assertions::assert_eq;

    fn parse_record(line: &str) -> LogRecord {
        match parse_line(line).unwrap() {
            Classified::Record(r) => r,
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn parses_route_record() {
        let line = r#"{"ts":1700000000000,"type":"route","tid":0,"entry":{"method":"GET","protocol":"http","host":"x","port":80,"url":"/a","statusCode":200,"et":4000}}"#;

        let record = parse_record(line);

        assert_eq!(record.ts, 1_700_000_000_000);
        assert_eq!(record.kind(), RecordKind::Route);
        let Payload::Route(entry) = &record.payload else {
            panic!("not a route payload");
        };
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.status_code, 200);
        assert_eq!(entry.et, 4000);
    }

    #[test]
    fn parses_header_with_passthrough_metadata() {
        let line = r#"{"ts":1,"type":"header","tid":0,"entry":{"version":"1.0.0","os":{"arch":"x64"}}}"#;

        let record = parse_record(line);

        let Payload::Header(entry) = &record.payload else {
            panic!("not a header payload");
        };
        assert_eq!(entry.version.as_deref(), Some("1.0.0"));
        assert!(entry.meta.contains_key("os"));
    }

    #[test]
    fn missing_tid_defaults_to_zero() {
        let line = r#"{"ts":1,"type":"gc","entry":{"count":2,"totalTime":3.5}}"#;

        let record = parse_record(line);

        assert_eq!(record.tid, 0);
    }

    #[test]
    fn eventloop_ladder_is_ordered_by_percentile() {
        let line = r#"{"ts":1,"type":"eventloop","tid":0,"entry":{"99":400,"50":100,"75":200}}"#;

        let record = parse_record(line);

        let Payload::EventLoop(entry) = &record.payload else {
            panic!("not an eventloop payload");
        };
        let labels: Vec<&str> = entry.percentiles.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["50", "75", "99"]);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = parse_line("not json").unwrap_err();

        assert_eq!(err.message, "invalid JSON");
    }

    #[test]
    fn missing_envelope_fields_are_named() {
        let err = parse_line(r#"{"ts":1,"entry":{}}"#).unwrap_err();
        assert_eq!(err.message, "missing required field: type");

        let err = parse_line(r#"{"type":"gc","entry":{}}"#).unwrap_err();
        assert_eq!(err.message, "missing required field: ts");

        let err = parse_line(r#"{"ts":1,"type":"gc"}"#).unwrap_err();
        assert_eq!(err.message, "missing required field: entry");
    }

    #[test]
    fn bad_payload_names_the_type() {
        let err = parse_line(r#"{"ts":1,"type":"route","tid":0,"entry":{"method":"GET"}}"#)
            .unwrap_err();

        assert_eq!(err.message, "malformed route entry");
    }

    #[test]
    fn unknown_config_items_is_skipped() {
        let line = r#"{"ts":1,"type":"unknown-config-items","tid":0,"entry":{"whatever":true}}"#;

        assert!(matches!(parse_line(line), Ok(Classified::Skipped)));
    }

    #[test]
    fn foreign_type_is_classified_not_rejected() {
        let line = r#"{"ts":1,"type":"mystery","tid":0,"entry":{}}"#;

        match parse_line(line).unwrap() {
            Classified::UnknownType { kind, .. } => assert_eq!(kind, "mystery"),
            other => panic!("expected unknown type, got {other:?}"),
        }
    }

    #[test]
    fn error_log_groups_by_message() {
        let mut log = ParseErrorLog::new();

        log.record(3, ParseError::new("invalid JSON"));
        log.record(7, ParseError::new("invalid JSON"));
        log.record(5, ParseError::new("missing required field: ts"));

        assert_eq!(log.total(), 3);
        assert_eq!(log.by_message()["invalid JSON"], vec![3, 7]);
        assert_eq!(log.by_message()["missing required field: ts"], vec![5]);
    }
}
