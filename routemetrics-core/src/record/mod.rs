//! Record envelope parsing and classification.
//!
//! Every log line is newline-delimited JSON with the envelope
//! `{"ts": <epoch ms>, "type": <tag>, "tid": <thread id>, "entry": {..}}`.
//! The type tag is a closed set; dispatch downstream is a `match` on
//! [`RecordKind`], never a string lookup.

mod parse;
mod types;

pub use parse::{Classified, ParseError, ParseErrorLog, parse_line};
pub use types::{
    EventLoopEntry, GcEntry, HeaderEntry, LogRecord, NameEntry, Payload, ProcEntry, RecordKind,
    RouteEntry, StatusEntry,
};
