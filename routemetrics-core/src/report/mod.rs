//! Report rendering.
//!
//! The engine builds one normalized [`ReportModel`] and hands it,
//! immutable, to a [`Reporter`]. Reporters are side-effect-only
//! against the provided sink; write failures propagate with no retry.
//! Blocking writes are what bound memory against a slow sink.

mod csv;
mod json;
mod model;

pub use csv::CsvReporter;
pub use json::JsonReporter;
pub use model::{BucketReport, ReportModel, RunReport, StatusRow, TimeSeriesReport};

use crate::error::ConfigError;
use std::io::{self, Write};
use std::str::FromStr;

pub trait Reporter {
    fn render(&self, model: &ReportModel, out: &mut dyn Write) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReporterKind {
    #[default]
    Csv,
    Json,
}

impl FromStr for ReporterKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::UnknownReporter {
                name: other.to_string(),
            }),
        }
    }
}

pub fn reporter_for(kind: ReporterKind) -> Box<dyn Reporter> {
    match kind {
        ReporterKind::Csv => Box::new(CsvReporter),
        ReporterKind::Json => Box::new(JsonReporter),
    }
}
