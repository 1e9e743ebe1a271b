use std::path::PathBuf;
use thiserror::Error;

/// Top-level failure taxonomy for one analysis pass.
///
/// Per-line parse problems are not errors; they are collected in
/// [`crate::record::ParseErrorLog`] and reported alongside the output.
#[derive(Debug, Error)]
pub enum EngineError {
    // IO
    #[error("failed to read log file {path}: {source}")]
    ReadLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read log input: {source}")]
    ReadInput {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report: {source}")]
    WriteReport {
        #[source]
        source: std::io::Error,
    },

    // Configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    // Programming / registry defects. These indicate broken wiring
    // inside the engine, never bad input.
    #[error("wiring defect: {detail}")]
    Wiring { detail: String },
}

impl EngineError {
    pub fn read_log(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadLog {
            path: path.into(),
            source,
        }
    }

    pub fn wiring(detail: impl Into<String>) -> Self {
        Self::Wiring {
            detail: detail.into(),
        }
    }
}

/// Validation failures raised before any record processing starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    // Grouping template
    #[error("failed to read grouping template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid grouping template {path}: {source}")]
    TemplateParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported grouping template version '{found}' (expected '{expected}')")]
    TemplateVersion { found: String, expected: String },

    // Grouping rules
    #[error("grouping rule at index {index} is missing required field: name")]
    RuleMissingName { index: usize },

    #[error("grouping rule '{name}' is missing required field: method")]
    RuleMissingMethod { name: String },

    #[error("grouping rule '{name}' must define exactly one of `startsWith`, `regex`, `pattern`")]
    RuleMatcherCount { name: String },

    #[error("grouping rule '{name}' has an invalid regex: {source}")]
    RuleInvalidRegex {
        name: String,
        #[source]
        source: regex::Error,
    },

    // Options
    #[error("unknown reporter '{name}' (expected 'csv' or 'json')")]
    UnknownReporter { name: String },

    #[error("unknown grouper '{name}' (expected 'by-status-code' or 'by-success-failure')")]
    UnknownGrouper { name: String },

    #[error("percentile {value} is out of range (0.0..=1.0)")]
    PercentileOutOfRange { value: f64 },
}
