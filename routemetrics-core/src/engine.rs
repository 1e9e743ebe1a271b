//! End-to-end analysis pass: read, parse, accumulate, group, report.
//!
//! Each invocation owns its accumulators outright; there is no shared
//! state between invocations and no internal parallelism. The log is
//! never written to, so concurrent invocations against the same file
//! are independent.

use crate::accumulate::{RunBuilder, RunSummary};
use crate::error::EngineError;
use crate::group::load_template;
use crate::options::ReportOptions;
use crate::reader::LineReader;
use crate::record::{Classified, ParseErrorLog, parse_line};
use crate::report::{ReportModel, reporter_for};
use std::io::{BufRead, Write};
use std::path::Path;

/// Everything one pass over the log produced, before grouping.
#[derive(Debug)]
pub struct Analysis {
    pub runs: Vec<RunSummary>,
    pub parse_errors: ParseErrorLog,
    pub lines_read: u64,
    pub bytes_read: u64,
    pub chars_read: u64,
}

impl Analysis {
    /// Earliest timestamp across every run.
    pub fn first_ts(&self) -> Option<i64> {
        self.runs.iter().filter_map(|r| r.span().first_ts()).min()
    }

    pub fn last_ts(&self) -> Option<i64> {
        self.runs.iter().filter_map(|r| r.span().last_ts()).max()
    }
}

pub fn analyze_file(path: impl AsRef<Path>) -> Result<Analysis, EngineError> {
    let path = path.as_ref();
    let reader =
        LineReader::open(path).map_err(|source| EngineError::read_log(path, source))?;
    analyze_lines(reader)
}

pub fn analyze<R: BufRead>(input: R) -> Result<Analysis, EngineError> {
    analyze_lines(LineReader::new(input))
}

fn analyze_lines<R: BufRead>(mut reader: LineReader<R>) -> Result<Analysis, EngineError> {
    let mut builder = RunBuilder::new();
    let mut parse_errors = ParseErrorLog::new();

    while let Some(line) = reader.next() {
        let line = line.map_err(|source| EngineError::ReadInput { source })?;
        let line_number = reader.lines_read();

        match parse_line(&line) {
            Ok(Classified::Record(record)) => builder.push(record)?,
            Ok(Classified::Skipped) => {}
            Ok(Classified::UnknownType { ts, kind }) => {
                tracing::debug!(kind, line = line_number, "unrecognized record type");
                builder.push_unknown(ts, kind, line_number);
            }
            Err(error) => parse_errors.record(line_number, error),
        }
    }

    Ok(Analysis {
        runs: builder.finish(),
        parse_errors,
        lines_read: reader.lines_read(),
        bytes_read: reader.bytes_read(),
        chars_read: reader.chars_read(),
    })
}

/// One-shot convenience: validate options, load the template (all
/// template problems fatal here; the CLI layers its own safe-default
/// policy on top), analyze, group, and render into `out`.
pub fn run_report(options: &ReportOptions, out: &mut dyn Write) -> Result<Analysis, EngineError> {
    options.validate()?;

    let rules = match &options.template_path {
        Some(path) => load_template(path)?,
        None => Vec::new(),
    };

    let analysis = analyze_file(&options.log_path)?;
    let model = ReportModel::build(&analysis, &rules, options);

    reporter_for(options.reporter)
        .render(&model, out)
        .map_err(|source| EngineError::WriteReport { source })?;

    Ok(analysis)
}
