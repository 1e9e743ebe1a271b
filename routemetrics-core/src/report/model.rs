use crate::accumulate::{EventLoopSummary, GcSummary, ProcSummary, RunSummary, UnknownRecord};
use crate::engine::Analysis;
use crate::group::key::KeyProperties;
use crate::group::{GroupingRule, group};
use crate::options::ReportOptions;
use crate::record::ParseErrorLog;
use crate::stats::{percentile, stats};
use serde_json::Value;

/// The normalized summary both reporters consume.
///
/// Elapsed times arrive in microseconds from the accumulators and are
/// converted to milliseconds here — the single mutation the data model
/// permits — unless microsecond mode is requested.
#[derive(Debug)]
pub struct ReportModel {
    pub lines_read: u64,
    pub bytes_read: u64,
    pub chars_read: u64,
    pub first_ts: Option<i64>,
    pub last_ts: Option<i64>,
    pub percentile_labels: Vec<f64>,
    pub microseconds: bool,
    pub parse_errors: ParseErrorLog,
    pub runs: Vec<RunReport>,
}

#[derive(Debug)]
pub struct RunReport {
    /// Full header entry, passed through verbatim; None for an
    /// implicit run.
    pub header: Option<Value>,
    pub buckets: Vec<BucketReport>,
    pub key_properties: Vec<(String, KeyProperties)>,
    pub patches: Vec<(i64, String)>,
    pub loads: Vec<(i64, String)>,
    pub status_log: Vec<(i64, Value)>,
    pub unknown: Vec<UnknownRecord>,
    pub time_series: TimeSeriesReport,
}

#[derive(Debug)]
pub struct TimeSeriesReport {
    pub line_count: u64,
    pub proc: Option<ProcSummary>,
    pub gc: Option<GcSummary>,
    pub eventloop: Option<EventLoopSummary>,
}

#[derive(Debug)]
pub struct BucketReport {
    pub name: String,
    /// One row per status key, in sorted status order.
    pub rows: Vec<StatusRow>,
}

#[derive(Debug)]
pub struct StatusRow {
    pub status: String,
    pub n: usize,
    pub mean: f64,
    pub stddev: f64,
    /// One value per requested percentile, nearest-rank.
    pub percentile_values: Vec<f64>,
    /// Scaled observations, ascending.
    pub observations: Vec<f64>,
}

impl ReportModel {
    pub fn build(analysis: &Analysis, rules: &[GroupingRule], options: &ReportOptions) -> Self {
        let scale = if options.microseconds { 1.0 } else { 1000.0 };

        let runs = analysis
            .runs
            .iter()
            .map(|run| build_run(run, rules, options, scale))
            .collect();

        Self {
            lines_read: analysis.lines_read,
            bytes_read: analysis.bytes_read,
            chars_read: analysis.chars_read,
            first_ts: analysis.first_ts(),
            last_ts: analysis.last_ts(),
            percentile_labels: options.percentiles.clone(),
            microseconds: options.microseconds,
            parse_errors: analysis.parse_errors.clone(),
            runs,
        }
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn total_observations(&self) -> usize {
        self.runs
            .iter()
            .flat_map(|r| &r.buckets)
            .flat_map(|b| &b.rows)
            .map(|row| row.n)
            .sum()
    }

    pub fn route_key_count(&self) -> usize {
        self.runs.iter().map(|r| r.key_properties.len()).sum()
    }

    pub fn has_patches(&self) -> bool {
        self.runs.iter().any(|r| !r.patches.is_empty())
    }

    pub fn time_series_lines(&self) -> u64 {
        self.runs.iter().map(|r| r.time_series.line_count).sum()
    }
}

fn build_run(
    run: &RunSummary,
    rules: &[GroupingRule],
    options: &ReportOptions,
    scale: f64,
) -> RunReport {
    let grouped = group(&run.routes, rules, options.grouper);

    let buckets = grouped
        .buckets
        .into_iter()
        .map(|bucket| BucketReport {
            name: bucket.name,
            rows: bucket
                .statuses
                .into_iter()
                .map(|(status, observations)| build_row(status, observations, options, scale))
                .collect(),
        })
        .collect();

    RunReport {
        header: run.header.entry().and_then(|e| serde_json::to_value(e).ok()),
        buckets,
        key_properties: grouped.key_properties,
        patches: run.patches.entries().to_vec(),
        loads: run.loads.entries().to_vec(),
        status_log: run.status_log.entries().to_vec(),
        unknown: run.unknown.clone(),
        time_series: TimeSeriesReport {
            line_count: run.time_series_lines(),
            proc: (run.proc.span().count() > 0).then(|| run.proc.summary()),
            gc: (run.gc.span().count() > 0).then(|| run.gc.summary()),
            eventloop: (run.eventloop.span().count() > 0).then(|| run.eventloop.summary()),
        },
    }
}

fn build_row(
    status: String,
    observations_us: Vec<u64>,
    options: &ReportOptions,
    scale: f64,
) -> StatusRow {
    // Stats are computed on the sorted microsecond samples, then
    // scaled; mean and stddev are linear so the order does not matter.
    let sample_stats = stats(&observations_us);
    let percentile_values = options
        .percentiles
        .iter()
        .map(|&p| percentile(p, &observations_us) as f64 / scale)
        .collect();

    StatusRow {
        status,
        n: sample_stats.n,
        mean: sample_stats.mean / scale,
        stddev: sample_stats.stddev / scale,
        percentile_values,
        observations: observations_us.iter().map(|&o| o as f64 / scale).collect(),
    }
}

/// JS-style minimal number rendering: whole values print without a
/// fraction (4.0 -> "4", 4.5 -> "4.5"). Rust's shortest-roundtrip
/// float Display already does exactly this.
pub(crate) fn format_number(value: f64) -> String {
    format!("{value}")
}
