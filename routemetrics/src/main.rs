use clap::Parser;
use routemetrics_core::error::ConfigError;
use routemetrics_core::group::GroupingRule;
use routemetrics_core::group::load_template;
use routemetrics_core::logging::init_logging;
use routemetrics_core::options::{DEFAULT_LOG_PATH, Destination, ReportOptions};
use routemetrics_core::report::{ReportModel, reporter_for};
use routemetrics_core::{EngineError, analyze_file};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "routemetrics",
    version,
    about = "Offline analyzer for route-metrics instrumentation logs"
)]
struct Cli {
    /// Path to the instrumentation log
    #[arg(default_value = DEFAULT_LOG_PATH)]
    log: PathBuf,

    /// Report format: csv or json
    #[arg(long, env = "ROUTE_METRICS_REPORTER", default_value = "csv")]
    reporter: String,

    /// Report destination: a file path or a numeric descriptor
    /// (1 = stdout, 2 = stderr)
    #[arg(long, env = "ROUTE_METRICS_OUTPUT", default_value = "1")]
    output: String,

    /// Grouping template (JSON) folding routes into named buckets
    #[arg(long, env = "ROUTE_METRICS_TEMPLATE")]
    template: Option<PathBuf>,

    /// Keep elapsed times in microseconds instead of milliseconds
    #[arg(long, env = "ROUTE_METRICS_MICROSECONDS")]
    microseconds: bool,

    /// Percentile ladder, comma-separated values in 0.0..=1.0
    #[arg(long, value_delimiter = ',')]
    percentiles: Option<Vec<f64>>,

    /// Status sub-keying: by-status-code or by-success-failure
    #[arg(long, default_value = "by-status-code")]
    grouper: String,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("routemetrics: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let options = build_options(&cli)?;
    let rules = resolve_template(&options)?;

    let analysis = analyze_file(&options.log_path)?;
    let model = ReportModel::build(&analysis, &rules, &options);

    let mut out = open_destination(&options.output);
    reporter_for(options.reporter)
        .render(&model, &mut out)
        .map_err(|source| EngineError::WriteReport { source })?;
    out.flush()?;

    if !analysis.parse_errors.is_empty() {
        tracing::warn!(
            malformed_lines = analysis.parse_errors.total(),
            "log contained malformed lines; details are in the report"
        );
    }

    Ok(())
}

fn build_options(cli: &Cli) -> anyhow::Result<ReportOptions> {
    let options = ReportOptions {
        log_path: cli.log.clone(),
        reporter: cli.reporter.parse()?,
        output: cli.output.parse::<Destination>().unwrap_or_default(),
        template_path: cli.template.clone(),
        microseconds: cli.microseconds,
        percentiles: cli
            .percentiles
            .clone()
            .unwrap_or_else(|| ReportOptions::default().percentiles),
        grouper: cli.grouper.parse()?,
    };
    options.validate()?;
    Ok(options)
}

/// A missing template file has a safe default (no grouping) and only
/// warns; a template that exists but fails validation is fatal.
fn resolve_template(options: &ReportOptions) -> anyhow::Result<Vec<GroupingRule>> {
    let Some(path) = &options.template_path else {
        return Ok(Vec::new());
    };

    match load_template(path) {
        Ok(rules) => Ok(rules),
        Err(ConfigError::TemplateRead { path, source }) => {
            eprintln!(
                "routemetrics: cannot read template {}: {source}; continuing without grouping",
                path.display()
            );
            Ok(Vec::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Unopenable output paths fall back to stdout with a warning; the
/// report is still produced.
fn open_destination(destination: &Destination) -> Box<dyn Write> {
    match destination {
        Destination::Stdout => Box::new(io::stdout()),
        Destination::Stderr => Box::new(io::stderr()),
        Destination::File(path) => match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => {
                eprintln!(
                    "routemetrics: cannot open output {}: {e}; writing to stdout",
                    path.display()
                );
                Box::new(io::stdout())
            }
        },
    }
}
