use crate::report::model::{ReportModel, format_number};
use crate::report::Reporter;
use chrono::DateTime;
use std::io::{self, Write};

/// CSV reporter: a `#`-prefixed info block, one header row, then one
/// data row per (bucket, status) pair in grouper order.
pub struct CsvReporter;

impl Reporter for CsvReporter {
    fn render(&self, model: &ReportModel, out: &mut dyn Write) -> io::Result<()> {
        write_info_block(model, out)?;

        let labels: Vec<String> = model
            .percentile_labels
            .iter()
            .map(|&p| format_number(p))
            .collect();
        writeln!(
            out,
            "route, status, n, mean, stddev, percentiles: [{}]",
            labels.join(", ")
        )?;

        let annotate_runs = model.runs.len() > 1;
        for (index, run) in model.runs.iter().enumerate() {
            if annotate_runs {
                writeln!(out, "# run {}", index + 1)?;
            }
            for bucket in &run.buckets {
                for row in &bucket.rows {
                    let percentiles: Vec<String> = row
                        .percentile_values
                        .iter()
                        .map(|&v| format_number(v))
                        .collect();
                    writeln!(
                        out,
                        "{},{},{},{:.2},{:.2},{}",
                        bucket.name,
                        row.status,
                        row.n,
                        row.mean,
                        row.stddev,
                        percentiles.join(",")
                    )?;
                }
            }
        }

        Ok(())
    }
}

fn write_info_block(model: &ReportModel, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "# runs: {}", model.run_count())?;
    writeln!(
        out,
        "# lines: {} (bytes: {}, chars: {})",
        model.lines_read, model.bytes_read, model.chars_read
    )?;
    writeln!(out, "# start: {}", format_ts(model.first_ts))?;
    writeln!(out, "# end: {}", format_ts(model.last_ts))?;
    writeln!(
        out,
        "# route observations: {} across {} route keys",
        model.total_observations(),
        model.route_key_count()
    )?;
    if model.has_patches() {
        let count: usize = model.runs.iter().map(|r| r.patches.len()).sum();
        writeln!(out, "# patches: {count} recorded")?;
    } else {
        writeln!(out, "# patches: none")?;
    }
    writeln!(out, "# time-series lines: {}", model.time_series_lines())?;
    if !model.parse_errors.is_empty() {
        writeln!(
            out,
            "# parse errors: {} malformed lines",
            model.parse_errors.total()
        )?;
    }
    if model.microseconds {
        writeln!(out, "# elapsed times in microseconds")?;
    }
    Ok(())
}

fn format_ts(ts: Option<i64>) -> String {
    match ts {
        Some(ms) => match DateTime::from_timestamp_millis(ms) {
            Some(dt) => format!("{} ({ms})", dt.to_rfc3339()),
            None => ms.to_string(),
        },
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::analyze;
    use crate::options::ReportOptions;
    use crate::report::model::ReportModel;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn render(log: &str, options: &ReportOptions) -> String {
        let analysis = analyze(Cursor::new(log)).unwrap();
        let model = ReportModel::build(&analysis, &[], options);
        let mut out = Vec::new();
        CsvReporter.render(&model, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn body_rows(rendered: &str) -> Vec<&str> {
        rendered
            .lines()
            .skip_while(|l| !l.starts_with("route, status"))
            .skip(1)
            .collect()
    }

    #[test]
    fn single_route_body_is_byte_exact() {
        let log = concat!(
            r#"{"ts":1700000000000,"type":"header","tid":0,"entry":{"version":"1.0.0"}}"#,
            "\n",
            r#"{"ts":1700000000001,"type":"route","tid":0,"entry":{"method":"GET","protocol":"http","host":"x","port":80,"url":"/a","statusCode":200,"et":4000}}"#,
            "\n",
        );

        let rendered = render(log, &ReportOptions::default());

        assert_eq!(
            body_rows(&rendered),
            vec!["GET http://x:80/a,200,1,4.00,0.00,4,4,4,4,4"]
        );
    }

    #[test]
    fn header_row_lists_the_percentile_ladder() {
        let rendered = render("", &ReportOptions::default());

        assert!(
            rendered
                .lines()
                .any(|l| l == "route, status, n, mean, stddev, percentiles: [0.5, 0.7, 0.8, 0.9, 0.95]")
        );
    }

    #[test]
    fn two_statuses_share_the_bucket_name() {
        let log = concat!(
            r#"{"ts":1,"type":"header","tid":0,"entry":{"version":"1.0.0"}}"#,
            "\n",
            r#"{"ts":2,"type":"route","tid":0,"entry":{"method":"GET","protocol":"http","host":"x","port":80,"url":"/a","statusCode":200,"et":4000}}"#,
            "\n",
            r#"{"ts":3,"type":"route","tid":0,"entry":{"method":"GET","protocol":"http","host":"x","port":80,"url":"/a","statusCode":500,"et":6000}}"#,
            "\n",
        );

        let rendered = render(log, &ReportOptions::default());

        assert_eq!(
            body_rows(&rendered),
            vec![
                "GET http://x:80/a,200,1,4.00,0.00,4,4,4,4,4",
                "GET http://x:80/a,500,1,6.00,0.00,6,6,6,6,6",
            ]
        );
    }

    #[test]
    fn microsecond_mode_skips_unit_conversion() {
        let log = concat!(
            r#"{"ts":1,"type":"route","tid":0,"entry":{"method":"GET","protocol":"http","host":"x","port":80,"url":"/a","statusCode":200,"et":4000}}"#,
            "\n",
        );
        let options = ReportOptions {
            microseconds: true,
            ..ReportOptions::default()
        };

        let rendered = render(log, &options);

        assert_eq!(
            body_rows(&rendered),
            vec!["GET http://x:80/a,200,1,4000.00,0.00,4000,4000,4000,4000,4000"]
        );
        assert!(rendered.contains("# elapsed times in microseconds"));
    }

    #[test]
    fn info_block_reports_counts() {
        let log = concat!(
            r#"{"ts":1,"type":"header","tid":0,"entry":{"version":"1.0.0"}}"#,
            "\n",
            r#"{"ts":2,"type":"patch","tid":0,"entry":{"name":"http"}}"#,
            "\n",
            r#"{"ts":3,"type":"gc","tid":0,"entry":{"count":1,"totalTime":0.5}}"#,
            "\n",
        );

        let rendered = render(log, &ReportOptions::default());

        assert!(rendered.contains("# runs: 1"));
        assert!(rendered.contains("# lines: 3"));
        assert!(rendered.contains("# route observations: 0 across 0 route keys"));
        assert!(rendered.contains("# patches: 1 recorded"));
        assert!(rendered.contains("# time-series lines: 1"));
    }

    #[test]
    fn multiple_runs_are_annotated() {
        let log = concat!(
            r#"{"ts":1,"type":"header","tid":0,"entry":{"version":"1.0.0"}}"#,
            "\n",
            r#"{"ts":2,"type":"route","tid":0,"entry":{"method":"GET","protocol":"http","host":"x","port":80,"url":"/a","statusCode":200,"et":1000}}"#,
            "\n",
            r#"{"ts":3,"type":"header","tid":0,"entry":{"version":"1.0.0"}}"#,
            "\n",
            r#"{"ts":4,"type":"route","tid":0,"entry":{"method":"GET","protocol":"http","host":"x","port":80,"url":"/a","statusCode":200,"et":2000}}"#,
            "\n",
        );

        let rendered = render(log, &ReportOptions::default());

        assert!(rendered.contains("# runs: 2"));
        assert!(rendered.contains("# run 1"));
        assert!(rendered.contains("# run 2"));
    }
}
