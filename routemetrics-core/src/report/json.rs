use crate::report::Reporter;
use crate::report::model::{ReportModel, RunReport};
use serde_json::{Map, Value, json};
use std::io::{self, Write};

/// JSON reporter: 2-space pretty print of the full summary. Bucket
/// order is preserved by emitting route groups as `[name, statusMap]`
/// pairs rather than an object.
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn render(&self, model: &ReportModel, out: &mut dyn Write) -> io::Result<()> {
        let value = model_value(model);
        serde_json::to_writer_pretty(&mut *out, &value)?;
        writeln!(out)?;
        Ok(())
    }
}

fn model_value(model: &ReportModel) -> Value {
    json!({
        "runs": model.runs.iter().map(run_value).collect::<Vec<_>>(),
        "lines": model.lines_read,
        "bytes": model.bytes_read,
        "chars": model.chars_read,
        "start": model.first_ts,
        "end": model.last_ts,
        "percentiles": model.percentile_labels,
        "units": if model.microseconds { "microseconds" } else { "milliseconds" },
        "parseErrors": model.parse_errors.by_message(),
    })
}

fn run_value(run: &RunReport) -> Value {
    let routes: Vec<Value> = run
        .buckets
        .iter()
        .map(|bucket| {
            let mut statuses = Map::new();
            for row in &bucket.rows {
                statuses.insert(row.status.clone(), json!(row.observations));
            }
            json!([bucket.name, statuses])
        })
        .collect();

    let mut key_to_properties = Map::new();
    for (key, properties) in &run.key_properties {
        key_to_properties.insert(key.clone(), json!(properties));
    }

    json!({
        "header": run.header,
        "routes": routes,
        "patches": run.patches.iter()
            .map(|(ts, name)| json!({"ts": ts, "name": name}))
            .collect::<Vec<_>>(),
        "loads": run.loads.iter()
            .map(|(ts, name)| json!({"ts": ts, "name": name}))
            .collect::<Vec<_>>(),
        "statuses": run.status_log.iter()
            .map(|(ts, status)| json!({"ts": ts, "status": status}))
            .collect::<Vec<_>>(),
        "unknown": run.unknown,
        "timeSeries": {
            "lineCount": run.time_series.line_count,
            "proc": run.time_series.proc,
            "gc": run.time_series.gc,
            "eventloop": run.time_series.eventloop,
        },
        "meta": { "keyToProperties": key_to_properties },
    })
}
