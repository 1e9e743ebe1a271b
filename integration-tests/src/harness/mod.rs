//! Shared fixtures: write instrumentation logs and grouping templates
//! into a temp dir and hand back their paths.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct Fixture {
    // Held so the directory outlives the test body.
    _dir: TempDir,
    root: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path().to_path_buf();
        Self { _dir: dir, root }
    }

    pub fn write_log(&self, lines: &[String]) -> PathBuf {
        let path = self.root.join("route-metrics.log");
        let mut contents = lines.join("\n");
        contents.push('\n');
        fs::write(&path, contents).expect("write log fixture");
        path
    }

    pub fn write_template(&self, contents: &str) -> PathBuf {
        let path = self.root.join("template.json");
        fs::write(&path, contents).expect("write template fixture");
        path
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn header_line(ts: i64) -> String {
    format!(r#"{{"ts":{ts},"type":"header","tid":0,"entry":{{"version":"1.0.0","app":"fixture"}}}}"#)
}

pub fn route_line(ts: i64, method: &str, url: &str, status: i64, et_us: u64) -> String {
    format!(
        r#"{{"ts":{ts},"type":"route","tid":0,"entry":{{"method":"{method}","protocol":"http","host":"x","port":80,"url":"{url}","statusCode":{status},"et":{et_us}}}}}"#
    )
}

pub fn gc_line(ts: i64, count: u64, total_time: f64) -> String {
    format!(r#"{{"ts":{ts},"type":"gc","tid":0,"entry":{{"count":{count},"totalTime":{total_time}}}}}"#)
}

pub fn proc_line(ts: i64, cpu_user: u64, rss: u64) -> String {
    format!(
        r#"{{"ts":{ts},"type":"proc","tid":0,"entry":{{"cpuUser":{cpu_user},"cpuSystem":0,"rss":{rss},"heapTotal":0,"heapUsed":0,"external":0,"arrayBuffers":0}}}}"#
    )
}
