pub mod accumulate;
pub mod engine;
pub mod error;
pub mod group;
pub mod logging;
pub mod options;
pub mod reader;
pub mod record;
pub mod report;
pub mod stats;

pub use engine::{Analysis, analyze, analyze_file, run_report};
pub use error::{ConfigError, EngineError};
pub use options::ReportOptions;
