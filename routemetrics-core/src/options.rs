use crate::error::ConfigError;
use crate::group::GrouperKind;
use crate::report::ReporterKind;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_LOG_PATH: &str = "route-metrics.log";

/// Percentile ladder rendered when the caller does not override it.
pub const DEFAULT_PERCENTILES: [f64; 5] = [0.5, 0.7, 0.8, 0.9, 0.95];

/// Where the report goes: a file path or a numeric descriptor
/// ("1" = stdout, "2" = stderr).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Destination {
    #[default]
    Stdout,
    Stderr,
    File(PathBuf),
}

impl FromStr for Destination {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "1" => Self::Stdout,
            "2" => Self::Stderr,
            path => Self::File(PathBuf::from(path)),
        })
    }
}

/// The already-validated options object the engine consumes. CLI
/// argument and environment parsing live in the binary, not here.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub log_path: PathBuf,
    pub reporter: ReporterKind,
    pub output: Destination,
    pub template_path: Option<PathBuf>,
    /// Keep elapsed times in microseconds instead of converting to
    /// milliseconds at report time.
    pub microseconds: bool,
    pub percentiles: Vec<f64>,
    pub grouper: GrouperKind,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            reporter: ReporterKind::default(),
            output: Destination::default(),
            template_path: None,
            microseconds: false,
            percentiles: DEFAULT_PERCENTILES.to_vec(),
            grouper: GrouperKind::default(),
        }
    }
}

impl ReportOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for &p in &self.percentiles {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::PercentileOutOfRange { value: p });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn destination_parses_descriptors_and_paths() {
        assert_eq!("1".parse::<Destination>().unwrap(), Destination::Stdout);
        assert_eq!("2".parse::<Destination>().unwrap(), Destination::Stderr);
        assert_eq!(
            "out/report.csv".parse::<Destination>().unwrap(),
            Destination::File(PathBuf::from("out/report.csv"))
        );
    }

    #[test]
    fn default_percentile_ladder() {
        let options = ReportOptions::default();

        assert_eq!(options.percentiles, vec![0.5, 0.7, 0.8, 0.9, 0.95]);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn out_of_range_percentile_is_rejected() {
        let options = ReportOptions {
            percentiles: vec![0.5, 1.5],
            ..ReportOptions::default()
        };

        let err = options.validate().unwrap_err();

        assert!(matches!(err, ConfigError::PercentileOutOfRange { value } if value == 1.5));
    }
}
