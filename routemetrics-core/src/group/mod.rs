//! Route index and grouper.
//!
//! Raw route keys (method + full URL) fold into named buckets under an
//! ordered rule set; unmatched keys become raw buckets of their own.
//! All validation happens before any grouping work.

pub mod key;

mod grouper;
mod template;

pub use grouper::{Bucket, BucketOrigin, RouteBuckets, group};
pub use template::{GroupingRule, RouteMatcher, load_template, parse_template};

use crate::error::ConfigError;
use std::str::FromStr;

/// Selects the status sub-key for observations within a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrouperKind {
    /// Sub-key by exact status code ("200", "404", ...). The default.
    #[default]
    ByStatusCode,
    /// Sub-key by "success" (status < 400) or "failure".
    BySuccessFailure,
}

impl GrouperKind {
    pub fn status_key(&self, status_code: i64) -> String {
        match self {
            Self::ByStatusCode => status_code.to_string(),
            Self::BySuccessFailure => {
                if status_code < 400 {
                    "success".to_string()
                } else {
                    "failure".to_string()
                }
            }
        }
    }
}

impl FromStr for GrouperKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "by-status-code" => Ok(Self::ByStatusCode),
            "by-success-failure" => Ok(Self::BySuccessFailure),
            other => Err(ConfigError::UnknownGrouper {
                name: other.to_string(),
            }),
        }
    }
}
