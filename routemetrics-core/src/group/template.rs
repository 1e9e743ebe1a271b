use crate::error::ConfigError;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The one template schema version this engine understands. A
/// mismatch is a hard validation error raised before grouping begins.
const TEMPLATE_VERSION: &str = "1.0.0";

/// On-disk grouping template, consumed verbatim:
/// `{version, routes: [{name, method, startsWith|regex|pattern}]}`.
#[derive(Debug, Deserialize)]
struct TemplateFile {
    version: String,
    #[serde(default)]
    routes: Vec<RuleSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleSpec {
    name: Option<String>,
    method: Option<String>,
    starts_with: Option<String>,
    regex: Option<String>,
    pattern: Option<String>,
}

/// A validated rule: name, method, and exactly one matcher.
#[derive(Debug, Clone)]
pub struct GroupingRule {
    pub name: String,
    pub method: String,
    pub matcher: RouteMatcher,
}

impl GroupingRule {
    /// True iff the rule's method equals the observation's method and
    /// the URL path satisfies the matcher.
    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.method == method && self.matcher.matches(path)
    }
}

#[derive(Debug, Clone)]
pub enum RouteMatcher {
    /// Path prefix.
    StartsWith(String),
    /// Compiled once at validation time.
    Regex(Regex),
    /// Exact equality.
    Pattern(String),
}

impl RouteMatcher {
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::StartsWith(prefix) => path.starts_with(prefix),
            Self::Regex(re) => re.is_match(path),
            Self::Pattern(exact) => path == exact,
        }
    }
}

/// Load and validate a grouping template file. Any failure is fatal
/// and happens before a single record is grouped.
pub fn load_template(path: impl AsRef<Path>) -> Result<Vec<GroupingRule>, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })?;
    let file: TemplateFile =
        serde_json::from_str(&contents).map_err(|source| ConfigError::TemplateParse {
            path: path.to_path_buf(),
            source,
        })?;
    validate(file)
}

/// Parse a template from an in-memory string (tests, embedded config).
pub fn parse_template(contents: &str) -> Result<Vec<GroupingRule>, ConfigError> {
    let file: TemplateFile =
        serde_json::from_str(contents).map_err(|source| ConfigError::TemplateParse {
            path: "<inline>".into(),
            source,
        })?;
    validate(file)
}

fn validate(file: TemplateFile) -> Result<Vec<GroupingRule>, ConfigError> {
    if file.version != TEMPLATE_VERSION {
        return Err(ConfigError::TemplateVersion {
            found: file.version,
            expected: TEMPLATE_VERSION.to_string(),
        });
    }

    file.routes
        .into_iter()
        .enumerate()
        .map(|(index, spec)| validate_rule(index, spec))
        .collect()
}

fn validate_rule(index: usize, spec: RuleSpec) -> Result<GroupingRule, ConfigError> {
    let name = match spec.name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ConfigError::RuleMissingName { index }),
    };
    let method = match spec.method {
        Some(method) if !method.is_empty() => method,
        _ => return Err(ConfigError::RuleMissingMethod { name }),
    };

    let matcher = match (spec.starts_with, spec.regex, spec.pattern) {
        (Some(prefix), None, None) => RouteMatcher::StartsWith(prefix),
        (None, Some(pattern), None) => RouteMatcher::Regex(
            Regex::new(&pattern).map_err(|source| ConfigError::RuleInvalidRegex {
                name: name.clone(),
                source,
            })?,
        ),
        (None, None, Some(exact)) => RouteMatcher::Pattern(exact),
        _ => return Err(ConfigError::RuleMatcherCount { name }),
    };

    Ok(GroupingRule {
        name,
        method,
        matcher,
    })
}
