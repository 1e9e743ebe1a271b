//! Raw route key codec.
//!
//! A key is `"{method} {protocol}://{host}:{port}{url}"`, e.g.
//! `GET http://x:80/a`. The JSON report's `meta.keyToProperties`
//! carries the decoded method and path for every raw key.

use crate::record::RouteEntry;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KeyProperties {
    pub method: String,
    pub path: String,
}

pub fn encode_key(entry: &RouteEntry) -> String {
    format!(
        "{} {}://{}:{}{}",
        entry.method, entry.protocol, entry.host, entry.port, entry.url
    )
}

/// Recover `{method, path}` from an encoded key. Returns None for
/// strings that were not produced by [`encode_key`].
pub fn decode_key(key: &str) -> Option<KeyProperties> {
    let (method, rest) = key.split_once(' ')?;
    let (_, after_scheme) = rest.split_once("://")?;
    let path_start = after_scheme.find('/')?;
    Some(KeyProperties {
        method: method.to_string(),
        path: after_scheme[path_start..].to_string(),
    })
}
