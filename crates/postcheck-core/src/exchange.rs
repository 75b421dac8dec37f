//! Request/response snapshots for one HTTP call
//!
//! An [`Exchange`] is captured by the runner, written to the scenario log
//! and handed to the scenario's assertions. Nothing here is retained past
//! the scenario that produced it.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Snapshot of the HTTP request as it was sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RequestSnapshot {
    pub method: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Snapshot of the HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResponseSnapshot {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub latency_ms: u64,
}

/// Request sent paired with the response received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Exchange {
    pub request: RequestSnapshot,
    pub response: ResponseSnapshot,
}

impl Exchange {
    /// Decode the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.response.body)
    }
}

/// Render a header map on a single line, keys in sorted order.
#[must_use]
pub fn render_headers(headers: &BTreeMap<String, String>) -> String {
    serde_json::to_string(headers).unwrap_or_else(|_| format!("{headers:?}"))
}

/// Insert a header, joining repeated names with `", "`.
pub fn push_header(headers: &mut BTreeMap<String, String>, name: &str, value: &str) {
    headers
        .entry(name.to_string())
        .and_modify(|v| {
            v.push_str(", ");
            v.push_str(value);
        })
        .or_insert_with(|| value.to_string());
}
