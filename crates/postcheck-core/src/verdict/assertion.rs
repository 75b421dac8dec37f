//! Assertion failures raised by scenario checks

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What kind of expectation was violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssertionKind {
    /// Status code differs from the expected one
    StatusCode,
    /// Body (or an element of it) does not match the post schema
    Schema,
    /// Collection has fewer elements than required
    MinLength,
    /// A field holds an unexpected value
    FieldValue,
    /// Body could not be decoded into the expected JSON shape
    Decode,
}

impl AssertionKind {
    /// Human-readable description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::StatusCode => "Unexpected status code",
            Self::Schema => "Response does not match post schema",
            Self::MinLength => "Too few elements",
            Self::FieldValue => "Unexpected field value",
            Self::Decode => "Response body is not the expected JSON",
        }
    }
}

impl std::fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// A failed expectation. Checks stop at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AssertionFailure {
    pub kind: AssertionKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl AssertionFailure {
    #[must_use]
    pub fn new(kind: AssertionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Attach the expected and actual values.
    #[must_use]
    pub fn with_values(mut self, expected: impl ToString, actual: impl ToString) -> Self {
        self.expected = Some(expected.to_string());
        self.actual = Some(actual.to_string());
        self
    }
}

impl std::fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let (Some(expected), Some(actual)) = (&self.expected, &self.actual) {
            write!(f, " (expected {expected}, got {actual})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AssertionFailure {}
