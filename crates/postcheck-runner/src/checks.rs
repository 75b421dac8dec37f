//! Assertion helpers for scenario checks
//!
//! No I/O. Every helper returns the first violated expectation as an
//! [`AssertionFailure`] so checks can chain them with `?`.

use postcheck_core::{AssertionFailure, AssertionKind, Exchange, validate_post};
use serde_json::Value;

pub fn expect_status(exchange: &Exchange, expected: u16) -> Result<(), AssertionFailure> {
    let actual = exchange.response.status_code;
    if actual == expected {
        return Ok(());
    }
    Err(AssertionFailure::new(
        AssertionKind::StatusCode,
        format!("{} {}", exchange.request.method, exchange.request.url),
    )
    .with_values(expected, actual))
}

/// Decode the response body as JSON.
pub fn decode(exchange: &Exchange) -> Result<Value, AssertionFailure> {
    exchange.json().map_err(|e| {
        AssertionFailure::new(AssertionKind::Decode, format!("invalid JSON body: {e}"))
    })
}

pub fn expect_schema(value: &Value) -> Result<(), AssertionFailure> {
    if validate_post(value) {
        return Ok(());
    }
    Err(AssertionFailure::new(
        AssertionKind::Schema,
        format!("body {}", truncate(&value.to_string())),
    ))
}

/// Require a JSON array and validate every element independently.
///
/// Returns the elements so callers can assert on the collection.
pub fn expect_each_schema(value: &Value) -> Result<&[Value], AssertionFailure> {
    let items = value.as_array().ok_or_else(|| {
        AssertionFailure::new(AssertionKind::Decode, "expected a JSON array")
            .with_values("array", json_type(value))
    })?;
    for (index, item) in items.iter().enumerate() {
        if !validate_post(item) {
            return Err(AssertionFailure::new(
                AssertionKind::Schema,
                format!("element {index}: {}", truncate(&item.to_string())),
            ));
        }
    }
    Ok(items)
}

pub fn expect_min_len(items: &[Value], min: usize) -> Result<(), AssertionFailure> {
    if items.len() >= min {
        return Ok(());
    }
    Err(
        AssertionFailure::new(AssertionKind::MinLength, "collection is too short")
            .with_values(format!(">= {min}"), items.len()),
    )
}

/// Compare the value at a JSON pointer (e.g. `/id`) with `expected`.
///
/// Numbers compare by value, so `1.0` matches `1`.
pub fn expect_field(
    value: &Value,
    pointer: &str,
    expected: &Value,
) -> Result<(), AssertionFailure> {
    let Some(actual) = value.pointer(pointer) else {
        return Err(
            AssertionFailure::new(AssertionKind::FieldValue, format!("{pointer} is missing"))
                .with_values(expected, "nothing"),
        );
    };
    if values_equal(actual, expected) {
        return Ok(());
    }
    Err(AssertionFailure::new(AssertionKind::FieldValue, pointer.to_string())
        .with_values(expected, actual))
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Keep failure messages readable when a whole post body is quoted.
fn truncate(s: &str) -> String {
    const MAX: usize = 200;
    if s.len() <= MAX {
        return s.to_string();
    }
    let mut end = MAX;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}
