//! Post schema and validator
//!
//! The schema is deliberately lax: every field is optional and unknown
//! fields are allowed. An object with none of the four fields is valid.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// JSON Schema describing a post as returned by the API.
#[must_use]
pub fn post_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "body": { "type": "string" },
            "userId": { "type": "number" },
            "id": { "type": "number" }
        }
    })
}

/// Compiled [`post_schema`].
pub struct PostValidator {
    validator: jsonschema::Validator,
}

impl PostValidator {
    /// Compile the post schema.
    ///
    /// # Errors
    ///
    /// Returns the compiler message if the schema is rejected.
    pub fn new() -> Result<Self, String> {
        let validator = jsonschema::validator_for(&post_schema()).map_err(|e| e.to_string())?;
        Ok(Self { validator })
    }

    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Human-readable validation errors (empty when valid).
    #[must_use]
    pub fn errors(&self, instance: &Value) -> Vec<String> {
        self.validator
            .iter_errors(instance)
            .map(|e| e.to_string())
            .collect()
    }
}

fn shared_validator() -> &'static PostValidator {
    static VALIDATOR: OnceLock<PostValidator> = OnceLock::new();
    VALIDATOR.get_or_init(|| PostValidator::new().expect("post schema should compile"))
}

/// Check a decoded JSON value against the post schema.
///
/// Never fails hard: a mismatch returns `false` and the details are only
/// emitted as a `warn` event for whoever is listening.
#[must_use]
pub fn validate_post(instance: &Value) -> bool {
    let validator = shared_validator();
    if validator.is_valid(instance) {
        return true;
    }
    tracing::warn!(
        errors = %validator.errors(instance).join("; "),
        "post schema validation failed"
    );
    false
}

/// Payload for creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}
