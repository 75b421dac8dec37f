//! The five request/assert scenarios
//!
//! A scenario is data (method, path, headers, body) plus a pure check over
//! the captured [`Exchange`]. The runner owns all I/O.

use postcheck_core::{AssertionFailure, Exchange, NewPost};
use reqwest::Method;
use serde_json::json;

use crate::checks::{
    decode, expect_each_schema, expect_field, expect_min_len, expect_schema, expect_status,
};

/// Minimum number of posts the collection endpoint must return.
pub const MIN_POSTS: usize = 100;

/// Pure assertion over a completed exchange.
pub type Check = fn(&Exchange) -> Result<(), AssertionFailure>;

/// One independent HTTP call and its expectations
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Unique name; also the log file name
    pub name: &'static str,
    pub description: &'static str,
    pub method: Method,
    /// Path relative to the base URL
    pub path: &'static str,
    /// Send the configured JSON Content-Type header
    pub send_json_header: bool,
    pub body: Option<NewPost>,
    pub check: Check,
}

/// All scenarios in execution order.
#[must_use]
pub fn all() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "list_posts",
            description: "GET posts: 200, every element matches the post schema, at least 100 posts",
            method: Method::GET,
            path: "posts",
            send_json_header: true,
            body: None,
            check: check_list_posts,
        },
        Scenario {
            name: "get_single_post",
            description: "GET posts/1: 200, body matches the post schema, id is 1",
            method: Method::GET,
            path: "posts/1",
            send_json_header: true,
            body: None,
            check: check_get_single_post,
        },
        Scenario {
            name: "not_found",
            description: "GET invalidposts: 404",
            method: Method::GET,
            path: "invalidposts",
            send_json_header: true,
            body: None,
            check: check_not_found,
        },
        Scenario {
            name: "create_post",
            description: "POST posts (no Content-Type): 201, body matches the post schema",
            method: Method::POST,
            path: "posts",
            // The create call goes out without a Content-Type header.
            send_json_header: false,
            body: Some(NewPost {
                title: "foo".into(),
                body: "bar".into(),
                user_id: 1,
            }),
            check: check_create_post,
        },
        Scenario {
            name: "delete_post",
            description: "DELETE posts/1: 200",
            method: Method::DELETE,
            path: "posts/1",
            send_json_header: false,
            body: None,
            check: check_delete_post,
        },
    ]
}

/// Look up a scenario by name.
#[must_use]
pub fn find(name: &str) -> Option<Scenario> {
    all().into_iter().find(|s| s.name == name)
}

fn check_list_posts(exchange: &Exchange) -> Result<(), AssertionFailure> {
    expect_status(exchange, 200)?;
    let value = decode(exchange)?;
    let posts = expect_each_schema(&value)?;
    expect_min_len(posts, MIN_POSTS)
}

fn check_get_single_post(exchange: &Exchange) -> Result<(), AssertionFailure> {
    expect_status(exchange, 200)?;
    let value = decode(exchange)?;
    expect_schema(&value)?;
    expect_field(&value, "/id", &json!(1))
}

fn check_not_found(exchange: &Exchange) -> Result<(), AssertionFailure> {
    expect_status(exchange, 404)
}

fn check_create_post(exchange: &Exchange) -> Result<(), AssertionFailure> {
    expect_status(exchange, 201)?;
    let value = decode(exchange)?;
    expect_schema(&value)
}

// The sandbox does not persist deletes, so only the status is checked.
fn check_delete_post(exchange: &Exchange) -> Result<(), AssertionFailure> {
    expect_status(exchange, 200)
}

#[cfg(test)]
mod tests {
    use super::*;
    use postcheck_core::{AssertionKind, RequestSnapshot, ResponseSnapshot};
    use std::collections::{BTreeMap, HashSet};

    fn exchange(status: u16, body: &str) -> Exchange {
        Exchange {
            request: RequestSnapshot {
                method: "GET".into(),
                url: "http://stub/".into(),
                headers: BTreeMap::new(),
                body: None,
            },
            response: ResponseSnapshot {
                status_code: status,
                headers: BTreeMap::new(),
                body: body.into(),
                latency_ms: 0,
            },
        }
    }

    fn posts(n: usize) -> String {
        let items: Vec<_> = (1..=n)
            .map(|i| json!({"userId": 1, "id": i, "title": "t", "body": "b"}))
            .collect();
        serde_json::Value::Array(items).to_string()
    }

    fn run(name: &str, status: u16, body: &str) -> Result<(), AssertionFailure> {
        let scenario = find(name).unwrap();
        (scenario.check)(&exchange(status, body))
    }

    #[test]
    fn scenarios_are_unique_and_ordered() {
        let names: Vec<_> = all().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "list_posts",
                "get_single_post",
                "not_found",
                "create_post",
                "delete_post"
            ]
        );
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn only_get_scenarios_send_the_json_header() {
        for s in all() {
            assert_eq!(s.send_json_header, s.method == Method::GET, "{}", s.name);
        }
    }

    #[test]
    fn create_payload() {
        let create = find("create_post").unwrap();
        assert_eq!(create.method, Method::POST);
        assert_eq!(
            serde_json::to_value(create.body.unwrap()).unwrap(),
            json!({"title": "foo", "body": "bar", "userId": 1})
        );
    }

    #[test]
    fn unknown_scenario() {
        assert!(find("test_006").is_none());
    }

    // ── list_posts ──

    #[test]
    fn list_posts_with_hundred_posts_passes() {
        assert!(run("list_posts", 200, &posts(100)).is_ok());
    }

    #[test]
    fn list_posts_with_ninety_nine_posts_fails_on_length() {
        let err = run("list_posts", 200, &posts(99)).unwrap_err();
        assert_eq!(err.kind, AssertionKind::MinLength);
    }

    #[test]
    fn list_posts_with_one_bad_element_fails_on_schema() {
        let mut items: serde_json::Value = serde_json::from_str(&posts(150)).unwrap();
        items[42]["title"] = json!(42);
        let err = run("list_posts", 200, &items.to_string()).unwrap_err();
        assert_eq!(err.kind, AssertionKind::Schema);
    }

    #[test]
    fn list_posts_checks_status_first() {
        let err = run("list_posts", 500, "oops").unwrap_err();
        assert_eq!(err.kind, AssertionKind::StatusCode);
    }

    // ── get_single_post ──

    #[test]
    fn get_single_post_with_id_one_passes() {
        let body = r#"{"id":1,"userId":1,"title":"t","body":"b"}"#;
        assert!(run("get_single_post", 200, body).is_ok());
    }

    #[test]
    fn get_single_post_with_id_two_fails() {
        let body = r#"{"id":2,"userId":1,"title":"t","body":"b"}"#;
        let err = run("get_single_post", 200, body).unwrap_err();
        assert_eq!(err.kind, AssertionKind::FieldValue);
        assert_eq!(err.actual.as_deref(), Some("2"));
    }

    #[test]
    fn get_single_post_with_bad_schema_fails_before_id() {
        let body = r#"{"id":1,"userId":"1"}"#;
        let err = run("get_single_post", 200, body).unwrap_err();
        assert_eq!(err.kind, AssertionKind::Schema);
    }

    // ── not_found ──

    #[test]
    fn not_found_with_404_passes() {
        assert!(run("not_found", 404, "{}").is_ok());
    }

    #[test]
    fn not_found_with_200_fails() {
        let err = run("not_found", 200, "{}").unwrap_err();
        assert_eq!(err.kind, AssertionKind::StatusCode);
    }

    // ── create_post ──

    #[test]
    fn create_post_with_201_passes() {
        assert!(run("create_post", 201, r#"{"id":101}"#).is_ok());
    }

    #[test]
    fn create_post_with_200_fails_regardless_of_body() {
        for body in [r#"{"id":101}"#, r#"{"id":"x"}"#, ""] {
            let err = run("create_post", 200, body).unwrap_err();
            assert_eq!(err.kind, AssertionKind::StatusCode);
        }
    }

    #[test]
    fn create_post_with_mistyped_body_fails() {
        let err = run("create_post", 201, r#"{"userId":"1"}"#).unwrap_err();
        assert_eq!(err.kind, AssertionKind::Schema);
    }

    // ── delete_post ──

    #[test]
    fn delete_post_only_checks_status() {
        assert!(run("delete_post", 200, "").is_ok());
        assert!(run("delete_post", 404, "").is_err());
    }
}
