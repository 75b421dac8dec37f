//! postcheck-core: Core types for contract-checking a JSON posts API
//!
//! This crate holds everything that does not touch the network: the post
//! schema and its validator, request/response snapshots, the per-scenario
//! file logger, and the assertion/report types the runner produces.

pub mod config;
pub mod exchange;
pub mod logger;
pub mod schema;
pub mod verdict;

pub use config::{Config, ConfigError};
pub use exchange::{Exchange, RequestSnapshot, ResponseSnapshot};
pub use logger::{LoggerError, TestLogger};
pub use schema::{NewPost, PostValidator, validate_post};
pub use verdict::{
    AssertionFailure, AssertionKind, Outcome, RunReport, ScenarioResult, VerdictStatus,
};
