//! postcheck-runner: HTTP scenarios for the posts API

pub mod checks;
pub mod client;
mod runner;
pub mod scenarios;

pub use client::HttpClient;
pub use runner::{Runner, RunnerError};
pub use scenarios::Scenario;
