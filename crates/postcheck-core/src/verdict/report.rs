//! Scenario outcomes and the aggregated run report

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::AssertionFailure;

/// How a single scenario ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// Every assertion held
    Passed,
    /// Halted at the first failing assertion
    Failed(AssertionFailure),
    /// The exchange itself could not be completed (DNS, refused, timeout, log file)
    Errored(String),
}

impl Outcome {
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed(_) => "FAIL",
            Self::Errored(_) => "ERROR",
        }
    }
}

/// Result of running one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioResult {
    /// Scenario name (also the log file name)
    pub scenario: String,
    pub outcome: Outcome,
    /// Wall-clock time spent in the scenario
    pub duration_secs: f64,
    /// Log file written for this run, if it could be created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

/// Pass or fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerdictStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// All scenario results from one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunReport {
    /// Base URL the scenarios were run against
    pub base_url: String,
    pub results: Vec<ScenarioResult>,
}

impl RunReport {
    #[must_use]
    pub fn new(base_url: impl Into<String>, results: Vec<ScenarioResult>) -> Self {
        Self {
            base_url: base_url.into(),
            results,
        }
    }

    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Passed))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    #[must_use]
    pub fn errored(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Errored(_)))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// PASS iff at least one scenario ran and every scenario passed.
    #[must_use]
    pub fn status(&self) -> VerdictStatus {
        if !self.results.is_empty() && self.passed() == self.results.len() {
            VerdictStatus::Pass
        } else {
            VerdictStatus::Fail
        }
    }

    /// Process exit code.
    ///
    /// 0 when everything passed, 1 when any assertion failed,
    /// 3 when the only problems were transport/tool errors (or nothing ran).
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.failed() > 0 {
            return 1;
        }
        if self.errored() > 0 || self.results.is_empty() {
            return 3;
        }
        0
    }

    #[must_use]
    pub fn reason(&self) -> String {
        if self.results.is_empty() {
            return "No scenarios were run".to_string();
        }
        if self.status() == VerdictStatus::Pass {
            return "All scenarios passed".to_string();
        }
        let mut parts = Vec::new();
        if self.failed() > 0 {
            parts.push(format!("{} failed", self.failed()));
        }
        if self.errored() > 0 {
            parts.push(format!("{} errored (connection/transport)", self.errored()));
        }
        parts.join("; ")
    }

    /// Render for a terminal.
    #[must_use]
    pub fn to_terminal(&self) -> String {
        let width = self
            .results
            .iter()
            .map(|r| r.scenario.len())
            .max()
            .unwrap_or(0);

        let mut lines = Vec::new();
        for r in &self.results {
            lines.push(format!(
                "  {:<width$}  {:<5}  {:.2}s",
                r.scenario,
                r.outcome.label(),
                r.duration_secs
            ));
            match &r.outcome {
                Outcome::Passed => {}
                Outcome::Failed(failure) => lines.push(format!("      {failure}")),
                Outcome::Errored(error) => lines.push(format!("      {error}")),
            }
            if let Some(log) = &r.log_file {
                lines.push(format!("      log: {}", log.display()));
            }
        }

        lines.push(String::new());
        lines.push(format!("{}: {}", self.status(), self.reason()));
        lines.push(format!(
            "  Scenarios: {} total, {} passed, {} failed, {} errored",
            self.results.len(),
            self.passed(),
            self.failed(),
            self.errored()
        ));
        lines.push(format!("  Exit code: {}", self.exit_code()));
        lines.join("\n")
    }
}

/// Generate JSON Schema for the report format.
#[must_use]
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(RunReport);
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::AssertionKind;

    fn result(name: &str, outcome: Outcome, secs: f64) -> ScenarioResult {
        ScenarioResult {
            scenario: name.to_string(),
            outcome,
            duration_secs: secs,
            log_file: Some(PathBuf::from(format!("logs/{name}"))),
        }
    }

    fn status_failure() -> AssertionFailure {
        AssertionFailure::new(AssertionKind::StatusCode, "GET invalidposts").with_values(404, 200)
    }

    #[test]
    fn all_passed_is_pass_with_exit_zero() {
        let report = RunReport::new(
            "http://x/",
            vec![
                result("a", Outcome::Passed, 0.1),
                result("b", Outcome::Passed, 0.2),
            ],
        );
        assert_eq!(report.status(), VerdictStatus::Pass);
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.reason(), "All scenarios passed");
    }

    #[test]
    fn failure_wins_over_error() {
        let report = RunReport::new(
            "http://x/",
            vec![
                result("a", Outcome::Failed(status_failure()), 0.1),
                result("b", Outcome::Errored("refused".into()), 0.2),
            ],
        );
        assert_eq!(report.status(), VerdictStatus::Fail);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn errors_only_exit_three() {
        let report = RunReport::new(
            "http://x/",
            vec![
                result("a", Outcome::Passed, 0.1),
                result("b", Outcome::Errored("timed out".into()), 0.2),
            ],
        );
        assert_eq!(report.status(), VerdictStatus::Fail);
        assert_eq!(report.exit_code(), 3);
        assert_eq!(report.reason(), "1 errored (connection/transport)");
    }

    #[test]
    fn empty_run_is_not_a_pass() {
        let report = RunReport::new("http://x/", vec![]);
        assert_eq!(report.status(), VerdictStatus::Fail);
        assert_eq!(report.exit_code(), 3);
        assert_eq!(report.reason(), "No scenarios were run");
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(Outcome::Failed(status_failure())).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["detail"]["kind"], "status_code");
        assert_eq!(json["detail"]["expected"], "404");

        let json = serde_json::to_value(Outcome::Passed).unwrap();
        assert_eq!(json, serde_json::json!({"status": "passed"}));
    }

    #[test]
    fn terminal_rendering() {
        let report = RunReport::new(
            "http://x/",
            vec![
                result("list_posts", Outcome::Passed, 0.41),
                result("not_found", Outcome::Failed(status_failure()), 0.12),
                result(
                    "delete_post",
                    Outcome::Errored("HTTP error: connection refused".into()),
                    0.01,
                ),
            ],
        );
        insta::assert_snapshot!(report.to_terminal(), @r"
  list_posts   PASS   0.41s
      log: logs/list_posts
  not_found    FAIL   0.12s
      Unexpected status code: GET invalidposts (expected 404, got 200)
      log: logs/not_found
  delete_post  ERROR  0.01s
      HTTP error: connection refused
      log: logs/delete_post

FAIL: 1 failed; 1 errored (connection/transport)
  Scenarios: 3 total, 1 passed, 1 failed, 1 errored
  Exit code: 1
");
    }

    #[test]
    fn schema_generation_produces_valid_json() {
        let schema = generate_schema();
        let parsed: serde_json::Value = serde_json::from_str(&schema).unwrap();
        assert_eq!(
            parsed.get("title").and_then(|v| v.as_str()),
            Some("RunReport")
        );
    }
}
