//! Scenario execution: fixture → logger → request → log → check

use std::path::PathBuf;
use std::time::Instant;

use postcheck_core::{AssertionFailure, Config, Outcome, RunReport, ScenarioResult, TestLogger};

use crate::client::HttpClient;
use crate::scenarios::Scenario;

/// Runs scenarios against one configured API
pub struct Runner {
    config: Config,
    client: HttpClient,
}

impl Runner {
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn from_config(config: &Config) -> Result<Self, RunnerError> {
        Ok(Self {
            client: HttpClient::new(config.timeout())?,
            config: config.clone(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run scenarios in order. A failing scenario never stops the rest.
    pub fn run(&self, scenarios: &[Scenario]) -> RunReport {
        let results = scenarios.iter().map(|s| self.run_scenario(s)).collect();
        RunReport::new(self.config.base_url.clone(), results)
    }

    /// Run one scenario and classify how it ended.
    pub fn run_scenario(&self, scenario: &Scenario) -> ScenarioResult {
        let start = Instant::now();
        let mut log_file = None;

        let outcome = match self.execute(scenario, &mut log_file) {
            Ok(Ok(())) => Outcome::Passed,
            Ok(Err(failure)) => Outcome::Failed(failure),
            Err(e) => Outcome::Errored(e.to_string()),
        };
        let duration_secs = start.elapsed().as_secs_f64();

        tracing::debug!(
            scenario = scenario.name,
            outcome = outcome.label(),
            duration_secs,
            "scenario finished"
        );

        ScenarioResult {
            scenario: scenario.name.to_string(),
            outcome,
            duration_secs,
            log_file,
        }
    }

    /// Outer error: the exchange could not happen. Inner error: it happened
    /// and an expectation failed.
    fn execute(
        &self,
        scenario: &Scenario,
        log_file: &mut Option<PathBuf>,
    ) -> Result<Result<(), AssertionFailure>, RunnerError> {
        let url = self.config.url(scenario.path);

        let logger = TestLogger::create(scenario.name, &self.config.log_dir)
            .map_err(|e| RunnerError::Logger(e.to_string()))?;
        *log_file = Some(logger.path().to_path_buf());

        let mut headers = Vec::new();
        if scenario.send_json_header {
            headers.push(("Content-Type", self.config.json_content_type.as_str()));
        }

        let body = scenario
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| RunnerError::Serialize(e.to_string()))?;

        let exchange = self
            .client
            .send(scenario.method.clone(), &url, &headers, body)
            .inspect_err(|e| logger.warn(&format!("Request to {url} failed: {e}")))?;
        logger.log_exchange(&exchange);

        let verdict = (scenario.check)(&exchange);
        if let Err(failure) = &verdict {
            logger.warn(&format!("Assertion failed: {failure}"));
        }
        Ok(verdict)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Log file error: {0}")]
    Logger(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
}
