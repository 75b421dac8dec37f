//! Verdict module - assertion failures, scenario outcomes, run report

mod assertion;
mod report;

pub use assertion::{AssertionFailure, AssertionKind};
pub use report::{Outcome, RunReport, ScenarioResult, VerdictStatus, generate_schema};
