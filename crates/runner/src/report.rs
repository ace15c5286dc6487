//! Run reports.
//!
//! Every scenario execution produces a [`ScenarioReport`]; a full invocation
//! aggregates them into a [`RunReport`] with a run id and timestamps. All
//! types serialize to JSON for machine-readable CLI output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use fastarmor_core::error::FastarmorError;

/// Outcome class of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// Expected marker found in the armor ccache.
    Passed,
    /// Environment or precondition failure before the artifact check.
    SetupFailed,
    /// SSH connect/auth/exec fault.
    TransportFailed,
    /// All steps ran but the ccache did not carry the expected marker.
    AssertionFailed,
}

impl ScenarioStatus {
    /// Classifies an engine error into a report status.
    ///
    /// Config and I/O errors surface here only when they strike mid-run
    /// (e.g. the conf becomes unreadable); they count as setup failures.
    pub fn from_error(err: &FastarmorError) -> Self {
        match err {
            FastarmorError::Assertion(_) => Self::AssertionFailed,
            FastarmorError::Transport(_) => Self::TransportFailed,
            FastarmorError::Setup(_) | FastarmorError::Config(_) | FastarmorError::Io(_) => {
                Self::SetupFailed
            }
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Result of one scenario execution.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Scenario name from the table.
    pub scenario: String,
    /// Outcome class.
    pub status: ScenarioStatus,
    /// Error message when the scenario did not pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Wall-clock duration of the scenario.
    pub duration_ms: u64,
}

impl ScenarioReport {
    pub fn passed(scenario: &str, duration_ms: u64) -> Self {
        Self {
            scenario: scenario.to_owned(),
            status: ScenarioStatus::Passed,
            detail: None,
            duration_ms,
        }
    }

    pub fn failed(scenario: &str, err: &FastarmorError, duration_ms: u64) -> Self {
        Self {
            scenario: scenario.to_owned(),
            status: ScenarioStatus::from_error(err),
            detail: Some(err.to_string()),
            duration_ms,
        }
    }
}

/// Aggregate of one `fastarmor run` invocation.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique id for this invocation.
    pub run_id: Uuid,
    /// UTC start time.
    pub started_at: DateTime<Utc>,
    /// Per-scenario results, in execution order.
    pub reports: Vec<ScenarioReport>,
    /// Number of passed scenarios.
    pub passed: usize,
    /// Number of failed scenarios.
    pub failed: usize,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            reports: Vec::new(),
            passed: 0,
            failed: 0,
        }
    }

    pub fn push(&mut self, report: ScenarioReport) {
        if report.status.is_passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.reports.push(report);
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Worst failure class in this run, if any.
    ///
    /// Setup and transport failures take precedence over assertion failures
    /// when choosing an exit code: they mean the verdict is unknown, not
    /// that the feature regressed.
    pub fn worst_failure(&self) -> Option<ScenarioStatus> {
        let statuses: Vec<ScenarioStatus> = self.reports.iter().map(|r| r.status).collect();
        for candidate in [
            ScenarioStatus::TransportFailed,
            ScenarioStatus::SetupFailed,
            ScenarioStatus::AssertionFailed,
        ] {
            if statuses.contains(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
