//! Report handed to the delivery layer once a submission is classified.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::strategy::StrategyOutcome;
use crate::types::{ClassificationState, OutcomeComponent, Submission};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub state: ClassificationState,
    /// Student-facing summary of `state`.
    pub message: String,
    pub show_contact_button: bool,
    pub components: Vec<OutcomeComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    /// Every submission of the batch, as stamped by the grader.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submissions: Vec<Submission>,
    /// RFC 3339, UTC.
    pub checked_at: String,
}

impl CheckReport {
    pub fn new(outcome: StrategyOutcome, checksum: Option<String>) -> Self {
        let StrategyOutcome { state, components } = outcome;
        Self {
            state,
            message: state.student_message().to_string(),
            show_contact_button: state.show_contact_button(),
            components,
            checksum,
            submissions: Vec::new(),
            checked_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn with_submissions(mut self, submissions: Vec<Submission>) -> Self {
        self.submissions = submissions;
        self
    }

    /// Components a student should look at: mismatches that decided the result.
    pub fn highlighted(&self) -> impl Iterator<Item = &OutcomeComponent> {
        self.components
            .iter()
            .filter(|c| c.component_number.is_some() && !c.acceptable_to_ancestor)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
