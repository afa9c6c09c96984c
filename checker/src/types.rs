//! # Types Module
//!
//! Core records exchanged between the engine and its callers: the per-node
//! [`OutcomeComponent`], the final [`ClassificationState`], and the
//! [`Submission`] identity handed in by the task layer.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// How the delivery layer should present `renderer_data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Renderer {
    Text,
}

/// Outcome record for one evaluated predicate node.
///
/// `component_number` lines up with the pre-order position of the node in the
/// instruction tree that was shown to the student, so the UI can link each
/// component to the `instruction-N` anchor it explains. Only the synthetic notice
/// prepended to undecided results has no number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeComponent {
    pub component_number: Option<u32>,
    pub outcome: Option<bool>,
    pub desired_outcome: Option<bool>,
    /// `None` when the node behaved as desired.
    pub renderer: Option<Renderer>,
    pub renderer_data: Option<String>,
    /// False only when this mismatch was not absorbed by an enclosing composite.
    pub acceptable_to_ancestor: bool,
}

impl OutcomeComponent {
    /// Component for an evaluated node. `explanation` is only given on mismatch.
    pub fn evaluated(
        component_number: u32,
        outcome: bool,
        desired_outcome: bool,
        explanation: Option<String>,
    ) -> Self {
        Self {
            component_number: Some(component_number),
            outcome: Some(outcome),
            desired_outcome: Some(desired_outcome),
            renderer: explanation.as_ref().map(|_| Renderer::Text),
            renderer_data: explanation,
            acceptable_to_ancestor: outcome == desired_outcome,
        }
    }

    /// Unnumbered explanatory component that is not tied to any predicate.
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            component_number: None,
            outcome: None,
            desired_outcome: None,
            renderer: Some(Renderer::Text),
            renderer_data: Some(text.into()),
            acceptable_to_ancestor: false,
        }
    }

    pub fn matches_desired(&self) -> bool {
        self.outcome.is_some() && self.outcome == self.desired_outcome
    }
}

/// Final classification of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationState {
    Refused,
    Accepted,
    /// Neither the refusing nor the accepting predicate held.
    Undecided,
    /// Automatic grading could not run to completion.
    InconclusiveTechnical,
}

impl ClassificationState {
    /// Text shown to the student once the result is delivered.
    pub fn student_message(self) -> &'static str {
        match self {
            ClassificationState::Accepted => "Je oefening is aanvaard.",
            ClassificationState::Refused => {
                "Je oefening is geweigerd. Inspecteer de gemarkeerde technische vereisten. \
                 Contacteer zo nodig de lector nadat je dit hebt gedaan."
            }
            ClassificationState::Undecided => {
                "Je oefening is voorlopig aanvaard. Het systeem heeft ze nog niet leren herkennen \
                 als juist of fout. Je mag voorlopig verder en de lector zal je oefening met de \
                 hand nakijken."
            }
            ClassificationState::InconclusiveTechnical => {
                "Het systeem kon je oefening niet automatisch controleren. De lector wordt \
                 verwittigd."
            }
        }
    }

    pub fn show_contact_button(self) -> bool {
        !matches!(
            self,
            ClassificationState::Accepted | ClassificationState::Undecided
        )
    }

    /// Whether an instructor has to look at the submission by hand.
    pub fn needs_review(self) -> bool {
        matches!(
            self,
            ClassificationState::Undecided | ClassificationState::InconclusiveTechnical
        )
    }
}

/// A submission as known to the task layer.
///
/// The engine only reads `content_uid`; `checksum` and `state` are filled in
/// by the grader for the caller to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub content_uid: String,
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default)]
    pub state: Option<ClassificationState>,
}

impl Submission {
    pub fn new(content_uid: impl Into<String>) -> Self {
        Self {
            content_uid: content_uid.into(),
            checksum: None,
            state: None,
        }
    }
}

/// Read-only inputs of one evaluation.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    /// Exercise identifier; default file names derive from it.
    pub exercise: &'a str,
    /// Directory holding the checked-out submission.
    pub artifact_root: &'a Path,
}

impl<'a> CheckContext<'a> {
    pub fn new(exercise: &'a str, artifact_root: &'a Path) -> Self {
        Self {
            exercise,
            artifact_root,
        }
    }
}
