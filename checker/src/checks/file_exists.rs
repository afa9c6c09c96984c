//! Existence of a file directly under the artifact root.

use serde::{Deserialize, Serialize};

use crate::checks::PredicateAnalysis;
use crate::error::CheckerError;
use crate::instructions::InstructionTree;
use crate::types::{CheckContext, OutcomeComponent};

/// Checks that `<name>[.<extension>]` exists at the top of the submission.
///
/// Without a `name` the exercise identifier is used, so
/// `FileExistsCheck { name: None, extension: Some("mc") }` looks for
/// `<exercise>.mc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileExistsCheck {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
}

impl FileExistsCheck {
    pub fn new(name: Option<&str>, extension: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_owned),
            extension: extension.map(str::to_owned),
        }
    }

    /// Expected file name for `exercise`.
    pub fn entry(&self, exercise: Option<&str>) -> String {
        let stem = self.name.as_deref().or(exercise).unwrap_or_default();
        match self.extension.as_deref() {
            Some(ext) if !ext.is_empty() => format!("{stem}.{ext}"),
            _ => stem.to_string(),
        }
    }

    pub fn instructions(&self, exercise: Option<&str>) -> InstructionTree {
        InstructionTree::leaf(format!(
            "Je hebt een bestand met naam {}",
            self.entry(exercise)
        ))
    }

    pub fn negative_instructions(&self, exercise: Option<&str>) -> InstructionTree {
        InstructionTree::leaf(format!(
            "Je hebt geen bestand met naam {}",
            self.entry(exercise)
        ))
    }

    pub fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<bool, CheckerError> {
        let path = ctx.artifact_root.join(self.entry(Some(ctx.exercise)));
        path.try_exists().map_err(|e| CheckerError::io(path, e))
    }

    pub fn check_submission(
        &self,
        ctx: &CheckContext<'_>,
        desired_outcome: bool,
        init_check_number: u32,
    ) -> Result<(PredicateAnalysis, u32), CheckerError> {
        let entry = self.entry(Some(ctx.exercise));
        let outcome = self.evaluate(ctx)?;
        let explanation = match (outcome, desired_outcome) {
            (true, false) => Some(format!("{entry} mag niet bestaan en bestaat toch")),
            (false, true) => Some(format!("{entry} moet bestaan, maar bestaat niet")),
            _ => None,
        };
        Ok((
            PredicateAnalysis::single(OutcomeComponent::evaluated(
                init_check_number,
                outcome,
                desired_outcome,
                explanation,
            )),
            init_check_number + 1,
        ))
    }
}
