//! Per-exercise classification: a refusing and an accepting predicate run in
//! sequence.
//!
//! This is the only place where faults raised by checks are contained. Below
//! this level every error propagates with `?`; here it is logged and turned
//! into [`ClassificationState::InconclusiveTechnical`].

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::checks::{CheckingPredicate, negation};
use crate::error::CheckerError;
use crate::instructions::StrategyInstructions;
use crate::types::{CheckContext, ClassificationState, OutcomeComponent, Submission};

/// Classification plus the components to show for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub state: ClassificationState,
    pub components: Vec<OutcomeComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    /// Holds when the submission must be refused.
    #[serde(default = "never")]
    pub refusing: CheckingPredicate,
    /// Holds when the submission may be accepted.
    #[serde(default = "never")]
    pub accepting: CheckingPredicate,
}

fn never() -> CheckingPredicate {
    negation(CheckingPredicate::True)
}

impl Default for Strategy {
    /// Neither refuses nor accepts, so every submission ends up undecided.
    fn default() -> Self {
        Self {
            refusing: never(),
            accepting: never(),
        }
    }
}

fn py_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

impl Strategy {
    pub fn new(refusing: CheckingPredicate, accepting: CheckingPredicate) -> Self {
        Self {
            refusing,
            accepting,
        }
    }

    /// Both condition trees, numbered the way [`Self::check_submission`]
    /// numbers its components.
    pub fn instructions(&self, exercise: &str) -> StrategyInstructions {
        StrategyInstructions {
            refusing: self.refusing.instructions(Some(exercise)),
            accepting: self.accepting.instructions(Some(exercise)),
        }
    }

    pub fn mentioned_files(&self, exercise: &str) -> BTreeSet<String> {
        let mut files = self.refusing.mentioned_files(exercise);
        files.extend(self.accepting.mentioned_files(exercise));
        files
    }

    /// Leaf checks of both predicates, refusing first.
    pub fn atomic_checks(&self) -> Vec<&CheckingPredicate> {
        let mut checks = self.refusing.atomic_checks();
        checks.extend(self.accepting.atomic_checks());
        checks
    }

    pub fn validate(&self) -> Result<(), CheckerError> {
        self.refusing.validate()?;
        self.accepting.validate()
    }

    /// Classify `submission`, whose files are checked out under `artifact_root`.
    ///
    /// Refusing is tried first, desired to be false. If it holds the accepting
    /// predicate is never evaluated. Otherwise accepting runs, numbered on from
    /// where refusing stopped. When neither holds the result is undecided and
    /// both traces are returned behind a notice.
    pub fn check_submission(
        &self,
        submission: &Submission,
        artifact_root: &Path,
    ) -> StrategyOutcome {
        let ctx = CheckContext::new(&submission.content_uid, artifact_root);
        match self.classify(&ctx) {
            Ok(outcome) => {
                debug!(
                    exercise = %submission.content_uid,
                    state = ?outcome.state,
                    components = outcome.components.len(),
                    "Submission classified"
                );
                outcome
            }
            Err(e) => {
                error!(
                    exercise = %submission.content_uid,
                    artifact_root = %artifact_root.display(),
                    "Failed to check submission: {}",
                    e
                );
                StrategyOutcome {
                    state: ClassificationState::InconclusiveTechnical,
                    components: Vec::new(),
                }
            }
        }
    }

    fn classify(&self, ctx: &CheckContext<'_>) -> Result<StrategyOutcome, CheckerError> {
        let (refusing, next) = self.refusing.check_submission(ctx, false, 1, false)?;
        if refusing.outcome {
            return Ok(StrategyOutcome {
                state: ClassificationState::Refused,
                components: refusing.components,
            });
        }

        let (accepting, _) = self.accepting.check_submission(ctx, true, next, false)?;
        if accepting.outcome {
            return Ok(StrategyOutcome {
                state: ClassificationState::Accepted,
                components: accepting.components,
            });
        }

        warn!(
            exercise = %ctx.exercise,
            "Submission could not be decided: refusing was {}, accepting was {}",
            refusing.outcome,
            accepting.outcome
        );
        let mut components =
            Vec::with_capacity(1 + refusing.components.len() + accepting.components.len());
        components.push(OutcomeComponent::notice(format!(
            "Het systeem kan niet automatisch bepalen of je inzending klopt. De lector wordt verwittigd. Weigering was {} en aanvaarding was {}",
            py_bool(refusing.outcome),
            py_bool(accepting.outcome)
        )));
        components.extend(refusing.components);
        components.extend(accepting.components);
        Ok(StrategyOutcome {
            state: ClassificationState::Undecided,
            components,
        })
    }
}
