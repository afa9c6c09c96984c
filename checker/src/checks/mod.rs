//! # Checks Module
//!
//! The predicate algebra a [`Strategy`](crate::strategy::Strategy) is built
//! from. A [`CheckingPredicate`] is a closed tree of atomic checks (file
//! existence, multiple-choice format and answers) joined by negation,
//! conjunction and disjunction.
//!
//! Every predicate can do three things:
//!
//! - describe itself as an [`InstructionTree`], positively or negatively,
//!   without touching a submission;
//! - [`evaluate`](CheckingPredicate::evaluate) to a plain boolean;
//! - [`check_submission`](CheckingPredicate::check_submission), the numbered
//!   walk that produces one [`OutcomeComponent`] per instruction node.
//!
//! The numbering of the last two always agrees with the first: a node with an
//! instruction tree of width `w` consumes exactly `w` component numbers,
//! whether or not it was actually evaluated.
//!
//! Predicates compare by value, which is what the allowed-checks gate of a
//! [`BatchType`](crate::catalog::BatchType) relies on.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CheckerError;
use crate::instructions::InstructionTree;
use crate::types::{CheckContext, OutcomeComponent};

mod combinators;
pub mod file_exists;
pub mod multiple_choice;

use combinators::Connective;
pub use file_exists::FileExistsCheck;
pub use multiple_choice::McModel;

/// Result of a numbered walk over one predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateAnalysis {
    pub outcome: bool,
    /// Depth-first, the node's own component first.
    pub components: Vec<OutcomeComponent>,
}

impl PredicateAnalysis {
    pub fn single(component: OutcomeComponent) -> Self {
        Self {
            outcome: component.outcome.unwrap_or_default(),
            components: vec![component],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckingPredicate {
    /// Always holds.
    #[default]
    True,
    /// Zero-width: its instructions are the inner predicate's negated ones.
    Negation { inner: Box<CheckingPredicate> },
    Conjunctive { children: Vec<CheckingPredicate> },
    Disjunctive { children: Vec<CheckingPredicate> },
    FileExists(FileExistsCheck),
    /// `<exercise>.mc` parses without syntax errors.
    MultipleChoiceFormat,
    /// `<exercise>.mc` marks exactly the correct answers of `model`.
    MultipleChoiceAnswer { model: Arc<McModel> },
}

pub fn negation(inner: CheckingPredicate) -> CheckingPredicate {
    CheckingPredicate::Negation {
        inner: Box::new(inner),
    }
}

pub fn all_of(children: impl IntoIterator<Item = CheckingPredicate>) -> CheckingPredicate {
    CheckingPredicate::Conjunctive {
        children: children.into_iter().collect(),
    }
}

pub fn any_of(children: impl IntoIterator<Item = CheckingPredicate>) -> CheckingPredicate {
    CheckingPredicate::Disjunctive {
        children: children.into_iter().collect(),
    }
}

pub fn file_exists(name: Option<&str>, extension: Option<&str>) -> CheckingPredicate {
    CheckingPredicate::FileExists(FileExistsCheck::new(name, extension))
}

pub fn multiple_choice_answers(model: McModel) -> CheckingPredicate {
    CheckingPredicate::MultipleChoiceAnswer {
        model: Arc::new(model),
    }
}

impl CheckingPredicate {
    /// When this predicate holds, phrased for the student.
    pub fn instructions(&self, exercise: Option<&str>) -> InstructionTree {
        match self {
            CheckingPredicate::True => InstructionTree::leaf("True"),
            CheckingPredicate::Negation { inner } => inner.negative_instructions(exercise),
            CheckingPredicate::Conjunctive { children } => {
                combinators::instructions(Connective::And, children, exercise, false)
            }
            CheckingPredicate::Disjunctive { children } => {
                combinators::instructions(Connective::Or, children, exercise, false)
            }
            CheckingPredicate::FileExists(check) => check.instructions(exercise),
            CheckingPredicate::MultipleChoiceFormat => multiple_choice::format_instructions(),
            CheckingPredicate::MultipleChoiceAnswer { .. } => {
                multiple_choice::answer_instructions()
            }
        }
    }

    /// When this predicate does not hold. Same shape as [`Self::instructions`].
    pub fn negative_instructions(&self, exercise: Option<&str>) -> InstructionTree {
        match self {
            CheckingPredicate::True => InstructionTree::leaf("False"),
            CheckingPredicate::Negation { inner } => inner.instructions(exercise),
            CheckingPredicate::Conjunctive { children } => {
                combinators::instructions(Connective::And, children, exercise, true)
            }
            CheckingPredicate::Disjunctive { children } => {
                combinators::instructions(Connective::Or, children, exercise, true)
            }
            CheckingPredicate::FileExists(check) => check.negative_instructions(exercise),
            CheckingPredicate::MultipleChoiceFormat => {
                multiple_choice::negative_format_instructions()
            }
            CheckingPredicate::MultipleChoiceAnswer { .. } => {
                multiple_choice::negative_answer_instructions()
            }
        }
    }

    /// Component numbers consumed by a numbered walk over this predicate.
    pub fn width(&self, exercise: Option<&str>) -> u32 {
        self.instructions(exercise).width()
    }

    /// Plain evaluation, short-circuiting, without components.
    pub fn evaluate(&self, ctx: &CheckContext<'_>) -> Result<bool, CheckerError> {
        match self {
            CheckingPredicate::True => Ok(true),
            CheckingPredicate::Negation { inner } => Ok(!inner.evaluate(ctx)?),
            CheckingPredicate::Conjunctive { children } => {
                combinators::evaluate(Connective::And, children, ctx)
            }
            CheckingPredicate::Disjunctive { children } => {
                combinators::evaluate(Connective::Or, children, ctx)
            }
            CheckingPredicate::FileExists(check) => check.evaluate(ctx),
            CheckingPredicate::MultipleChoiceFormat => multiple_choice::evaluate_format(ctx),
            CheckingPredicate::MultipleChoiceAnswer { model } => {
                Ok(multiple_choice::answer_errors(ctx, model)?.is_empty())
            }
        }
    }

    /// Numbered walk starting at `init_check_number`.
    ///
    /// `desired_outcome` is what the caller hopes this predicate yields; a
    /// component whose outcome differs carries an explanation. Returns the
    /// analysis and the next free component number.
    pub fn check_submission(
        &self,
        ctx: &CheckContext<'_>,
        desired_outcome: bool,
        init_check_number: u32,
        parent_is_negation: bool,
    ) -> Result<(PredicateAnalysis, u32), CheckerError> {
        match self {
            CheckingPredicate::True => {
                let explanation =
                    (!desired_outcome).then(|| "aan false kan nooit voldaan zijn".to_string());
                Ok((
                    PredicateAnalysis::single(OutcomeComponent::evaluated(
                        init_check_number,
                        true,
                        desired_outcome,
                        explanation,
                    )),
                    init_check_number + 1,
                ))
            }
            CheckingPredicate::Negation { inner } => {
                // Two negations cancel, so the inner phrasing is that of the outer tree again.
                let (analysis, next) = inner.check_submission(
                    ctx,
                    !desired_outcome,
                    init_check_number,
                    !parent_is_negation,
                )?;
                Ok((
                    PredicateAnalysis {
                        outcome: !analysis.outcome,
                        components: analysis.components,
                    },
                    next,
                ))
            }
            CheckingPredicate::Conjunctive { children } => combinators::check_submission(
                Connective::And,
                children,
                ctx,
                desired_outcome,
                init_check_number,
                parent_is_negation,
            ),
            CheckingPredicate::Disjunctive { children } => combinators::check_submission(
                Connective::Or,
                children,
                ctx,
                desired_outcome,
                init_check_number,
                parent_is_negation,
            ),
            CheckingPredicate::FileExists(check) => {
                check.check_submission(ctx, desired_outcome, init_check_number)
            }
            CheckingPredicate::MultipleChoiceFormat => {
                multiple_choice::check_format(ctx, desired_outcome, init_check_number)
            }
            CheckingPredicate::MultipleChoiceAnswer { model } => multiple_choice::check_answer_sheet(
                ctx,
                model,
                desired_outcome,
                init_check_number,
            ),
        }
    }

    /// Artifact files this predicate reads for `exercise`.
    pub fn mentioned_files(&self, exercise: &str) -> BTreeSet<String> {
        match self {
            CheckingPredicate::True => BTreeSet::new(),
            CheckingPredicate::Negation { inner } => inner.mentioned_files(exercise),
            CheckingPredicate::Conjunctive { children }
            | CheckingPredicate::Disjunctive { children } => children
                .iter()
                .flat_map(|c| c.mentioned_files(exercise))
                .collect(),
            CheckingPredicate::FileExists(check) => {
                BTreeSet::from([check.entry(Some(exercise))])
            }
            CheckingPredicate::MultipleChoiceFormat
            | CheckingPredicate::MultipleChoiceAnswer { .. } => {
                BTreeSet::from([format!("{exercise}.mc")])
            }
        }
    }

    /// Leaf checks, left to right.
    pub fn atomic_checks(&self) -> Vec<&CheckingPredicate> {
        let mut out = Vec::new();
        self.collect_atomic(&mut out);
        out
    }

    fn collect_atomic<'a>(&'a self, out: &mut Vec<&'a CheckingPredicate>) {
        match self {
            CheckingPredicate::Negation { inner } => inner.collect_atomic(out),
            CheckingPredicate::Conjunctive { children }
            | CheckingPredicate::Disjunctive { children } => {
                for child in children {
                    child.collect_atomic(out);
                }
            }
            _ => out.push(self),
        }
    }

    /// Fails on a multiple-choice model that cannot be answered with letters.
    pub fn validate(&self) -> Result<(), CheckerError> {
        match self {
            CheckingPredicate::Negation { inner } => inner.validate(),
            CheckingPredicate::Conjunctive { children }
            | CheckingPredicate::Disjunctive { children } => {
                children.iter().try_for_each(CheckingPredicate::validate)
            }
            CheckingPredicate::MultipleChoiceAnswer { model } => model.validate(),
            _ => Ok(()),
        }
    }
}
