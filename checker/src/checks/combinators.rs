//! AND / OR over an ordered list of child predicates.
//!
//! Both connectives share one implementation parameterised by [`Connective`];
//! the only differences are the identity element, the short-circuit value and
//! the marker label.

use crate::checks::{CheckingPredicate, PredicateAnalysis};
use crate::error::CheckerError;
use crate::instructions::{InstructionTree, Label};
use crate::types::{CheckContext, OutcomeComponent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Connective {
    And,
    Or,
}

impl Connective {
    /// Result over zero children.
    fn identity(self) -> bool {
        matches!(self, Connective::And)
    }

    /// A child producing this value decides the aggregate.
    fn absorbing(self) -> bool {
        !self.identity()
    }

    fn dual(self) -> Self {
        match self {
            Connective::And => Connective::Or,
            Connective::Or => Connective::And,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }

    fn marker(self) -> Label {
        match self {
            Connective::And => Label::AllOf,
            Connective::Or => Label::AtLeastOne,
        }
    }
}

fn py_bool(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

/// Marker followed by each child's tree. The negative form swaps the marker
/// and negates every child.
pub(crate) fn instructions(
    connective: Connective,
    children: &[CheckingPredicate],
    exercise: Option<&str>,
    negative: bool,
) -> InstructionTree {
    let (connective, subtrees) = if negative {
        (
            connective.dual(),
            children
                .iter()
                .map(|c| c.negative_instructions(exercise))
                .collect(),
        )
    } else {
        (
            connective,
            children.iter().map(|c| c.instructions(exercise)).collect(),
        )
    };
    InstructionTree::node(connective.marker(), subtrees)
}

pub(crate) fn evaluate(
    connective: Connective,
    children: &[CheckingPredicate],
    ctx: &CheckContext<'_>,
) -> Result<bool, CheckerError> {
    for child in children {
        if child.evaluate(ctx)? == connective.absorbing() {
            return Ok(connective.absorbing());
        }
    }
    Ok(connective.identity())
}

/// Explanation for a composite that did not produce `desired_outcome`.
///
/// Under a negation the student was shown the dual connective with negated
/// values, so the message is phrased that way too.
fn mismatch_message(
    connective: Connective,
    desired_outcome: bool,
    outcome: bool,
    parent_is_negation: bool,
) -> String {
    let (connective, desired_outcome, outcome) = if parent_is_negation {
        (connective.dual(), !desired_outcome, !outcome)
    } else {
        (connective, desired_outcome, outcome)
    };
    format!(
        "{} moest {} leveren, leverde {}",
        connective.name(),
        py_bool(desired_outcome),
        py_bool(outcome)
    )
}

/// Numbered walk of a composite.
///
/// The composite takes `init_check_number` for itself, children follow. Once
/// the aggregate is decided the remaining children are not evaluated but still
/// consume their instruction width, so numbers after this node stay aligned
/// with the instruction tree.
pub(crate) fn check_submission(
    connective: Connective,
    children: &[CheckingPredicate],
    ctx: &CheckContext<'_>,
    desired_outcome: bool,
    init_check_number: u32,
    parent_is_negation: bool,
) -> Result<(PredicateAnalysis, u32), CheckerError> {
    let mut outcome = connective.identity();
    let mut next = init_check_number + 1;
    let mut child_components = Vec::new();

    for child in children {
        if outcome == connective.absorbing() {
            next += child.width(Some(ctx.exercise));
            continue;
        }
        let (analysis, after) = child.check_submission(ctx, desired_outcome, next, false)?;
        next = after;
        outcome = analysis.outcome;
        child_components.extend(analysis.components);
    }

    let matched = outcome == desired_outcome;
    if matched {
        // A composite that delivered what was asked absorbs its children's mismatches.
        for c in &mut child_components {
            c.acceptable_to_ancestor = true;
        }
    }
    let explanation =
        (!matched).then(|| mismatch_message(connective, desired_outcome, outcome, parent_is_negation));

    let mut components = Vec::with_capacity(child_components.len() + 1);
    components.push(OutcomeComponent::evaluated(
        init_check_number,
        outcome,
        desired_outcome,
        explanation,
    ));
    components.extend(child_components);

    Ok((PredicateAnalysis { outcome, components }, next))
}
