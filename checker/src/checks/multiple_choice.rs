//! Multiple-choice checks: sheet format and answer correctness.
//!
//! Both read `<exercise>.mc` from the artifact root. A sheet that does not
//! parse is an ordinary negative outcome; a sheet that cannot be *read* is a
//! fault and propagates as [`CheckerError::Io`].

use std::fs;

use serde::{Deserialize, Serialize};

use crate::checks::PredicateAnalysis;
use crate::error::CheckerError;
use crate::instructions::InstructionTree;
use crate::parsers::multiple_choice::{AnswerSheet, MultipleChoiceParser};
use crate::traits::parser::Parser;
use crate::types::{CheckContext, OutcomeComponent};

/// Letters address answers `a`..`z`, so a question holds at most this many.
pub const MAX_ANSWERS: usize = 26;

/// One answer option of a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct McAnswer {
    pub text: String,
    pub correct: bool,
    /// Shown when the student gets this option wrong.
    #[serde(default)]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct McQuestion {
    pub text: String,
    pub answers: Vec<McAnswer>,
}

/// Instructor-authored model answers, question 1 first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct McModel(pub Vec<McQuestion>);

impl McModel {
    pub fn questions(&self) -> &[McQuestion] {
        &self.0
    }

    /// Question `number`, counted from 1.
    pub fn question(&self, number: u32) -> Option<&McQuestion> {
        let idx = usize::try_from(number).ok()?.checked_sub(1)?;
        self.0.get(idx)
    }

    /// Rejects questions that cannot be answered with single letters.
    pub fn validate(&self) -> Result<(), CheckerError> {
        for (i, q) in self.0.iter().enumerate() {
            if q.answers.is_empty() {
                return Err(CheckerError::MalformedModel(format!(
                    "question {} has no answers",
                    i + 1
                )));
            }
            if q.answers.len() > MAX_ANSWERS {
                return Err(CheckerError::MalformedModel(format!(
                    "question {} has {} answers, at most {MAX_ANSWERS} can be addressed",
                    i + 1,
                    q.answers.len()
                )));
            }
        }
        Ok(())
    }
}

/// 1-based answer index of a letter, case-insensitive.
fn answer_index(letter: char) -> usize {
    (letter.to_ascii_lowercase() as u8 - b'a') as usize + 1
}

/// Compare a parsed sheet against the model and list every problem found.
///
/// Numbering must run 1, 2, 3, ...; a jump is reported but the walk carries on
/// from the number actually written. For each known question, every correct
/// answer that was left out and every wrong answer that was given contributes
/// its hint. Options without a hint contribute nothing.
pub fn check_answers(sheet: &AnswerSheet, model: &McModel) -> Vec<String> {
    let mut errors = Vec::new();
    let mut expected = 1u32;

    for entry in &sheet.entries {
        let number = entry.number;
        if number != expected {
            errors.push(format!(
                "Vraag {expected} werd verwacht op de plaats waar {number} voorkomt."
            ));
        }
        expected = number.saturating_add(1);

        let Some(question) = model.question(number) else {
            errors.push(format!(
                "Vraag {number} is geen geldige index. Er zijn {} vragen en deze worden geteld vanaf 1.",
                model.questions().len()
            ));
            continue;
        };

        let given: Vec<usize> = entry.letters.iter().map(|&l| answer_index(l)).collect();
        let correct: Vec<usize> = question
            .answers
            .iter()
            .enumerate()
            .filter(|(_, a)| a.correct)
            .map(|(i, _)| i + 1)
            .collect();

        // missing
        for idx in &correct {
            if !given.contains(idx) {
                if let Some(hint) = &question.answers[idx - 1].hint {
                    errors.push(format!("Vraag {number}: {hint}"));
                }
            }
        }

        // incorrect
        for (&idx, letter) in given.iter().zip(&entry.letters) {
            if correct.contains(&idx) {
                continue;
            }
            match question.answers.get(idx - 1) {
                Some(answer) => {
                    if let Some(hint) = &answer.hint {
                        errors.push(format!("Vraag {number}: {hint}"));
                    }
                }
                None => errors.push(format!(
                    "Vraag {number}: antwoord {} bestaat niet.",
                    letter.to_ascii_lowercase()
                )),
            }
        }
    }

    errors
}

fn read_sheet(ctx: &CheckContext<'_>) -> Result<String, CheckerError> {
    let path = ctx.artifact_root.join(format!("{}.mc", ctx.exercise));
    fs::read_to_string(&path).map_err(|e| CheckerError::io(path, e))
}

pub fn format_instructions() -> InstructionTree {
    InstructionTree::leaf("Je multiple choice bestand volgt <HET AFGESPROKEN FORMAAT>.")
}

pub fn negative_format_instructions() -> InstructionTree {
    InstructionTree::leaf("Je multiple choice bestand volgt <HET AFGESPROKEN FORMAAT> niet.")
}

pub fn answer_instructions() -> InstructionTree {
    InstructionTree::leaf("Je hebt alle correcte antwoorden per vraag aangeduid.")
}

pub fn negative_answer_instructions() -> InstructionTree {
    InstructionTree::leaf("Je hebt niet alle correcte antwoorden per vraag aangeduid.")
}

pub fn evaluate_format(ctx: &CheckContext<'_>) -> Result<bool, CheckerError> {
    let source = read_sheet(ctx)?;
    Ok(MultipleChoiceParser.parse(source.as_str()).is_ok())
}

/// Error list for the submitted sheet; empty means every answer is right.
pub fn answer_errors(ctx: &CheckContext<'_>, model: &McModel) -> Result<Vec<String>, CheckerError> {
    let source = read_sheet(ctx)?;
    let parsed = MultipleChoiceParser.parse_recovering(&source);
    Ok(check_answers(&parsed.sheet, model))
}

pub fn check_format(
    ctx: &CheckContext<'_>,
    desired_outcome: bool,
    init_check_number: u32,
) -> Result<(PredicateAnalysis, u32), CheckerError> {
    let outcome = evaluate_format(ctx)?;
    let explanation = match (outcome, desired_outcome) {
        (true, false) => Some(
            "Je multiple choice bestand volgt het afgesproken formaat en dat mag niet".to_string(),
        ),
        (false, true) => Some(
            "Je multiple choice bestand volgt het afgesproken formaat niet en dat moet juist wel"
                .to_string(),
        ),
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

pub fn check_answer_sheet(
    ctx: &CheckContext<'_>,
    model: &McModel,
    desired_outcome: bool,
    init_check_number: u32,
) -> Result<(PredicateAnalysis, u32), CheckerError> {
    let errors = answer_errors(ctx, model)?;
    let outcome = errors.is_empty();
    let explanation = match (outcome, desired_outcome) {
        (true, false) => Some("Je hebt geen enkel fout antwoord aangeduid.".to_string()),
        (false, true) => Some(
            std::iter::once("Je hebt volgende fouten:".to_string())
                .chain(errors)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
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
