//! # Checker Library
//!
//! Decision engine that classifies student submissions as refused, accepted or
//! undecided, and explains why in a numbered trace that lines up with the
//! instructions shown before submitting.
//!
//! ## Key Concepts
//! - **CheckingPredicate**: a tree of atomic checks joined by negation, AND and OR
//!   ([`checks`]).
//! - **Instruction tree**: what a predicate demands, phrased for students, with
//!   negation pushed down by De Morgan ([`instructions`]).
//! - **Strategy**: the refusing and accepting predicate of one exercise
//!   ([`strategy`]).
//! - **OutcomeComponent**: one numbered record per evaluated node ([`types`]).
//! - **Catalog and grader**: exercise definitions and the task layer that checks
//!   all submissions of a commit ([`catalog`], [`grader`]).

pub mod catalog;
pub mod checks;
pub mod error;
pub mod grader;
pub mod instructions;
pub mod parsers;
pub mod render;
pub mod report;
pub mod strategy;
pub mod traits;
pub mod types;

pub use checks::{CheckingPredicate, all_of, any_of, file_exists, negation};
pub use error::CheckerError;
pub use strategy::{Strategy, StrategyOutcome};
pub use types::{ClassificationState, OutcomeComponent, Submission};
