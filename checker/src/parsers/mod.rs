//! # Parsers
//!
//! Parsers for the structured files students submit.
//!
//! - [`multiple_choice`]: the `.mc` answer-sheet format.

pub mod multiple_choice;
