//! Parser Trait
//!
//! This module defines the [`Parser`] trait, a generic interface for turning raw
//! submission content into strongly-typed structures.
//!
//! # Example
//!
//! ```rust
//! use checker::traits::parser::Parser;
//!
//! struct LineCounter;
//!
//! impl<'a> Parser<&'a str, usize> for LineCounter {
//!     type Error = std::convert::Infallible;
//!
//!     fn parse(&self, input: &'a str) -> Result<usize, Self::Error> {
//!         Ok(input.lines().count())
//!     }
//! }
//!
//! assert_eq!(LineCounter.parse("a\nb").unwrap(), 2);
//! ```

/// A generic trait for parsing input into a strongly-typed Rust structure.
///
/// # Type Parameters
///
/// * `Input` - The input type to be parsed.
/// * `Output` - The output type produced by the parser.
pub trait Parser<Input, Output> {
    /// What a failed parse reports.
    type Error;

    /// Parse an input value into the target type.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if the input does not conform to the expected format.
    fn parse(&self, input: Input) -> Result<Output, Self::Error>;
}
