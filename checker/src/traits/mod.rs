//!
//! Traits Module
//!
//! Core traits used across the checker for extensibility.
//!
//! - [`parser`]: the generic trait for turning submitted text into typed structures.

pub mod parser;
