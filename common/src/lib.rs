//! Process-wide plumbing shared by every binary that embeds the checker:
//! environment-driven configuration and tracing initialisation.

pub mod config;
pub mod logger;
