//! Checker Error Types
//!
//! [`CheckerError`] covers the faults that can interrupt an evaluation or the
//! loading of exercise definitions. Expected negative results (a missing file,
//! a multiple-choice sheet that does not parse, wrong answers) are *not* errors:
//! they are ordinary `false` outcomes of the corresponding check.
//!
//! Errors raised inside a predicate tree propagate unchanged up to
//! [`Strategy::check_submission`](crate::strategy::Strategy::check_submission),
//! which is the single place where they are contained.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckerError {
    /// A file under the artifact root (or a definition file) could not be read.
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Instructor-authored model data is inconsistent.
    #[error("malformed model data: {0}")]
    MalformedModel(String),

    /// No exercise with this uid is registered in the catalog.
    #[error("unknown exercise '{0}'")]
    UnknownExercise(String),

    /// The exercise catalog is structurally invalid (e.g. duplicate uids).
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// A definition file is not valid JSON for the expected schema.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CheckerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CheckerError::Io {
            path: path.into(),
            source,
        }
    }
}
