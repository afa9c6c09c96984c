//! Exercises of a course and the batch types that may re-check them.
//!
//! A catalog is authored as JSON:
//!
//! ```json
//! {
//!   "exercises": [
//!     { "uid": "mc1", "title": "Meerkeuze 1",
//!       "strategy": { "refusing": { "type": "negation",
//!                                   "inner": { "type": "multiple_choice_format" } },
//!                     "accepting": { "type": "true" } } }
//!   ],
//!   "batch_types": [
//!     { "name": "format", "description": "enkel formaatcontroles",
//!       "allowed_checks": [ { "type": "multiple_choice_format" } ] }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::checks::CheckingPredicate;
use crate::error::CheckerError;
use crate::strategy::Strategy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Matches `Submission::content_uid` and names the exercise's files.
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub strategy: Strategy,
}

/// A kind of batch re-check and the atomic checks it may run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchType {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub allowed_checks: Vec<CheckingPredicate>,
}

impl BatchType {
    /// Whether every atomic check of `strategy` is in the allow-list.
    ///
    /// `True` inspects nothing and is always allowed.
    pub fn permits(&self, strategy: &Strategy) -> bool {
        strategy
            .atomic_checks()
            .into_iter()
            .filter(|c| **c != CheckingPredicate::True)
            .all(|c| self.allowed_checks.contains(c))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    exercises: Vec<Exercise>,
    #[serde(default)]
    batch_types: Vec<BatchType>,
}

/// Exercises by uid, in authored order.
#[derive(Debug, Clone, Default)]
pub struct ExerciseCatalog {
    exercises: Vec<Exercise>,
    index: HashMap<String, usize>,
    batch_types: Vec<BatchType>,
}

impl ExerciseCatalog {
    pub fn new(exercises: Vec<Exercise>, batch_types: Vec<BatchType>) -> Result<Self, CheckerError> {
        let mut index = HashMap::with_capacity(exercises.len());
        for (i, exercise) in exercises.iter().enumerate() {
            if index.insert(exercise.uid.clone(), i).is_some() {
                return Err(CheckerError::InvalidCatalog(format!(
                    "duplicate exercise uid '{}'",
                    exercise.uid
                )));
            }
            exercise.strategy.validate().map_err(|e| {
                CheckerError::InvalidCatalog(format!("exercise '{}': {}", exercise.uid, e))
            })?;
        }
        Ok(Self {
            exercises,
            index,
            batch_types,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, CheckerError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.exercises, file.batch_types)
    }

    pub fn load(path: &Path) -> Result<Self, CheckerError> {
        let json = fs::read_to_string(path).map_err(|e| CheckerError::io(path, e))?;
        let catalog = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            exercises = catalog.exercises.len(),
            "Loaded exercise catalog"
        );
        Ok(catalog)
    }

    pub fn get(&self, uid: &str) -> Result<&Exercise, CheckerError> {
        self.index
            .get(uid)
            .map(|&i| &self.exercises[i])
            .ok_or_else(|| CheckerError::UnknownExercise(uid.to_string()))
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn batch_types(&self) -> &[BatchType] {
        &self.batch_types
    }

    pub fn batch_type(&self, name: &str) -> Option<&BatchType> {
        self.batch_types.iter().find(|b| b.name == name)
    }

    /// Exercises a batch of this type may re-check.
    pub fn permitted_exercises<'a>(
        &'a self,
        batch_type: &'a BatchType,
    ) -> impl Iterator<Item = &'a Exercise> + 'a {
        self.exercises
            .iter()
            .filter(move |e| batch_type.permits(&e.strategy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{file_exists, negation};
    use std::path::PathBuf;

    fn fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/test_files/catalog/exercises.json")
    }

    #[test]
    fn loads_fixture_catalog() {
        let catalog = ExerciseCatalog::load(&fixture()).unwrap();
        assert_eq!(catalog.exercises().len(), 3);

        let mc = catalog.get("mc1").unwrap();
        assert_eq!(mc.title, "Meerkeuzevragen hoofdstuk 1");
        assert_eq!(
            mc.strategy.refusing,
            negation(CheckingPredicate::MultipleChoiceFormat)
        );

        let placeholder = catalog.get("todo").unwrap();
        assert_eq!(placeholder.strategy, Strategy::default());
    }

    #[test]
    fn unknown_uid_is_an_error() {
        let catalog = ExerciseCatalog::load(&fixture()).unwrap();
        assert!(matches!(
            catalog.get("bestaat-niet"),
            Err(CheckerError::UnknownExercise(uid)) if uid == "bestaat-niet"
        ));
    }

    #[test]
    fn duplicate_uids_are_rejected() {
        let json = r#"{"exercises": [{"uid": "a"}, {"uid": "a"}]}"#;
        assert!(matches!(
            ExerciseCatalog::from_json(json),
            Err(CheckerError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn malformed_model_is_rejected() {
        let json = r#"{"exercises": [{"uid": "a", "strategy": {"accepting":
            {"type": "multiple_choice_answer", "model": [{"text": "leeg", "answers": []}]}}}]}"#;
        assert!(matches!(
            ExerciseCatalog::from_json(json),
            Err(CheckerError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn batch_type_permits_by_structural_equality() {
        let catalog = ExerciseCatalog::load(&fixture()).unwrap();
        let format_only = catalog.batch_type("formaat").unwrap();

        let permitted: Vec<_> = catalog
            .permitted_exercises(format_only)
            .map(|e| e.uid.as_str())
            .collect();
        assert_eq!(permitted, vec!["mc1", "todo"]);

        let strategy = Strategy::new(
            negation(file_exists(None, Some("txt"))),
            CheckingPredicate::True,
        );
        assert!(!format_only.permits(&strategy));
        let files = BatchType {
            name: "bestanden".into(),
            description: String::new(),
            allowed_checks: vec![file_exists(None, Some("txt"))],
        };
        assert!(files.permits(&strategy));
    }
}
