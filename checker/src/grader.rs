//! Task layer: classify every submission of one pushed commit.
//!
//! The artifact directory is a single well-known path that is re-populated for
//! every batch, so at most one batch may be checked at a time. [`Grader`]
//! enforces this with an async mutex and runs the synchronous engine on the
//! blocking pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::catalog::ExerciseCatalog;
use crate::strategy::StrategyOutcome;
use crate::types::{ClassificationState, Submission};

/// Length of a full git commit hash.
pub const CHECKSUM_LEN: usize = 40;

pub fn is_valid_checksum(checksum: &str) -> bool {
    checksum.len() == CHECKSUM_LEN && checksum.bytes().all(|b| b.is_ascii_hexdigit())
}

fn inconclusive() -> StrategyOutcome {
    StrategyOutcome {
        state: ClassificationState::InconclusiveTechnical,
        components: Vec::new(),
    }
}

/// Check `submissions` in order against the files under `artifact_root`.
///
/// Every submission is stamped with `checksum`. Checking stops at the first
/// submission that is not accepted; later ones keep `state == None`. Returns
/// the outcome of the last submission that was checked.
pub fn check_submissions_in_commit(
    catalog: &ExerciseCatalog,
    submissions: &mut [Submission],
    artifact_root: &Path,
    checksum: &str,
) -> Option<StrategyOutcome> {
    let mut last: Option<StrategyOutcome> = None;
    for submission in submissions.iter_mut() {
        submission.checksum = Some(checksum.to_string());
        if last
            .as_ref()
            .is_some_and(|o| o.state != ClassificationState::Accepted)
        {
            continue;
        }

        let outcome = match catalog.get(&submission.content_uid) {
            Ok(exercise) => exercise.strategy.check_submission(submission, artifact_root),
            Err(e) => {
                warn!(checksum, "Cannot check submission: {}", e);
                inconclusive()
            }
        };
        submission.state = Some(outcome.state);
        last = Some(outcome);
    }
    last
}

/// Submissions of one batch, updated, plus the outcome to deliver.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub submissions: Vec<Submission>,
    pub outcome: Option<StrategyOutcome>,
}

#[derive(Clone)]
pub struct Grader {
    catalog: Arc<ExerciseCatalog>,
    artifact_root: PathBuf,
    busy: Arc<Mutex<()>>,
}

impl Grader {
    pub fn new(catalog: Arc<ExerciseCatalog>, artifact_root: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            artifact_root: artifact_root.into(),
            busy: Arc::new(Mutex::new(())),
        }
    }

    pub fn artifact_root(&self) -> &Path {
        &self.artifact_root
    }

    /// Check one batch. Waits for any batch already running on this grader.
    ///
    /// A malformed checksum means the commit was never retrieved: the first
    /// submission is marked inconclusive and nothing is evaluated.
    pub async fn check_batch(
        &self,
        mut submissions: Vec<Submission>,
        checksum: &str,
    ) -> BatchResult {
        let _guard = self.busy.lock().await;

        if !is_valid_checksum(checksum) {
            warn!(checksum, "Invalid commit checksum, submissions not checked");
            if let Some(first) = submissions.first_mut() {
                first.state = Some(ClassificationState::InconclusiveTechnical);
            }
            return BatchResult {
                submissions,
                outcome: Some(inconclusive()),
            };
        }

        info!(checksum, count = submissions.len(), "Checking submission batch");
        let fallback = submissions.clone();
        let catalog = Arc::clone(&self.catalog);
        let root = self.artifact_root.clone();
        let checksum_owned = checksum.to_string();

        let joined = tokio::task::spawn_blocking(move || {
            let outcome =
                check_submissions_in_commit(&catalog, &mut submissions, &root, &checksum_owned);
            (submissions, outcome)
        })
        .await;

        match joined {
            Ok((submissions, outcome)) => BatchResult {
                submissions,
                outcome,
            },
            Err(e) => {
                error!(checksum, "Submission check aborted: {}", e);
                let mut submissions = fallback;
                for s in &mut submissions {
                    s.checksum = Some(checksum.to_string());
                }
                if let Some(first) = submissions.first_mut() {
                    first.state = Some(ClassificationState::InconclusiveTechnical);
                }
                BatchResult {
                    submissions,
                    outcome: Some(inconclusive()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Exercise;
    use crate::checks::{CheckingPredicate, file_exists, negation};
    use crate::strategy::Strategy;
    use tempfile::TempDir;

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";

    fn catalog() -> ExerciseCatalog {
        let present = Exercise {
            uid: "aanwezig".into(),
            title: String::new(),
            strategy: Strategy::new(
                negation(file_exists(None, Some("txt"))),
                CheckingPredicate::True,
            ),
        };
        let missing = Exercise {
            uid: "ontbrekend".into(),
            ..present.clone()
        };
        ExerciseCatalog::new(vec![present, missing], vec![]).unwrap()
    }

    #[test]
    fn checksum_must_be_full_hex_hash() {
        assert!(is_valid_checksum(SHA));
        assert!(!is_valid_checksum("abc"));
        assert!(!is_valid_checksum(&"g".repeat(40)));
    }

    #[test]
    fn stops_after_first_unaccepted_submission() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("aanwezig.txt"), "").unwrap();
        let mut subs = vec![
            Submission::new("aanwezig"),
            Submission::new("ontbrekend"),
            Submission::new("aanwezig"),
        ];

        let outcome = check_submissions_in_commit(&catalog(), &mut subs, dir.path(), SHA).unwrap();
        assert_eq!(outcome.state, ClassificationState::Refused);
        assert_eq!(subs[0].state, Some(ClassificationState::Accepted));
        assert_eq!(subs[1].state, Some(ClassificationState::Refused));
        assert_eq!(subs[2].state, None);
        assert!(subs.iter().all(|s| s.checksum.as_deref() == Some(SHA)));
    }

    #[test]
    fn unknown_exercise_is_inconclusive() {
        let dir = TempDir::new().unwrap();
        let mut subs = vec![Submission::new("onbekend")];
        let outcome = check_submissions_in_commit(&catalog(), &mut subs, dir.path(), SHA).unwrap();
        assert_eq!(outcome.state, ClassificationState::InconclusiveTechnical);
    }

    #[tokio::test]
    async fn grader_rejects_bad_checksum() {
        let dir = TempDir::new().unwrap();
        let grader = Grader::new(Arc::new(catalog()), dir.path());
        let result = grader
            .check_batch(vec![Submission::new("aanwezig"), Submission::new("aanwezig")], "kapot")
            .await;

        assert_eq!(
            result.outcome.unwrap().state,
            ClassificationState::InconclusiveTechnical
        );
        assert_eq!(
            result.submissions[0].state,
            Some(ClassificationState::InconclusiveTechnical)
        );
        assert_eq!(result.submissions[1].state, None);
    }

    #[tokio::test]
    async fn grader_serialises_batches() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("aanwezig.txt"), "").unwrap();
        let grader = Grader::new(Arc::new(catalog()), dir.path());

        let (a, b) = tokio::join!(
            grader.check_batch(vec![Submission::new("aanwezig")], SHA),
            grader.check_batch(vec![Submission::new("ontbrekend")], SHA),
        );
        assert_eq!(a.outcome.unwrap().state, ClassificationState::Accepted);
        assert_eq!(b.outcome.unwrap().state, ClassificationState::Refused);
    }
}
