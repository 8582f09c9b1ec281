//! Persistence seam for the review workflow.
//!
//! `PortalRepository` abstracts the storage of users, submissions and
//! review history. The Postgres implementation lives in [`crate::db`];
//! [`InMemoryRepository`] backs tests and local experiments.

mod memory;

pub use memory::InMemoryRepository;

use async_trait::async_trait;

use crate::workflow::query::SubmissionFilter;
use crate::workflow::record::{
    NewReviewEntry, NewSubmission, ReviewDecision, ReviewEntry, SubmissionRecord,
};
use crate::workflow::role::Actor;
use crate::workflow::status::SubmissionStatus;
use crate::workflow::visibility::ReviewScope;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back into a domain value.
    #[error("corrupt {table} row {id}: {reason}")]
    Corrupt {
        table: &'static str,
        id: i64,
        reason: String,
    },

    /// The submission was removed between lookup and write.
    #[error("submission {0} does not exist")]
    MissingSubmission(i64),
}

/// Which submissions a listing draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// Submissions a reviewer may act on.
    Review(ReviewScope),
    /// Submissions owned by one user.
    Owner(i64),
}

impl ListScope {
    pub fn permits(&self, submission: &SubmissionRecord) -> bool {
        match self {
            ListScope::Review(scope) => scope.permits(submission),
            ListScope::Owner(owner_id) => submission.owner_id == *owner_id,
        }
    }
}

#[async_trait]
pub trait PortalRepository: Send + Sync {
    /// Load a user profile as an actor, or `None` if the id is unknown.
    async fn get_actor(&self, id: i64) -> Result<Option<Actor>, RepositoryError>;

    /// Load every known profile among `ids`. Unknown ids are absent from
    /// the result.
    async fn get_actors(&self, ids: &[i64]) -> Result<Vec<Actor>, RepositoryError>;

    /// Store a new submission with status `pending` and no review stamp.
    async fn insert_submission(
        &self,
        submission: NewSubmission,
    ) -> Result<SubmissionRecord, RepositoryError>;

    async fn get_submission(&self, id: i64) -> Result<Option<SubmissionRecord>, RepositoryError>;

    /// Submissions in `scope` matching `filter`, newest first.
    async fn list_submissions(
        &self,
        scope: &ListScope,
        filter: &SubmissionFilter,
    ) -> Result<Vec<SubmissionRecord>, RepositoryError>;

    /// Review history of a submission, oldest first.
    async fn review_entries(&self, submission_id: i64) -> Result<Vec<ReviewEntry>, RepositoryError>;

    /// Write a reviewer's decision (status, comments, stamp) and append
    /// `entry`, together.
    async fn apply_review(
        &self,
        decision: &ReviewDecision,
        entry: NewReviewEntry,
    ) -> Result<(SubmissionRecord, ReviewEntry), RepositoryError>;

    /// Append `entry` and overwrite only the parent's status with `status`,
    /// together.
    async fn append_entry(
        &self,
        entry: NewReviewEntry,
        status: SubmissionStatus,
    ) -> Result<(SubmissionRecord, ReviewEntry), RepositoryError>;
}
