use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::{ReviewAction, SubmissionStatus, SubmissionType};

/// Who reviewed a submission and when. Both halves are always present
/// together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStamp {
    pub reviewed_by: i64,
    pub reviewed_at: DateTime<Utc>,
}

/// A faculty member's contribution entered for institutional review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: i64,
    pub owner_id: i64,
    pub submission_type: SubmissionType,
    pub title: String,
    pub description: String,
    /// Form data exactly as submitted; no schema is enforced.
    pub content: serde_json::Value,
    pub department: Option<String>,
    pub school: Option<String>,
    pub status: SubmissionStatus,
    pub review: Option<ReviewStamp>,
    pub review_comments: String,
    pub submitted_at: DateTime<Utc>,
}

/// One immutable entry in a submission's review history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub id: i64,
    pub submission_id: i64,
    pub reviewer_id: i64,
    pub action: ReviewAction,
    pub comments: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a submission. Department and school are copied from
/// the owner's profile by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub owner_id: i64,
    pub submission_type: SubmissionType,
    pub title: String,
    pub description: String,
    pub content: serde_json::Value,
    pub department: Option<String>,
    pub school: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Insert payload for a review history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReviewEntry {
    pub submission_id: i64,
    pub reviewer_id: i64,
    pub action: ReviewAction,
    pub comments: String,
    pub created_at: DateTime<Utc>,
}

/// Fields written onto a submission by a reviewer's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDecision {
    pub status: SubmissionStatus,
    pub comments: String,
    pub stamp: ReviewStamp,
}
