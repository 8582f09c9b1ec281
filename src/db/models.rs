use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::repository::RepositoryError;
use crate::workflow::record::{ReviewEntry, ReviewStamp, SubmissionRecord};
use crate::workflow::role::{Actor, Role};
use crate::workflow::status::{ReviewAction, SubmissionStatus, SubmissionType};

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub department: Option<String>,
    pub school: Option<String>,
    pub role: String,
}

/// Trimmed unit name, or `None` when blank.
fn unit(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<UserRow> for Actor {
    fn from(row: UserRow) -> Self {
        let department = unit(row.department);
        let school = unit(row.school);
        let role = Role::resolve(&row.role, department.as_deref(), school.as_deref());
        Actor {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            email: row.email,
            department,
            school,
            role,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct SubmissionRow {
    pub id: i64,
    pub owner_id: i64,
    pub submission_type: String,
    pub title: String,
    pub description: String,
    pub content: serde_json::Value,
    pub department: Option<String>,
    pub school: Option<String>,
    pub status: String,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_comments: String,
    pub submitted_at: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for SubmissionRecord {
    type Error = RepositoryError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| RepositoryError::Corrupt {
            table: "submissions",
            id: row.id,
            reason,
        };

        let submission_type = row
            .submission_type
            .parse::<SubmissionType>()
            .map_err(|e| corrupt(format!("{e}")))?;
        let status = row
            .status
            .parse::<SubmissionStatus>()
            .map_err(|e| corrupt(format!("{e}")))?;
        let review = match (row.reviewed_by, row.reviewed_at) {
            (Some(reviewed_by), Some(reviewed_at)) => Some(ReviewStamp {
                reviewed_by,
                reviewed_at,
            }),
            (None, None) => None,
            _ => return Err(corrupt("reviewed_by and reviewed_at disagree".to_string())),
        };

        Ok(SubmissionRecord {
            id: row.id,
            owner_id: row.owner_id,
            submission_type,
            title: row.title,
            description: row.description,
            content: row.content,
            department: row.department,
            school: row.school,
            status,
            review,
            review_comments: row.review_comments,
            submitted_at: row.submitted_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct ReviewEntryRow {
    pub id: i64,
    pub submission_id: i64,
    pub reviewer_id: i64,
    pub action: String,
    pub comments: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReviewEntryRow> for ReviewEntry {
    type Error = RepositoryError;

    fn try_from(row: ReviewEntryRow) -> Result<Self, Self::Error> {
        let action = row.action.parse::<ReviewAction>().map_err(|e| RepositoryError::Corrupt {
            table: "review_entries",
            id: row.id,
            reason: format!("{e}"),
        })?;
        Ok(ReviewEntry {
            id: row.id,
            submission_id: row.submission_id,
            reviewer_id: row.reviewer_id,
            action,
            comments: row.comments,
            created_at: row.created_at,
        })
    }
}
