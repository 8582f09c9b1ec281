//! Submission lifecycle operations.
//!
//! Two paths change a submission's status:
//!
//! - [`submit_review`]: a reviewer's explicit decision from the review form.
//!   The decision is written as-is together with the comments and the
//!   review stamp, and a `reviewed` entry is appended. The action mapping
//!   is not consulted.
//! - [`record_action`] and [`resubmit`]: non-interactive triggers. The
//!   entry is appended and the parent status is set to
//!   [`ReviewAction::resulting_status`] in the same repository call.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::{WorkflowError, WorkflowResult};
use super::query::{Page, StatusCounts, SubmissionFilter};
use super::record::{
    NewReviewEntry, NewSubmission, ReviewDecision, ReviewEntry, ReviewStamp, SubmissionRecord,
};
use super::role::Actor;
use super::status::{ReviewAction, SubmissionStatus, SubmissionType};
use super::visibility::can_be_reviewed_by;
use crate::repository::{ListScope, PortalRepository};

const TITLE_MAX_CHARS: usize = 255;

/// A contribution form as submitted by its owner.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionDraft {
    pub submission_type: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

/// The reviewer's decision form.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub review_comments: String,
}

/// Review dashboard data for one actor.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub page: Page<SubmissionRecord>,
    pub counts: StatusCounts,
}

/// Create a pending submission owned by `owner`, stamping the owner's
/// current department and school onto it.
pub async fn create_submission(
    repo: &dyn PortalRepository,
    owner: &Actor,
    draft: SubmissionDraft,
) -> WorkflowResult<SubmissionRecord> {
    let submission_type = draft
        .submission_type
        .trim()
        .parse::<SubmissionType>()
        .map_err(|_| WorkflowError::validation("submission_type", "Select a valid choice."))?;

    let title = draft.title.trim();
    if title.is_empty() {
        return Err(WorkflowError::validation("title", "This field is required."));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(WorkflowError::validation(
            "title",
            format!("Ensure this value has at most {TITLE_MAX_CHARS} characters."),
        ));
    }

    let record = repo
        .insert_submission(NewSubmission {
            owner_id: owner.id,
            submission_type,
            title: title.to_string(),
            description: draft.description.trim().to_string(),
            content: draft.content,
            department: owner.department.clone(),
            school: owner.school.clone(),
            submitted_at: Utc::now(),
        })
        .await?;

    tracing::info!(
        submission_id = record.id,
        owner_id = owner.id,
        submission_type = %submission_type,
        "Submission created"
    );
    Ok(record)
}

async fn load(repo: &dyn PortalRepository, id: i64) -> WorkflowResult<SubmissionRecord> {
    repo.get_submission(id)
        .await?
        .ok_or(WorkflowError::NotFound(id))
}

fn ensure_reviewer(submission: &SubmissionRecord, actor: &Actor) -> WorkflowResult<()> {
    if can_be_reviewed_by(submission, actor) {
        return Ok(());
    }
    tracing::warn!(
        submission_id = submission.id,
        actor_id = actor.id,
        role = actor.role.tag(),
        "Review access denied"
    );
    Err(WorkflowError::denied(
        "You don't have permission to review this submission.",
    ))
}

/// Load a submission and its history for the review view.
pub async fn open_for_review(
    repo: &dyn PortalRepository,
    actor: &Actor,
    id: i64,
) -> WorkflowResult<(SubmissionRecord, Vec<ReviewEntry>)> {
    let submission = load(repo, id).await?;
    ensure_reviewer(&submission, actor)?;
    let history = repo.review_entries(id).await?;
    Ok((submission, history))
}

/// Load a submission for its owner or for a reviewer in scope.
pub async fn open_for_owner_or_reviewer(
    repo: &dyn PortalRepository,
    actor: &Actor,
    id: i64,
) -> WorkflowResult<(SubmissionRecord, Vec<ReviewEntry>)> {
    let submission = load(repo, id).await?;
    if submission.owner_id != actor.id {
        ensure_reviewer(&submission, actor)?;
    }
    let history = repo.review_entries(id).await?;
    Ok((submission, history))
}

/// Apply a reviewer's decision.
///
/// The chosen status is authoritative: it is stored together with the
/// comments and the reviewer stamp, and a `reviewed` entry carrying the
/// comments is appended.
pub async fn submit_review(
    repo: &dyn PortalRepository,
    actor: &Actor,
    id: i64,
    form: ReviewForm,
) -> WorkflowResult<(SubmissionRecord, ReviewEntry)> {
    let submission = load(repo, id).await?;
    ensure_reviewer(&submission, actor)?;

    let raw_status = form.status.trim();
    if raw_status.is_empty() {
        return Err(WorkflowError::validation("status", "This field is required."));
    }
    let status = raw_status
        .parse::<SubmissionStatus>()
        .map_err(|_| WorkflowError::validation("status", "Select a valid choice."))?;

    let now = Utc::now();
    let comments = form.review_comments.trim().to_string();
    let decision = ReviewDecision {
        status,
        comments: comments.clone(),
        stamp: ReviewStamp {
            reviewed_by: actor.id,
            reviewed_at: now,
        },
    };
    let entry = NewReviewEntry {
        submission_id: id,
        reviewer_id: actor.id,
        action: ReviewAction::Reviewed,
        comments,
        created_at: now,
    };

    let (updated, entry) = repo.apply_review(&decision, entry).await?;
    tracing::info!(
        submission_id = id,
        reviewer_id = actor.id,
        from = %submission.status,
        to = %updated.status,
        "Review submitted"
    );
    Ok((updated, entry))
}

async fn append_mapped(
    repo: &dyn PortalRepository,
    submission: &SubmissionRecord,
    actor_id: i64,
    action: ReviewAction,
    comments: String,
) -> WorkflowResult<(SubmissionRecord, ReviewEntry)> {
    let status = action.resulting_status();
    let entry = NewReviewEntry {
        submission_id: submission.id,
        reviewer_id: actor_id,
        action,
        comments,
        created_at: Utc::now(),
    };
    let (updated, entry) = repo.append_entry(entry, status).await?;
    tracing::info!(
        submission_id = submission.id,
        actor_id,
        action = %action,
        from = %submission.status,
        to = %updated.status,
        "Review action recorded"
    );
    Ok((updated, entry))
}

/// Append a history entry on behalf of a reviewer in scope and move the
/// submission to the status mapped from `action`.
///
/// Entry point for non-interactive triggers such as
/// `POST /api/submissions/:id/actions`.
pub async fn record_action(
    repo: &dyn PortalRepository,
    actor: &Actor,
    id: i64,
    action: ReviewAction,
    comments: &str,
) -> WorkflowResult<(SubmissionRecord, ReviewEntry)> {
    let submission = load(repo, id).await?;
    ensure_reviewer(&submission, actor)?;
    append_mapped(repo, &submission, actor.id, action, comments.trim().to_string()).await
}

/// Return a submission that needs revision to the review queue.
///
/// Only the owner may resubmit, and only from `needs_revision`.
pub async fn resubmit(
    repo: &dyn PortalRepository,
    owner: &Actor,
    id: i64,
    comments: &str,
) -> WorkflowResult<(SubmissionRecord, ReviewEntry)> {
    let submission = load(repo, id).await?;
    if submission.owner_id != owner.id {
        return Err(WorkflowError::denied(
            "Only the owner can resubmit this submission.",
        ));
    }
    if submission.status != SubmissionStatus::NeedsRevision {
        return Err(WorkflowError::validation(
            "status",
            format!(
                "Only submissions that need revision can be resubmitted (currently {}).",
                submission.status.label()
            ),
        ));
    }
    append_mapped(
        repo,
        &submission,
        owner.id,
        ReviewAction::Resubmitted,
        comments.trim().to_string(),
    )
    .await
}

/// The reviewer's dashboard: one page of scoped, filtered submissions plus
/// counts over the whole scope.
pub async fn review_dashboard(
    repo: &dyn PortalRepository,
    actor: &Actor,
    filter: &SubmissionFilter,
    page: usize,
) -> WorkflowResult<Dashboard> {
    let scope = actor.review_scope().ok_or_else(|| {
        WorkflowError::denied("You don't have permission to access the review dashboard.")
    })?;
    let scope = ListScope::Review(scope);

    let everything = repo
        .list_submissions(&scope, &SubmissionFilter::default())
        .await?;
    let counts = StatusCounts::tally(&everything);

    let matching = if *filter == SubmissionFilter::default() {
        everything
    } else {
        repo.list_submissions(&scope, filter).await?
    };

    Ok(Dashboard {
        page: Page::paginate(matching, page),
        counts,
    })
}

/// The actor's own submissions, optionally narrowed to one status.
pub async fn my_submissions(
    repo: &dyn PortalRepository,
    actor: &Actor,
    status: Option<SubmissionStatus>,
    page: usize,
) -> WorkflowResult<Page<SubmissionRecord>> {
    let owned = repo
        .list_submissions(
            &ListScope::Owner(actor.id),
            &SubmissionFilter::only_status(status),
        )
        .await?;
    Ok(Page::paginate(owned, page))
}
