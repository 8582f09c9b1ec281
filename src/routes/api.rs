use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentActor;
use crate::state::AppState;
use crate::workflow::engine::{self, SubmissionDraft};
use crate::workflow::{ReviewAction, WorkflowError};

fn error_response(error: WorkflowError) -> Response {
    let (status, body) = match &error {
        WorkflowError::Validation { field, message } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            serde_json::json!({
                "status": "invalid",
                "field": field,
                "message": message
            }),
        ),
        WorkflowError::PermissionDenied(message) => (
            StatusCode::FORBIDDEN,
            serde_json::json!({
                "status": "forbidden",
                "message": message
            }),
        ),
        WorkflowError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            serde_json::json!({
                "status": "not_found",
                "message": "Submission not found."
            }),
        ),
        WorkflowError::Storage(e) => {
            tracing::error!("Storage failure: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "status": "error",
                    "message": "Database error."
                }),
            )
        }
    };
    (status, Json(body)).into_response()
}

pub async fn create_submission(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Json(draft): Json<SubmissionDraft>,
) -> Response {
    match engine::create_submission(state.repo.as_ref(), &actor, draft).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn submission_status(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(submission_id): Path<i64>,
) -> Response {
    match engine::open_for_owner_or_reviewer(state.repo.as_ref(), &actor, submission_id).await {
        Ok((submission, history)) => Json(serde_json::json!({
            "status": submission.status,
            "review": submission.review,
            "review_comments": submission.review_comments,
            "history": history
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub comments: String,
}

/// Record a review action from an integration. The submission moves to the
/// status mapped from the action.
pub async fn record_action(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(submission_id): Path<i64>,
    Json(request): Json<ActionRequest>,
) -> Response {
    let action = match request.action.trim().parse::<ReviewAction>() {
        Ok(action) => action,
        Err(_) => {
            return error_response(WorkflowError::validation(
                "action",
                "Select a valid choice.",
            ))
        }
    };

    match engine::record_action(
        state.repo.as_ref(),
        &actor,
        submission_id,
        action,
        &request.comments,
    )
    .await
    {
        Ok((submission, entry)) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "status": submission.status,
                "entry": entry
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
