use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::workflow::{Actor, WorkflowError};

/// Notice codes carried across redirects and rendered as messages.
pub mod notice {
    pub const PERMISSION_DENIED: &str = "permission_denied";
    pub const REVIEW_SAVED: &str = "review_saved";
    pub const RESUBMITTED: &str = "resubmitted";

    pub fn message(code: &str) -> Option<&'static str> {
        match code {
            PERMISSION_DENIED => Some("You don't have permission to do that."),
            REVIEW_SAVED => Some("Review submitted successfully."),
            RESUBMITTED => Some("Submission returned to the review queue."),
            _ => None,
        }
    }
}

/// Failure of an HTML request, mapped to a response at the handler
/// boundary.
#[derive(Debug)]
pub enum AppError {
    Unauthorized,
    Internal,
    Workflow {
        error: WorkflowError,
        /// Where permission failures send the user back to.
        home: &'static str,
    },
}

impl AppError {
    /// Landing page for `actor`: the review dashboard for reviewers, their
    /// own submissions for everyone else.
    pub fn home_of(actor: &Actor) -> &'static str {
        if actor.can_review_submissions() {
            "/review-dashboard"
        } else {
            "/my-submissions"
        }
    }

    pub fn for_actor(actor: &Actor) -> impl FnOnce(WorkflowError) -> AppError {
        let home = Self::home_of(actor);
        move |error| AppError::Workflow { error, home }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Authentication required").into_response()
            }
            AppError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
            AppError::Workflow { error, home } => match error {
                WorkflowError::PermissionDenied(_) => {
                    let target = format!("{}?notice={}", home, notice::PERMISSION_DENIED);
                    Redirect::to(&target).into_response()
                }
                WorkflowError::NotFound(id) => (
                    StatusCode::NOT_FOUND,
                    format!("Submission {} not found", id),
                )
                    .into_response(),
                WorkflowError::Validation { field, message } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("{}: {}", field, message),
                )
                    .into_response(),
                WorkflowError::Storage(e) => {
                    tracing::error!("Storage failure: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
                }
            },
        }
    }
}
