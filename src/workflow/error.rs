use crate::repository::RepositoryError;

/// Failures of a workflow operation. None of them leave partial state
/// behind except `Storage`, which reports whatever the backend did.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("submission {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl WorkflowError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        WorkflowError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn denied(message: impl Into<String>) -> Self {
        WorkflowError::PermissionDenied(message.into())
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
