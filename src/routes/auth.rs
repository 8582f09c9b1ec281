use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use std::sync::Arc;

use super::error::AppError;
use crate::state::AppState;
use crate::workflow::Actor;

/// The authenticated user making the request.
///
/// Login happens upstream; the login layer forwards the user's id in the
/// configured actor header. Requests without it, or with an id that has
/// no profile, are rejected with 401.
pub struct CurrentActor(pub Actor);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(state.config.actor_header.as_str())
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let id: i64 = raw.trim().parse().map_err(|_| AppError::Unauthorized)?;

        match state.repo.get_actor(id).await {
            Ok(Some(actor)) => Ok(CurrentActor(actor)),
            Ok(None) => {
                tracing::warn!(actor_id = id, "Request for unknown user");
                Err(AppError::Unauthorized)
            }
            Err(e) => {
                tracing::error!("Failed to load user {}: {}", id, e);
                Err(AppError::Internal)
            }
        }
    }
}
