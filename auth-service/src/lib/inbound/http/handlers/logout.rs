use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::bearer_token;
use crate::inbound::http::router::AppState;

/// Logout with the token taken from `Authorization: Bearer <token>`.
///
/// A missing or non-Bearer header is a client error; a well-formed header
/// carrying an invalid token is accepted and ignored.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<()>, ApiError> {
    let token = bearer_token(&headers).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    revoke(&state, token).await
}

/// Logout with the token passed as the `token` query parameter.
pub async fn logout_with_token(
    State(state): State<AppState>,
    Query(params): Query<LogoutParams>,
) -> Result<ApiSuccess<()>, ApiError> {
    revoke(&state, &params.token).await
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogoutParams {
    token: String,
}

async fn revoke(state: &AppState, token: &str) -> Result<ApiSuccess<()>, ApiError> {
    state
        .auth_service
        .logout(token)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
