use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use thiserror::Error;

use crate::domain::user::models::User;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

const BEARER_PREFIX: &str = "Bearer ";

/// Extension type to store the authenticated user in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Why an `Authorization` header could not yield a bearer token
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BearerError {
    #[error("Missing Authorization header")]
    Missing,

    #[error("Invalid Authorization header")]
    NotVisibleAscii,

    #[error("Invalid Authorization header format. Expected: Bearer <token>")]
    WrongScheme,
}

/// Extract the raw token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BearerError::Missing)?
        .to_str()
        .map_err(|_| BearerError::NotVisibleAscii)?;

    value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(BearerError::WrongScheme)
}

/// Middleware that rejects requests whose bearer token is invalid, expired or
/// revoked, and adds the token's user to request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer_token(req.headers())
        .map_err(|e| ApiError::Unauthorized(e.to_string()).into_response())?;

    let user = state
        .auth_service
        .authenticate(token)
        .await
        .map_err(|e| match e {
            UserError::AuthenticationFailed => {
                tracing::warn!("Rejected invalid, expired or revoked token");
                ApiError::Unauthorized("Invalid or expired token".to_string()).into_response()
            }
            _ => ApiError::from(e).into_response(),
        })?;

    req.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Bearer ")), Ok(""));
    }

    #[test]
    fn test_bearer_token_missing() {
        assert_eq!(bearer_token(&HeaderMap::new()), Err(BearerError::Missing));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        assert_eq!(
            bearer_token(&headers("Basic YWxpY2U6cGFzcw==")),
            Err(BearerError::WrongScheme)
        );
        assert_eq!(bearer_token(&headers("bearer abc")), Err(BearerError::WrongScheme));
        assert_eq!(bearer_token(&headers("abc.def.ghi")), Err(BearerError::WrongScheme));
    }
}
