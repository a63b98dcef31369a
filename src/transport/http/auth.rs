//! Bearer-token extraction for authenticated routes.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;

use crate::domain::auth::{verify_token, Claims};
use crate::transport::http::types::{ApiResponse, AppState};

/// The authenticated caller. Adding this extractor to a handler makes the
/// route require a valid `Authorization: Bearer <token>` header; every
/// failure mode is a 401 with the envelope the client already handles.
pub struct AuthUser(pub Claims);

fn unauthorized(message: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }),
    )
}

/// Extracts the token from an `Authorization` header value. The scheme
/// comparison is case-insensitive per RFC 7235.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, Json<ApiResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing bearer token"))?;

        let token = parse_bearer(header).ok_or_else(|| unauthorized("Missing bearer token"))?;

        let claims = verify_token(&state.jwt_secret, token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bearer_scheme() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(parse_bearer("bearer abc"), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert_eq!(parse_bearer("Basic dXNlcjpwdw=="), None);
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer(""), None);
    }
}
