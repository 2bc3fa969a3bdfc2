//! JWT bearer authentication

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::errors::ErrorKind;
use tracing::debug;

use crate::infrastructure::crypto::{verify_token, JwtConfig, TokenClaims};

use super::common::ApiError;

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    /// When false every request passes through unauthenticated.
    pub require_auth: bool,
}

/// Caller identity, stored in request extensions by [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
}

impl AuthenticatedUser {
    fn from_claims(claims: TokenClaims) -> Option<Self> {
        Some(Self {
            user_id: claims.user_id()?,
            email: claims.email,
        })
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if !auth.require_auth {
        return next.run(request).await;
    }

    let Some(auth_header) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        return ApiError::unauthorized("Missing authentication token").into_response();
    };

    let Some(token) = extract_token(auth_header) else {
        return ApiError::unauthorized("Invalid authentication token").into_response();
    };

    let claims = match verify_token(token, &auth.jwt_config) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            let message = match e.kind() {
                ErrorKind::ExpiredSignature => "Token has expired",
                _ => "Invalid authentication token",
            };
            return ApiError::unauthorized(message).into_response();
        }
    };

    let Some(user) = AuthenticatedUser::from_claims(claims) else {
        return ApiError::unauthorized("Invalid authentication token").into_response();
    };
    request.extensions_mut().insert(user);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("Bearer "), None);
        assert_eq!(extract_token("Basic abc"), None);
    }
}
