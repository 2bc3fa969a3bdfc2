use axum::{extract::State, Extension, Json};

use super::dto::{LoginRequest, LoginResponse};
use crate::interfaces::http::common::{ApiError, ApiResult, ErrorBody, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::users::UserDto;
use crate::interfaces::http::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let auth = state.users.login(&request.email, &request.password).await?;
    Ok(Json(LoginResponse {
        token: auth.token,
        token_type: auth.token_type,
        expires_in: auth.expires_in,
        user: UserDto::from(auth.user),
    }))
}

/// The account behind the bearer token.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserDto),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    user: Option<Extension<AuthenticatedUser>>,
) -> ApiResult<Json<UserDto>> {
    let Some(Extension(user)) = user else {
        return Err(ApiError::unauthorized("Authentication is disabled"));
    };
    let user = state.users.get(user.user_id).await?;
    Ok(Json(UserDto::from(user)))
}
