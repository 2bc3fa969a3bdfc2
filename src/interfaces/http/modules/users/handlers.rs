use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{ListUsersParams, RegisterRequest, UpdateUserRequest, UserDto};
use crate::interfaces::http::common::{
    ApiResponse, ApiResult, ErrorBody, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::AppState;
use crate::shared::validate_pagination;

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(ListUsersParams),
    responses((status = 200, description = "One page of users", body = PaginatedResponse<UserDto>))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> ApiResult<Json<PaginatedResponse<UserDto>>> {
    let page = validate_pagination(params.page, params.size);
    let users = state.users.list(&params.filter(), page).await?;
    Ok(Json(PaginatedResponse::from_page(users, UserDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Active user", body = UserDto),
        (status = 404, description = "Unknown or deleted user", body = ErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(state.users.get(id).await?.into()))
}

/// Register a user. A soft-deleted account with the same email comes back to life.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 409, description = "Email already in use", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserDto>)> {
    let user = state
        .users
        .register(&request.name, &request.email, &request.password)
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 404, description = "Not found", body = ErrorBody),
        (status = 409, description = "Email already in use", body = ErrorBody)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserDto>> {
    Ok(Json(state.users.update(id, request.into()).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deactivated", body = ApiResponse),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse>> {
    state.users.delete(id).await?;
    Ok(Json(ApiResponse::message(format!("User {} deleted", id))))
}
