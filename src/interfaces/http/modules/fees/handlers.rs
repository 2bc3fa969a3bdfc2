use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateFeeRequest, FeeDto, ListFeesParams, UpdateFeeRequest};
use crate::interfaces::http::common::{
    ApiResponse, ApiResult, ErrorBody, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::AppState;
use crate::shared::validate_pagination;

#[utoipa::path(
    get,
    path = "/api/v1/fees",
    tag = "Fees",
    security(("bearer_auth" = [])),
    params(ListFeesParams),
    responses((status = 200, description = "One page of fees", body = PaginatedResponse<FeeDto>))
)]
pub async fn list_fees(
    State(state): State<AppState>,
    Query(params): Query<ListFeesParams>,
) -> ApiResult<Json<PaginatedResponse<FeeDto>>> {
    let page = validate_pagination(params.page, params.size);
    let fees = state.fees.list(&params.filter(), page).await?;
    Ok(Json(PaginatedResponse::from_page(fees, FeeDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/fees/{id}",
    tag = "Fees",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Fee id")),
    responses(
        (status = 200, description = "Fee", body = FeeDto),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_fee(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<FeeDto>> {
    Ok(Json(state.fees.get(id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/fees",
    tag = "Fees",
    security(("bearer_auth" = [])),
    request_body = CreateFeeRequest,
    responses(
        (status = 201, description = "Fee created", body = FeeDto),
        (status = 400, description = "Missing or non-positive unit price", body = ErrorBody)
    )
)]
pub async fn create_fee(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateFeeRequest>,
) -> ApiResult<(StatusCode, Json<FeeDto>)> {
    let fee = state.fees.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(fee.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/fees/{id}",
    tag = "Fees",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Fee id")),
    request_body = UpdateFeeRequest,
    responses(
        (status = 200, description = "Fee updated", body = FeeDto),
        (status = 400, description = "Missing or non-positive unit price", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn update_fee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateFeeRequest>,
) -> ApiResult<Json<FeeDto>> {
    Ok(Json(state.fees.update(id, request.into()).await?.into()))
}

/// Delete a fee and drop it from every invoice that lists it.
#[utoipa::path(
    delete,
    path = "/api/v1/fees/{id}",
    tag = "Fees",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Fee id")),
    responses(
        (status = 200, description = "Fee deleted", body = ApiResponse),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_fee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse>> {
    state.fees.delete(id).await?;
    Ok(Json(ApiResponse::message(format!("Fee {} deleted", id))))
}
