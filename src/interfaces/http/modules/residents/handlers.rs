use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateResidentRequest, ListResidentsParams, ResidentDto, UpdateResidentRequest};
use crate::interfaces::http::common::{
    ApiResponse, ApiResult, ErrorBody, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::AppState;
use crate::shared::validate_pagination;

/// Residents still living in the building (status other than `Moved`).
#[utoipa::path(
    get,
    path = "/api/v1/residents",
    tag = "Residents",
    security(("bearer_auth" = [])),
    params(ListResidentsParams),
    responses((status = 200, description = "One page of residents", body = PaginatedResponse<ResidentDto>))
)]
pub async fn list_residents(
    State(state): State<AppState>,
    Query(params): Query<ListResidentsParams>,
) -> ApiResult<Json<PaginatedResponse<ResidentDto>>> {
    let page = validate_pagination(params.page, params.size);
    let residents = state.residents.list_active(params.filter(), page).await?;
    Ok(Json(PaginatedResponse::from_page(residents, ResidentDto::from)))
}

/// Every resident, moved-out ones included.
#[utoipa::path(
    get,
    path = "/api/v1/residents/all",
    tag = "Residents",
    security(("bearer_auth" = [])),
    params(ListResidentsParams),
    responses((status = 200, description = "One page of residents", body = PaginatedResponse<ResidentDto>))
)]
pub async fn list_all_residents(
    State(state): State<AppState>,
    Query(params): Query<ListResidentsParams>,
) -> ApiResult<Json<PaginatedResponse<ResidentDto>>> {
    let page = validate_pagination(params.page, params.size);
    let residents = state.residents.list_all(params.filter(), page).await?;
    Ok(Json(PaginatedResponse::from_page(residents, ResidentDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/residents/{id}",
    tag = "Residents",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "National identity number")),
    responses(
        (status = 200, description = "Resident", body = ResidentDto),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_resident(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ResidentDto>> {
    Ok(Json(state.residents.get(id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/residents",
    tag = "Residents",
    security(("bearer_auth" = [])),
    request_body = CreateResidentRequest,
    responses(
        (status = 201, description = "Resident created", body = ResidentDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Apartment not found", body = ErrorBody),
        (status = 409, description = "Id already registered", body = ErrorBody)
    )
)]
pub async fn create_resident(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateResidentRequest>,
) -> ApiResult<(StatusCode, Json<ResidentDto>)> {
    let resident = state.residents.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(resident.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/residents/{id}",
    tag = "Residents",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "National identity number")),
    request_body = UpdateResidentRequest,
    responses(
        (status = 200, description = "Resident updated", body = ResidentDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn update_resident(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateResidentRequest>,
) -> ApiResult<Json<ResidentDto>> {
    Ok(Json(state.residents.update(id, request.into()).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/residents/{id}",
    tag = "Residents",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "National identity number")),
    responses(
        (status = 200, description = "Resident deleted", body = ApiResponse),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_resident(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse>> {
    state.residents.delete(id).await?;
    Ok(Json(ApiResponse::message(format!("Resident {} deleted", id))))
}
