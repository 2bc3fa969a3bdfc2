use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    ApartmentDto, CreateApartmentRequest, ListApartmentsParams, UpdateApartmentRequest,
};
use crate::interfaces::http::common::{
    ApiResponse, ApiResult, ErrorBody, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::AppState;
use crate::shared::validate_pagination;

#[utoipa::path(
    get,
    path = "/api/v1/apartments",
    tag = "Apartments",
    security(("bearer_auth" = [])),
    params(ListApartmentsParams),
    responses((status = 200, description = "One page of apartments", body = PaginatedResponse<ApartmentDto>))
)]
pub async fn list_apartments(
    State(state): State<AppState>,
    Query(params): Query<ListApartmentsParams>,
) -> ApiResult<Json<PaginatedResponse<ApartmentDto>>> {
    let page = validate_pagination(params.page, params.size);
    let apartments = state.apartments.list(&params.filter(), page).await?;
    Ok(Json(PaginatedResponse::from_page(apartments, ApartmentDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/apartments/{id}",
    tag = "Apartments",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Address number")),
    responses(
        (status = 200, description = "Apartment with owner, members and vehicles", body = ApartmentDto),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_apartment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApartmentDto>> {
    Ok(Json(state.apartments.get(id).await?.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/apartments",
    tag = "Apartments",
    security(("bearer_auth" = [])),
    request_body = CreateApartmentRequest,
    responses(
        (status = 201, description = "Apartment created", body = ApartmentDto),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 404, description = "Owner or member not found", body = ErrorBody),
        (status = 409, description = "Address taken or owner already owns an apartment", body = ErrorBody)
    )
)]
pub async fn create_apartment(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateApartmentRequest>,
) -> ApiResult<(StatusCode, Json<ApartmentDto>)> {
    let apartment = state.apartments.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(apartment.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/apartments/{id}",
    tag = "Apartments",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Address number")),
    request_body = UpdateApartmentRequest,
    responses(
        (status = 200, description = "Apartment updated", body = ApartmentDto),
        (status = 404, description = "Apartment, owner or member not found", body = ErrorBody),
        (status = 409, description = "Owner already owns another apartment", body = ErrorBody)
    )
)]
pub async fn update_apartment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateApartmentRequest>,
) -> ApiResult<Json<ApartmentDto>> {
    Ok(Json(state.apartments.update(id, request.into()).await?.into()))
}

/// Detaches residents and removes vehicles, invoice links and utility bills
/// together with the apartment.
#[utoipa::path(
    delete,
    path = "/api/v1/apartments/{id}",
    tag = "Apartments",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Address number")),
    responses(
        (status = 200, description = "Apartment deleted", body = ApiResponse),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_apartment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse>> {
    state.apartments.delete(id).await?;
    Ok(Json(ApiResponse::message(format!("Apartment {} deleted", id))))
}
