use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{ListVehiclesParams, RegisterVehicleRequest, VehicleDto};
use crate::interfaces::http::common::{
    ApiResponse, ApiResult, ErrorBody, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::AppState;
use crate::shared::validate_pagination;

#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(ListVehiclesParams),
    responses((status = 200, description = "One page of vehicles", body = PaginatedResponse<VehicleDto>))
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(params): Query<ListVehiclesParams>,
) -> ApiResult<Json<PaginatedResponse<VehicleDto>>> {
    let page = validate_pagination(params.page, params.size);
    let vehicles = state.vehicles.list(&params.filter(), page).await?;
    Ok(Json(PaginatedResponse::from_page(vehicles, VehicleDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Licence plate")),
    responses(
        (status = 200, description = "Vehicle", body = VehicleDto),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<VehicleDto>> {
    Ok(Json(state.vehicles.get(&id).await?.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/apartment/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Address number")),
    responses(
        (status = 200, description = "Vehicles of the apartment", body = [VehicleDto]),
        (status = 404, description = "Apartment not found", body = ErrorBody)
    )
)]
pub async fn vehicles_of_apartment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<VehicleDto>>> {
    let vehicles = state.vehicles.for_apartment(id).await?;
    Ok(Json(vehicles.into_iter().map(VehicleDto::from).collect()))
}

/// Register a vehicle. The apartment must exist and have an owner.
#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    request_body = RegisterVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = VehicleDto),
        (status = 400, description = "Missing id or apartment without owner", body = ErrorBody),
        (status = 404, description = "Apartment not found", body = ErrorBody),
        (status = 409, description = "Plate already registered", body = ErrorBody)
    )
)]
pub async fn register_vehicle(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterVehicleRequest>,
) -> ApiResult<(StatusCode, Json<VehicleDto>)> {
    let vehicle = state.vehicles.register(request.into()).await?;
    Ok((StatusCode::CREATED, Json(vehicle.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Licence plate")),
    responses(
        (status = 200, description = "Vehicle deleted", body = ApiResponse),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    state.vehicles.delete(&id).await?;
    Ok(Json(ApiResponse::message(format!("Vehicle {} deleted", id))))
}
