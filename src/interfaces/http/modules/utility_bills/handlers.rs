use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use super::csv_rows::parse_rows;
use super::dto::{ListUtilityBillsParams, UtilityBillDto, UtilityBillUpload};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ErrorBody, PaginatedResponse};
use crate::interfaces::http::AppState;
use crate::shared::validate_pagination;

/// Import one bill per CSV row. Nothing is stored if any row is invalid.
#[utoipa::path(
    post,
    path = "/api/v1/utilitybills/import",
    tag = "Utility Bills",
    security(("bearer_auth" = [])),
    request_body(content = UtilityBillUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Bills imported", body = [UtilityBillDto]),
        (status = 400, description = "Missing field or invalid row", body = ErrorBody)
    )
)]
pub async fn import_utility_bills(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Vec<UtilityBillDto>>)> {
    let mut name = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        match field.name() {
            Some("name") => {
                name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?,
                );
            }
            Some("file") => {
                debug!(file_name = ?field.file_name(), "Receiving utility bill file");
                file = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::bad_request(e.body_text()))?,
                );
            }
            _ => {}
        }
    }

    let Some(file) = file else {
        return Err(ApiError::bad_request("Multipart field 'file' is required"));
    };
    let name = name.unwrap_or_default();

    let rows = parse_rows(&file)?;
    let bills = state.utility_bills.import(&name, rows).await?;
    Ok((
        StatusCode::CREATED,
        Json(bills.into_iter().map(UtilityBillDto::from).collect()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/utilitybills",
    tag = "Utility Bills",
    security(("bearer_auth" = [])),
    params(ListUtilityBillsParams),
    responses((status = 200, description = "One page of bills", body = PaginatedResponse<UtilityBillDto>))
)]
pub async fn list_utility_bills(
    State(state): State<AppState>,
    Query(params): Query<ListUtilityBillsParams>,
) -> ApiResult<Json<PaginatedResponse<UtilityBillDto>>> {
    let page = validate_pagination(params.page, params.size);
    let bills = state.utility_bills.list(&params.filter(), page).await?;
    Ok(Json(PaginatedResponse::from_page(bills, UtilityBillDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/utilitybills/apartment/{id}",
    tag = "Utility Bills",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Address number")),
    responses(
        (status = 200, description = "Bills of the apartment", body = [UtilityBillDto]),
        (status = 404, description = "Apartment not found", body = ErrorBody)
    )
)]
pub async fn utility_bills_of_apartment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<UtilityBillDto>>> {
    let bills = state.utility_bills.for_apartment(id).await?;
    Ok(Json(bills.into_iter().map(UtilityBillDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/utilitybills/{id}",
    tag = "Utility Bills",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Bill id")),
    responses(
        (status = 200, description = "Bill", body = UtilityBillDto),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn get_utility_bill(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UtilityBillDto>> {
    Ok(Json(state.utility_bills.get(id).await?.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/utilitybills/{id}/paid",
    tag = "Utility Bills",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Bill id")),
    responses(
        (status = 200, description = "Bill marked as paid", body = UtilityBillDto),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn mark_utility_bill_paid(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UtilityBillDto>> {
    Ok(Json(state.utility_bills.mark_paid(id).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/utilitybills/{id}",
    tag = "Utility Bills",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Bill id")),
    responses(
        (status = 200, description = "Bill deleted", body = ApiResponse),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_utility_bill(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse>> {
    state.utility_bills.delete(id).await?;
    Ok(Json(ApiResponse::message(format!("Utility bill {} deleted", id))))
}
