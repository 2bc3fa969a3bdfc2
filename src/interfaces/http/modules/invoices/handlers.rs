use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    ApartmentInvoiceDto, ContributionRequest, CreateInvoiceRequest, InvoiceDto, InvoiceTotalDto,
    ListInvoicesParams, UpdateInvoiceRequest,
};
use crate::interfaces::http::common::{
    ApiResponse, ApiResult, ErrorBody, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::AppState;
use crate::shared::validate_pagination;

#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    params(ListInvoicesParams),
    responses((status = 200, description = "One page of active invoices", body = PaginatedResponse<InvoiceDto>))
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<ListInvoicesParams>,
) -> ApiResult<Json<PaginatedResponse<InvoiceDto>>> {
    let page = validate_pagination(params.page, params.size);
    let invoices = state.invoices.list(&params.filter(), page).await?;
    Ok(Json(PaginatedResponse::from_page(invoices, InvoiceDto::from)))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Invoice code")),
    responses(
        (status = 200, description = "Active invoice with its fees", body = InvoiceDto),
        (status = 404, description = "Unknown or inactive invoice", body = ErrorBody)
    )
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<InvoiceDto>> {
    Ok(Json(state.invoices.get(&id).await?.into()))
}

/// Per active invoice: amount charged, amount paid and the contribution share.
#[utoipa::path(
    get,
    path = "/api/v1/invoices/total",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Totals per invoice", body = [InvoiceTotalDto]))
)]
pub async fn invoice_totals(State(state): State<AppState>) -> ApiResult<Json<Vec<InvoiceTotalDto>>> {
    let totals = state.invoices.totals().await?;
    Ok(Json(totals.into_iter().map(InvoiceTotalDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/invoices/apartment/{id}",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Address number")),
    responses(
        (status = 200, description = "Invoices of the apartment with computed amounts", body = [ApartmentInvoiceDto]),
        (status = 404, description = "Apartment not found", body = ErrorBody)
    )
)]
pub async fn invoices_of_apartment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<ApartmentInvoiceDto>>> {
    let invoices = state.invoices.for_apartment(id).await?;
    Ok(Json(invoices.into_iter().map(ApartmentInvoiceDto::from).collect()))
}

/// Create an invoice and link it to one apartment, or to all of them when
/// `apartmentId` is absent. An inactive invoice with the same id is reactivated.
#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice created", body = InvoiceDto),
        (status = 404, description = "Fee or apartment not found", body = ErrorBody),
        (status = 409, description = "Invoice id already active", body = ErrorBody)
    )
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateInvoiceRequest>,
) -> ApiResult<(StatusCode, Json<InvoiceDto>)> {
    let invoice = state.invoices.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(invoice.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/invoices/{id}",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Invoice code")),
    request_body = UpdateInvoiceRequest,
    responses(
        (status = 200, description = "Invoice updated", body = InvoiceDto),
        (status = 404, description = "Invoice or fee not found", body = ErrorBody)
    )
)]
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateInvoiceRequest>,
) -> ApiResult<Json<InvoiceDto>> {
    Ok(Json(state.invoices.update(&id, request.into()).await?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/invoices/{id}",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Invoice code")),
    responses(
        (status = 200, description = "Invoice deleted", body = ApiResponse),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    state.invoices.delete(&id).await?;
    Ok(Json(ApiResponse::message(format!("Invoice {} deleted", id))))
}

#[utoipa::path(
    put,
    path = "/api/v1/invoices/apartment/{id}/{invoice_id}/contributions",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Address number"),
        ("invoice_id" = String, Path, description = "Invoice code")
    ),
    request_body = ContributionRequest,
    responses(
        (status = 200, description = "Amounts stored", body = ApartmentInvoiceDto),
        (status = 400, description = "Fee is not a contribution fund of the invoice", body = ErrorBody),
        (status = 404, description = "Invoice not linked to the apartment", body = ErrorBody)
    )
)]
pub async fn update_contributions(
    State(state): State<AppState>,
    Path((apartment_id, invoice_id)): Path<(i64, String)>,
    ValidatedJson(request): ValidatedJson<ContributionRequest>,
) -> ApiResult<Json<ApartmentInvoiceDto>> {
    let updated = state
        .invoices
        .update_contributions(apartment_id, &invoice_id, request.amounts)
        .await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/invoices/payments/{id}",
    tag = "Invoices",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Id of the apartment's invoice link")),
    responses(
        (status = 200, description = "Marked as paid", body = ApartmentInvoiceDto),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn mark_invoice_paid(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApartmentInvoiceDto>> {
    Ok(Json(state.invoices.mark_paid(id).await?.into()))
}
