//! API router with Swagger UI

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::common::{error_path_middleware, ApiResponse, ErrorBody};
use super::middleware::auth_middleware;
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{
    apartments, auth, fees, health, invoices, residents, users, utility_bills, vehicles,
};
use super::AppState;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::current_user,
        users::list_users,
        users::get_user,
        users::register,
        users::update_user,
        users::delete_user,
        residents::list_residents,
        residents::list_all_residents,
        residents::get_resident,
        residents::create_resident,
        residents::update_resident,
        residents::delete_resident,
        apartments::list_apartments,
        apartments::get_apartment,
        apartments::create_apartment,
        apartments::update_apartment,
        apartments::delete_apartment,
        vehicles::list_vehicles,
        vehicles::get_vehicle,
        vehicles::vehicles_of_apartment,
        vehicles::register_vehicle,
        vehicles::delete_vehicle,
        fees::list_fees,
        fees::get_fee,
        fees::create_fee,
        fees::update_fee,
        fees::delete_fee,
        invoices::list_invoices,
        invoices::get_invoice,
        invoices::invoice_totals,
        invoices::invoices_of_apartment,
        invoices::create_invoice,
        invoices::update_invoice,
        invoices::delete_invoice,
        invoices::update_contributions,
        invoices::mark_invoice_paid,
        utility_bills::import_utility_bills,
        utility_bills::list_utility_bills,
        utility_bills::utility_bills_of_apartment,
        utility_bills::get_utility_bill,
        utility_bills::mark_utility_bill_paid,
        utility_bills::delete_utility_bill,
    ),
    components(schemas(ApiResponse, ErrorBody)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database ping"),
        (name = "Authentication", description = "JWT login"),
        (name = "Users", description = "Back-office accounts"),
        (name = "Residents", description = "Residents and move-out handling"),
        (name = "Apartments", description = "Apartments, owners and members"),
        (name = "Vehicles", description = "Vehicle registration per apartment"),
        (name = "Fees", description = "Fee catalogue"),
        (name = "Invoices", description = "Invoices, per-apartment amounts and payments"),
        (name = "Utility Bills", description = "Electricity, water and internet bills"),
    ),
    info(
        title = "Department Manager API",
        version = "1.0.0",
        description = "REST API for managing residents, apartments, fees, invoices and utility bills"
    )
)]
pub struct ApiDoc;

fn api_routes() -> Router<AppState> {
    let residents = Router::new()
        .route(
            "/",
            get(residents::list_residents).post(residents::create_resident),
        )
        .route("/all", get(residents::list_all_residents))
        .route(
            "/{id}",
            get(residents::get_resident)
                .put(residents::update_resident)
                .delete(residents::delete_resident),
        );

    let apartments = Router::new()
        .route(
            "/",
            get(apartments::list_apartments).post(apartments::create_apartment),
        )
        .route(
            "/{id}",
            get(apartments::get_apartment)
                .put(apartments::update_apartment)
                .delete(apartments::delete_apartment),
        );

    let vehicles = Router::new()
        .route(
            "/",
            get(vehicles::list_vehicles).post(vehicles::register_vehicle),
        )
        .route("/apartment/{id}", get(vehicles::vehicles_of_apartment))
        .route(
            "/{id}",
            get(vehicles::get_vehicle).delete(vehicles::delete_vehicle),
        );

    let fees = Router::new()
        .route("/", get(fees::list_fees).post(fees::create_fee))
        .route(
            "/{id}",
            get(fees::get_fee)
                .put(fees::update_fee)
                .delete(fees::delete_fee),
        );

    let invoices = Router::new()
        .route(
            "/",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route("/total", get(invoices::invoice_totals))
        .route("/apartment/{id}", get(invoices::invoices_of_apartment))
        .route(
            "/apartment/{id}/{invoice_id}/contributions",
            put(invoices::update_contributions),
        )
        .route("/payments/{id}", put(invoices::mark_invoice_paid))
        .route(
            "/{id}",
            get(invoices::get_invoice)
                .put(invoices::update_invoice)
                .delete(invoices::delete_invoice),
        );

    let utility_bills = Router::new()
        .route("/", get(utility_bills::list_utility_bills))
        .route("/import", post(utility_bills::import_utility_bills))
        .route(
            "/apartment/{id}",
            get(utility_bills::utility_bills_of_apartment),
        )
        .route(
            "/{id}",
            get(utility_bills::get_utility_bill).delete(utility_bills::delete_utility_bill),
        )
        .route("/{id}/paid", put(utility_bills::mark_utility_bill_paid));

    let users = Router::new()
        .route("/", get(users::list_users))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    Router::new()
        .route("/auth/me", get(auth::current_user))
        .nest("/users", users)
        .nest("/residents", residents)
        .nest("/apartments", apartments)
        .nest("/vehicles", vehicles)
        .nest("/fees", fees)
        .nest("/invoices", invoices)
        .nest("/utilitybills", utility_bills)
}

/// Build the full application router.
///
/// `metrics` is `None` when no Prometheus recorder is installed, in which case
/// `/metrics` is not served.
pub fn create_api_router(state: AppState, metrics: Option<PrometheusHandle>) -> Router {
    let protected = api_routes().layer(middleware::from_fn_with_state(
        state.auth.clone(),
        auth_middleware,
    ));

    let public = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/users/register", post(users::register));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .nest("/api/v1", public.merge(protected))
        .with_state(state);

    if let Some(handle) = metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(error_path_middleware))
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::VehicleRates;
    use crate::infrastructure::crypto::JwtConfig;
    use crate::infrastructure::InMemoryStore;

    fn app(require_auth: bool) -> Router {
        let state = AppState::new(
            Arc::new(InMemoryStore::new()),
            JwtConfig::new("router-test-secret", 1),
            VehicleRates::default(),
            require_auth,
        );
        create_api_router(state, None)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn login(app: &Router) -> String {
        let (status, _) = send(
            app,
            "POST",
            "/api/v1/users/register",
            None,
            Some(json!({ "name": "Admin", "email": "admin@example.com", "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "admin@example.com", "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = app(true);
        let (status, body) = send(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn protected_route_requires_token() {
        let app = app(true);
        let (status, body) = send(&app, "GET", "/api/v1/fees", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], 401);
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["path"], "/api/v1/fees");

        let (status, _) = send(&app, "GET", "/api/v1/fees", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = app(true);
        login(&app).await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "admin@example.com", "password": "nope-nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn fee_rules_and_pagination_shape() {
        let app = app(true);
        let token = login(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/fees",
            Some(&token),
            Some(json!({ "name": "Management", "feeType": "DepartmentFee" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["path"], "/api/v1/fees");

        for name in ["Fund A", "Fund B", "Fund C"] {
            let (status, body) = send(
                &app,
                "POST",
                "/api/v1/fees",
                Some(&token),
                Some(json!({ "name": name, "feeTypeEnum": "ContributionFund", "unitPrice": 5 })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["unitPrice"], "0");
        }

        let (status, body) = send(&app, "GET", "/api/v1/fees?page=2&size=2", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pageSize"], 2);
        assert_eq!(body["curPage"], 2);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["totalElements"], 3);
        assert_eq!(body["result"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn apartment_invoice_flow() {
        let app = app(false);

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/residents",
            None,
            Some(json!({ "id": 1001, "name": "Owner", "gender": "Female" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/apartments",
            None,
            Some(json!({ "addressNumber": 101, "area": 50, "ownerId": 1001, "ownerPhone": "0901234567" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["numberOfMembers"], 1);
        assert_eq!(body["owner"]["id"], 1001);

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/fees",
            None,
            Some(json!({ "name": "Management", "feeType": "DepartmentFee", "unitPrice": "1000" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let fee_id = body["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/invoices",
            None,
            Some(json!({ "id": "INV001", "name": "May", "feeIds": [fee_id] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, "GET", "/api/v1/invoices/apartment/101", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["invoiceId"], "INV001");
        assert_eq!(body[0]["fees"][0]["amount"], "50000");
        assert_eq!(body[0]["paymentStatus"], "Unpaid");

        let link = body[0]["invoiceApartmentId"].as_i64().unwrap();
        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/v1/invoices/payments/{}", link),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["paymentStatus"], "Paid");

        let (status, body) = send(&app, "GET", "/api/v1/invoices/total", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["paidAmount"], "50000");

        let (status, body) = send(&app, "DELETE", "/api/v1/invoices/INV001", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 200);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn missing_apartment_is_not_found() {
        let app = app(false);
        let (status, body) = send(&app, "GET", "/api/v1/apartments/404", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Apartment with id = 404 is not found");
        assert_eq!(body["path"], "/api/v1/apartments/404");
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let app = app(false);
        let req = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.headers()["x-request-id"], "abc-123");
    }

    #[test]
    fn openapi_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/residents",
            "/api/v1/apartments/{id}",
            "/api/v1/invoices/total",
            "/api/v1/utilitybills/import",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
