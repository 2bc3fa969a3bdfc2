use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;

use crate::application::{
    ApartmentService, FeeService, InvoiceService, ResidentService, UserService,
    UtilityBillService, VehicleService,
};
use crate::domain::{Store, VehicleRates};
use crate::infrastructure::crypto::JwtConfig;

use super::middleware::AuthState;

/// Everything the handlers need, cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub users: Arc<UserService>,
    pub residents: Arc<ResidentService>,
    pub apartments: Arc<ApartmentService>,
    pub vehicles: Arc<VehicleService>,
    pub fees: Arc<FeeService>,
    pub invoices: Arc<InvoiceService>,
    pub utility_bills: Arc<UtilityBillService>,
    pub auth: AuthState,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        jwt_config: JwtConfig,
        rates: VehicleRates,
        require_auth: bool,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(store.clone(), jwt_config.clone())),
            residents: Arc::new(ResidentService::new(store.clone())),
            apartments: Arc::new(ApartmentService::new(store.clone())),
            vehicles: Arc::new(VehicleService::new(store.clone())),
            fees: Arc::new(FeeService::new(store.clone())),
            invoices: Arc::new(InvoiceService::new(store.clone(), rates)),
            utility_bills: Arc::new(UtilityBillService::new(store.clone())),
            auth: AuthState {
                jwt_config,
                require_auth,
            },
            started_at: Instant::now(),
            store,
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
