use axum::extract::State;
use axum::Json;

use socialmedia_shared::types::api::{HealthCheck, HealthResponse};

use crate::AppState;

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_check = match state.store.ping() {
        Ok(()) => HealthCheck::healthy("store"),
        Err(e) => {
            tracing::warn!(error = %e, "store health check failed");
            HealthCheck::unhealthy("store", e.to_string())
        }
    };

    Json(
        HealthResponse::healthy("socialmedia-api", env!("CARGO_PKG_VERSION"))
            .with_checks(vec![store_check]),
    )
}
