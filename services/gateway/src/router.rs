use axum::{Router, routing::get};

use orderflow_core::health::{healthz, readyz};
use orderflow_core::middleware::request_id_layer;

pub fn build_router() -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(request_id_layer())
}
