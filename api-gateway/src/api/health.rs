//! Liveness endpoint

use axum::Json;
use serde_json::{json, Value};

/// Report that the gateway is up
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Gateway is running")
    ),
    tag = "health"
)]
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
