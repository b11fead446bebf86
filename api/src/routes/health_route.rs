use axum::Json;
use serde_json::{Value, json};

/// Handler: GET /healthz. Liveness only, never calls the model.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
