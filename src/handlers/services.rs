use axum::extract::Path;
use axum::Json;

use crate::errors::AppError;
use crate::models::service;

// GET /api/services
pub async fn list_services() -> Json<serde_json::Value> {
    Json(serde_json::json!(service::CATALOGUE))
}

// GET /api/services/:id
pub async fn get_service(Path(id): Path<String>) -> Result<Json<serde_json::Value>, AppError> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::Validation("invalid service id".to_string()))?;

    let svc = service::find_by_id(id)
        .ok_or_else(|| AppError::NotFound("service not found".to_string()))?;

    Ok(Json(serde_json::json!(svc)))
}
