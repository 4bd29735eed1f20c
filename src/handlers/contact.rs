use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::auth::require_admin;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{ContactMessage, ContactStatus};
use crate::state::AppState;

// POST /api/contact
#[derive(Deserialize)]
pub struct SubmitRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

pub async fn submit_message(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = body.name.as_deref().map(str::trim).unwrap_or("");
    let email = body
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_default();
    let subject = body.subject.as_deref().map(str::trim).unwrap_or("");
    let message = body.message.as_deref().map(str::trim).unwrap_or("");

    if name.is_empty() || email.is_empty() || subject.is_empty() || message.is_empty() {
        return Err(AppError::Validation(
            "name, email, subject and message are required".to_string(),
        ));
    }

    let msg = ContactMessage {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        email,
        phone: body.phone.as_deref().map(|p| p.trim().to_string()),
        subject: subject.to_string(),
        message: message.to_string(),
        status: ContactStatus::New,
        admin_notes: None,
        replied_at: None,
        replied_by: None,
        created_at: chrono::Utc::now().naive_utc(),
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_contact(&db, &msg)?;
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "contact message received",
            "contact": msg,
        })),
    ))
}

// GET /api/contact/admin
#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let status_filter = query.status.as_deref();

    let (contacts, total) = {
        let db = state.db.lock().unwrap();
        let contacts = queries::get_contacts(&db, status_filter, page, limit)?;
        let total = queries::count_contacts(&db, status_filter)?;
        (contacts, total)
    };

    let total_pages = (total + limit - 1) / limit;

    Ok(Json(serde_json::json!({
        "contacts": contacts,
        "totalPages": total_pages,
        "currentPage": page,
        "total": total,
    })))
}

// GET /api/contact/admin/:id
pub async fn get_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let msg = {
        let db = state.db.lock().unwrap();
        queries::get_contact_by_id(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound("contact message not found".to_string()))?;

    Ok(Json(serde_json::json!(msg)))
}

// PUT /api/contact/admin/:id/status
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
    #[serde(rename = "adminNotes")]
    pub admin_notes: Option<String>,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let status = match body.status.as_deref() {
        Some(raw) => Some(
            ContactStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("unknown status: {raw}")))?,
        ),
        None => None,
    };

    let msg = {
        let db = state.db.lock().unwrap();
        let updated = queries::update_contact_status(&db, &id, status, body.admin_notes.as_deref())?;
        if !updated {
            return Err(AppError::NotFound("contact message not found".to_string()));
        }
        queries::get_contact_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("contact message not found".to_string()))?
    };

    Ok(Json(serde_json::json!(msg)))
}

// PUT /api/contact/admin/:id/reply
#[derive(Deserialize)]
pub struct ReplyRequest {
    #[serde(rename = "adminNotes")]
    pub admin_notes: Option<String>,
}

pub async fn mark_replied(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ReplyRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let admin = require_admin(&state, &headers)?;

    let msg = {
        let db = state.db.lock().unwrap();
        let updated =
            queries::mark_contact_replied(&db, &id, body.admin_notes.as_deref(), &admin.id)?;
        if !updated {
            return Err(AppError::NotFound("contact message not found".to_string()));
        }
        queries::get_contact_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("contact message not found".to_string()))?
    };

    Ok(Json(serde_json::json!(msg)))
}

// DELETE /api/contact/admin/:id
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_contact(&db, &id)?
    };

    if !deleted {
        return Err(AppError::NotFound("contact message not found".to_string()));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "contact message deleted successfully",
    })))
}
