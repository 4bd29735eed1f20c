use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::auth::require_admin;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::Faq;
use crate::state::AppState;

// GET /api/faqs
pub async fn list_faqs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let faqs = {
        let db = state.db.lock().unwrap();
        queries::list_active_faqs(&db, None)?
    };
    Ok(Json(serde_json::json!(faqs)))
}

// GET /api/faqs/category/:category
pub async fn list_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let faqs = {
        let db = state.db.lock().unwrap();
        queries::list_active_faqs(&db, Some(&category))?
    };
    Ok(Json(serde_json::json!(faqs)))
}

// POST /api/faqs
#[derive(Deserialize)]
pub struct CreateFaqRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "order")]
    pub display_order: Option<i64>,
}

pub async fn create_faq(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateFaqRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&state, &headers)?;

    let question = body.question.as_deref().map(str::trim).unwrap_or("");
    let answer = body.answer.as_deref().map(str::trim).unwrap_or("");
    if question.is_empty() || answer.is_empty() {
        return Err(AppError::Validation(
            "question and answer are required".to_string(),
        ));
    }

    let faq = Faq {
        id: uuid::Uuid::new_v4().to_string(),
        question: question.to_string(),
        answer: answer.to_string(),
        category: body
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "general".to_string()),
        display_order: body.display_order.unwrap_or(0),
        is_active: true,
        created_at: chrono::Utc::now().naive_utc(),
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_faq(&db, &faq)?;
    }

    Ok((StatusCode::CREATED, Json(serde_json::json!(faq))))
}

// PUT /api/faqs/:id
#[derive(Deserialize)]
pub struct UpdateFaqRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "order")]
    pub display_order: Option<i64>,
    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

pub async fn update_faq(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateFaqRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let faq = {
        let db = state.db.lock().unwrap();

        let mut faq = queries::get_faq_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("FAQ not found".to_string()))?;

        if let Some(q) = body.question {
            faq.question = q;
        }
        if let Some(a) = body.answer {
            faq.answer = a;
        }
        if let Some(c) = body.category {
            faq.category = c;
        }
        if let Some(o) = body.display_order {
            faq.display_order = o;
        }
        if let Some(active) = body.is_active {
            faq.is_active = active;
        }

        queries::update_faq(&db, &faq)?;
        faq
    };

    Ok(Json(serde_json::json!(faq)))
}

// DELETE /api/faqs/:id
pub async fn delete_faq(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_faq(&db, &id)?
    };

    if !deleted {
        return Err(AppError::NotFound("FAQ not found".to_string()));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "FAQ deleted successfully",
    })))
}
