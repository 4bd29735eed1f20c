use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::auth::require_admin;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::BlogPost;
use crate::state::AppState;

// GET /api/blog
#[derive(Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(9).clamp(1, 100);
    let category = query.category.as_deref();
    let tag = query.tag.as_deref();

    let (posts, total) = {
        let db = state.db.lock().unwrap();
        let posts = queries::list_published_posts(&db, category, tag, page, limit)?;
        let total = queries::count_published_posts(&db, category, tag)?;
        (posts, total)
    };

    let total_pages = (total + limit - 1) / limit;

    Ok(Json(serde_json::json!({
        "posts": posts,
        "totalPages": total_pages,
        "currentPage": page,
        "total": total,
    })))
}

// GET /api/blog/:id
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let post = {
        let db = state.db.lock().unwrap();
        queries::get_post_by_id(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    // Drafts are only visible to admins; hide their existence otherwise.
    if !post.is_published {
        require_admin(&state, &headers)
            .map_err(|_| AppError::NotFound("post not found".to_string()))?;
    }

    Ok(Json(serde_json::json!(post)))
}

// POST /api/blog
#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(rename = "isPublished")]
    pub is_published: Option<bool>,
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&state, &headers)?;

    let title = body.title.as_deref().map(str::trim).unwrap_or("");
    let content = body.content.as_deref().unwrap_or("");
    if title.is_empty() || content.is_empty() {
        return Err(AppError::Validation(
            "title and content are required".to_string(),
        ));
    }

    let now = chrono::Utc::now().naive_utc();
    let is_published = body.is_published.unwrap_or(false);

    let post = BlogPost {
        id: uuid::Uuid::new_v4().to_string(),
        title: title.to_string(),
        content: content.to_string(),
        excerpt: body.excerpt,
        category: body.category,
        tags: body.tags.unwrap_or_default(),
        is_published,
        published_at: is_published.then_some(now),
        created_at: now,
        updated_at: now,
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_post(&db, &post)?;
    }

    Ok((StatusCode::CREATED, Json(serde_json::json!(post))))
}

// PUT /api/blog/:id
#[derive(Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    #[serde(rename = "isPublished")]
    pub is_published: Option<bool>,
}

pub async fn update_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdatePostRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let post = {
        let db = state.db.lock().unwrap();

        let mut post = queries::get_post_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        if let Some(t) = body.title {
            post.title = t;
        }
        if let Some(c) = body.content {
            post.content = c;
        }
        if body.excerpt.is_some() {
            post.excerpt = body.excerpt;
        }
        if body.category.is_some() {
            post.category = body.category;
        }
        if let Some(tags) = body.tags {
            post.tags = tags;
        }
        if let Some(published) = body.is_published {
            // First publish stamps published_at; republishing keeps it.
            if published && post.published_at.is_none() {
                post.published_at = Some(chrono::Utc::now().naive_utc());
            }
            post.is_published = published;
        }

        queries::update_post(&db, &post)?;
        post
    };

    Ok(Json(serde_json::json!(post)))
}

// DELETE /api/blog/:id
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_post(&db, &id)?
    };

    if !deleted {
        return Err(AppError::NotFound("post not found".to_string()));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "post deleted successfully",
    })))
}
