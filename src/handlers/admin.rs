use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::auth::require_admin;
use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

// GET /api/admin/dashboard/stats
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let stats = {
        let db = state.db.lock().unwrap();
        queries::get_dashboard_stats(&db)?
    };

    let service_stats: Vec<serde_json::Value> = stats
        .service_stats
        .iter()
        .map(|(service, count)| serde_json::json!({ "service": service, "count": count }))
        .collect();

    Ok(Json(serde_json::json!({
        "success": true,
        "stats": {
            "totalUsers": stats.total_users,
            "totalBookings": stats.total_bookings,
            "pendingBookings": stats.pending_bookings,
            "confirmedBookings": stats.confirmed_bookings,
            "totalPosts": stats.total_posts,
            "monthlyBookings": stats.monthly_bookings,
            "serviceStats": service_stats,
        },
    })))
}

// GET /api/admin/users
#[derive(Deserialize)]
pub struct UsersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<UsersQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let (users, total) = {
        let db = state.db.lock().unwrap();
        let users = queries::list_users(&db, page, limit)?;
        let total = queries::count_users(&db)?;
        (users, total)
    };

    let total_pages = (total + limit - 1) / limit;

    // `User` never serializes its password hash.
    Ok(Json(serde_json::json!({
        "success": true,
        "users": users,
        "pagination": {
            "currentPage": page,
            "totalPages": total_pages,
            "totalUsers": total,
        },
    })))
}
