use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::auth::{require_admin, require_user};
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, User};
use crate::services::availability;
use crate::state::AppState;

// POST /api/bookings
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let caller = require_user(&state, &headers)?;

    let name = body.name.as_deref().map(str::trim).unwrap_or("");
    let email = body.email.as_deref().map(str::trim).unwrap_or("");
    let phone = body.phone.as_deref().map(str::trim).unwrap_or("");
    let service = body.service.as_deref().map(str::trim).unwrap_or("");
    let date_raw = body.date.as_deref().unwrap_or("");
    let time = body.time.as_deref().map(str::trim).unwrap_or("");

    if name.is_empty()
        || email.is_empty()
        || phone.is_empty()
        || service.is_empty()
        || date_raw.is_empty()
        || time.is_empty()
    {
        return Err(AppError::Validation(
            "all required fields must be filled".to_string(),
        ));
    }

    let date = availability::parse_day(date_raw)
        .ok_or_else(|| AppError::Validation("invalid date format".to_string()))?;

    // A slot outside the template could never show up as available.
    if !availability::is_template_slot(time) {
        return Err(AppError::Validation(
            "time must be one of the daily slots".to_string(),
        ));
    }

    let now = chrono::Utc::now().naive_utc();
    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        // Ownership is always the caller, never client-supplied.
        user_id: caller.id.clone(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        service: service.to_string(),
        date,
        time: time.to_string(),
        status: BookingStatus::Pending,
        notes: body.notes,
        created_at: now,
        updated_at: now,
    };

    {
        let db = state.db.lock().unwrap();
        match queries::create_booking(&db, &booking) {
            Ok(()) => {}
            // The partial unique index on live (date, time) slots makes
            // check-and-insert a single atomic write; a violation means
            // a concurrent or earlier booking holds the slot.
            Err(e) if queries::is_unique_violation(&e) => {
                return Err(AppError::Conflict(
                    "this time slot is already booked".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(booking_id = %booking.id, user_id = %caller.id, date = %date, time, "booking created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "booking created successfully",
            "booking": booking,
        })),
    ))
}

// GET /api/bookings/my-bookings
pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let caller = require_user(&state, &headers)?;

    let bookings = {
        let db = state.db.lock().unwrap();
        queries::get_bookings_for_user(&db, &caller.id)?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "bookings": bookings,
    })))
}

// GET /api/bookings/all
#[derive(Deserialize)]
pub struct AllBookingsQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn all_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<AllBookingsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let status_filter = query.status.as_deref();

    let (bookings, total) = {
        let db = state.db.lock().unwrap();
        let bookings = queries::get_all_bookings(&db, status_filter, page, limit)?;
        let total = queries::count_bookings(&db, status_filter)?;
        (bookings, total)
    };

    let total_pages = (total + limit - 1) / limit;

    Ok(Json(serde_json::json!({
        "success": true,
        "bookings": bookings,
        "pagination": {
            "currentPage": page,
            "totalPages": total_pages,
            "totalBookings": total,
        },
    })))
}

/// Owner-or-admin rule shared by update and delete.
fn check_ownership(caller: &User, booking: &Booking) -> Result<(), AppError> {
    if !caller.is_admin() && booking.user_id != caller.id {
        return Err(AppError::Forbidden(
            "you may only modify your own bookings".to_string(),
        ));
    }
    Ok(())
}

// PATCH /api/bookings/:id
#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateBookingRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let caller = require_user(&state, &headers)?;

    // Any status may move to any other; transitions are deliberately
    // unrestricted beyond the enum itself.
    let status = match body.status.as_deref() {
        Some(raw) => Some(
            BookingStatus::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("unknown status: {raw}")))?,
        ),
        None => None,
    };

    let updated = {
        let db = state.db.lock().unwrap();

        let booking = queries::get_booking_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("booking not found".to_string()))?;
        check_ownership(&caller, &booking)?;

        match queries::update_booking(&db, &id, status, body.notes.as_deref()) {
            Ok(_) => {}
            // Re-activating a cancelled booking whose slot was retaken.
            Err(e) if queries::is_unique_violation(&e) => {
                return Err(AppError::Conflict(
                    "this time slot is already booked".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        queries::get_booking_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("booking not found".to_string()))?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "booking updated successfully",
        "booking": updated,
    })))
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let caller = require_user(&state, &headers)?;

    {
        let db = state.db.lock().unwrap();

        let booking = queries::get_booking_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("booking not found".to_string()))?;
        check_ownership(&caller, &booking)?;

        queries::delete_booking(&db, &id)?;
    }

    tracing::info!(booking_id = %id, user_id = %caller.id, "booking deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "booking deleted successfully",
    })))
}

// GET /api/bookings/available-times/:date
pub async fn available_times(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let day = availability::parse_day(&date)
        .ok_or_else(|| AppError::Validation("invalid date format".to_string()))?;

    let avail = {
        let db = state.db.lock().unwrap();
        availability::for_date(&db, day)?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "availableTimes": avail.available_times,
        "bookedTimes": avail.booked_times,
    })))
}
