use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::auth::{password, JwtManager};
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::state::AppState;

fn jwt(state: &AppState) -> JwtManager {
    JwtManager::new(state.config.jwt_secret.as_bytes(), state.config.jwt_ttl_secs)
}

fn user_json(user: &User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "phone": user.phone,
        "role": user.role,
    })
}

// POST /api/auth/register
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = body.name.as_deref().map(str::trim).unwrap_or("");
    let email = body
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_default();
    let password = body.password.as_deref().unwrap_or("");
    let phone = body.phone.as_deref().map(str::trim).unwrap_or("");

    if name.is_empty() || email.is_empty() || password.is_empty() || phone.is_empty() {
        return Err(AppError::Validation("all fields are required".to_string()));
    }

    let password_hash = password::hash_password(password)
        .map_err(|e| AppError::Storage(anyhow::anyhow!("password hashing failed: {e}")))?;

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        email,
        password_hash,
        phone: phone.to_string(),
        role: Role::User,
        created_at: chrono::Utc::now().naive_utc(),
    };

    {
        let db = state.db.lock().unwrap();
        match queries::create_user(&db, &user) {
            Ok(()) => {}
            // The unique email index is the authority on duplicates.
            Err(e) if queries::is_unique_violation(&e) => {
                return Err(AppError::Validation("user already exists".to_string()));
            }
            Err(e) => return Err(e.into()),
        }
    }

    let token = jwt(&state)
        .issue(&user.id, user.role)
        .map_err(|e| AppError::Storage(anyhow::anyhow!("token issuance failed: {e}")))?;

    tracing::info!(user_id = %user.id, "registered new user");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "token": token,
            "user": user_json(&user),
        })),
    ))
}

// POST /api/auth/login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

fn verify_credentials(state: &AppState, body: &LoginRequest) -> Result<User, AppError> {
    let email = body
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_default();
    let password = body.password.as_deref().unwrap_or("");

    let user = {
        let db = state.db.lock().unwrap();
        queries::get_user_by_email(&db, &email)?
    };

    // Same error for an unknown email and a bad password.
    let user = user.ok_or(AppError::Unauthorized)?;
    let ok = password::verify_password(password, &user.password_hash)
        .map_err(|_| AppError::Unauthorized)?;
    if !ok {
        return Err(AppError::Unauthorized);
    }
    Ok(user)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = verify_credentials(&state, &body)?;

    let token = jwt(&state)
        .issue(&user.id, user.role)
        .map_err(|e| AppError::Storage(anyhow::anyhow!("token issuance failed: {e}")))?;

    Ok(Json(serde_json::json!({
        "token": token,
        "user": user_json(&user),
    })))
}

// POST /api/auth/admin/login
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = verify_credentials(&state, &body)?;
    if !user.is_admin() {
        return Err(AppError::Unauthorized);
    }

    let token = jwt(&state)
        .issue(&user.id, user.role)
        .map_err(|e| AppError::Storage(anyhow::anyhow!("token issuance failed: {e}")))?;

    Ok(Json(serde_json::json!({
        "token": token,
        "user": user_json(&user),
    })))
}
