use axum::http::HeaderMap;

use crate::auth::JwtManager;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::User;
use crate::state::AppState;

/// Resolve the bearer token in `headers` to a live account.
///
/// Missing or invalid credentials are 401; a token whose account no
/// longer exists is 403.
pub fn require_user(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let token = auth.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

    let jwt = JwtManager::new(state.config.jwt_secret.as_bytes(), state.config.jwt_ttl_secs);
    let claims = jwt.validate(token).map_err(|_| AppError::Unauthorized)?;

    let user = {
        let db = state.db.lock().unwrap();
        queries::get_user_by_id(&db, &claims.sub)?
    };

    user.ok_or_else(|| AppError::Forbidden("account no longer exists".to_string()))
}

/// Like [`require_user`], but the resolved account must be an admin.
pub fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let user = require_user(state, headers)?;
    if !user.is_admin() {
        return Err(AppError::Forbidden("admin access required".to_string()));
    }
    Ok(user)
}
