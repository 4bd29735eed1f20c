use std::sync::{Arc, Mutex};

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use clinic_booking::auth::password;
use clinic_booking::config::AppConfig;
use clinic_booking::db::{self, queries};
use clinic_booking::handlers;
use clinic_booking::models::{Role, User};
use clinic_booking::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    // Admin accounts are provisioned by an explicit idempotent command,
    // never as a side effect of serving traffic.
    if std::env::args().nth(1).as_deref() == Some("provision-admin") {
        return provision_admin(&config);
    }

    let conn = db::init_db(&config.database_url)?;

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
    });

    let app = handlers::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn provision_admin(config: &AppConfig) -> anyhow::Result<()> {
    let email = std::env::var("ADMIN_EMAIL")
        .map(|e| e.trim().to_lowercase())
        .map_err(|_| anyhow::anyhow!("ADMIN_EMAIL must be set"))?;
    let password = std::env::var("ADMIN_PASSWORD")
        .map_err(|_| anyhow::anyhow!("ADMIN_PASSWORD must be set"))?;
    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());

    let conn = db::init_db(&config.database_url)?;

    if let Some(existing) = queries::get_user_by_email(&conn, &email)? {
        if existing.is_admin() {
            tracing::info!(%email, "admin account already provisioned");
            return Ok(());
        }
        anyhow::bail!("a non-admin account already uses {email}");
    }

    let password_hash = password::hash_password(&password)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;

    let admin = User {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        email: email.clone(),
        password_hash,
        phone: std::env::var("ADMIN_PHONE").unwrap_or_default(),
        role: Role::Admin,
        created_at: chrono::Utc::now().naive_utc(),
    };
    queries::create_user(&conn, &admin)?;

    tracing::info!(%email, "admin account created");
    Ok(())
}
