use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::auth::require_admin;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Certificate, Doctor};
use crate::state::AppState;

// GET /api/doctors
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let doctors = {
        let db = state.db.lock().unwrap();
        queries::list_doctors(&db)?
    };
    Ok(Json(serde_json::json!(doctors)))
}

// GET /api/doctors/:id
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let doctor = {
        let db = state.db.lock().unwrap();
        queries::get_doctor_by_id(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound("doctor not found".to_string()))?;

    Ok(Json(serde_json::json!(doctor)))
}

// POST /api/doctors
#[derive(Deserialize)]
pub struct CreateDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    #[serde(rename = "experienceYears")]
    pub experience_years: Option<i64>,
    pub education: Option<String>,
    #[serde(rename = "profileImage")]
    pub profile_image: Option<String>,
    pub certificates: Option<Vec<Certificate>>,
}

pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateDoctorRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_admin(&state, &headers)?;

    let name = body.name.as_deref().map(str::trim).unwrap_or("");
    let specialization = body.specialization.as_deref().map(str::trim).unwrap_or("");
    let bio = body.bio.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() || specialization.is_empty() || bio.is_empty() {
        return Err(AppError::Validation(
            "name, specialization and bio are required".to_string(),
        ));
    }

    let doctor = Doctor {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        specialization: specialization.to_string(),
        bio: bio.to_string(),
        experience_years: body.experience_years.unwrap_or(0),
        education: body.education,
        profile_image: body.profile_image,
        certificates: body.certificates.unwrap_or_default(),
        created_at: chrono::Utc::now().naive_utc(),
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_doctor(&db, &doctor)?;
    }

    Ok((StatusCode::CREATED, Json(serde_json::json!(doctor))))
}

// PUT /api/doctors/:id
#[derive(Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub bio: Option<String>,
    #[serde(rename = "experienceYears")]
    pub experience_years: Option<i64>,
    pub education: Option<String>,
    #[serde(rename = "profileImage")]
    pub profile_image: Option<String>,
    pub certificates: Option<Vec<Certificate>>,
}

pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateDoctorRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let doctor = {
        let db = state.db.lock().unwrap();

        let mut doctor = queries::get_doctor_by_id(&db, &id)?
            .ok_or_else(|| AppError::NotFound("doctor not found".to_string()))?;

        if let Some(n) = body.name {
            doctor.name = n;
        }
        if let Some(s) = body.specialization {
            doctor.specialization = s;
        }
        if let Some(b) = body.bio {
            doctor.bio = b;
        }
        if let Some(e) = body.experience_years {
            doctor.experience_years = e;
        }
        if body.education.is_some() {
            doctor.education = body.education;
        }
        if body.profile_image.is_some() {
            doctor.profile_image = body.profile_image;
        }
        if let Some(certs) = body.certificates {
            doctor.certificates = certs;
        }

        queries::update_doctor(&db, &doctor)?;
        doctor
    };

    Ok(Json(serde_json::json!(doctor)))
}

// DELETE /api/doctors/:id
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_admin(&state, &headers)?;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_doctor(&db, &id)?
    };

    if !deleted {
        return Err(AppError::NotFound("doctor not found".to_string()));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "doctor deleted successfully",
    })))
}
