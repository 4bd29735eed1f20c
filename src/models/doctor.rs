use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A practitioner profile shown on the website. Doctors are
/// admin-managed content; they do not carry credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub bio: String,
    pub experience_years: i64,
    pub education: Option<String>,
    pub profile_image: Option<String>,
    pub certificates: Vec<Certificate>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub name: String,
    pub institution: String,
    pub year: i64,
    pub image: Option<String>,
}
