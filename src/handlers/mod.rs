pub mod admin;
pub mod auth;
pub mod blog;
pub mod bookings;
pub mod contact;
pub mod doctors;
pub mod faqs;
pub mod health;
pub mod services;

use std::sync::Arc;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;

use crate::state::AppState;

/// The full API route table, shared by the server binary and the
/// integration tests.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/admin/login", post(auth::admin_login))
        .route("/api/bookings", post(bookings::create_booking))
        .route("/api/bookings/my-bookings", get(bookings::my_bookings))
        .route("/api/bookings/all", get(bookings::all_bookings))
        .route(
            "/api/bookings/available-times/:date",
            get(bookings::available_times),
        )
        .route("/api/bookings/:id", patch(bookings::update_booking))
        .route("/api/bookings/:id", delete(bookings::delete_booking))
        .route("/api/services", get(services::list_services))
        .route("/api/services/:id", get(services::get_service))
        .route("/api/contact", post(contact::submit_message))
        .route("/api/contact/admin", get(contact::list_messages))
        .route("/api/contact/admin/:id", get(contact::get_message))
        .route("/api/contact/admin/:id/status", put(contact::update_status))
        .route("/api/contact/admin/:id/reply", put(contact::mark_replied))
        .route("/api/contact/admin/:id", delete(contact::delete_message))
        .route("/api/faqs", get(faqs::list_faqs))
        .route("/api/faqs/category/:category", get(faqs::list_by_category))
        .route("/api/faqs", post(faqs::create_faq))
        .route("/api/faqs/:id", put(faqs::update_faq))
        .route("/api/faqs/:id", delete(faqs::delete_faq))
        .route("/api/doctors", get(doctors::list_doctors))
        .route("/api/doctors/:id", get(doctors::get_doctor))
        .route("/api/doctors", post(doctors::create_doctor))
        .route("/api/doctors/:id", put(doctors::update_doctor))
        .route("/api/doctors/:id", delete(doctors::delete_doctor))
        .route("/api/blog", get(blog::list_posts))
        .route("/api/blog/:id", get(blog::get_post))
        .route("/api/blog", post(blog::create_post))
        .route("/api/blog/:id", put(blog::update_post))
        .route("/api/blog/:id", delete(blog::delete_post))
        .route("/api/admin/dashboard/stats", get(admin::dashboard_stats))
        .route("/api/admin/users", get(admin::list_users))
        .with_state(state)
}
