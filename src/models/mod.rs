pub mod blog;
pub mod booking;
pub mod contact;
pub mod doctor;
pub mod faq;
pub mod service;
pub mod user;

pub use blog::BlogPost;
pub use booking::{Booking, BookingStatus};
pub use contact::{ContactMessage, ContactStatus};
pub use doctor::{Certificate, Doctor};
pub use faq::Faq;
pub use service::Service;
pub use user::{Role, User};
