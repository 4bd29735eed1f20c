pub mod guard;
pub mod jwt;
pub mod password;

pub use guard::{require_admin, require_user};
pub use jwt::{Claims, JwtManager};
