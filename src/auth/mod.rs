mod dto;
pub mod session;
pub mod validation;

pub use dto::{token_from_login_body, LoginRequest, RegisterRequest};
pub use session::{AuthState, SessionManager};
