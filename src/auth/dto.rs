use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Request body for login.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

/// Request body for registration.
#[derive(Clone, Serialize)]
pub struct RegisterRequest {
    pub nome: String,
    pub email: String,
    pub senha: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("senha", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("nome", &self.nome)
            .field("email", &self.email)
            .field("senha", &"<redacted>")
            .finish()
    }
}

/// Pulls the session token out of a login response body.
///
/// Only a non-empty JSON string counts; absent, null, empty or non-string
/// values yield `None`.
pub fn token_from_login_body(body: &Value) -> Option<String> {
    match body.get("token") {
        Some(Value::String(token)) if !token.trim().is_empty() => Some(token.clone()),
        _ => None,
    }
}
