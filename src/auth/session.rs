use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use crate::{
    api::{ApiClient, Auth, Payload},
    auth::{
        dto::{token_from_login_body, LoginRequest, RegisterRequest},
        validation::{validate_login, validate_register},
    },
    error::{fallback, ClientError, ClientResult},
    storage::{SecureStore, TOKEN_KEY},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

/// Reads the stored token. Store failures are logged and read as "no token";
/// an empty string also counts as absent.
pub(crate) async fn read_token(store: &dyn SecureStore) -> Option<String> {
    match store.get(TOKEN_KEY).await {
        Ok(Some(token)) if !token.trim().is_empty() => Some(token),
        Ok(_) => None,
        Err(e) => {
            error!(error = %e, "reading session token failed");
            None
        }
    }
}

/// Owns the single stored session token.
///
/// Validity is a local presence check only: a stored token that the backend
/// has revoked or expired still reads as valid until a request comes back 401.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SecureStore>,
    api: ApiClient,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SecureStore>, api: ApiClient) -> Self {
        Self { store, api }
    }

    /// Logs in and stores the returned token.
    ///
    /// The token is written only after a 2xx response carrying a non-empty
    /// string `token`; any other success body is `MalformedResponse` and
    /// leaves the store untouched.
    #[instrument(skip(self, senha))]
    pub async fn login(&self, email: &str, senha: &str) -> ClientResult<()> {
        let payload = LoginRequest {
            email: email.trim().to_string(),
            senha: senha.to_string(),
        };
        let errors = validate_login(&payload.email, &payload.senha);
        if !errors.is_empty() {
            warn!(fields = errors.len(), "login form rejected");
            return Err(ClientError::Validation(errors));
        }

        let res = self
            .api
            .post("/login", Payload::json(&payload)?, Auth::Public, fallback::LOGIN)
            .await?;

        let Some(token) = token_from_login_body(&res.body) else {
            warn!(status = res.status, "login succeeded without a usable token");
            return Err(ClientError::MalformedResponse(
                fallback::INVALID_TOKEN.to_string(),
            ));
        };

        self.store.save(TOKEN_KEY, &token).await?;
        info!(email = %payload.email, "user logged in");
        Ok(())
    }

    /// Creates an account. Does not authenticate; nothing is stored.
    #[instrument(skip(self, senha))]
    pub async fn register(&self, nome: &str, email: &str, senha: &str) -> ClientResult<()> {
        let payload = RegisterRequest {
            nome: nome.trim().to_string(),
            email: email.trim().to_string(),
            senha: senha.to_string(),
        };
        let errors = validate_register(&payload.nome, &payload.email, &payload.senha);
        if !errors.is_empty() {
            warn!(fields = errors.len(), "register form rejected");
            return Err(ClientError::Validation(errors));
        }

        self.api
            .post(
                "/users",
                Payload::json(&payload)?,
                Auth::Public,
                fallback::REGISTER,
            )
            .await?;
        info!(email = %payload.email, "user registered");
        Ok(())
    }

    /// Deletes the stored token. Safe to call when already logged out.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> ClientResult<()> {
        self.store.delete(TOKEN_KEY).await?;
        info!("session cleared");
        Ok(())
    }

    pub async fn get_token(&self) -> Option<String> {
        read_token(self.store.as_ref()).await
    }

    /// True iff a non-empty token is stored. Does not contact the backend.
    pub async fn is_token_valid(&self) -> bool {
        self.get_token().await.is_some()
    }

    pub async fn state(&self) -> AuthState {
        if self.is_token_valid().await {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    /// Token for an authenticated operation, or `NotAuthenticated` without
    /// touching the network.
    pub async fn require_token(&self) -> ClientResult<String> {
        self.get_token().await.ok_or(ClientError::NotAuthenticated)
    }

    /// Drops a session the backend no longer accepts.
    pub(crate) async fn invalidate(&self) {
        match self.store.delete(TOKEN_KEY).await {
            Ok(()) => warn!("session rejected by backend; token cleared"),
            Err(e) => error!(error = %e, "clearing rejected session token failed"),
        }
    }
}
