use thiserror::Error;

use crate::storage::StoreError;

/// Generic user-facing messages used when the backend supplies none.
pub mod fallback {
    pub const LOGIN: &str = "Erro ao fazer login";
    pub const REGISTER: &str = "Erro ao registrar";
    pub const LIST_MEALS: &str = "Falha ao carregar refeições";
    pub const CREATE_MEAL: &str = "Não foi possível adicionar a refeição";
    pub const NETWORK: &str = "Erro de rede";
    pub const TIMEOUT: &str = "O servidor demorou muito para responder";
    pub const NOT_AUTHENTICATED: &str = "Você precisa estar logado";
    pub const SESSION_EXPIRED: &str = "Sessão expirada, faça login novamente";
    pub const INVALID_TOKEN: &str = "Token inválido recebido do servidor";
    pub const STORAGE: &str = "Falha ao acessar o armazenamento local";
    pub const INVALID_INPUT: &str = "Dados inválidos";
}

/// One failed field check from a form validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Failure side of every client operation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client-side field checks failed; nothing was sent.
    #[error("validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    /// No token stored locally; nothing was sent.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Backend rejected the bearer token.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// 2xx response without the fields the contract requires.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request could not be built from the given input; nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ClientError {
    /// Text suitable for showing to the user as-is.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(fields) => fields
                .first()
                .map(|f| f.message.clone())
                .unwrap_or_else(|| fallback::INVALID_INPUT.to_string()),
            ClientError::Network(_) => fallback::NETWORK.to_string(),
            ClientError::Timeout => fallback::TIMEOUT.to_string(),
            ClientError::NotAuthenticated => fallback::NOT_AUTHENTICATED.to_string(),
            ClientError::Unauthorized { message } | ClientError::Server { message, .. } => {
                message.clone()
            }
            ClientError::MalformedResponse(msg) => msg.clone(),
            ClientError::InvalidRequest(_) => fallback::INVALID_INPUT.to_string(),
            ClientError::Storage(_) => fallback::STORAGE.to_string(),
        }
    }

    /// True when the caller should drop the session and ask for a new login.
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            ClientError::NotAuthenticated | ClientError::Unauthorized { .. }
        )
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type ClientResult<T> = Result<T, ClientError>;
