use std::sync::Arc;

use reqwest::{multipart::Form, Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{
    auth::session::read_token,
    config::ClientConfig,
    error::{fallback, ClientError, ClientResult},
    storage::SecureStore,
};

/// Whether a request carries the stored bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    Public,
    Bearer,
}

pub enum Payload {
    Empty,
    Json(Value),
    Multipart(Form),
}

impl Payload {
    pub fn json<T: Serialize>(body: &T) -> ClientResult<Self> {
        serde_json::to_value(body)
            .map(Payload::Json)
            .map_err(|e| ClientError::InvalidRequest(format!("encode request body: {e}")))
    }
}

/// Successful (2xx) response with its body parsed as JSON.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

/// HTTP access to the backend. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<dyn SecureStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn SecureStore>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("build http client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(
        &self,
        path: &str,
        auth: Auth,
        fallback_message: &str,
    ) -> ClientResult<ApiResponse> {
        self.send(Method::GET, path, Payload::Empty, auth, fallback_message)
            .await
    }

    pub async fn post(
        &self,
        path: &str,
        payload: Payload,
        auth: Auth,
        fallback_message: &str,
    ) -> ClientResult<ApiResponse> {
        self.send(Method::POST, path, payload, auth, fallback_message).await
    }

    /// Sends one request. Never retries; the configured timeout covers the
    /// whole exchange including reading the body.
    #[instrument(skip(self, payload, fallback_message))]
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        auth: Auth,
        fallback_message: &str,
    ) -> ClientResult<ApiResponse> {
        let mut request = self.http.request(method, self.url(path));

        if auth == Auth::Bearer {
            if let Some(token) = read_token(self.store.as_ref()).await {
                request = request.bearer_auth(token);
            }
        }

        request = match payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(&body),
            Payload::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let raw = response.bytes().await.map_err(transport_error)?;
        let body = parse_body(&raw);
        debug!(status = status.as_u16(), "response received");

        if status.is_success() {
            return Ok(ApiResponse {
                status: status.as_u16(),
                body,
            });
        }

        let server_message = message_of(&body);
        warn!(status = status.as_u16(), message = ?server_message, "request failed");

        if status == StatusCode::UNAUTHORIZED && auth == Auth::Bearer {
            return Err(ClientError::Unauthorized {
                message: server_message.unwrap_or_else(|| fallback::SESSION_EXPIRED.to_string()),
            });
        }
        Err(ClientError::Server {
            status: status.as_u16(),
            message: server_message.unwrap_or_else(|| fallback_message.to_string()),
        })
    }
}

fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        warn!("request timed out");
        ClientError::Timeout
    } else {
        warn!(error = %e, "transport failure");
        ClientError::Network(e.to_string())
    }
}

/// Empty or non-JSON bodies become `Value::Null`.
fn parse_body(raw: &[u8]) -> Value {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(raw).unwrap_or(Value::Null)
}

fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::json;

    use super::*;
    use crate::{storage::TOKEN_KEY, test_support};

    #[test]
    fn url_joins_without_double_slash() {
        let store: Arc<dyn SecureStore> = Arc::new(crate::storage::MemoryStore::new());
        let api = ApiClient::new(&ClientConfig::for_api("http://h/api/"), store).unwrap();
        assert_eq!(api.url("/meals"), "http://h/api/meals");
        assert_eq!(api.url("login"), "http://h/api/login");
    }

    #[test]
    fn message_is_taken_only_when_non_empty_string() {
        assert_eq!(message_of(&json!({"message": "nope"})).as_deref(), Some("nope"));
        assert_eq!(message_of(&json!({"message": "  "})), None);
        assert_eq!(message_of(&json!({"message": 42})), None);
        assert_eq!(message_of(&Value::Null), None);
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(b"<html>"), Value::Null);
    }

    #[test]
    fn unencodable_body_is_an_invalid_request() {
        let body = std::collections::HashMap::from([((1u8, 2u8), "x")]);
        match Payload::json(&body) {
            Err(err @ ClientError::InvalidRequest(_)) => {
                assert_eq!(err.user_message(), fallback::INVALID_INPUT);
                assert!(!err.is_session_expired());
            }
            Err(other) => panic!("unexpected: {other:?}"),
            Ok(_) => panic!("tuple keys should not encode"),
        }
    }

    #[tokio::test]
    async fn bearer_header_only_on_authorized_calls() {
        let rec = test_support::Recorder::default();
        let router = Router::new().route(
            "/echo",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                Json(json!({ "auth": auth }))
            }),
        );
        let ctx = test_support::context(&test_support::spawn(router, rec).await);
        ctx.store.save(TOKEN_KEY, "abc123").await.unwrap();

        let res = ctx.api.get("/echo", Auth::Bearer, "x").await.unwrap();
        assert_eq!(res.body["auth"], "Bearer abc123");

        let res = ctx.api.get("/echo", Auth::Public, "x").await.unwrap();
        assert_eq!(res.body["auth"], Value::Null);
    }

    #[tokio::test]
    async fn non_success_carries_server_message_or_fallback() {
        let router = Router::new()
            .route(
                "/with-message",
                get(|| async { (StatusCode::BAD_REQUEST, Json(json!({"message": "bad input"}))) }),
            )
            .route("/bare", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/denied", get(|| async { StatusCode::UNAUTHORIZED }));
        let base = test_support::spawn(router, test_support::Recorder::default()).await;
        let ctx = test_support::context(&base);

        match ctx.api.get("/with-message", Auth::Public, "fallback").await {
            Err(ClientError::Server { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad input");
            }
            other => panic!("unexpected: {other:?}"),
        }
        match ctx.api.get("/bare", Auth::Public, "fallback").await {
            Err(ClientError::Server { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "fallback");
            }
            other => panic!("unexpected: {other:?}"),
        }
        match ctx.api.get("/denied", Auth::Bearer, "fallback").await {
            Err(ClientError::Unauthorized { message }) => {
                assert_eq!(message, fallback::SESSION_EXPIRED)
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn stalled_backend_times_out() {
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({}))
            }),
        );
        let base = test_support::spawn(router, test_support::Recorder::default()).await;
        let ctx = test_support::context_with_timeout(&base, Duration::from_millis(200));

        let err = ctx.api.get("/slow", Auth::Public, "x").await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        let ctx = test_support::context("http://127.0.0.1:9/api");
        let err = ctx.api.get("/meals", Auth::Public, "x").await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)), "got {err:?}");
    }
}
