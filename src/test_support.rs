//! Stub backend for exercising the client over real HTTP.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tokio::net::TcpListener;

use crate::{config::ClientConfig, state::ClientContext};

/// Counts requests reaching the stub and keeps their `Authorization` headers.
#[derive(Clone, Default)]
pub(crate) struct Recorder {
    hits: Arc<AtomicUsize>,
    authorization: Arc<Mutex<Vec<Option<String>>>>,
}

impl Recorder {
    pub(crate) fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub(crate) fn last_authorization(&self) -> Option<String> {
        self.authorization
            .lock()
            .unwrap()
            .last()
            .cloned()
            .flatten()
    }
}

async fn record(State(rec): State<Recorder>, req: Request, next: Next) -> Response {
    rec.hits.fetch_add(1, Ordering::SeqCst);
    let auth = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    rec.authorization.lock().unwrap().push(auth);
    next.run(req).await
}

/// Serves `router` under `/api` on an ephemeral port and returns the base URL.
pub(crate) async fn spawn(router: Router<Recorder>, rec: Recorder) -> String {
    let app = Router::new().nest(
        "/api",
        router
            .layer(middleware::from_fn_with_state(rec.clone(), record))
            .with_state(rec),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });
    format!("http://{addr}/api")
}

pub(crate) fn context(base_url: &str) -> ClientContext {
    context_with_timeout(base_url, Duration::from_secs(2))
}

pub(crate) fn context_with_timeout(base_url: &str, timeout: Duration) -> ClientContext {
    ClientContext::in_memory(ClientConfig::for_api(base_url).with_timeout(timeout))
        .expect("test context")
}
