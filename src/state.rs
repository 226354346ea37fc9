use std::sync::Arc;

use crate::{
    api::ApiClient,
    auth::SessionManager,
    config::ClientConfig,
    error::ClientResult,
    storage::{FileStore, MemoryStore, SecureStore},
};

/// Everything an operation needs, passed explicitly instead of living in a
/// global. Clones share the same store and HTTP connection pool.
#[derive(Clone)]
pub struct ClientContext {
    pub config: Arc<ClientConfig>,
    pub store: Arc<dyn SecureStore>,
    pub api: ApiClient,
    pub session: SessionManager,
}

impl ClientContext {
    /// Context backed by the on-disk session file at `config.store_path`.
    pub fn init(config: ClientConfig) -> ClientResult<Self> {
        let store = Arc::new(FileStore::new(config.store_path.clone())) as Arc<dyn SecureStore>;
        Self::from_parts(config, store)
    }

    pub fn from_parts(config: ClientConfig, store: Arc<dyn SecureStore>) -> ClientResult<Self> {
        let api = ApiClient::new(&config, store.clone())?;
        let session = SessionManager::new(store.clone(), api.clone());
        Ok(Self {
            config: Arc::new(config),
            store,
            api,
            session,
        })
    }

    pub fn in_memory(config: ClientConfig) -> ClientResult<Self> {
        Self::from_parts(config, Arc::new(MemoryStore::new()))
    }
}
