use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use directories::ProjectDirs;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const STORE_FILE: &str = "session.json";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout: Duration,
    pub store_path: PathBuf,
}

impl ClientConfig {
    /// Reads `MEALMIND_API_URL`, `MEALMIND_TIMEOUT_SECS` and
    /// `MEALMIND_STORE_PATH`. Unset or unparsable values fall back to defaults;
    /// a zero timeout counts as unparsable.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_url = var("MEALMIND_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let request_timeout = Duration::from_secs(
            var("MEALMIND_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );
        let store_path = match var("MEALMIND_STORE_PATH") {
            Some(path) => PathBuf::from(path),
            None => default_store_path().context("resolve default session store path")?,
        };
        Ok(Self {
            api_url,
            request_timeout,
            store_path,
        })
    }

    /// Config pointing at `api_url` with default timeout; store path is left
    /// to the caller when no file store is used.
    pub fn for_api(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            store_path: PathBuf::from(STORE_FILE),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn default_store_path() -> anyhow::Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "mealmind")
        .context("no home directory available for the session store")?;
    Ok(dirs.data_dir().join(STORE_FILE))
}
