use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult, FieldError};

/// Upload ceiling for a meal photo.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

const FIELD: &str = "image";

/// A local photo picked for upload but not yet sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub path: PathBuf,
    pub file_name: String,
    pub mime: String,
    pub size: u64,
}

impl ImageAsset {
    pub fn new(path: impl Into<PathBuf>, mime: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        let mime = mime.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("image.{}", ext_from_mime(&mime).unwrap_or("bin")));
        Self {
            path,
            file_name,
            mime,
            size,
        }
    }

    /// Builds an asset from a file on disk: size from metadata, MIME type
    /// from the extension (`application/octet-stream` when unknown).
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path).await.map_err(|e| {
            warn!(error = %e, path = %path.display(), "image metadata unavailable");
            unreadable()
        })?;
        if !meta.is_file() {
            return Err(unreadable());
        }
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_from_ext)
            .unwrap_or("application/octet-stream");
        Ok(Self::new(path, mime, meta.len()))
    }

    /// MIME whitelist and size ceiling. Empty means acceptable.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !ALLOWED_MIME_TYPES.contains(&self.mime.to_ascii_lowercase().as_str()) {
            errors.push(FieldError::new(FIELD, "A imagem deve ser JPEG ou PNG"));
        }
        if self.size > MAX_IMAGE_BYTES {
            errors.push(too_large());
        }
        errors
    }

    /// Reads the file for upload, re-checking the size actually on disk.
    pub(crate) async fn read(&self) -> ClientResult<Bytes> {
        let data = tokio::fs::read(&self.path).await.map_err(|e| {
            warn!(error = %e, path = %self.path.display(), "image read failed");
            unreadable()
        })?;
        if data.len() as u64 > MAX_IMAGE_BYTES {
            return Err(ClientError::Validation(vec![too_large()]));
        }
        debug!(bytes = data.len(), mime = %self.mime, "image loaded");
        Ok(Bytes::from(data))
    }
}

fn too_large() -> FieldError {
    FieldError::new(FIELD, "A imagem deve ter no máximo 5 MB")
}

fn unreadable() -> ClientError {
    ClientError::Validation(vec![FieldError::new(
        FIELD,
        "Não foi possível ler a imagem selecionada",
    )])
}

pub fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        _ => None,
    }
}

pub fn mime_from_ext(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}
