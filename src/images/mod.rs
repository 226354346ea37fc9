mod asset;

pub use asset::{ext_from_mime, mime_from_ext, ImageAsset, ALLOWED_MIME_TYPES, MAX_IMAGE_BYTES};
