//! Picture attachment storage.
//!
//! The gram controller only needs to put an upload and later remove it by
//! key; where the bytes live is up to the [`PictureStore`] implementation.

pub mod disk;
pub mod memory;

pub use disk::DiskPictureStore;
pub use memory::MemoryPictureStore;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::grams::model::Picture;

#[derive(Debug, Error)]
pub enum PictureError {
    #[error("picture storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid picture key: {0}")]
    InvalidKey(String),
}

/// Submitted picture bytes before storage
#[derive(Clone)]
pub struct PictureUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PictureUpload {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

// Keep request bodies out of logs
impl std::fmt::Debug for PictureUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PictureUpload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Stored picture bytes together with their content type
#[derive(Debug, Clone)]
pub struct StoredPicture {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait PictureStore: Send + Sync {
    async fn put(&self, upload: PictureUpload) -> Result<Picture, PictureError>;

    async fn get(&self, key: &str) -> Result<Option<StoredPicture>, PictureError>;

    /// Removing an unknown key is not an error
    async fn remove(&self, key: &str) -> Result<(), PictureError>;
}

/// Fresh storage key: random stem plus an extension derived from the content type
pub fn new_key(content_type: &str) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), extension_for(content_type))
}

pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

pub fn content_type_for_key(key: &str) -> &'static str {
    match key.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Keys are generated by [`new_key`]; anything else is refused before touching storage
pub fn validate_key(key: &str) -> Result<(), PictureError> {
    let valid = !key.is_empty()
        && key.len() <= 64
        && !key.starts_with('.')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '.');
    if valid {
        Ok(())
    } else {
        Err(PictureError::InvalidKey(key.to_string()))
    }
}

pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Metadata record for an upload stored under `key`
pub(crate) fn describe(key: String, upload: &PictureUpload) -> Picture {
    Picture {
        key,
        filename: upload.filename.clone(),
        content_type: upload.content_type.clone(),
        size: upload.bytes.len() as u64,
        digest: digest(&upload.bytes),
    }
}
