use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{
    content_type_for_key, describe, new_key, validate_key, PictureError, PictureStore, PictureUpload,
    StoredPicture,
};
use crate::grams::model::Picture;

/// Stores each picture as a file under a root directory
pub struct DiskPictureStore {
    root: PathBuf,
}

impl DiskPictureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PictureError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl PictureStore for DiskPictureStore {
    async fn put(&self, upload: PictureUpload) -> Result<Picture, PictureError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let picture = describe(new_key(&upload.content_type), &upload);
        let path = self.path_for(&picture.key)?;
        tokio::fs::write(&path, &upload.bytes).await?;

        tracing::debug!("stored picture {} ({} bytes) at {}", picture.key, picture.size, path.display());
        Ok(picture)
    }

    async fn get(&self, key: &str) -> Result<Option<StoredPicture>, PictureError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(StoredPicture {
                content_type: content_type_for_key(key).to_string(),
                bytes,
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, key: &str) -> Result<(), PictureError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
