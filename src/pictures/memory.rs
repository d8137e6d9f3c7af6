use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{describe, new_key, validate_key, PictureError, PictureStore, PictureUpload, StoredPicture};
use crate::grams::model::Picture;

/// Keeps pictures in process memory
#[derive(Default)]
pub struct MemoryPictureStore {
    pictures: RwLock<HashMap<String, StoredPicture>>,
}

impl MemoryPictureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.pictures.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.pictures.read().await.len()
    }
}

#[async_trait]
impl PictureStore for MemoryPictureStore {
    async fn put(&self, upload: PictureUpload) -> Result<Picture, PictureError> {
        let picture = describe(new_key(&upload.content_type), &upload);
        self.pictures.write().await.insert(
            picture.key.clone(),
            StoredPicture {
                content_type: upload.content_type,
                bytes: upload.bytes,
            },
        );
        Ok(picture)
    }

    async fn get(&self, key: &str) -> Result<Option<StoredPicture>, PictureError> {
        validate_key(key)?;
        Ok(self.pictures.read().await.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<(), PictureError> {
        validate_key(key)?;
        self.pictures.write().await.remove(key);
        Ok(())
    }
}
