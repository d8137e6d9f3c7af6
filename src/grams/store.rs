use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::grams::model::{Gram, GramChanges, GramId, NewGram};

/// Errors from a record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store query failed: {0}")]
    Query(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// 1-based page selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Build from optional query values, clamping into sane bounds
    pub fn clamped(page: Option<u32>, per_page: Option<u32>, default_per_page: u32, max_per_page: u32) -> Self {
        let max = max_per_page.max(1);
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(default_per_page).clamp(1, max),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

/// One page of grams, newest first
#[derive(Debug, Clone, Serialize)]
pub struct GramPage {
    pub grams: Vec<Gram>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

/// CRUD contract consumed by the gram controller
#[async_trait]
pub trait GramStore: Send + Sync {
    async fn list(&self, page: PageRequest) -> Result<GramPage, StoreError>;

    async fn find(&self, id: GramId) -> Result<Option<Gram>, StoreError>;

    async fn create(&self, gram: NewGram) -> Result<Gram, StoreError>;

    /// Returns `None` when the gram no longer exists
    async fn update(&self, id: GramId, changes: GramChanges) -> Result<Option<Gram>, StoreError>;

    /// Returns whether a gram was removed
    async fn delete(&self, id: GramId) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}

/// In-process store; insertion order doubles as creation order
#[derive(Default)]
pub struct MemoryGramStore {
    grams: RwLock<Vec<Gram>>,
}

impl MemoryGramStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently created gram, if any
    pub async fn last(&self) -> Option<Gram> {
        self.grams.read().await.last().cloned()
    }
}

#[async_trait]
impl GramStore for MemoryGramStore {
    async fn list(&self, page: PageRequest) -> Result<GramPage, StoreError> {
        let grams = self.grams.read().await;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = grams
            .iter()
            .rev()
            .skip(skip)
            .take(page.per_page as usize)
            .cloned()
            .collect();

        Ok(GramPage {
            grams: items,
            page: page.page,
            per_page: page.per_page,
            total: grams.len() as u64,
        })
    }

    async fn find(&self, id: GramId) -> Result<Option<Gram>, StoreError> {
        Ok(self.grams.read().await.iter().find(|g| g.id == id).cloned())
    }

    async fn create(&self, gram: NewGram) -> Result<Gram, StoreError> {
        let now = Utc::now();
        let record = Gram {
            id: GramId::new(),
            message: gram.message,
            picture: gram.picture,
            owner: gram.owner,
            created_at: now,
            updated_at: now,
        };
        self.grams.write().await.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: GramId, changes: GramChanges) -> Result<Option<Gram>, StoreError> {
        let mut grams = self.grams.write().await;
        Ok(grams.iter_mut().find(|g| g.id == id).map(|gram| {
            gram.apply(changes);
            gram.clone()
        }))
    }

    async fn delete(&self, id: GramId) -> Result<bool, StoreError> {
        let mut grams = self.grams.write().await;
        let before = grams.len();
        grams.retain(|g| g.id != id);
        Ok(grams.len() != before)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.grams.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grams::model::{Picture, UserId};

    fn new_gram(message: &str, owner: UserId) -> NewGram {
        NewGram {
            message: message.to_string(),
            picture: Picture {
                key: format!("{message}.png"),
                filename: "picture.png".to_string(),
                content_type: "image/png".to_string(),
                size: 3,
                digest: String::new(),
            },
            owner,
        }
    }

    #[test]
    fn page_request_clamps() {
        let p = PageRequest::clamped(Some(0), Some(500), 25, 100);
        assert_eq!(p, PageRequest { page: 1, per_page: 100 });
        let p = PageRequest::clamped(None, None, 25, 100);
        assert_eq!(p.per_page, 25);
        assert_eq!(PageRequest { page: 3, per_page: 10 }.offset(), 20);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_paged() {
        let store = MemoryGramStore::new();
        let owner = UserId::new();
        for m in ["one", "two", "three"] {
            store.create(new_gram(m, owner)).await.unwrap();
        }

        let first = store.list(PageRequest { page: 1, per_page: 2 }).await.unwrap();
        let messages: Vec<_> = first.grams.iter().map(|g| g.message.as_str()).collect();
        assert_eq!(messages, ["three", "two"]);
        assert_eq!(first.total, 3);

        let second = store.list(PageRequest { page: 2, per_page: 2 }).await.unwrap();
        assert_eq!(second.grams.len(), 1);
        assert_eq!(second.grams[0].message, "one");
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_records() {
        let store = MemoryGramStore::new();
        let gram = store.create(new_gram("initial value", UserId::new())).await.unwrap();

        let changed = store
            .update(gram.id, GramChanges { message: "changed".to_string(), picture: None })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(changed.message, "changed");
        assert_eq!(changed.owner, gram.owner);

        assert!(store.delete(gram.id).await.unwrap());
        assert!(!store.delete(gram.id).await.unwrap());
        assert!(store.find(gram.id).await.unwrap().is_none());
        assert!(store
            .update(gram.id, GramChanges { message: "x".to_string(), picture: None })
            .await
            .unwrap()
            .is_none());
    }
}
