use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an authenticated principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Store-assigned gram identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GramId(pub Uuid);

impl GramId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a path segment. Anything that is not a UUID cannot name a gram.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for GramId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GramId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Reference to a stored picture attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    /// Storage key understood by the picture store
    pub key: String,
    /// File name as submitted by the client
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    /// Hex SHA-256 of the stored bytes
    pub digest: String,
}

impl Picture {
    pub fn url(&self) -> String {
        format!("/pictures/{}", self.key)
    }
}

/// A captioned picture owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gram {
    pub id: GramId,
    pub message: String,
    pub picture: Picture,
    /// Fixed at creation, never transferred
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes for a gram about to be persisted
#[derive(Debug, Clone)]
pub struct NewGram {
    pub message: String,
    pub picture: Picture,
    pub owner: UserId,
}

/// Field changes applied by an update. `picture: None` keeps the current one.
#[derive(Debug, Clone)]
pub struct GramChanges {
    pub message: String,
    pub picture: Option<Picture>,
}

impl Gram {
    /// Apply changes in place and bump `updated_at`
    pub fn apply(&mut self, changes: GramChanges) {
        self.message = changes.message;
        if let Some(picture) = changes.picture {
            self.picture = picture;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner == *user
    }
}
