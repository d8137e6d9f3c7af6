use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::grams::model::{Gram, GramChanges, GramId, NewGram, Picture, UserId};
use crate::grams::store::{GramPage, GramStore, PageRequest, StoreError};
use crate::users::{normalize_email, User, UserStore};

const GRAM_COLUMNS: &str = "id, message, picture_key, picture_filename, picture_content_type, \
                            picture_size, picture_digest, user_id, created_at, updated_at";

#[derive(Debug, FromRow)]
struct GramRow {
    id: Uuid,
    message: String,
    picture_key: String,
    picture_filename: String,
    picture_content_type: String,
    picture_size: i64,
    picture_digest: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GramRow> for Gram {
    fn from(row: GramRow) -> Self {
        Gram {
            id: GramId(row.id),
            message: row.message,
            picture: Picture {
                key: row.picture_key,
                filename: row.picture_filename,
                content_type: row.picture_content_type,
                size: u64::try_from(row.picture_size).unwrap_or(0),
                digest: row.picture_digest,
            },
            owner: UserId(row.user_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId(row.id),
            email: row.email,
            created_at: row.created_at,
        }
    }
}

fn size_column(size: u64) -> i64 {
    i64::try_from(size).unwrap_or(i64::MAX)
}

/// Postgres-backed gram store
#[derive(Clone)]
pub struct PgGramStore {
    pool: PgPool,
}

impl PgGramStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GramStore for PgGramStore {
    async fn list(&self, page: PageRequest) -> Result<GramPage, StoreError> {
        let sql = format!(
            "SELECT {} FROM grams ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
            GRAM_COLUMNS
        );
        let rows = sqlx::query_as::<_, GramRow>(&sql)
            .bind(i64::from(page.per_page))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        Ok(GramPage {
            grams: rows.into_iter().map(Gram::from).collect(),
            page: page.page,
            per_page: page.per_page,
            total: self.count().await?,
        })
    }

    async fn find(&self, id: GramId) -> Result<Option<Gram>, StoreError> {
        let sql = format!("SELECT {} FROM grams WHERE id = $1", GRAM_COLUMNS);
        let row = sqlx::query_as::<_, GramRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Gram::from))
    }

    async fn create(&self, gram: NewGram) -> Result<Gram, StoreError> {
        let sql = format!(
            "INSERT INTO grams (id, message, picture_key, picture_filename, picture_content_type, \
             picture_size, picture_digest, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            GRAM_COLUMNS
        );
        let row = sqlx::query_as::<_, GramRow>(&sql)
            .bind(GramId::new().0)
            .bind(&gram.message)
            .bind(&gram.picture.key)
            .bind(&gram.picture.filename)
            .bind(&gram.picture.content_type)
            .bind(size_column(gram.picture.size))
            .bind(&gram.picture.digest)
            .bind(gram.owner.0)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update(&self, id: GramId, changes: GramChanges) -> Result<Option<Gram>, StoreError> {
        let row = match changes.picture {
            Some(picture) => {
                let sql = format!(
                    "UPDATE grams SET message = $2, picture_key = $3, picture_filename = $4, \
                     picture_content_type = $5, picture_size = $6, picture_digest = $7, updated_at = now() \
                     WHERE id = $1 RETURNING {}",
                    GRAM_COLUMNS
                );
                sqlx::query_as::<_, GramRow>(&sql)
                    .bind(id.0)
                    .bind(&changes.message)
                    .bind(&picture.key)
                    .bind(&picture.filename)
                    .bind(&picture.content_type)
                    .bind(size_column(picture.size))
                    .bind(&picture.digest)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "UPDATE grams SET message = $2, updated_at = now() WHERE id = $1 RETURNING {}",
                    GRAM_COLUMNS
                );
                sqlx::query_as::<_, GramRow>(&sql)
                    .bind(id.0)
                    .bind(&changes.message)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        Ok(row.map(Gram::from))
    }

    async fn delete(&self, id: GramId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM grams WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM grams")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

/// Postgres-backed user store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, email, created_at FROM users WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT id, email, created_at FROM users WHERE email = $1")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn create(&self, email: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, email) VALUES ($1, $2) RETURNING id, email, created_at",
        )
        .bind(UserId::new().0)
        .bind(normalize_email(email))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }
}
