use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

/// Idempotent DDL, applied in order
const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          UUID PRIMARY KEY,
        email       TEXT NOT NULL UNIQUE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS grams (
        id                    UUID PRIMARY KEY,
        message               TEXT NOT NULL,
        picture_key           TEXT NOT NULL,
        picture_filename      TEXT NOT NULL,
        picture_content_type  TEXT NOT NULL,
        picture_size          BIGINT NOT NULL,
        picture_digest        TEXT NOT NULL,
        user_id               UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        created_at            TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at            TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS grams_created_at_idx ON grams (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS grams_user_id_idx ON grams (user_id)",
];

/// Create tables and indexes when missing
pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema is up to date ({} statements)", STATEMENTS.len());
    Ok(())
}
