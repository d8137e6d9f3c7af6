pub mod migrate;
pub mod user;

use sqlx::PgPool;

use crate::config::config;
use crate::database::DatabaseManager;

/// Commands act on the configured Postgres database; there is nothing to administer in memory
pub(crate) async fn connect() -> anyhow::Result<PgPool> {
    let database = &config().database;
    if database.url.is_none() {
        anyhow::bail!("DATABASE_URL must be set to run this command");
    }
    Ok(DatabaseManager::connect(database).await?)
}
