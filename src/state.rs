//! Shared application state handed to every handler.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::{JwtError, JwtKeys};
use crate::config::AppConfig;
use crate::database::{schema, DatabaseError, DatabaseManager, PgGramStore, PgUserStore};
use crate::grams::{GramController, GramStore, MemoryGramStore, PictureRules};
use crate::pictures::{DiskPictureStore, MemoryPictureStore, PictureStore};
use crate::users::{MemoryUserStore, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Jwt(#[from] JwtError),
}

/// Which backend holds records
#[derive(Clone)]
pub enum Backend {
    Postgres(PgPool),
    Memory,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub controller: Arc<GramController>,
    pub users: Arc<dyn UserStore>,
    pub pictures: Arc<dyn PictureStore>,
    pub keys: JwtKeys,
    pub backend: Backend,
}

impl AppState {
    /// Wire stores from configuration: Postgres when a URL is set, memory otherwise
    pub async fn from_config(config: AppConfig) -> Result<Self, StateError> {
        let pictures: Arc<dyn PictureStore> = match &config.uploads.directory {
            Some(dir) => {
                info!("Storing pictures under {}", dir.display());
                Arc::new(DiskPictureStore::new(dir.clone()))
            }
            None => {
                warn!("UPLOADS_DIRECTORY not set; pictures are kept in memory");
                Arc::new(MemoryPictureStore::new())
            }
        };

        if config.database.url.is_some() {
            let pool = DatabaseManager::connect(&config.database).await?;
            schema::migrate(&pool).await?;
            let grams = Arc::new(PgGramStore::new(pool.clone()));
            let users = Arc::new(PgUserStore::new(pool.clone()));
            Self::assemble(config, grams, users, pictures, Backend::Postgres(pool))
        } else {
            warn!("DATABASE_URL not set; records are kept in memory and lost on restart");
            Self::assemble(
                config,
                Arc::new(MemoryGramStore::new()),
                Arc::new(MemoryUserStore::new()),
                pictures,
                Backend::Memory,
            )
        }
    }

    /// Build state around explicit stores
    pub fn assemble(
        config: AppConfig,
        grams: Arc<dyn GramStore>,
        users: Arc<dyn UserStore>,
        pictures: Arc<dyn PictureStore>,
        backend: Backend,
    ) -> Result<Self, StateError> {
        let keys = JwtKeys::from_config(&config.security)?;
        let rules = PictureRules { max_bytes: config.uploads.max_picture_bytes };
        let controller = GramController::new(grams, pictures.clone(), rules, config.pagination.clone());

        Ok(Self {
            config: Arc::new(config),
            controller: Arc::new(controller),
            users,
            pictures,
            keys,
            backend,
        })
    }
}
