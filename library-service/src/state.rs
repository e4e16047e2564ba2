//! Application state shared across handlers

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::{
    config::Config,
    database::{create_pool, init_schema},
    error::Result,
    repository::SqliteBookRepository,
};

/// Application state shared across handlers
///
/// Handlers only reach storage through [`BookRepository`](crate::repository::BookRepository),
/// so `R` can be any implementation; the service itself runs on SQLite.
/// Cloning is cheap: the config sits behind an `Arc` and the SQLite pool is
/// reference-counted internally.
#[derive(Clone)]
pub struct AppState<R = SqliteBookRepository> {
    config: Arc<Config>,
    books: R,
}

impl<R> AppState<R> {
    /// Build state around any book repository
    pub fn with_repository(config: Config, books: R) -> Self {
        Self {
            config: Arc::new(config),
            books,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Book storage
    pub fn books(&self) -> &R {
        &self.books
    }
}

impl AppState {
    /// Build state around an existing pool whose schema is already in place
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        Self::with_repository(config, SqliteBookRepository::new(pool))
    }

    /// Open the configured store, create the schema and build the state
    pub async fn connect(config: Config) -> Result<Self> {
        let pool = create_pool(&config.database).await?;
        init_schema(&pool).await?;
        Ok(Self::new(config, pool))
    }
}
