//! # library-service
//!
//! HTTP catalog of books keyed by ISBN, backed by SQLite.
//!
//! - Create, list and filter (author substring, exact year), look up by
//!   title fragment, search by title or author, update and delete books
//! - Duplicate ISBNs are rejected by the store's UNIQUE constraint
//! - Layered configuration (defaults, TOML files, `LIBRARY_*` env vars)
//! - Structured logging, request IDs, liveness and readiness checks
//! - OpenAPI document at `/openapi.json`
//!
//! ## Example
//!
//! ```rust,no_run
//! use library_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let state = AppState::connect(config.clone()).await?;
//!
//!     Server::new(config).serve(router(state)).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod server;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, DatabaseConfig, MiddlewareConfig, ServiceConfig};
    pub use crate::error::{
        DatabaseError, DatabaseErrorKind, DatabaseOperation, Error, ErrorResponse, Result,
    };
    pub use crate::ids::{MakeTypedRequestId, RequestId, RequestIdError};
    pub use crate::models::{Book, BookCreate, BookFilter, BookUpdate, MessageResponse, SearchQuery};
    pub use crate::observability::init_tracing;
    pub use crate::openapi::ApiDoc;
    pub use crate::repository::{
        BookRepository, RepositoryError, RepositoryErrorKind, RepositoryResult,
        SqliteBookRepository,
    };
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::state::AppState;
}
