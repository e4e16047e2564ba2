//! Book persistence
//!
//! [`BookRepository`] is the storage seam the handlers are written against;
//! [`SqliteBookRepository`] implements it over a sqlx SQLite pool.

mod error;
mod sqlite;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use sqlite::SqliteBookRepository;
pub use traits::{BookRepository, RepositoryResult};
