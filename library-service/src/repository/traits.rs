//! Repository trait for the book catalog
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) so implementations can
//! be written with plain `async fn` and no `async_trait` boxing.

use std::future::Future;

use super::error::RepositoryError;
use crate::models::{Book, BookCreate, BookFilter, BookUpdate};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Storage operations behind the HTTP handlers
///
/// Text matching (`author` filter, title lookup, search) is a
/// case-insensitive substring match. Result order is not part of the
/// contract.
pub trait BookRepository: Send + Sync {
    /// Insert a new book and return it with its assigned id
    ///
    /// # Errors
    ///
    /// `AlreadyExists` when another book has the same isbn; nothing is stored.
    fn create(&self, data: BookCreate) -> impl Future<Output = RepositoryResult<Book>> + Send;

    /// Find a book by id; `Ok(None)` when absent
    fn find_by_id(&self, id: i64) -> impl Future<Output = RepositoryResult<Option<Book>>> + Send;

    /// Books matching every supplied filter, or all books for an empty filter
    fn list(&self, filter: &BookFilter)
        -> impl Future<Output = RepositoryResult<Vec<Book>>> + Send;

    /// Books whose title contains `fragment`
    fn find_by_title(
        &self,
        fragment: &str,
    ) -> impl Future<Output = RepositoryResult<Vec<Book>>> + Send;

    /// Books whose title or author contains `query`, each at most once
    fn search(&self, query: &str) -> impl Future<Output = RepositoryResult<Vec<Book>>> + Send;

    /// Overwrite the supplied fields; `Ok(None)` when no book has `id`
    fn update(
        &self,
        id: i64,
        data: BookUpdate,
    ) -> impl Future<Output = RepositoryResult<Option<Book>>> + Send;

    /// Remove a book; `Ok(false)` when no book has `id`
    fn delete(&self, id: i64) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Number of stored books
    fn count(&self) -> impl Future<Output = RepositoryResult<u64>> + Send;
}
