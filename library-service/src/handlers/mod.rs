//! HTTP handlers
//!
//! Handlers take [`AppState<R>`](crate::state::AppState) through axum's
//! `State` extractor, generic over the book repository, and return
//! `Result<_, Error>`; failures render through
//! [`Error`](crate::error::Error)'s `IntoResponse` impl.

pub(crate) mod books;
mod health;
mod home;

pub use books::{
    books_by_title, create_book, delete_book, get_book, list_books, search_books, update_book,
};
pub use health::{health, readiness, DependencyStatus, HealthResponse, ReadinessResponse};
pub use home::{home, IndexTemplate};
