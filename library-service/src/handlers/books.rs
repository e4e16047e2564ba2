//! Book catalog handlers
//!
//! Every handler pulls the repository out of [`AppState`]; nothing is held
//! between requests. Bodies, query strings and paths go through the
//! [`extract`](crate::extract) wrappers, so malformed input is a 422.

use axum::{extract::State, Json};
use tracing::{info, instrument, warn};

use crate::{
    error::{Error, ErrorResponse, Result},
    extract::{ApiJson, ApiPath, ApiQuery},
    models::{Book, BookCreate, BookFilter, BookUpdate, MessageResponse, SearchQuery},
    repository::{BookRepository, RepositoryError, RepositoryErrorKind},
    state::AppState,
};

fn book_not_found(id: i64) -> Error {
    RepositoryError::not_found("Book", id.to_string()).into()
}

/// Register a new book
///
/// Rejected with 400 when the isbn is already catalogued.
#[utoipa::path(
    post,
    path = "/books/",
    tag = "books",
    request_body = BookCreate,
    responses(
        (status = 200, description = "Book stored", body = Book),
        (status = 400, description = "Isbn already registered", body = ErrorResponse),
        (status = 422, description = "Malformed body", body = ErrorResponse)
    )
)]
#[instrument(skip(state, req), fields(isbn = %req.isbn))]
pub async fn create_book<R: BookRepository>(
    State(state): State<AppState<R>>,
    ApiJson(req): ApiJson<BookCreate>,
) -> Result<Json<Book>> {
    let book = state.books().create(req).await.map_err(|e| {
        if e.kind == RepositoryErrorKind::AlreadyExists {
            warn!("Rejected book with registered isbn");
        }
        Error::from(e)
    })?;

    info!(book_id = book.id, "Created book: {}", book.title);
    Ok(Json(book))
}

/// List books, optionally filtered by author fragment and exact year
#[utoipa::path(
    get,
    path = "/books/",
    tag = "books",
    params(BookFilter),
    responses(
        (status = 200, description = "Matching books, possibly none", body = Vec<Book>),
        (status = 422, description = "Malformed query string", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_books<R: BookRepository>(
    State(state): State<AppState<R>>,
    ApiQuery(filter): ApiQuery<BookFilter>,
) -> Result<Json<Vec<Book>>> {
    let books = state.books().list(&filter).await?;

    info!("Listed {} books", books.len());
    Ok(Json(books))
}

/// Books whose title contains the path segment; an empty list is not an error
#[utoipa::path(
    get,
    path = "/books/{key}",
    tag = "books",
    params(("key" = String, Path, description = "Case-insensitive title fragment")),
    responses(
        (status = 200, description = "Matching books, possibly none", body = Vec<Book>)
    )
)]
#[instrument(skip(state))]
pub async fn books_by_title<R: BookRepository>(
    State(state): State<AppState<R>>,
    ApiPath(title): ApiPath<String>,
) -> Result<Json<Vec<Book>>> {
    Ok(Json(state.books().find_by_title(&title).await?))
}

/// Fetch a single book by id
#[utoipa::path(
    get,
    path = "/books/id/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "The book", body = Book),
        (status = 404, description = "No book has this id", body = ErrorResponse),
        (status = 422, description = "Id is not an integer", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_book<R: BookRepository>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Book>> {
    state
        .books()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| book_not_found(id))
}

/// Books whose title or author contains `query`
///
/// Unlike the list and title lookups, nothing matching is a 404.
#[utoipa::path(
    get,
    path = "/books/search/",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 404, description = "No books found", body = ErrorResponse),
        (status = 422, description = "Missing query", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn search_books<R: BookRepository>(
    State(state): State<AppState<R>>,
    ApiQuery(search): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<Book>>> {
    let books = state.books().search(&search.query).await?;

    if books.is_empty() {
        return Err(Error::NotFound("No books found".to_string()));
    }
    Ok(Json(books))
}

/// Overwrite the supplied fields of a book
///
/// The segment shares `/books/{key}` with the title lookup; here it must be
/// an integer id.
#[utoipa::path(
    put,
    path = "/books/{key}",
    tag = "books",
    params(("key" = i64, Path, description = "Book id")),
    request_body = BookUpdate,
    responses(
        (status = 200, description = "Book after the update", body = Book),
        (status = 400, description = "Isbn already registered", body = ErrorResponse),
        (status = 404, description = "No book has this id", body = ErrorResponse),
        (status = 422, description = "Malformed id or body", body = ErrorResponse)
    )
)]
#[instrument(skip(state, req))]
pub async fn update_book<R: BookRepository>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<BookUpdate>,
) -> Result<Json<Book>> {
    // Nothing to write: answer with the stored record as-is
    let book = if req.has_updates() {
        state.books().update(id, req).await?
    } else {
        state.books().find_by_id(id).await?
    };

    let book = book.ok_or_else(|| book_not_found(id))?;

    info!(book_id = book.id, "Updated book: {}", book.title);
    Ok(Json(book))
}

/// Remove a book
#[utoipa::path(
    delete,
    path = "/books/{key}",
    tag = "books",
    params(("key" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book removed", body = MessageResponse),
        (status = 404, description = "No book has this id", body = ErrorResponse),
        (status = 422, description = "Id is not an integer", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_book<R: BookRepository>(
    State(state): State<AppState<R>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>> {
    if !state.books().delete(id).await? {
        return Err(book_not_found(id));
    }

    info!(book_id = id, "Deleted book");
    Ok(Json(MessageResponse::new("Book deleted successfully")))
}
