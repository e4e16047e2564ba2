//! Router assembly
//!
//! `GET`, `PUT` and `DELETE /books/{key}` share one route: `GET` treats the
//! segment as a title fragment, `PUT` and `DELETE` as a numeric id. The
//! literal `/books/search/` and `/books/id/{id}` routes take precedence over
//! `{key}`.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers,
    openapi::{openapi_json, OPENAPI_PATH},
    repository::BookRepository,
    state::AppState,
};

/// Build the application router with its state attached
pub fn router<R>(state: AppState<R>) -> Router
where
    R: BookRepository + Clone + 'static,
{
    Router::new()
        .route("/", get(handlers::home::<R>))
        .route("/health", get(handlers::health::<R>))
        .route("/ready", get(handlers::readiness::<R>))
        .route(OPENAPI_PATH, get(openapi_json))
        .route(
            "/books/",
            post(handlers::create_book::<R>).get(handlers::list_books::<R>),
        )
        .route(
            "/books",
            post(handlers::create_book::<R>).get(handlers::list_books::<R>),
        )
        .route("/books/search/", get(handlers::search_books::<R>))
        .route("/books/search", get(handlers::search_books::<R>))
        .route("/books/id/{id}", get(handlers::get_book::<R>))
        .route(
            "/books/{key}",
            get(handlers::books_by_title::<R>)
                .put(handlers::update_book::<R>)
                .delete(handlers::delete_book::<R>),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{Book, BookCreate, BookFilter, BookUpdate};
    use crate::repository::{
        RepositoryError, RepositoryErrorKind, RepositoryOperation, RepositoryResult,
    };
    use axum::body::{to_bytes, Body};
    use http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use tower::ServiceExt;

    async fn app() -> Router {
        let state = AppState::connect(Config::in_memory()).await.unwrap();
        router(state)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create(app: &Router, title: &str, author: &str, year: i32, isbn: &str) -> Book {
        let (status, body) = send(
            app,
            Method::POST,
            "/books/",
            Some(json!({"title": title, "author": author, "year": year, "isbn": isbn})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "create failed: {body}");
        serde_json::from_value(body).unwrap()
    }

    async fn send_raw(
        app: &Router,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn books(body: Value) -> Vec<Book> {
        serde_json::from_value(body).unwrap()
    }

    /// Store whose every call fails as if the database file were unreachable
    #[derive(Clone)]
    struct UnreachableStore;

    fn unreachable(operation: RepositoryOperation) -> RepositoryError {
        RepositoryError::new(
            operation,
            RepositoryErrorKind::ConnectionFailed,
            "unable to open database file: /var/lib/library/library.db",
        )
    }

    impl BookRepository for UnreachableStore {
        async fn create(&self, _data: BookCreate) -> RepositoryResult<Book> {
            Err(unreachable(RepositoryOperation::Create))
        }

        async fn find_by_id(&self, _id: i64) -> RepositoryResult<Option<Book>> {
            Err(unreachable(RepositoryOperation::FindById))
        }

        async fn list(&self, _filter: &BookFilter) -> RepositoryResult<Vec<Book>> {
            Err(unreachable(RepositoryOperation::List))
        }

        async fn find_by_title(&self, _fragment: &str) -> RepositoryResult<Vec<Book>> {
            Err(unreachable(RepositoryOperation::Search))
        }

        async fn search(&self, _query: &str) -> RepositoryResult<Vec<Book>> {
            Err(unreachable(RepositoryOperation::Search))
        }

        async fn update(&self, _id: i64, _data: BookUpdate) -> RepositoryResult<Option<Book>> {
            Err(unreachable(RepositoryOperation::Update))
        }

        async fn delete(&self, _id: i64) -> RepositoryResult<bool> {
            Err(unreachable(RepositoryOperation::Delete))
        }

        async fn count(&self) -> RepositoryResult<u64> {
            Err(unreachable(RepositoryOperation::Count))
        }
    }

    #[tokio::test]
    async fn test_create_returns_input_fields() {
        let app = app().await;
        let book = create(&app, "Dune", "Frank Herbert", 1965, "0441013597").await;

        assert!(book.id > 0);
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.year, 1965);
        assert_eq!(book.isbn, "0441013597");
    }

    #[tokio::test]
    async fn test_duplicate_isbn_is_400_and_store_unchanged() {
        let app = app().await;
        create(&app, "Dune", "Frank Herbert", 1965, "0441013597").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/books/",
            Some(json!({"title": "Other", "author": "Someone", "year": 2000, "isbn": "0441013597"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Book already registered");

        let (_, body) = send(&app, Method::GET, "/books/", None).await;
        let matching = books(body)
            .into_iter()
            .filter(|b| b.isbn == "0441013597")
            .count();
        assert_eq!(matching, 1);
    }

    #[tokio::test]
    async fn test_malformed_create_is_422() {
        let app = app().await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/books/",
            Some(json!({"title": "Dune", "author": "Frank Herbert", "year": "soon", "isbn": "1"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = send(
            &app,
            Method::POST,
            "/books/",
            Some(json!({"title": "Dune", "author": "Frank Herbert", "year": 1965})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, body) = send(&app, Method::GET, "/books/", None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_422() {
        let app = app().await;

        let (status, body) =
            send_raw(&app, Method::POST, "/books/", Some("application/json"), "{\"title\": ").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["status"], 422);

        let valid = json!({"title": "Dune", "author": "Frank Herbert", "year": 1965, "isbn": "1"});
        let (status, body) = send_raw(&app, Method::POST, "/books/", None, &valid.to_string()).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) =
            send_raw(&app, Method::PUT, "/books/1", Some("application/json"), "not json").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_malformed_query_and_path_are_422() {
        let app = app().await;

        let (status, body) = send(&app, Method::GET, "/books/?year=abc", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, body) = send(&app, Method::GET, "/books/search/", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = send(&app, Method::GET, "/books/id/abc", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, Method::DELETE, "/books/Dune", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_empty_text_fields_are_stored() {
        let app = app().await;
        let book = create(&app, "", "Frank Herbert", 1965, "0441013597").await;
        assert_eq!(book.title, "");

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/books/{}", book.id),
            Some(json!({"author": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["author"], "");
        assert_eq!(body["isbn"], "0441013597");

        let (_, body) = send(&app, Method::GET, &format!("/books/id/{}", book.id), None).await;
        assert_eq!(body["title"], "");
    }

    #[tokio::test]
    async fn test_delete_then_fetch_is_not_found() {
        let app = app().await;
        let book = create(&app, "Dune", "Frank Herbert", 1965, "0441013597").await;
        let by_id = format!("/books/id/{}", book.id);
        let target = format!("/books/{}", book.id);

        let (status, body) = send(&app, Method::GET, &by_id, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isbn"], "0441013597");

        let (status, body) = send(&app, Method::DELETE, &target, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Book deleted successfully"}));

        let (status, body) = send(&app, Method::GET, &by_id, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Book not found");

        let (status, body) = send(&app, Method::DELETE, &target, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Book not found");
    }

    #[tokio::test]
    async fn test_partial_update_changes_only_year() {
        let app = app().await;
        let book = create(&app, "Dune", "Frank Herbert", 1965, "0441013597").await;

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/books/{}", book.id),
            Some(json!({"year": 1966})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let updated: Book = serde_json::from_value(body).unwrap();
        assert_eq!(
            updated,
            Book {
                year: 1966,
                ..book
            }
        );
    }

    #[tokio::test]
    async fn test_update_edge_cases() {
        let app = app().await;
        let book = create(&app, "Dune", "Frank Herbert", 1965, "0441013597").await;

        // Empty body leaves the record untouched
        let (status, body) = send(&app, Method::PUT, &format!("/books/{}", book.id), Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_value::<Book>(body).unwrap(), book);

        let (status, body) = send(&app, Method::PUT, "/books/999", Some(json!({"year": 1}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Book not found");

        let (status, _) = send(&app, Method::PUT, "/books/Dune", Some(json!({"year": 1}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_author_filter_is_case_insensitive() {
        let app = app().await;
        let orwell = create(&app, "1984", "George Orwell", 1949, "1").await;
        create(&app, "Dune", "Frank Herbert", 1965, "2").await;

        let (status, body) = send(&app, Method::GET, "/books/?author=orwell", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(books(body), vec![orwell.clone()]);

        let (_, body) = send(&app, Method::GET, "/books/?author=orwell&year=1949", None).await;
        assert_eq!(books(body), vec![orwell]);

        let (status, body) = send(&app, Method::GET, "/books/?year=1800", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_list_returns_exactly_stored_books() {
        let app = app().await;
        let mut expected = HashSet::new();
        for (i, title) in ["Emma", "Dune", "Beloved"].iter().enumerate() {
            expected.insert(create(&app, title, "Various", 1900 + i as i32, &i.to_string()).await.id);
        }

        let (_, body) = send(&app, Method::GET, "/books/", None).await;
        let listed: HashSet<i64> = books(body).iter().map(|b| b.id).collect();
        assert_eq!(listed, expected);

        // Alias without the trailing slash
        let (status, body) = send(&app, Method::GET, "/books", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(books(body).len(), 3);
    }

    #[tokio::test]
    async fn test_search_union_and_not_found() {
        let app = app().await;
        let by_title = create(&app, "Orwell: A Life", "Bernard Crick", 1980, "1").await;
        let by_author = create(&app, "1984", "George Orwell", 1949, "2").await;
        create(&app, "Dune", "Frank Herbert", 1965, "3").await;

        let (status, body) = send(&app, Method::GET, "/books/search/?query=ORWELL", None).await;
        assert_eq!(status, StatusCode::OK);
        let found = books(body);
        assert_eq!(found.len(), 2);
        let ids: HashSet<i64> = found.iter().map(|b| b.id).collect();
        assert_eq!(ids, HashSet::from([by_title.id, by_author.id]));

        let (status, body) = send(&app, Method::GET, "/books/search/?query=tolkien", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "No books found");
    }

    #[tokio::test]
    async fn test_dune_scenario() {
        let app = app().await;
        let dune = create(&app, "Dune", "Frank Herbert", 1965, "0441013597").await;

        // The id segment is a title fragment on GET
        let (status, body) = send(&app, Method::GET, &format!("/books/{}", dune.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (_, body) = send(&app, Method::GET, "/books/dune", None).await;
        assert_eq!(books(body), vec![dune.clone()]);

        let (status, body) = send(&app, Method::GET, "/books/search/?query=dune", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(books(body), vec![dune.clone()]);

        let (status, _) = send(&app, Method::DELETE, &format!("/books/{}", dune.id), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, Method::GET, "/books/", None).await;
        assert!(books(body).iter().all(|b| b.id != dune.id));
    }

    #[tokio::test]
    async fn test_home_and_health_checks() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("Library Management API"));

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "library-service");

        let (status, body) = send(&app, Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ready"], true);
        assert_eq!(body["dependencies"]["database"]["healthy"], true);
        assert_eq!(body["dependencies"]["database"]["message"], "Connected, 0 books");
    }

    #[tokio::test]
    async fn test_readiness_fails_when_store_closed() {
        let state = AppState::connect(Config::in_memory()).await.unwrap();
        state.books().pool().close().await;
        let app = router(state);

        let (status, body) = send(&app, Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["ready"], false);
    }

    #[tokio::test]
    async fn test_store_failures_are_503_without_internals() {
        let app = router(AppState::with_repository(Config::in_memory(), UnreachableStore));

        let requests = [
            (Method::GET, "/books/", None),
            (Method::GET, "/books/id/1", None),
            (Method::GET, "/books/search/?query=dune", None),
            (Method::DELETE, "/books/1", None),
            (
                Method::POST,
                "/books/",
                Some(json!({"title": "Dune", "author": "Frank Herbert", "year": 1965, "isbn": "1"})),
            ),
        ];
        for (method, uri, body) in requests {
            let (status, body) = send(&app, method.clone(), uri, body).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{method} {uri}");
            assert_eq!(body["detail"], "Database temporarily unavailable");
            assert!(!body.to_string().contains("library.db"));
        }

        let (status, body) = send(&app, Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["dependencies"]["database"]["message"], "Connection failed");

        let (status, _) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_serves_openapi_document() {
        let app = app().await;
        let (status, body) = send(&app, Method::GET, "/openapi.json", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["title"], "Library Management API");
        assert!(body["paths"]["/books/search/"]["get"].is_object());
    }
}
