//! OpenAPI document for the catalog endpoints
//!
//! Generated at compile time by utoipa from the `#[utoipa::path]`
//! annotations on the book handlers and served as JSON at `/openapi.json`.

use axum::Json;
use utoipa::OpenApi;

use crate::{
    error::ErrorResponse,
    handlers::books,
    models::{Book, BookCreate, BookUpdate, MessageResponse},
};

/// Path of the served document
pub const OPENAPI_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Management API",
        description = "Catalog of books keyed by ISBN: register, list, look up, search, update and remove books."
    ),
    paths(
        books::create_book,
        books::list_books,
        books::books_by_title,
        books::get_book,
        books::search_books,
        books::update_book,
        books::delete_book,
    ),
    components(schemas(Book, BookCreate, BookUpdate, MessageResponse, ErrorResponse)),
    tags((name = "books", description = "Book catalog"))
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_describes_catalog() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();

        assert_eq!(doc["info"]["title"], "Library Management API");
        assert_eq!(doc["info"]["version"], env!("CARGO_PKG_VERSION"));

        let paths = doc["paths"].as_object().unwrap();
        for path in ["/books/", "/books/{key}", "/books/id/{id}", "/books/search/"] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(paths["/books/"]["post"].is_object());
        assert!(paths["/books/"]["get"].is_object());
        assert!(paths["/books/{key}"]["put"].is_object());
        assert!(paths["/books/{key}"]["delete"].is_object());

        let schemas = doc["components"]["schemas"].as_object().unwrap();
        assert!(schemas.contains_key("Book"));
        assert!(schemas.contains_key("ErrorResponse"));
    }

    #[test]
    fn test_list_documents_query_parameters() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let params = doc["paths"]["/books/"]["get"]["parameters"]
            .as_array()
            .unwrap();
        let names: Vec<&str> = params.iter().filter_map(|p| p["name"].as_str()).collect();
        assert!(names.contains(&"author"));
        assert!(names.contains(&"year"));
    }
}
