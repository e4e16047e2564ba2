//! Request extractors that reject malformed input with 422
//!
//! axum's own `Json`, `Query` and `Path` answer 400 or 415 on bad input,
//! which would be indistinguishable from the duplicate-isbn 400. These
//! wrappers run the same extraction and turn every rejection into
//! [`Error::Validation`].
//!
//! ```rust,ignore
//! use library_service::extract::{ApiJson, ApiPath};
//!
//! async fn update(ApiPath(id): ApiPath<i64>, ApiJson(body): ApiJson<BookUpdate>) { .. }
//! ```

use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    FromRequest, FromRequestParts,
};

use crate::error::Error;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

/// Query-string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}
