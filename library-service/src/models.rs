//! Book record and request/response shapes
//!
//! Text fields are stored as given; an empty title, author or isbn is a
//! valid value. Only a wrong type or a missing required field is rejected,
//! and that happens while decoding the request.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// A catalogued book as stored and returned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Book {
    /// Store-assigned identifier
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Publication year
    pub year: i32,
    /// Unique across the catalog
    pub isbn: String,
}

/// Create book request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookCreate {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub isbn: String,
}

/// Partial update request; omitted fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BookUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

impl BookUpdate {
    /// Check if the request changes anything
    pub fn has_updates(&self) -> bool {
        self.title.is_some() || self.author.is_some() || self.year.is_some() || self.isbn.is_some()
    }
}

/// Query parameters for listing books
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookFilter {
    /// Case-insensitive substring of the author
    pub author: Option<String>,
    /// Exact publication year
    pub year: Option<i32>,
}

impl BookFilter {
    /// Author fragment, ignoring an empty `?author=`
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref().filter(|a| !a.is_empty())
    }
}

/// Query parameters for the title-or-author search
#[derive(Debug, Clone, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of the title or author
    pub query: String,
}

/// Plain confirmation body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
