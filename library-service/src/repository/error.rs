//! Repository error types
//!
//! Structured errors for record store operations, carrying which operation
//! failed and which book was involved.
//!
//! # Example
//!
//! ```rust
//! use library_service::repository::{RepositoryError, RepositoryErrorKind};
//!
//! let error = RepositoryError::already_exists("Book", "0441013597");
//! assert!(matches!(error.kind, RepositoryErrorKind::AlreadyExists));
//! assert_eq!(error.entity_id.as_deref(), Some("0441013597"));
//! ```

use std::fmt;

use crate::error::{DatabaseError, DatabaseErrorKind, DatabaseOperation, Error};

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Finding a single book by ID
    FindById,
    /// Listing books with filters
    List,
    /// Substring lookups over title and author
    Search,
    /// Counting books
    Count,
    /// Creating a new book
    Create,
    /// Updating an existing book
    Update,
    /// Deleting a book
    Delete,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindById => write!(f, "find_by_id"),
            Self::List => write!(f, "list"),
            Self::Search => write!(f, "search"),
            Self::Count => write!(f, "count"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl RepositoryOperation {
    fn database_operation(self) -> DatabaseOperation {
        match self {
            Self::FindById | Self::List | Self::Search | Self::Count => DatabaseOperation::Query,
            Self::Create => DatabaseOperation::Insert,
            Self::Update => DatabaseOperation::Update,
            Self::Delete => DatabaseOperation::Delete,
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// Book was not found
    NotFound,
    /// A book with the same isbn already exists
    AlreadyExists,
    /// Other database constraint violation
    ConstraintViolation,
    /// Failed to connect to database or acquire a connection
    ConnectionFailed,
    /// Underlying database error
    DatabaseError,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ConstraintViolation => write!(f, "constraint_violation"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::DatabaseError => write!(f, "database_error"),
        }
    }
}

/// Structured repository error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved
    pub entity_type: Option<String>,
    /// The identifier or business key involved
    pub entity_id: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a "not found" error with entity context
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            operation: RepositoryOperation::FindById,
            kind: RepositoryErrorKind::NotFound,
            message: "Entity not found".to_string(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(entity_id.into()),
        }
    }

    /// Create an "already exists" error with entity context
    pub fn already_exists(entity_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            operation: RepositoryOperation::Create,
            kind: RepositoryErrorKind::AlreadyExists,
            message: "Entity already exists".to_string(),
            entity_type: Some(entity_type.into()),
            entity_id: Some(identifier.into()),
        }
    }

    /// Classify a sqlx error raised during `operation`
    ///
    /// Unique-constraint violations become `AlreadyExists`; the only unique
    /// column besides the primary key is `isbn`.
    pub fn from_sqlx(operation: RepositoryOperation, err: sqlx::Error) -> Self {
        let db = DatabaseError::from_sqlx(operation.database_operation(), &err);
        let kind = match &err {
            sqlx::Error::Database(e) if e.is_unique_violation() => {
                RepositoryErrorKind::AlreadyExists
            }
            _ => match db.kind {
                DatabaseErrorKind::NotFound => RepositoryErrorKind::NotFound,
                DatabaseErrorKind::ConstraintViolation => RepositoryErrorKind::ConstraintViolation,
                DatabaseErrorKind::ConnectionFailed | DatabaseErrorKind::PoolExhausted => {
                    RepositoryErrorKind::ConnectionFailed
                }
                DatabaseErrorKind::QueryFailed => RepositoryErrorKind::DatabaseError,
            },
        };
        Self::new(operation, kind, db.message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(ref entity_type), Some(ref entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err.kind {
            RepositoryErrorKind::NotFound => {
                let entity = err.entity_type.as_deref().unwrap_or("Entity");
                Error::NotFound(format!("{} not found", entity))
            }
            RepositoryErrorKind::AlreadyExists => {
                let entity = err.entity_type.as_deref().unwrap_or("Entity");
                Error::Duplicate(format!("{} already registered", entity))
            }
            RepositoryErrorKind::ConstraintViolation => Error::Database(DatabaseError::new(
                err.operation.database_operation(),
                DatabaseErrorKind::ConstraintViolation,
                err.message,
            )),
            RepositoryErrorKind::ConnectionFailed => Error::Database(DatabaseError::new(
                err.operation.database_operation(),
                DatabaseErrorKind::PoolExhausted,
                err.message,
            )),
            RepositoryErrorKind::DatabaseError => Error::Database(DatabaseError::new(
                err.operation.database_operation(),
                DatabaseErrorKind::QueryFailed,
                err.message,
            )),
        }
    }
}
