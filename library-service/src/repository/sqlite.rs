//! SQLite-backed [`BookRepository`]

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::error::{RepositoryError, RepositoryOperation};
use super::traits::{BookRepository, RepositoryResult};
use crate::models::{Book, BookCreate, BookFilter, BookUpdate};

const BOOK_COLUMNS: &str = "id, title, author, year, isbn";

/// Book storage over a SQLite connection pool
///
/// Each call checks a connection out of the pool for a single statement and
/// returns it when the statement completes, whatever the outcome.
#[derive(Debug, Clone)]
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Build a `LIKE` pattern matching `fragment` literally anywhere in the value
///
/// Must be paired with `ESCAPE '\'`.
fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl BookRepository for SqliteBookRepository {
    async fn create(&self, data: BookCreate) -> RepositoryResult<Book> {
        let isbn = data.isbn.clone();

        sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, author, year, isbn) VALUES (?, ?, ?, ?) RETURNING {BOOK_COLUMNS}"
        ))
        .bind(data.title)
        .bind(data.author)
        .bind(data.year)
        .bind(data.isbn)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Create, e).with_entity("Book", isbn))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Book>> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::FindById, e))
    }

    async fn list(&self, filter: &BookFilter) -> RepositoryResult<Vec<Book>> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {BOOK_COLUMNS} FROM books WHERE 1 = 1"));

        if let Some(author) = filter.author() {
            query
                .push(" AND author LIKE ")
                .push_bind(contains_pattern(author))
                .push(r" ESCAPE '\'");
        }
        if let Some(year) = filter.year {
            query.push(" AND year = ").push_bind(year);
        }
        query.push(" ORDER BY id");

        query
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::List, e))
    }

    async fn find_by_title(&self, fragment: &str) -> RepositoryResult<Vec<Book>> {
        sqlx::query_as::<_, Book>(&format!(
            r"SELECT {BOOK_COLUMNS} FROM books WHERE title LIKE ? ESCAPE '\' ORDER BY id"
        ))
        .bind(contains_pattern(fragment))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Search, e))
    }

    async fn search(&self, query: &str) -> RepositoryResult<Vec<Book>> {
        let pattern = contains_pattern(query);

        sqlx::query_as::<_, Book>(&format!(
            r"SELECT {BOOK_COLUMNS} FROM books
              WHERE title LIKE ? ESCAPE '\' OR author LIKE ? ESCAPE '\'
              ORDER BY id"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Search, e))
    }

    async fn update(&self, id: i64, data: BookUpdate) -> RepositoryResult<Option<Book>> {
        let isbn = data.isbn.clone();

        sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET
                title  = COALESCE(?, title),
                author = COALESCE(?, author),
                year   = COALESCE(?, year),
                isbn   = COALESCE(?, isbn)
             WHERE id = ?
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(data.title)
        .bind(data.author)
        .bind(data.year)
        .bind(data.isbn)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            let err = RepositoryError::from_sqlx(RepositoryOperation::Update, e);
            match isbn {
                Some(isbn) => err.with_entity("Book", isbn),
                None => err.with_entity("Book", id.to_string()),
            }
        })
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Delete, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(RepositoryOperation::Count, e))?;

        Ok(count.max(0) as u64)
    }
}
