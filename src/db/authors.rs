//! Authors repository
//!
//! Authors are never created directly through the API; `addBook` creates
//! them on first use. The free functions taking a `SqliteConnection` exist
//! so that get-or-create can run inside the book transaction.

use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool as Pool};

use super::error::{DbError, DbResult, map_unique_violation, require_min_length};
use super::sqlite_helpers::{new_id, now_iso8601};

/// Minimum author name length, in characters
pub const MIN_AUTHOR_NAME_LENGTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthorRecord {
    pub id: String,
    pub name: String,
    pub born: Option<i32>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateAuthor {
    pub name: String,
    pub born: Option<i32>,
}

pub struct AuthorRepository {
    pool: Pool,
}

impl AuthorRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new author
    pub async fn create(&self, author: CreateAuthor) -> DbResult<AuthorRecord> {
        let mut conn = self.pool.acquire().await?;
        insert(&mut conn, author).await
    }

    /// Get author by exact name
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<AuthorRecord>> {
        let mut conn = self.pool.acquire().await?;
        find_by_name(&mut conn, name).await
    }

    /// Get every author whose id is in `ids`, in no particular order
    pub async fn get_by_ids(&self, ids: &[String]) -> DbResult<Vec<AuthorRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT id, name, born, created_at FROM authors WHERE id IN ({})",
            placeholders
        );

        let mut query = sqlx::query_as::<_, AuthorRecord>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// List all authors in creation order
    pub async fn list(&self) -> DbResult<Vec<AuthorRecord>> {
        let authors = sqlx::query_as::<_, AuthorRecord>(
            "SELECT id, name, born, created_at FROM authors ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    /// Count all authors
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Set the birth year of the author called `name`.
    ///
    /// Returns `None` when no such author exists.
    pub async fn set_born(&self, name: &str, born: i32) -> DbResult<Option<AuthorRecord>> {
        let result = sqlx::query("UPDATE authors SET born = ? WHERE name = ?")
            .bind(born)
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_name(name).await
    }
}

pub(crate) async fn find_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> DbResult<Option<AuthorRecord>> {
    let author = sqlx::query_as::<_, AuthorRecord>(
        "SELECT id, name, born, created_at FROM authors WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(author)
}

pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    author: CreateAuthor,
) -> DbResult<AuthorRecord> {
    require_min_length("author", &author.name, MIN_AUTHOR_NAME_LENGTH)?;

    let record = AuthorRecord {
        id: new_id(),
        name: author.name,
        born: author.born,
        created_at: now_iso8601(),
    };

    sqlx::query("INSERT INTO authors (id, name, born, created_at) VALUES (?, ?, ?, ?)")
        .bind(&record.id)
        .bind(&record.name)
        .bind(record.born)
        .bind(&record.created_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_unique_violation(e, "author", &record.name))?;

    Ok(record)
}

/// Look up an author by name, creating it when missing.
///
/// The boolean is true when a new author was inserted. The insert runs
/// before any read so that a surrounding transaction takes the write lock
/// on its first statement.
pub(crate) async fn get_or_create(
    conn: &mut SqliteConnection,
    name: &str,
) -> DbResult<(AuthorRecord, bool)> {
    require_min_length("author", name, MIN_AUTHOR_NAME_LENGTH)?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO authors (id, name, born, created_at)
        VALUES (?, ?, NULL, ?)
        ON CONFLICT(name) DO NOTHING
        "#,
    )
    .bind(new_id())
    .bind(name)
    .bind(now_iso8601())
    .execute(&mut *conn)
    .await?
    .rows_affected()
        == 1;

    let author = find_by_name(conn, name)
        .await?
        .ok_or(DbError::Database(sqlx::Error::RowNotFound))?;
    if inserted {
        tracing::info!(author_id = %author.id, name = %author.name, "Created author");
    }

    Ok((author, inserted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, DbError};
    use assert_matches::assert_matches;

    async fn db() -> Database {
        Database::connect("sqlite::memory:", 1)
            .await
            .expect("in-memory database")
    }

    #[tokio::test]
    async fn test_set_born_updates_existing_author() {
        let db = db().await;
        db.authors()
            .create(CreateAuthor {
                name: "Robert Martin".to_string(),
                born: Some(1952),
            })
            .await
            .unwrap();

        let updated = db.authors().set_born("Robert Martin", 1958).await.unwrap();

        assert_eq!(updated.map(|a| a.born), Some(Some(1958)));
    }

    #[tokio::test]
    async fn test_set_born_unknown_author_is_none() {
        let db = db().await;

        let updated = db.authors().set_born("Nobody", 1900).await.unwrap();

        assert_eq!(updated, None);
    }

    #[tokio::test]
    async fn test_get_or_create_reuses_existing() {
        let db = db().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let (first, created_first) = get_or_create(&mut conn, "Fyodor Dostoevsky").await.unwrap();
        let (second, created_second) = get_or_create(&mut conn, "Fyodor Dostoevsky").await.unwrap();
        drop(conn);

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(first.id, second.id);
        assert_eq!(db.authors().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_by_ids() {
        let db = db().await;
        let a = db
            .authors()
            .create(CreateAuthor { name: "Sandi Metz".to_string(), born: None })
            .await
            .unwrap();
        db.authors()
            .create(CreateAuthor { name: "Martin Fowler".to_string(), born: Some(1963) })
            .await
            .unwrap();

        let found = db.authors().get_by_ids(&[a.id.clone(), "missing".to_string()]).await.unwrap();

        assert_eq!(found, vec![a]);
        assert!(db.authors().get_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let db = db().await;

        let result = db
            .authors()
            .create(CreateAuthor { name: " ".to_string(), born: None })
            .await;

        assert_matches!(result, Err(DbError::Validation { field: "author", .. }));
    }
}
