//! Books repository

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool as Pool;

use super::authors::{self, AuthorRecord};
use super::error::{DbResult, map_unique_violation, require_min_length};
use super::sqlite_helpers::{json_to_vec, new_id, now_iso8601, vec_to_json};

/// Minimum book title length, in characters
pub const MIN_TITLE_LENGTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub published: i32,
    pub author_id: String,
    pub genres: Vec<String>,
    pub created_at: String,
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: String,
    title: String,
    published: i32,
    author_id: String,
    genres: String,
    created_at: String,
}

impl From<BookRow> for BookRecord {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            published: row.published,
            author_id: row.author_id,
            genres: json_to_vec(&row.genres),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateBook {
    pub title: String,
    pub published: i32,
    /// Author name; the author is created if it does not exist yet
    pub author: String,
    pub genres: Vec<String>,
}

/// Outcome of [BookRepository::create_with_author]
#[derive(Debug, Clone)]
pub struct CreatedBook {
    pub book: BookRecord,
    pub author: AuthorRecord,
    pub author_created: bool,
}

/// Drop repeated genres, keeping the first occurrence
fn dedup_genres(genres: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(genres.len());
    for genre in genres {
        if !unique.contains(&genre) {
            unique.push(genre);
        }
    }
    unique
}

pub struct BookRepository {
    pool: Pool,
}

impl BookRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a book, creating its author by name first if needed.
    ///
    /// Both writes happen in one transaction: a rejected book never leaves
    /// a freshly created author behind.
    pub async fn create_with_author(&self, input: CreateBook) -> DbResult<CreatedBook> {
        require_min_length("title", &input.title, MIN_TITLE_LENGTH)?;

        let mut tx = self.pool.begin().await?;

        let (author, author_created) = authors::get_or_create(&mut *tx, &input.author).await?;

        let book = BookRecord {
            id: new_id(),
            title: input.title,
            published: input.published,
            author_id: author.id.clone(),
            genres: dedup_genres(input.genres),
            created_at: now_iso8601(),
        };

        sqlx::query(
            r#"
            INSERT INTO books (id, title, published, author_id, genres, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.id)
        .bind(&book.title)
        .bind(book.published)
        .bind(&book.author_id)
        .bind(vec_to_json(&book.genres))
        .bind(&book.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "title", &book.title))?;

        tx.commit().await?;

        Ok(CreatedBook {
            book,
            author,
            author_created,
        })
    }

    /// List books, optionally restricted to one author
    pub async fn list(&self, author_id: Option<&str>) -> DbResult<Vec<BookRecord>> {
        let rows = match author_id {
            Some(author_id) => {
                sqlx::query_as::<_, BookRow>(
                    "SELECT id, title, published, author_id, genres, created_at FROM books WHERE author_id = ? ORDER BY rowid",
                )
                .bind(author_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, BookRow>(
                    "SELECT id, title, published, author_id, genres, created_at FROM books ORDER BY rowid",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(BookRecord::from).collect())
    }

    /// Count all books
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count books per author for every id in `author_ids`.
    ///
    /// Authors without books are present with a count of 0.
    pub async fn count_by_author_ids(&self, author_ids: &[String]) -> DbResult<HashMap<String, i64>> {
        let mut counts: HashMap<String, i64> =
            author_ids.iter().map(|id| (id.clone(), 0)).collect();
        if author_ids.is_empty() {
            return Ok(counts);
        }

        let placeholders = vec!["?"; author_ids.len()].join(", ");
        let sql = format!(
            "SELECT author_id, COUNT(*) FROM books WHERE author_id IN ({}) GROUP BY author_id",
            placeholders
        );

        let mut query = sqlx::query_as::<_, (String, i64)>(&sql);
        for id in author_ids {
            query = query.bind(id);
        }

        for (author_id, count) in query.fetch_all(&self.pool).await? {
            counts.insert(author_id, count);
        }

        Ok(counts)
    }
}
