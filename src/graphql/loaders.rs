//! GraphQL DataLoaders for batching database queries
//!
//! Resolving `allAuthors { bookCount }` or `allBooks { author { name } }`
//! would otherwise issue one query per row. The loaders collect the keys
//! requested within the same tick and fetch them in a single query.
//! Nothing is cached between loads, so counts always reflect the current
//! book records.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dataloader::Loader;

use crate::db::{AuthorRecord, Database, DbError};

/// Loads authors by id
pub struct AuthorLoader {
    db: Database,
}

impl AuthorLoader {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl Loader<String> for AuthorLoader {
    type Value = AuthorRecord;
    type Error = Arc<DbError>;

    async fn load(&self, keys: &[String]) -> Result<HashMap<String, Self::Value>, Self::Error> {
        tracing::debug!(count = keys.len(), "Batch loading authors");

        let authors = self.db.authors().get_by_ids(keys).await.map_err(Arc::new)?;
        Ok(authors.into_iter().map(|a| (a.id.clone(), a)).collect())
    }
}

/// Counts books per author id
pub struct BookCountLoader {
    db: Database,
}

impl BookCountLoader {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl Loader<String> for BookCountLoader {
    type Value = i64;
    type Error = Arc<DbError>;

    async fn load(&self, keys: &[String]) -> Result<HashMap<String, Self::Value>, Self::Error> {
        tracing::debug!(count = keys.len(), "Batch counting books");

        self.db
            .books()
            .count_by_author_ids(keys)
            .await
            .map_err(Arc::new)
    }
}
