//! Users repository

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool as Pool;

use super::error::{DbResult, map_unique_violation, require_min_length};
use super::sqlite_helpers::{new_id, now_iso8601};

/// Minimum username length, in characters
pub const MIN_USERNAME_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub favorite_genre: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub favorite_genre: Option<String>,
}

pub struct UsersRepository {
    pool: Pool,
}

impl UsersRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new user
    ///
    /// Fails with a validation error when the username is too short or taken.
    pub async fn create(&self, user: CreateUser) -> DbResult<UserRecord> {
        require_min_length("username", &user.username, MIN_USERNAME_LENGTH)?;

        let record = UserRecord {
            id: new_id(),
            username: user.username,
            favorite_genre: user.favorite_genre,
            created_at: now_iso8601(),
        };

        sqlx::query(
            "INSERT INTO users (id, username, favorite_genre, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.username)
        .bind(&record.favorite_genre)
        .bind(&record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "username", &record.username))?;

        Ok(record)
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, favorite_genre, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by username (exact match)
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, favorite_genre, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List all users in creation order
    pub async fn list(&self) -> DbResult<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, favorite_genre, created_at FROM users ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, DbError};
    use assert_matches::assert_matches;

    async fn users() -> UsersRepository {
        Database::connect("sqlite::memory:", 1)
            .await
            .expect("in-memory database")
            .users()
    }

    fn input(username: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            favorite_genre: Some("refactoring".to_string()),
        }
    }

    #[tokio::test]
    async fn test_short_username_is_rejected() {
        let users = users().await;

        let result = users.create(input("ab")).await;

        assert_matches!(result, Err(DbError::Validation { field: "username", .. }));
        assert!(users.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let users = users().await;
        users.create(input("mluukkai")).await.unwrap();

        let result = users.create(input("mluukkai")).await;

        assert_matches!(result, Err(DbError::Validation { field: "username", .. }));
        assert_eq!(users.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_by_username_and_id() {
        let users = users().await;
        let created = users.create(input("root")).await.unwrap();

        let by_name = users.get_by_username("root").await.unwrap();
        let by_id = users.get_by_id(&created.id).await.unwrap();

        assert_eq!(by_name.as_ref(), Some(&created));
        assert_eq!(by_id, Some(created));
        assert_eq!(users.get_by_username("ROOT").await.unwrap(), None);
    }
}
