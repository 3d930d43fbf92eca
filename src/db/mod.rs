//! Database connection and repositories

pub mod authors;
pub mod books;
pub mod error;
pub mod schema_sync;
pub mod sqlite_helpers;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub use authors::{AuthorRecord, AuthorRepository, CreateAuthor};
pub use books::{BookRecord, BookRepository, CreateBook, CreatedBook};
pub use error::{DbError, DbResult};
pub use users::{CreateUser, UserRecord, UsersRepository};

/// How long a connection waits on a locked database before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `url` and make sure the catalog tables exist.
    ///
    /// Each in-memory connection is its own database, so `sqlite::memory:`
    /// URLs get a single connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let (options, in_memory) = connect_options(url)?;
        let pool = pool_options(in_memory, max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database {}", url))?;
        Self::with_schema(pool).await
    }

    /// Connect, retrying transient failures every `retry_interval`.
    ///
    /// An invalid URL, an uncreatable directory or a failed schema sync is
    /// returned immediately.
    pub async fn connect_with_retry(
        url: &str,
        max_connections: u32,
        retry_interval: Duration,
    ) -> Result<Self> {
        let (options, in_memory) = connect_options(url)?;
        let pool = loop {
            match pool_options(in_memory, max_connections)
                .connect_with(options.clone())
                .await
            {
                Ok(pool) => break pool,
                Err(e) if is_transient(&e) => {
                    tracing::warn!(
                        error = %e,
                        retry_in_secs = retry_interval.as_secs(),
                        "Database connection failed, retrying"
                    );
                    tokio::time::sleep(retry_interval).await;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to open database {}", url));
                }
            }
        };
        Self::with_schema(pool).await
    }

    async fn with_schema(pool: SqlitePool) -> Result<Self> {
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get a users repository
    pub fn users(&self) -> UsersRepository {
        UsersRepository::new(self.pool.clone())
    }

    /// Get an authors repository
    pub fn authors(&self) -> AuthorRepository {
        AuthorRepository::new(self.pool.clone())
    }

    /// Get a books repository
    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    /// Create missing tables and indexes
    pub async fn migrate(&self) -> Result<()> {
        let result = schema_sync::sync_tables(&self.pool).await?;
        if !result.tables_created.is_empty() {
            tracing::info!(tables = ?result.tables_created, "Created tables");
        }
        if !result.errors.is_empty() {
            return Err(anyhow!("Schema sync failed: {}", result.errors.join("; ")));
        }
        Ok(())
    }

    /// Whether the database answers a trivial query
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

/// Parse `url` and create the database file's directory.
///
/// Returns the options and whether the database lives in memory.
fn connect_options(url: &str) -> Result<(SqliteConnectOptions, bool)> {
    let in_memory = url.contains(":memory:");
    let mut options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("Invalid database URL: {}", url))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
        if let Some(dir) = options.get_filename().parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create database directory {}", dir.display())
                })?;
            }
        }
    }

    Ok((options, in_memory))
}

fn pool_options(in_memory: bool, max_connections: u32) -> SqlitePoolOptions {
    if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    }
}

/// Whether a connect error may go away on its own
fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => true,
        // SQLITE_BUSY, SQLITE_LOCKED
        sqlx::Error::Database(db_err) => matches!(db_err.code().as_deref(), Some("5" | "6")),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_with_retry_fails_fast_on_bad_location() {
        // The parent "directory" is a regular file, so it can never be created
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let url = format!("sqlite:{}", blocker.join("catalog.db").display());

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            Database::connect_with_retry(&url, 1, Duration::from_millis(50)),
        )
        .await
        .expect("connect_with_retry must not loop on a permanent error");

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_connect_creates_file_database_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.db");
        let url = format!("sqlite:{}", path.display());

        let db = Database::connect_with_retry(&url, 2, Duration::from_millis(50))
            .await
            .unwrap();

        assert!(path.exists());
        assert!(db.ping().await);
        assert_eq!(db.books().count().await.unwrap(), 0);
    }
}
