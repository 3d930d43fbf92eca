//! Schema synchronization for the catalog tables
//!
//! Creates missing tables and indexes on startup. Every statement is
//! idempotent, so running the sync against an existing database is a no-op.
//! Column changes are not handled and require a database wipe.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

/// A table owned by this service
struct TableDef {
    name: &'static str,
    create_sql: &'static str,
    indexes: &'static [&'static str],
}

const TABLES: &[TableDef] = &[
    TableDef {
        name: "users",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                favorite_genre TEXT,
                created_at TEXT NOT NULL
            )
        "#,
        indexes: &[],
    },
    TableDef {
        name: "authors",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS authors (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                born INTEGER,
                created_at TEXT NOT NULL
            )
        "#,
        indexes: &[],
    },
    TableDef {
        name: "books",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS books (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL UNIQUE,
                published INTEGER NOT NULL,
                author_id TEXT NOT NULL REFERENCES authors(id),
                genres TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            )
        "#,
        indexes: &["CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id)"],
    },
];

/// Result of a schema sync operation
#[derive(Debug, Default)]
pub struct SchemaSyncResult {
    pub tables_created: Vec<String>,
    pub errors: Vec<String>,
}

/// Check if a table exists in the database
async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Create every missing table and index
pub async fn sync_tables(pool: &SqlitePool) -> Result<SchemaSyncResult, sqlx::Error> {
    let mut result = SchemaSyncResult::default();

    for table in TABLES {
        let existed = table_exists(pool, table.name).await?;

        debug!("Syncing table {}", table.name);
        if let Err(e) = sqlx::query(table.create_sql.trim()).execute(pool).await {
            let msg = format!("Failed to create table {}: {}", table.name, e);
            warn!("{}", msg);
            result.errors.push(msg);
            continue;
        }
        if !existed {
            info!("Created table: {}", table.name);
            result.tables_created.push(table.name.to_string());
        }

        for index_sql in table.indexes {
            if let Err(e) = sqlx::query(*index_sql).execute(pool).await {
                let msg = format!("Failed to create index on {}: {}", table.name, e);
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
    }

    Ok(result)
}
