use async_trait::async_trait;
use jiff::Timestamp;
use linkmint_core::store::Result;
use linkmint_core::{Link, LinkStore, NewLink, ShortCode, StorageError};
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};
use std::time::Duration;
use tracing::{debug, trace};

/// Schema for the `links` table.
pub const SCHEMA: &str = include_str!("../ddl/mysql/links.sql");

const URL_UNIQUE_INDEX: &str = "uq_links_original_url";

/// MySQL implementation of the link store contract.
///
/// Uniqueness of both `short_code` and `original_url` is enforced by unique
/// indexes; duplicate-key errors are reported as conflicts, told apart by the
/// index name in the server message. Timestamps are stored as unix seconds.
#[derive(Debug, Clone)]
pub struct MySqlLinkStore {
    pool: MySqlPool,
}

impl MySqlLinkStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    ///
    /// `acquire_timeout` bounds how long a call waits for a pooled connection.
    pub async fn connect(database_url: &str, acquire_timeout: Duration) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `links` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("links schema ensured");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_created_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", seconds))
    })
}

fn row_to_link(row: &MySqlRow) -> Result<Link> {
    let id: u64 = row.try_get("id").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(Link {
        id,
        original_url,
        short_code: ShortCode::new_unchecked(short_code),
        created_at: parse_created_at(created_at)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_conflict(err: &sqlx::Error, link: &NewLink) -> StorageError {
    let on_url = err
        .as_database_error()
        .is_some_and(|db| db.message().contains(URL_UNIQUE_INDEX));

    if on_url {
        StorageError::UrlConflict(link.original_url.clone())
    } else {
        StorageError::CodeConflict(link.short_code.to_string())
    }
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl LinkStore for MySqlLinkStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<Link>> {
        let row = sqlx::query(
            r#"
            SELECT id, original_url, short_code, created_at
            FROM links
            WHERE original_url = ?
            LIMIT 1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_link).transpose()
    }

    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Link>> {
        let row = sqlx::query(
            r#"
            SELECT id, original_url, short_code, created_at
            FROM links
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_link).transpose()
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM links
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn create(&self, link: NewLink) -> Result<Link> {
        let created_at = Timestamp::now().as_second();

        let result = sqlx::query(
            r#"
            INSERT INTO links (short_code, original_url, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(link.short_code.as_str())
        .bind(link.original_url.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_id();
                trace!(code = %link.short_code, id, "inserted link row");
                Ok(Link {
                    id,
                    original_url: link.original_url,
                    short_code: link.short_code,
                    created_at: parse_created_at(created_at)?,
                })
            }
            Err(err) if is_unique_violation(&err) => Err(map_conflict(&err, &link)),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn list(&self, limit: usize) -> Result<Vec<Link>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query(
            r#"
            SELECT id, original_url, short_code, created_at
            FROM links
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_link).collect()
    }
}
