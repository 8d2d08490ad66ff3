//! SQLite record store implementation.
//!
//! Local persistence for every collection in a single `records` table,
//! keyed by `(collection, id)` and ordered by insertion sequence.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use tracing::debug;

use super::connection::{create_pool, run_migrations, DbPool};
use super::model::{NewRecordRow, RecordRow};
use super::schema::records;
use crate::domain::Collection;
use crate::error::PersistenceError;
use crate::port::{PersistenceAdapter, Record};

/// SQLite-backed local store.
///
/// Implements [`PersistenceAdapter`] for the local-only strategy and as the
/// mirror of the mirrored strategy.
pub struct SqliteAdapter {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteAdapter {
    /// Create a store over an existing, migrated pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `path` and run migrations.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be created or migrations fail.
    pub fn open(path: &str) -> Result<Self, PersistenceError> {
        let pool = create_pool(path)?;
        run_migrations(&pool)?;
        debug!(path, "Opened local store");
        Ok(Self::new(pool))
    }

    fn conn(
        &self,
    ) -> Result<
        diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>,
        PersistenceError,
    > {
        self.pool
            .get()
            .map_err(|e| PersistenceError::Connection(e.to_string()))
    }

    fn to_row(collection: Collection, record: &Record) -> Result<NewRecordRow, PersistenceError> {
        let body = serde_json::to_string(&record.body)
            .map_err(|e| PersistenceError::Encoding(e.to_string()))?;
        Ok(NewRecordRow {
            collection: collection.as_str().to_string(),
            id: record.id.clone(),
            body,
            updated_at: Utc::now().to_rfc3339(),
        })
    }

    fn from_row(row: RecordRow) -> Result<Record, PersistenceError> {
        let body = serde_json::from_str(&row.body)
            .map_err(|e| PersistenceError::Encoding(format!("{} {}: {e}", row.collection, row.id)))?;
        Ok(Record { id: row.id, body })
    }
}

#[async_trait]
impl PersistenceAdapter for SqliteAdapter {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn load(&self, collection: Collection) -> Result<Vec<Record>, PersistenceError> {
        let mut conn = self.conn()?;

        let rows: Vec<RecordRow> = records::table
            .filter(records::collection.eq(collection.as_str()))
            .order(records::seq.asc())
            .select(RecordRow::as_select())
            .load(&mut conn)
            .map_err(|e| PersistenceError::Database(e.to_string()))?;

        debug!(%collection, count = rows.len(), "Loaded local records");
        rows.into_iter().map(Self::from_row).collect()
    }

    async fn put(&self, collection: Collection, record: &Record) -> Result<(), PersistenceError> {
        let row = Self::to_row(collection, record)?;
        let mut conn = self.conn()?;

        diesel::insert_into(records::table)
            .values(&row)
            .on_conflict((records::collection, records::id))
            .do_update()
            .set((
                records::body.eq(&row.body),
                records::updated_at.eq(&row.updated_at),
            ))
            .execute(&mut conn)
            .map_err(|e| PersistenceError::Database(e.to_string()))?;

        debug!(%collection, id = %record.id, "Stored local record");
        Ok(())
    }

    async fn remove(&self, collection: Collection, id: &str) -> Result<bool, PersistenceError> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            records::table
                .filter(records::collection.eq(collection.as_str()))
                .filter(records::id.eq(id)),
        )
        .execute(&mut conn)
        .map_err(|e| PersistenceError::Database(e.to_string()))?;

        debug!(%collection, id, deleted, "Removed local record");
        Ok(deleted > 0)
    }
}
