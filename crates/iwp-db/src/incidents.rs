//! Database operations for the `incidents` document table.

use chrono::{DateTime, Utc};
use iwp_core::{IncidentRecord, IncidentSink};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::DbError;

/// An incident document read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredIncident {
    pub id: i64,
    pub scrape_run_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub record: IncidentRecord,
}

#[derive(sqlx::FromRow)]
struct IncidentDocumentRow {
    id: i64,
    scrape_run_id: Option<i64>,
    document: Json<IncidentRecord>,
    created_at: DateTime<Utc>,
}

impl From<IncidentDocumentRow> for StoredIncident {
    fn from(row: IncidentDocumentRow) -> Self {
        Self {
            id: row.id,
            scrape_run_id: row.scrape_run_id,
            created_at: row.created_at,
            record: row.document.0,
        }
    }
}

/// Insert-only incident store, optionally tagging rows with the run that
/// produced them.
#[derive(Debug, Clone)]
pub struct IncidentStore {
    pool: PgPool,
    scrape_run_id: Option<i64>,
}

impl IncidentStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            scrape_run_id: None,
        }
    }

    /// Tags every row inserted through this store with `scrape_run_id`.
    #[must_use]
    pub fn for_run(pool: PgPool, scrape_run_id: i64) -> Self {
        Self {
            pool,
            scrape_run_id: Some(scrape_run_id),
        }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl IncidentSink for IncidentStore {
    type Error = DbError;

    async fn insert_many(&self, records: &[IncidentRecord]) -> Result<usize, DbError> {
        insert_incidents(&self.pool, self.scrape_run_id, records).await
    }

    async fn count(&self) -> Result<u64, DbError> {
        count_incidents(&self.pool).await
    }
}

/// Inserts every record as a new document in one transaction.
///
/// Returns the number of rows written. Nothing is deduplicated.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails; the whole batch is then
/// rolled back.
pub async fn insert_incidents(
    pool: &PgPool,
    scrape_run_id: Option<i64>,
    records: &[IncidentRecord],
) -> Result<usize, DbError> {
    if records.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    for record in records {
        sqlx::query(
            "INSERT INTO incidents (scrape_run_id, incident_url, incident_title, document) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(scrape_run_id)
        .bind(&record.url)
        .bind(&record.title)
        .bind(Json(record))
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    Ok(records.len())
}

/// Total number of stored incident documents.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_incidents(pool: &PgPool) -> Result<u64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM incidents")
        .fetch_one(pool)
        .await?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Returns stored incidents in insertion order, at most `limit` of them
/// (`None` returns all).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails or a document does not
/// decode into an [`IncidentRecord`].
pub async fn list_incidents(
    pool: &PgPool,
    limit: Option<i64>,
) -> Result<Vec<StoredIncident>, DbError> {
    let rows = sqlx::query_as::<_, IncidentDocumentRow>(
        "SELECT id, scrape_run_id, document, created_at \
         FROM incidents \
         ORDER BY id \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(StoredIncident::from).collect())
}
