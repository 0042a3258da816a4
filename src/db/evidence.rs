use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;

use super::StoreError;
use crate::domain::Verdict;

/// The verdict retained behind a notification so the detail view can explain
/// the warning. Advisory data: rows orphaned by a restart are tolerated and
/// cleaned by the startup sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceRecord {
    pub id: String,
    pub url: String,
    pub verdict: Verdict,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct EvidenceRepository {
    pool: SqlitePool,
}

impl EvidenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn put(&self, id: &str, url: &str, verdict: &Verdict) -> Result<(), StoreError> {
        let payload = serde_json::to_string(verdict)?;
        sqlx::query(
            r#"INSERT OR REPLACE INTO evidence (id, url, verdict, created_at)
                VALUES (?1, ?2, ?3, ?4)"#,
        )
        .bind(id)
        .bind(url)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Option<EvidenceRecord>, StoreError> {
        let row: Option<(String, String, String, DateTime<Utc>)> = sqlx::query_as(
            r#"SELECT id, url, verdict, created_at FROM evidence WHERE id = ?1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((id, url, payload, created_at)) => Ok(Some(EvidenceRecord {
                id,
                url,
                verdict: serde_json::from_str(&payload)?,
                created_at,
            })),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let affected = sqlx::query(r#"DELETE FROM evidence WHERE id = ?1"#)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    /// Deletes rows older than `ttl`. Run once at startup to bound the
    /// lifetime of records orphaned by a restart.
    pub async fn sweep_expired(&self, ttl: std::time::Duration) -> Result<u64, StoreError> {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero());
        let affected = sqlx::query(r#"DELETE FROM evidence WHERE created_at < ?1"#)
            .bind(cutoff)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected)
    }
}
