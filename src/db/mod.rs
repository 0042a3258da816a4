use std::{path::Path, str::FromStr, time::Duration};

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

pub mod evidence;
pub mod settings;

/// Failure of the local settings/evidence store. Every variant is recovered
/// at the evaluation that hit it; nothing is retried automatically.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable(#[from] sqlx::Error),
    #[error("stored payload did not decode")]
    Decode(#[from] serde_json::Error),
    #[error("suspiciousThreshold must stay below dangerousThreshold ({suspicious} >= {dangerous})")]
    ThresholdOrder { suspicious: i32, dangerous: i32 },
}

pub async fn init_pool(db_path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            payload TEXT NOT NULL,
            updated_at DATETIME
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS evidence (
            id TEXT PRIMARY KEY,
            url TEXT NOT NULL,
            verdict TEXT NOT NULL,
            created_at DATETIME NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    // A single connection keeps every test query on the same in-memory db.
    // sqlx opens the connection on a background OS thread. Under
    // `#[tokio::test(start_paused = true)]` the current-thread runtime would
    // otherwise auto-advance the virtual clock to the pool acquire timeout
    // before that thread can report success, so keep the runtime busy with
    // `yield_now` until the connection is established. Once the single
    // connection is pooled, later acquires are immediate and clock-independent.
    let options = SqlitePoolOptions::new().max_connections(1);
    let pool = drive_busy(options.connect("sqlite::memory:"))
        .await
        .expect("in-memory sqlite");
    drive_busy(run_migrations(&pool)).await.expect("migrations");
    pool
}

/// Drives a future to completion while keeping the current-thread runtime
/// busy, so `#[tokio::test(start_paused = true)]` does not auto-advance the
/// virtual clock past sqlx operations that complete on a background thread.
#[cfg(test)]
async fn drive_busy<F: std::future::Future>(future: F) -> F::Output {
    let mut future = Box::pin(future);
    loop {
        tokio::select! {
            biased;
            output = &mut future => break output,
            _ = tokio::task::yield_now() => {}
        }
    }
}
