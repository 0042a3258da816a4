use chrono::Utc;
use sqlx::sqlite::SqlitePool;

use super::StoreError;
use crate::domain::Settings;

/// Fixed key the settings record lives under.
const SETTINGS_KEY: &str = "settings";

/// Single-row settings store. The pipeline reads through this before every
/// evaluation; nothing caches the record across evaluations.
#[derive(Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Loads the persisted record, falling back to defaults when the row is
    /// missing or has never been written.
    pub async fn load(&self) -> Result<Settings, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as(r#"SELECT payload FROM settings WHERE key = ?1"#)
                .bind(SETTINGS_KEY)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((payload,)) => Ok(serde_json::from_str(&payload)?),
            None => Ok(Settings::default()),
        }
    }

    /// Saves the record, enforcing the threshold ordering invariant and
    /// normalizing the whitelist (trimmed, empty entries dropped). Concurrent
    /// saves are last-write-wins.
    pub async fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        if !settings.thresholds_ordered() {
            return Err(StoreError::ThresholdOrder {
                suspicious: settings.suspicious_threshold,
                dangerous: settings.dangerous_threshold,
            });
        }

        let mut normalized = settings.clone();
        normalized.whitelist = normalized
            .whitelist
            .iter()
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();

        let payload = serde_json::to_string(&normalized)?;
        sqlx::query(
            r#"INSERT OR REPLACE INTO settings (key, payload, updated_at) VALUES (?1, ?2, ?3)"#,
        )
        .bind(SETTINGS_KEY)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// First-activation initialization: writes the default record only when
    /// no record exists yet. Returns true when the defaults were installed.
    pub async fn ensure_defaults(&self) -> Result<bool, StoreError> {
        let payload = serde_json::to_string(&Settings::default())?;
        let affected = sqlx::query(
            r#"INSERT OR IGNORE INTO settings (key, payload, updated_at) VALUES (?1, ?2, ?3)"#,
        )
        .bind(SETTINGS_KEY)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }
}
