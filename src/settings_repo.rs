// SQLite-backed settings blob. One row under a fixed key holds the persisted
// subset of store state as JSON; read once at startup, rewritten on change.

use crate::models::PersistedState;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

/// Fixed storage name for the persisted blob (matches the dashboard's key).
pub const STORAGE_KEY: &str = "lifi-storage";

pub struct SettingsRepo {
    pool: SqlitePool,
}

impl SettingsRepo {
    pub async fn connect(path: &str) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query("CREATE TABLE IF NOT EXISTS settings (key TEXT PRIMARY KEY, data BLOB NOT NULL)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, state), fields(repo = "settings", operation = "save"))]
    pub async fn save(&self, state: &PersistedState) -> anyhow::Result<()> {
        let blob = serde_json::to_vec(state)?;
        sqlx::query("INSERT OR REPLACE INTO settings (key, data) VALUES ($1, $2)")
            .bind(STORAGE_KEY)
            .bind(&blob)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Returns `None` when nothing has been persisted yet.
    #[instrument(skip(self), fields(repo = "settings", operation = "load"))]
    pub async fn load(&self) -> anyhow::Result<Option<PersistedState>> {
        let row = sqlx::query("SELECT data FROM settings WHERE key = $1")
            .bind(STORAGE_KEY)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => {
                let blob: Vec<u8> = row.get(0);
                Ok(Some(serde_json::from_slice(&blob)?))
            }
            None => Ok(None),
        }
    }
}
