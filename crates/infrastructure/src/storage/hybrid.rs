use async_trait::async_trait;
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::{Path, PathBuf};
use tinydns_application::ports::KeyValueStore;
use tinydns_domain::DomainError;
use tracing::{debug, info, warn};

const CREATE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS kv_cache (key TEXT PRIMARY KEY, value BLOB NOT NULL)";

/// In-memory map in front of a SQLite table.
///
/// Writes go to SQLite first and then to memory; reads fall through to SQLite
/// on a memory miss and promote what they find.
pub struct HybridStore {
    pool: SqlitePool,
    hot: DashMap<String, Vec<u8>, FxBuildHasher>,
    path: PathBuf,
    temporary: bool,
}

impl HybridStore {
    /// Opens (or creates) a store that outlives the process.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        Self::connect(path.as_ref().to_path_buf(), false).await
    }

    /// Creates a store in the system temp dir that is deleted on `close`.
    pub async fn temporary() -> Result<Self, DomainError> {
        let path = std::env::temp_dir().join(format!(
            "tinydns_cache_{}_{:016x}.db",
            std::process::id(),
            fastrand::u64(..)
        ));
        Self::connect(path, true).await
    }

    async fn connect(path: PathBuf, temporary: bool) -> Result<Self, DomainError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    DomainError::CacheStore(format!(
                        "Failed to create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DomainError::CacheStore(format!("Database error: {}", e)))?;

        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(|e| DomainError::CacheStore(format!("Database error: {}", e)))?;

        info!(path = %path.display(), temporary, "Cache store opened");

        Ok(Self {
            pool,
            hot: DashMap::with_hasher(FxBuildHasher),
            path,
            temporary,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    async fn remove_files(&self) {
        let mut files = vec![self.path.clone()];
        for suffix in ["-wal", "-shm"] {
            let mut name = self.path.clone().into_os_string();
            name.push(suffix);
            files.push(PathBuf::from(name));
        }

        for file in files {
            match tokio::fs::remove_file(&file).await {
                Ok(()) => debug!(path = %file.display(), "Removed cache file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %file.display(), error = %e, "Failed to remove cache file"),
            }
        }
    }
}

#[async_trait]
impl KeyValueStore for HybridStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DomainError> {
        if let Some(value) = self.hot.get(key) {
            return Ok(Some(value.clone()));
        }

        let row = sqlx::query("SELECT value FROM kv_cache WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::CacheStore(format!("Database error: {}", e)))?;

        Ok(row.map(|row| {
            let value: Vec<u8> = row.get("value");
            self.hot.insert(key.to_string(), value.clone());
            value
        }))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO kv_cache (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value.as_slice())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::CacheStore(format!("Database error: {}", e)))?;

        self.hot.insert(key.to_string(), value);
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        self.hot.clear();

        if self.temporary {
            self.remove_files().await;
        }
        info!(path = %self.path.display(), "Cache store closed");
    }
}
