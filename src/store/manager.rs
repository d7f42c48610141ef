use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::config;

/// Errors from the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Collections managed by this service.
pub const COLLECTIONS: &[&str] = &["users", "profiles", "posts"];

/// Connection pool manager for the document store database
pub struct StoreManager {
    pool: Arc<RwLock<Option<PgPool>>>,
}

impl StoreManager {
    fn instance() -> &'static StoreManager {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<StoreManager> = OnceLock::new();
        INSTANCE.get_or_init(|| StoreManager { pool: Arc::new(RwLock::new(None)) })
    }

    /// Get the shared pool, creating it lazily from DATABASE_URL
    pub async fn pool() -> Result<PgPool, StoreError> {
        let manager = Self::instance();

        // Fast path: try read lock
        {
            let pool = manager.pool.read().await;
            if let Some(pool) = pool.as_ref() {
                return Ok(pool.clone());
            }
        }

        let url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::ConfigMissing("DATABASE_URL"))?;

        let store_config = &config::config().store;
        let pool = PgPoolOptions::new()
            .max_connections(store_config.max_connections)
            .acquire_timeout(Duration::from_secs(store_config.connect_timeout_secs))
            .connect(&url)
            .await?;

        {
            let mut slot = manager.pool.write().await;
            *slot = Some(pool.clone());
        }

        info!("Created document store pool");
        Ok(pool)
    }

    /// Pings the store to ensure connectivity
    pub async fn health_check() -> Result<(), StoreError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Create the collection tables if they do not exist yet. Idempotent;
    /// run once at startup.
    pub async fn ensure_collections() -> Result<(), StoreError> {
        let pool = Self::pool().await?;
        for name in COLLECTIONS {
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {} (\
                 id UUID PRIMARY KEY, \
                 doc JSONB NOT NULL, \
                 created_at TIMESTAMPTZ NOT NULL DEFAULT now())",
                Self::quote_identifier(name)
            );
            sqlx::query(&ddl).execute(&pool).await?;
        }
        info!("Document store collections ready");
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close() {
        let manager = Self::instance();
        let mut slot = manager.pool.write().await;
        if let Some(pool) = slot.take() {
            pool.close().await;
            info!("Closed document store pool");
        }
    }

    /// Quote SQL identifier to prevent injection
    fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}
