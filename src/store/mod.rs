//! Record store selection.

pub mod sqlite;

pub use sqlite::SqliteRecordStore;

use crate::baas::{BaasClient, Database};
use crate::config::{expand_path, StoreBackend, StoreConfig};
use std::sync::Arc;

/// Build the configured [`Database`]: the BaaS itself, or a local SQLite file.
pub fn open_database(config: &StoreConfig, baas: &BaasClient) -> anyhow::Result<Arc<dyn Database>> {
    match config.backend {
        StoreBackend::Baas => Ok(Arc::new(baas.clone())),
        StoreBackend::Sqlite => {
            let path = expand_path(&config.sqlite_path)?;
            tracing::info!(path = %path.display(), "Using local SQLite record store");
            Ok(Arc::new(SqliteRecordStore::new(&path)?))
        }
    }
}
