//! Storage: the `xkcd_comics` table behind a backend-neutral session trait.
//!
//! Layout:
//! - `schema.rs`: DDL and statements per backend
//! - `store.rs`: `ComicStore` / `ComicSession` traits
//! - `postgres.rs`, `sqlite.rs`: backends
//! - `bootstrap.rs`: database and table creation

pub mod bootstrap;
pub mod postgres;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use bootstrap::{BootstrapReport, init_database};
pub use postgres::PgComicStore;
pub use schema::{POSTGRES_INIT, SQLITE_INIT};
pub use sqlite::SqliteComicStore;
pub use store::{ComicSession, ComicStore, InsertOutcome};

use sqlx::postgres::PgConnectOptions;
use sqlx::sqlite::SqliteConnectOptions;
use std::{str::FromStr, sync::Arc, time::Duration};
use tracing::warn;

use crate::config::DatabaseConfig;
use crate::error::StorageError;

/// Where `DatabaseConfig` points.
#[derive(Debug, Clone)]
pub enum DatabaseTarget {
    Postgres(PgConnectOptions),
    Sqlite(SqliteConnectOptions),
}

impl DatabaseTarget {
    pub fn from_config(cfg: &DatabaseConfig) -> Result<Self, StorageError> {
        match cfg.url.as_deref().map(str::trim) {
            Some(url) if url.starts_with("sqlite:") => {
                let options = SqliteConnectOptions::from_str(url)
                    .map_err(StorageError::InvalidTarget)?
                    .create_if_missing(true)
                    .busy_timeout(Duration::from_secs(5));
                Ok(Self::Sqlite(options))
            }
            Some(url) => {
                let options =
                    PgConnectOptions::from_str(url).map_err(StorageError::InvalidTarget)?;
                Ok(Self::Postgres(options))
            }
            None => Ok(Self::Postgres(
                PgConnectOptions::new()
                    .host(&cfg.host)
                    .port(cfg.port)
                    .database(&cfg.name)
                    .username(&cfg.user)
                    .password(&cfg.password),
            )),
        }
    }

    pub fn into_store(self, connect_timeout: Duration) -> Arc<dyn ComicStore> {
        match self {
            Self::Postgres(options) => Arc::new(PgComicStore::new(options, connect_timeout)),
            Self::Sqlite(options) => Arc::new(SqliteComicStore::new(options, connect_timeout)),
        }
    }
}

/// Builds the configured store. No connection is made here.
pub fn store_from_config(cfg: &DatabaseConfig) -> Result<Arc<dyn ComicStore>, StorageError> {
    let target = DatabaseTarget::from_config(cfg)?;
    Ok(target.into_store(cfg.connect_timeout()))
}

/// Opens and closes one session, reading the stored maximum on the way. Fails
/// when storage is unreachable or the table is missing.
pub async fn probe(store: &dyn ComicStore) -> Result<Option<crate::model::ComicId>, StorageError> {
    let mut session = store.open().await?;
    let max = session.max_comic_id().await;
    if let Err(e) = session.close().await {
        warn!(backend = store.backend(), error = %e, "Failed to close storage session");
    }
    max
}
