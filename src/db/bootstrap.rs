use sqlx::postgres::PgConnectOptions;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, PgConnection, SqliteConnection};
use tracing::info;

use super::DatabaseTarget;
use super::schema::{POSTGRES_INIT, SQLITE_INIT, statements};
use crate::config::DatabaseConfig;
use crate::error::StorageError;

/// Database every Postgres server has; used to issue `CREATE DATABASE`.
const MAINTENANCE_DATABASE: &str = "postgres";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub backend: &'static str,
    /// False when the database already existed.
    pub database_created: bool,
}

/// Creates the configured database when missing, then the `xkcd_comics` table.
/// Safe to run repeatedly.
pub async fn init_database(cfg: &DatabaseConfig) -> Result<BootstrapReport, StorageError> {
    match DatabaseTarget::from_config(cfg)? {
        DatabaseTarget::Postgres(options) => bootstrap_postgres(options).await,
        DatabaseTarget::Sqlite(options) => bootstrap_sqlite(options).await,
    }
}

async fn bootstrap_postgres(options: PgConnectOptions) -> Result<BootstrapReport, StorageError> {
    let database_created = match options.get_database().map(str::to_owned) {
        Some(name) if name != MAINTENANCE_DATABASE => ensure_pg_database(&options, &name).await?,
        _ => false,
    };

    let mut conn = PgConnection::connect_with(&options)
        .await
        .map_err(StorageError::connect("postgres"))?;
    for stmt in statements(POSTGRES_INIT) {
        sqlx::query(stmt)
            .execute(&mut conn)
            .await
            .map_err(StorageError::query("create table"))?;
    }
    conn.close()
        .await
        .map_err(StorageError::query("close connection"))?;

    info!("Table xkcd_comics is ready (postgres)");
    Ok(BootstrapReport {
        backend: "postgres",
        database_created,
    })
}

async fn ensure_pg_database(options: &PgConnectOptions, name: &str) -> Result<bool, StorageError> {
    let maintenance = options.clone().database(MAINTENANCE_DATABASE);
    let mut conn = PgConnection::connect_with(&maintenance)
        .await
        .map_err(StorageError::connect("postgres"))?;

    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(name)
        .fetch_optional(&mut conn)
        .await
        .map_err(StorageError::query("check database exists"))?;

    let created = if exists.is_some() {
        info!(database = name, "Database already exists");
        false
    } else {
        let stmt = format!("CREATE DATABASE {}", quote_identifier(name));
        sqlx::query(&stmt)
            .execute(&mut conn)
            .await
            .map_err(StorageError::query("create database"))?;
        info!(database = name, "Database created");
        true
    };

    conn.close()
        .await
        .map_err(StorageError::query("close connection"))?;
    Ok(created)
}

async fn bootstrap_sqlite(options: SqliteConnectOptions) -> Result<BootstrapReport, StorageError> {
    let existed = options.get_filename().exists();

    let mut conn = SqliteConnection::connect_with(&options)
        .await
        .map_err(StorageError::connect("sqlite"))?;
    for stmt in statements(SQLITE_INIT) {
        sqlx::query(stmt)
            .execute(&mut conn)
            .await
            .map_err(StorageError::query("create table"))?;
    }
    conn.close()
        .await
        .map_err(StorageError::query("close connection"))?;

    info!(path = %options.get_filename().display(), "Table xkcd_comics is ready (sqlite)");
    Ok(BootstrapReport {
        backend: "sqlite",
        database_created: !existed,
    })
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
