use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use std::time::Duration;
use tokio::time::timeout;

use super::schema::{SELECT_MAX_COMIC_ID, SQLITE_INSERT_COMIC};
use super::store::{ComicSession, ComicStore, InsertOutcome, comic_id_from_db};
use crate::error::StorageError;
use crate::model::{Comic, ComicId};

const BACKEND: &str = "sqlite";

/// File-backed store for local runs and tests.
#[derive(Debug, Clone)]
pub struct SqliteComicStore {
    options: SqliteConnectOptions,
    connect_timeout: Duration,
}

impl SqliteComicStore {
    pub fn new(options: SqliteConnectOptions, connect_timeout: Duration) -> Self {
        Self {
            options,
            connect_timeout,
        }
    }
}

#[async_trait]
impl ComicStore for SqliteComicStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn open(&self) -> Result<Box<dyn ComicSession>, StorageError> {
        let conn = timeout(self.connect_timeout, SqliteConnection::connect_with(&self.options))
            .await
            .map_err(|_| StorageError::ConnectTimeout {
                backend: BACKEND,
                after: self.connect_timeout,
            })?
            .map_err(StorageError::connect(BACKEND))?;
        Ok(Box::new(SqliteSession { conn }))
    }
}

struct SqliteSession {
    conn: SqliteConnection,
}

#[async_trait]
impl ComicSession for SqliteSession {
    async fn max_comic_id(&mut self) -> Result<Option<ComicId>, StorageError> {
        let max: Option<i64> = sqlx::query_scalar(SELECT_MAX_COMIC_ID)
            .fetch_one(&mut self.conn)
            .await
            .map_err(StorageError::query("select max comic_id"))?;
        max.map(comic_id_from_db).transpose()
    }

    async fn insert_comic(&mut self, comic: &Comic) -> Result<InsertOutcome, StorageError> {
        let result = sqlx::query(SQLITE_INSERT_COMIC)
            .bind(i64::from(comic.id))
            .bind(&comic.title)
            .bind(&comic.img_url)
            .bind(&comic.alt_text)
            .bind(comic.date_published)
            .execute(&mut self.conn)
            .await
            .map_err(StorageError::query("insert comic"))?;
        Ok(InsertOutcome::from_rows_affected(result.rows_affected()))
    }

    async fn close(self: Box<Self>) -> Result<(), StorageError> {
        self.conn
            .close()
            .await
            .map_err(StorageError::query("close connection"))
    }
}
