use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use std::time::Duration;
use tokio::time::timeout;

use super::schema::{POSTGRES_INSERT_COMIC, SELECT_MAX_COMIC_ID};
use super::store::{ComicSession, ComicStore, InsertOutcome, comic_id_from_db};
use crate::error::StorageError;
use crate::model::{Comic, ComicId};

const BACKEND: &str = "postgres";

#[derive(Debug, Clone)]
pub struct PgComicStore {
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl PgComicStore {
    pub fn new(options: PgConnectOptions, connect_timeout: Duration) -> Self {
        Self {
            options,
            connect_timeout,
        }
    }
}

#[async_trait]
impl ComicStore for PgComicStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn open(&self) -> Result<Box<dyn ComicSession>, StorageError> {
        let conn = timeout(self.connect_timeout, PgConnection::connect_with(&self.options))
            .await
            .map_err(|_| StorageError::ConnectTimeout {
                backend: BACKEND,
                after: self.connect_timeout,
            })?
            .map_err(StorageError::connect(BACKEND))?;
        Ok(Box::new(PgSession { conn }))
    }
}

struct PgSession {
    conn: PgConnection,
}

#[async_trait]
impl ComicSession for PgSession {
    async fn max_comic_id(&mut self) -> Result<Option<ComicId>, StorageError> {
        let max: Option<i32> = sqlx::query_scalar(SELECT_MAX_COMIC_ID)
            .fetch_one(&mut self.conn)
            .await
            .map_err(StorageError::query("select max comic_id"))?;
        max.map(|id| comic_id_from_db(i64::from(id))).transpose()
    }

    async fn insert_comic(&mut self, comic: &Comic) -> Result<InsertOutcome, StorageError> {
        let id = i32::try_from(comic.id).map_err(|_| StorageError::IdOutOfRange(comic.id.into()))?;
        let result = sqlx::query(POSTGRES_INSERT_COMIC)
            .bind(id)
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
