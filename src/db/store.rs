use async_trait::async_trait;

use crate::error::StorageError;
use crate::model::{Comic, ComicId};

/// Result of an idempotent insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The key already existed; the stored row was left untouched.
    AlreadyPresent,
}

impl InsertOutcome {
    pub(crate) fn from_rows_affected(rows: u64) -> Self {
        if rows == 0 {
            InsertOutcome::AlreadyPresent
        } else {
            InsertOutcome::Inserted
        }
    }
}

/// A storage backend able to hand out one connection per reconciliation cycle.
#[async_trait]
pub trait ComicStore: Send + Sync {
    /// Backend name for logs ("postgres", "sqlite").
    fn backend(&self) -> &'static str;

    /// Opens a fresh connection; no pooling.
    async fn open(&self) -> Result<Box<dyn ComicSession>, StorageError>;
}

/// One open connection. Every insert is committed on its own.
#[async_trait]
pub trait ComicSession: Send {
    /// Highest stored comic number, `None` for an empty table.
    async fn max_comic_id(&mut self) -> Result<Option<ComicId>, StorageError>;

    /// `INSERT ... ON CONFLICT (comic_id) DO NOTHING`.
    async fn insert_comic(&mut self, comic: &Comic) -> Result<InsertOutcome, StorageError>;

    async fn close(self: Box<Self>) -> Result<(), StorageError>;
}

pub(crate) fn comic_id_from_db(raw: i64) -> Result<ComicId, StorageError> {
    ComicId::try_from(raw).map_err(|_| StorageError::IdOutOfRange(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_affected_maps_to_outcome() {
        assert_eq!(InsertOutcome::from_rows_affected(1), InsertOutcome::Inserted);
        assert_eq!(
            InsertOutcome::from_rows_affected(0),
            InsertOutcome::AlreadyPresent
        );
    }

    #[test]
    fn negative_ids_are_rejected() {
        assert!(matches!(
            comic_id_from_db(-4),
            Err(StorageError::IdOutOfRange(-4))
        ));
        assert_eq!(comic_id_from_db(2_000).unwrap(), 2_000);
    }
}
