use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::range::backfill_range;
use crate::db::{ComicSession, ComicStore, InsertOutcome};
use crate::error::SyncError;
use crate::model::{ComicId, ComicSummary};
use crate::source::XkcdClient;

/// Result of one reconciliation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    UpToDate {
        latest: ComicId,
        stored_max: Option<ComicId>,
    },
    Backfilled(BackfillReport),
}

impl ReconcileOutcome {
    pub fn is_up_to_date(&self) -> bool {
        matches!(self, ReconcileOutcome::UpToDate { .. })
    }

    pub fn inserted(&self) -> usize {
        match self {
            ReconcileOutcome::UpToDate { .. } => 0,
            ReconcileOutcome::Backfilled(report) => report.inserted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillReport {
    pub latest: ComicId,
    pub stored_max: Option<ComicId>,
    pub range: RangeInclusive<ComicId>,
    pub inserted: usize,
    /// Already present; the insert was a no-op.
    pub skipped: usize,
    /// Fetch or insert failed; newest first.
    pub failed: Vec<ComicId>,
}

impl BackfillReport {
    fn new(latest: ComicId, stored_max: Option<ComicId>, range: RangeInclusive<ComicId>) -> Self {
        Self {
            latest,
            stored_max,
            range,
            inserted: 0,
            skipped: 0,
            failed: Vec::new(),
        }
    }
}

/// Brings storage up to the latest upstream comic.
///
/// Sequential by construction: one fetch, then one insert, per identifier.
pub struct Reconciler {
    source: XkcdClient,
    store: Arc<dyn ComicStore>,
}

impl Reconciler {
    pub fn new(source: XkcdClient, store: Arc<dyn ComicStore>) -> Self {
        Self { source, store }
    }

    /// Fetches the latest comic, opens a storage session for this cycle only and
    /// backfills every missing identifier from newest to oldest.
    ///
    /// Errors abort the cycle only when the latest comic cannot be fetched or the
    /// session cannot be opened or queried for its maximum. Individual comics
    /// that fail are logged and counted in the report.
    pub async fn reconcile(&self) -> Result<ReconcileOutcome, SyncError> {
        let latest = self.source.fetch_latest().await?;

        let mut session = self.store.open().await?;
        let result = self.reconcile_with(session.as_mut(), &latest).await;
        if let Err(e) = session.close().await {
            warn!(backend = self.store.backend(), error = %e, "Failed to close storage session");
        }
        result
    }

    async fn reconcile_with(
        &self,
        session: &mut dyn ComicSession,
        latest: &ComicSummary,
    ) -> Result<ReconcileOutcome, SyncError> {
        let stored_max = session.max_comic_id().await?;

        let Some(range) = backfill_range(latest.id, stored_max) else {
            info!(
                latest = latest.id,
                stored_max = ?stored_max,
                "No new comics to store; up to date"
            );
            return Ok(ReconcileOutcome::UpToDate {
                latest: latest.id,
                stored_max,
            });
        };

        info!(
            latest = latest.id,
            title = %latest.title,
            stored_max = ?stored_max,
            from = *range.start(),
            to = *range.end(),
            "New comics found; backfilling"
        );

        let mut report = BackfillReport::new(latest.id, stored_max, range.clone());
        for id in range.rev() {
            let comic = match self.source.fetch_item(id).await {
                Ok(comic) => comic,
                Err(e) => {
                    error!(comic_id = id, operation = "fetch", error = %e, "Failed to fetch comic");
                    report.failed.push(id);
                    continue;
                }
            };

            match session.insert_comic(&comic).await {
                Ok(InsertOutcome::Inserted) => {
                    info!(comic_id = id, title = %comic.title, "Comic inserted");
                    report.inserted += 1;
                }
                Ok(InsertOutcome::AlreadyPresent) => {
                    debug!(comic_id = id, "Comic already stored; skipped");
                    report.skipped += 1;
                }
                Err(e) => {
                    error!(comic_id = id, operation = "insert", error = %e, "Failed to store comic");
                    report.failed.push(id);
                }
            }
        }

        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            failed = report.failed.len(),
            "Backfill finished"
        );
        Ok(ReconcileOutcome::Backfilled(report))
    }
}
