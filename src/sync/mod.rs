//! Reconciliation: compare upstream's latest comic with storage and fill the gap.

mod range;
mod reconciler;

pub use range::{INITIAL_BACKFILL_WINDOW, backfill_range};
pub use reconciler::{BackfillReport, ReconcileOutcome, Reconciler};
