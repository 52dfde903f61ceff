use std::ops::RangeInclusive;

use crate::model::ComicId;

/// Comics fetched when the table is empty: `latest` and the 49 before it.
pub const INITIAL_BACKFILL_WINDOW: ComicId = 50;

/// Identifiers missing from storage, or `None` when storage is up to date.
///
/// The floor is `stored_max + 1` when anything is stored, otherwise
/// `max(latest - 49, 1)`. The range is `[floor, latest]`, empty when
/// `latest < floor`.
pub fn backfill_range(
    latest: ComicId,
    stored_max: Option<ComicId>,
) -> Option<RangeInclusive<ComicId>> {
    let floor = match stored_max {
        Some(max) => max.checked_add(1)?,
        None => latest
            .saturating_sub(INITIAL_BACKFILL_WINDOW - 1)
            .max(1),
    };

    (latest >= floor).then_some(floor..=latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_backfills_fifty() {
        let range = backfill_range(100, None).unwrap();
        assert_eq!(range, 51..=100);
        assert_eq!(range.count(), 50);
    }

    #[test]
    fn empty_table_window_is_clamped_at_one() {
        assert_eq!(backfill_range(30, None), Some(1..=30));
        assert_eq!(backfill_range(50, None), Some(1..=50));
        assert_eq!(backfill_range(51, None), Some(2..=51));
        assert_eq!(backfill_range(1, None), Some(1..=1));
    }

    #[test]
    fn zero_latest_on_empty_table_is_up_to_date() {
        assert_eq!(backfill_range(0, None), None);
    }

    #[test]
    fn resumes_after_stored_max() {
        assert_eq!(backfill_range(103, Some(100)), Some(101..=103));
        assert_eq!(backfill_range(101, Some(100)), Some(101..=101));
    }

    #[test]
    fn stored_max_does_not_use_the_initial_window() {
        // A gap wider than the initial window is still filled entirely.
        let range = backfill_range(500, Some(10)).unwrap();
        assert_eq!(range, 11..=500);
    }

    #[test]
    fn no_gap_is_up_to_date() {
        assert_eq!(backfill_range(100, Some(100)), None);
        // Storage ahead of upstream (e.g. upstream served a stale latest).
        assert_eq!(backfill_range(99, Some(100)), None);
        assert_eq!(backfill_range(ComicId::MAX, Some(ComicId::MAX)), None);
    }

    #[test]
    fn range_matches_floor_formula_exhaustively() {
        for latest in 0u32..=120 {
            for stored in std::iter::once(None).chain((0..=120).map(Some)) {
                let floor = match stored {
                    Some(m) => m + 1,
                    None => latest.saturating_sub(49).max(1),
                };
                let expected = (latest >= floor).then_some(floor..=latest);
                assert_eq!(
                    backfill_range(latest, stored),
                    expected,
                    "latest={latest} stored={stored:?}"
                );
            }
        }
    }
}
