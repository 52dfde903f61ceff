use chrono::{NaiveTime, Timelike};
use std::time::Duration;

const SECS_PER_DAY: u32 = 86_400;

/// Daily window `[start, end)` in UTC wall-clock time. A window with
/// `start > end` spans midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietPeriod {
    start: NaiveTime,
    end: NaiveTime,
}

impl QuietPeriod {
    /// `None` for an empty window (`start == end`).
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        (start != end).then_some(Self { start, end })
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.start < self.end {
            time >= self.start && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }

    /// Time until the window closes, at least one second.
    pub fn remaining(&self, time: NaiveTime) -> Duration {
        let now = time.num_seconds_from_midnight();
        let end = self.end.num_seconds_from_midnight();
        let secs = (end + SECS_PER_DAY - now) % SECS_PER_DAY;
        Duration::from_secs(u64::from(secs.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn empty_window_is_rejected() {
        assert!(QuietPeriod::new(t(1, 0, 0), t(1, 0, 0)).is_none());
    }

    #[test]
    fn same_day_window() {
        let quiet = QuietPeriod::new(t(2, 0, 0), t(4, 30, 0)).unwrap();
        assert!(!quiet.contains(t(1, 59, 59)));
        assert!(quiet.contains(t(2, 0, 0)));
        assert!(quiet.contains(t(4, 29, 59)));
        assert!(!quiet.contains(t(4, 30, 0)));
        assert_eq!(quiet.remaining(t(3, 0, 0)), Duration::from_secs(90 * 60));
    }

    #[test]
    fn window_wrapping_midnight() {
        let quiet = QuietPeriod::new(t(22, 0, 0), t(6, 0, 0)).unwrap();
        assert!(quiet.contains(t(23, 0, 0)));
        assert!(quiet.contains(t(0, 0, 0)));
        assert!(quiet.contains(t(5, 59, 59)));
        assert!(!quiet.contains(t(6, 0, 0)));
        assert!(!quiet.contains(t(21, 59, 59)));
        assert_eq!(quiet.remaining(t(23, 0, 0)), Duration::from_secs(7 * 3600));
        assert_eq!(quiet.remaining(t(5, 0, 0)), Duration::from_secs(3600));
    }

    #[test]
    fn window_ending_at_midnight() {
        let quiet = QuietPeriod::new(t(23, 50, 0), t(0, 0, 0)).unwrap();
        assert!(quiet.contains(t(23, 55, 0)));
        assert!(!quiet.contains(t(0, 0, 0)));
        assert_eq!(quiet.remaining(t(23, 55, 0)), Duration::from_secs(300));
    }

    #[test]
    fn remaining_never_rounds_to_zero() {
        let quiet = QuietPeriod::new(t(1, 0, 0), t(2, 0, 0)).unwrap();
        let almost = NaiveTime::from_hms_milli_opt(1, 59, 59, 900).unwrap();
        assert_eq!(quiet.remaining(almost), Duration::from_secs(1));
    }
}
