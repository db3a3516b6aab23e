use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult};

/// Inclusive timestamp range used to select merged changesets for one report.
/// Fixed at startup; never derived from the triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start > end {
            return Err(AppError::Configuration(format!(
                "report window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn contains_is_inclusive_on_both_bounds() {
        let window = TimeWindow::new(at(2024, 1, 21), at(2024, 1, 23)).unwrap();
        assert!(window.contains(at(2024, 1, 21)));
        assert!(window.contains(at(2024, 1, 22)));
        assert!(window.contains(at(2024, 1, 23)));
    }

    #[test]
    fn rejects_instants_outside_the_window() {
        let window = TimeWindow::new(at(2024, 1, 21), at(2024, 1, 23)).unwrap();
        assert!(!window.contains(at(2024, 1, 20)));
        assert!(!window.contains(at(2024, 1, 24)));
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(TimeWindow::new(at(2024, 1, 23), at(2024, 1, 21)).is_err());
    }

    #[test]
    fn single_instant_window_is_valid() {
        let window = TimeWindow::new(at(2024, 1, 22), at(2024, 1, 22)).unwrap();
        assert!(window.contains(at(2024, 1, 22)));
    }
}
