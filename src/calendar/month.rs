use std::fmt;
use time::{util::days_in_month, Date, Duration, Month};

/// Number of columns in the calendar grid
pub(crate) const DAYS_IN_WEEK: usize = 7;

/// Number of grid cells in a month laid out over five weeks
pub(crate) const FIVE_WEEK_CELLS: usize = 5 * DAYS_IN_WEEK;

/// Number of grid cells in a month laid out over six weeks
pub(crate) const SIX_WEEK_CELLS: usize = 6 * DAYS_IN_WEEK;

/// Where a grid cell's date lies relative to the month whose page the cell is
/// on
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum DayPosition {
    /// Spill-over from the month before
    Previous,
    Inner,
    /// Spill-over from the month after
    Next,
}

/// A single calendar month, along with the grid arithmetic for showing it as
/// whole weeks running Sunday through Saturday
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct YearMonth {
    first_day: Date,
    last_day: Date,
    day_count: u8,
}

impl YearMonth {
    pub(crate) fn containing(date: Date) -> YearMonth {
        let first_day = date
            .replace_day(1)
            .expect("every month should have a first day");
        let day_count = days_in_month(date.month(), date.year());
        let last_day = date
            .replace_day(day_count)
            .expect("every month should have a last day");
        YearMonth {
            first_day,
            last_day,
            day_count,
        }
    }

    pub(crate) fn first_day(&self) -> Date {
        self.first_day
    }

    pub(crate) fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub(crate) fn month(&self) -> Month {
        self.first_day.month()
    }

    pub(crate) fn day_count(&self) -> usize {
        self.day_count.into()
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        self.first_day <= date && date <= self.last_day
    }

    /// Returns `None` if the month after this one cannot be represented
    pub(crate) fn next(&self) -> Option<YearMonth> {
        self.last_day.next_day().map(YearMonth::containing)
    }

    /// Returns `None` if the month before this one cannot be represented
    pub(crate) fn previous(&self) -> Option<YearMonth> {
        self.first_day.previous_day().map(YearMonth::containing)
    }

    /// Number of days from the previous month shown before the first of this
    /// month
    pub(crate) fn leading_days(&self) -> usize {
        self.first_day.weekday().number_days_from_sunday().into()
    }

    /// Number of days from the next month shown after the last of this month
    /// to fill out its last week
    pub(crate) fn trailing_days(&self) -> usize {
        6 - usize::from(self.last_day.weekday().number_days_from_sunday())
    }

    /// Number of grid cells needed to show the month as whole weeks.  This is
    /// always either [`FIVE_WEEK_CELLS`] or [`SIX_WEEK_CELLS`]; a February
    /// that would fit in exactly four weeks is given an extra week of days
    /// from March.
    pub(crate) fn show_count(&self) -> usize {
        let natural = self.leading_days() + self.day_count() + self.trailing_days();
        if natural < FIVE_WEEK_CELLS {
            natural + DAYS_IN_WEEK
        } else {
            natural
        }
    }

    /// Returns the date shown in the grid cell at `index`, or `None` if that
    /// date cannot be represented
    pub(crate) fn date_at(&self, index: usize) -> Option<Date> {
        let index = i64::try_from(index).ok()?;
        let leading = i64::try_from(self.leading_days()).ok()?;
        self.first_day.checked_add(Duration::days(index - leading))
    }

    pub(crate) fn day_position(&self, index: usize) -> DayPosition {
        match index.checked_sub(self.leading_days()) {
            None => DayPosition::Previous,
            Some(i) if i < self.day_count() => DayPosition::Inner,
            Some(_) => DayPosition::Next,
        }
    }

    /// Returns the index of the grid cell showing `date` as an inner day, if
    /// `date` is in this month
    pub(crate) fn index_of(&self, date: Date) -> Option<usize> {
        self.contains(date)
            .then(|| self.leading_days() + usize::from(date.day()) - 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month(), self.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_containing() {
        let m = YearMonth::containing(date!(2024 - 03 - 15));
        assert_eq!(m.year(), 2024);
        assert_eq!(m.month(), Month::March);
        assert_eq!(m.first_day(), date!(2024 - 03 - 01));
        assert_eq!(m.day_count(), 31);
        assert_eq!(m, YearMonth::containing(date!(2024 - 03 - 31)));
        assert_eq!(m.to_string(), "March 2024");
    }

    #[test]
    fn test_leap_february() {
        let m = YearMonth::containing(date!(2024 - 02 - 10));
        assert_eq!(m.day_count(), 29);
        assert!(m.contains(date!(2024 - 02 - 29)));
        assert!(!m.contains(date!(2024 - 03 - 01)));
        let m = YearMonth::containing(date!(2023 - 02 - 10));
        assert_eq!(m.day_count(), 28);
        assert!(m.contains(date!(2023 - 02 - 28)));
        assert!(!m.contains(date!(2023 - 03 - 01)));
    }

    #[test]
    fn test_last_representable_month() {
        let m = YearMonth::containing(Date::MAX);
        assert_eq!(m.day_count(), 31);
        assert!(m.contains(Date::MAX));
        assert_eq!(m.next(), None);
    }

    #[test]
    fn test_six_week_month() {
        // 2024-03-01 is a Friday and 2024-03-31 is a Sunday.
        let m = YearMonth::containing(date!(2024 - 03 - 01));
        assert_eq!(m.leading_days(), 5);
        assert_eq!(m.trailing_days(), 6);
        assert_eq!(m.show_count(), SIX_WEEK_CELLS);
        assert_eq!(m.date_at(0), Some(date!(2024 - 02 - 25)));
        assert_eq!(m.day_position(4), DayPosition::Previous);
        assert_eq!(m.date_at(5), Some(date!(2024 - 03 - 01)));
        assert_eq!(m.day_position(5), DayPosition::Inner);
        assert_eq!(m.day_position(35), DayPosition::Inner);
        assert_eq!(m.date_at(36), Some(date!(2024 - 04 - 01)));
        assert_eq!(m.day_position(36), DayPosition::Next);
        assert_eq!(m.date_at(41), Some(date!(2024 - 04 - 06)));
    }

    #[test]
    fn test_five_week_month() {
        // 2024-05-01 is a Wednesday and 2024-05-31 is a Friday.
        let m = YearMonth::containing(date!(2024 - 05 - 20));
        assert_eq!(m.leading_days(), 3);
        assert_eq!(m.trailing_days(), 1);
        assert_eq!(m.show_count(), FIVE_WEEK_CELLS);
        assert_eq!(m.date_at(34), Some(date!(2024 - 06 - 01)));
        assert_eq!(m.day_position(34), DayPosition::Next);
    }

    #[test]
    fn test_four_week_february_is_padded() {
        // 2026-02-01 is a Sunday and 2026-02-28 is a Saturday.
        let m = YearMonth::containing(date!(2026 - 02 - 14));
        assert_eq!(m.leading_days(), 0);
        assert_eq!(m.trailing_days(), 0);
        assert_eq!(m.show_count(), FIVE_WEEK_CELLS);
        assert_eq!(m.date_at(0), Some(date!(2026 - 02 - 01)));
        assert_eq!(m.day_position(27), DayPosition::Inner);
        assert_eq!(m.day_position(28), DayPosition::Next);
        assert_eq!(m.date_at(34), Some(date!(2026 - 03 - 07)));
        assert_eq!(m.day_position(34), DayPosition::Next);
    }

    #[test]
    fn test_show_count_is_whole_weeks() {
        let mut m = YearMonth::containing(date!(1990 - 01 - 01));
        while m.year() < 2040 {
            let count = m.show_count();
            assert_eq!(count % DAYS_IN_WEEK, 0, "{m} has {count} cells");
            assert!(
                count == FIVE_WEEK_CELLS || count == SIX_WEEK_CELLS,
                "{m} has {count} cells"
            );
            m = m.next().unwrap();
        }
    }

    #[test]
    fn test_inner_days() {
        let mut m = YearMonth::containing(date!(2019 - 11 - 20));
        for _ in 0..30 {
            for i in 0..m.day_count() {
                let index = m.leading_days() + i;
                assert_eq!(m.day_position(index), DayPosition::Inner);
                assert_eq!(m.date_at(index).map(|d| usize::from(d.day())), Some(i + 1));
            }
            m = m.next().unwrap();
        }
    }

    #[test]
    fn test_next_previous_round_trip() {
        let mut m = YearMonth::containing(date!(1999 - 12 - 31));
        for _ in 0..40 {
            let next = m.next().unwrap();
            assert_eq!(next.previous(), Some(m));
            assert_eq!(m.previous().unwrap().next(), Some(m));
            m = next;
        }
        assert_eq!(
            YearMonth::containing(date!(1999 - 12 - 31)).next(),
            Some(YearMonth::containing(date!(2000 - 01 - 01)))
        );
    }

    #[test]
    fn test_end_of_time() {
        assert_eq!(YearMonth::containing(Date::MAX).next(), None);
        assert_eq!(YearMonth::containing(Date::MIN).previous(), None);
    }

    #[test]
    fn test_index_of() {
        let m = YearMonth::containing(date!(2024 - 03 - 15));
        assert_eq!(m.index_of(date!(2024 - 03 - 15)), Some(19));
        assert_eq!(m.date_at(19), Some(date!(2024 - 03 - 15)));
        assert_eq!(m.index_of(date!(2024 - 04 - 01)), None);
    }
}
