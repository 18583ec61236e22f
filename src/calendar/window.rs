use super::layout::{GridDataSource, IndexPath};
use super::month::{DayPosition, YearMonth};
use std::collections::VecDeque;
use std::iter::successors;
use std::num::NonZeroUsize;
use thiserror::Error;
use time::Date;

/// A contiguous run of months, grown in batches at either end as the user
/// scrolls towards it
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthWindow {
    // Invariants:
    // - Never empty
    // - `months[i + 1] == months[i].next()` for all `i`
    // - `index_of_default_month` and `index_of_showing_month` are valid
    //   indices into `months`
    months: VecDeque<YearMonth>,
    index_of_default_month: usize,
    index_of_showing_month: usize,
    batch: NonZeroUsize,
}

impl MonthWindow {
    /// Create a window of `month_qty` months with the month containing
    /// `default_date` at index `month_qty / 2`.  Growth requests add `batch`
    /// months at a time.
    pub(crate) fn new(default_date: Date, month_qty: NonZeroUsize, batch: NonZeroUsize) -> Self {
        let default_month = YearMonth::containing(default_date);
        let mut months = VecDeque::with_capacity(month_qty.get());
        months.push_back(default_month);
        let mut index = 0;
        for m in iter_months_before(default_month).take(month_qty.get() / 2) {
            months.push_front(m);
            index += 1;
        }
        months.extend(iter_months_after(default_month).take(month_qty.get() - months.len()));
        if months.len() < month_qty.get() {
            // We are near the end of time, and so the "after" months were
            // short.  Fill towards the past.
            let earliest = months[0];
            for m in iter_months_before(earliest).take(month_qty.get() - months.len()) {
                months.push_front(m);
                index += 1;
            }
        }
        MonthWindow {
            months,
            index_of_default_month: index,
            index_of_showing_month: index,
            batch,
        }
    }

    pub(crate) fn month_count(&self) -> usize {
        self.months.len()
    }

    pub(crate) fn index_of_default_month(&self) -> usize {
        self.index_of_default_month
    }

    pub(crate) fn index_of_showing_month(&self) -> usize {
        self.index_of_showing_month
    }

    pub(crate) fn index_of_previous_month(&self) -> Option<usize> {
        self.index_of_showing_month.checked_sub(1)
    }

    pub(crate) fn index_of_next_month(&self) -> Option<usize> {
        let index = self.index_of_showing_month + 1;
        (index < self.months.len()).then_some(index)
    }

    pub(crate) fn showing_month(&self) -> YearMonth {
        self.month(self.index_of_showing_month)
    }

    /// # Panics
    ///
    /// Panics if `section` is not less than `self.month_count()`
    pub(crate) fn month(&self, section: usize) -> YearMonth {
        match self.months.get(section) {
            Some(&m) => m,
            None => panic!(
                "month index {section} out of range for window of {} months",
                self.months.len()
            ),
        }
    }

    /// Returns the number of grid cells in the month at index `section`
    ///
    /// # Panics
    ///
    /// Panics if `section` is not less than `self.month_count()`
    pub(crate) fn number_of_days(&self, section: usize) -> usize {
        self.month(section).show_count()
    }

    /// Returns the date shown in the given grid cell, or `None` if it cannot
    /// be represented.  The result for items not less than the month's
    /// `show_count()` is meaningless.
    ///
    /// # Panics
    ///
    /// Panics if `index_path.section` is not less than `self.month_count()`
    pub(crate) fn day(&self, index_path: IndexPath) -> Option<Date> {
        self.month(index_path.section).date_at(index_path.item)
    }

    /// # Panics
    ///
    /// Panics if `index_path.section` is not less than `self.month_count()`
    pub(crate) fn day_position(&self, index_path: IndexPath) -> DayPosition {
        self.month(index_path.section).day_position(index_path.item)
    }

    /// Record that the month at `index` is now the one being shown, and grow
    /// the window if that month is within one batch of either end.
    ///
    /// If the window grew, the new index of the shown month is returned.
    /// Growth repeats until the shown month is at least one batch away from
    /// both ends (or until the window reaches the end of time), so that even
    /// a long jump leaves room to scroll without waiting on growth.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than `self.month_count()`
    pub(crate) fn request_growth_if_near_edge(&mut self, index: usize) -> Option<usize> {
        assert!(
            index < self.months.len(),
            "month index {index} out of range for window of {} months",
            self.months.len()
        );
        self.index_of_showing_month = index;
        let batch = self.batch.get();
        let mut grew = false;
        while self.index_of_showing_month < batch && self.grow_front(batch) {
            grew = true;
        }
        while self.months.len() - self.index_of_showing_month <= batch && self.grow_back(batch) {
            grew = true;
        }
        grew.then_some(self.index_of_showing_month)
    }

    /// Returns the index of the month containing `date`, growing the window
    /// one batch at a time until it includes that month.
    pub(crate) fn locate(&mut self, date: Date) -> Result<usize, OutOfTimeError> {
        let target = YearMonth::containing(date);
        let batch = self.batch.get();
        loop {
            match self.months.binary_search(&target) {
                Ok(index) => return Ok(index),
                Err(0) => {
                    if !self.grow_front(batch) {
                        return Err(OutOfTimeError);
                    }
                }
                Err(_) => {
                    if !self.grow_back(batch) {
                        return Err(OutOfTimeError);
                    }
                }
            }
        }
    }

    /// Add up to one batch of months before the first month, returning how
    /// many were added.  All indices into the window shift by that amount.
    pub(crate) fn extend_backwards(&mut self) -> Result<usize, OutOfTimeError> {
        let before = self.months.len();
        if self.grow_front(self.batch.get()) {
            Ok(self.months.len() - before)
        } else {
            Err(OutOfTimeError)
        }
    }

    /// Add up to one batch of months after the last month
    pub(crate) fn extend_forwards(&mut self) -> Result<(), OutOfTimeError> {
        if self.grow_back(self.batch.get()) {
            Ok(())
        } else {
            Err(OutOfTimeError)
        }
    }

    // Returns `true` if any months were added
    fn grow_front(&mut self, qty: usize) -> bool {
        let before = self.months.len();
        for m in iter_months_before(self.months[0]).take(qty) {
            self.months.push_front(m);
        }
        let added = self.months.len() - before;
        self.index_of_default_month += added;
        self.index_of_showing_month += added;
        if added > 0 {
            tracing::debug!(
                added,
                month_count = self.months.len(),
                first = %self.months[0],
                "prepended months to window"
            );
        }
        added > 0
    }

    // Returns `true` if any months were added
    fn grow_back(&mut self, qty: usize) -> bool {
        let before = self.months.len();
        let last = self.months[before - 1];
        self.months.extend(iter_months_after(last).take(qty));
        let added = self.months.len() - before;
        if added > 0 {
            tracing::debug!(
                added,
                month_count = self.months.len(),
                last = %self.months[self.months.len() - 1],
                "appended months to window"
            );
        }
        added > 0
    }
}

impl GridDataSource for MonthWindow {
    fn number_of_sections(&self) -> usize {
        self.month_count()
    }

    fn number_of_items(&self, section: usize) -> usize {
        self.number_of_days(section)
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

fn iter_months_before(month: YearMonth) -> impl Iterator<Item = YearMonth> {
    successors(Some(month), YearMonth::previous).skip(1)
}

fn iter_months_after(month: YearMonth) -> impl Iterator<Item = YearMonth> {
    successors(Some(month), YearMonth::next).skip(1)
}
