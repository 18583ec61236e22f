use crate::calendar::{DayCellView, GridItem, GridLayout, GridSize, ScrollDirection};
use std::num::NonZeroUsize;
use thiserror::Error;

const fn nonzero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => panic!("value should be nonzero"),
    }
}

/// Number of months in a freshly-created month window
pub(crate) const DEFAULT_MONTH_COUNT: NonZeroUsize = nonzero(12);

/// Number of months added at a time when scrolling nears either end of the
/// month window
pub(crate) const DEFAULT_GROWTH_BATCH: NonZeroUsize = nonzero(12);

/// Construction-time settings for a calendar.  These cannot be changed once
/// the calendar has been built.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct CalendarConfig {
    /// Size of a day cell in a five-week month
    pub(crate) item_size: GridSize,
    /// Blank lines between weeks
    pub(crate) line_spacing: u32,
    /// Blank columns between days
    pub(crate) interitem_spacing: u32,
    pub(crate) direction: ScrollDirection,
    pub(crate) initial_month_count: NonZeroUsize,
    pub(crate) growth_batch: NonZeroUsize,
}

impl Default for CalendarConfig {
    fn default() -> CalendarConfig {
        CalendarConfig {
            item_size: GridSize::new(6, 3),
            line_spacing: 0,
            interitem_spacing: 1,
            direction: ScrollDirection::Horizontal,
            initial_month_count: DEFAULT_MONTH_COUNT,
            growth_batch: DEFAULT_GROWTH_BATCH,
        }
    }
}

impl CalendarConfig {
    pub(crate) fn direction(mut self, direction: ScrollDirection) -> CalendarConfig {
        self.direction = direction;
        self
    }

    pub(crate) fn initial_month_count(mut self, qty: NonZeroUsize) -> CalendarConfig {
        self.initial_month_count = qty;
        self
    }

    pub(crate) fn layout(&self) -> GridLayout {
        GridLayout::new(
            self.item_size,
            self.line_spacing,
            self.interitem_spacing,
            self.direction,
        )
    }

    /// Check that day cells will be big enough to show their contents in
    /// both five-week and six-week months
    pub(crate) fn validate(self) -> Result<CalendarConfig, ConfigError> {
        let min = DayCellView::new().intrinsic_size();
        if self.item_size.width < min.width || self.item_size.height < min.height {
            return Err(ConfigError::ItemTooSmall {
                width: self.item_size.width,
                height: self.item_size.height,
                min_width: min.width,
                min_height: min.height,
            });
        }
        let extra_height = self.layout().extra_line_item_height();
        if extra_height < min.height {
            return Err(ConfigError::NoRoomForSixWeeks {
                height: extra_height,
            });
        }
        Ok(self)
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum ConfigError {
    #[error("day cells must be at least {min_width}x{min_height}, but got {width}x{height}")]
    ItemTooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },
    #[error("day cells in six-week months would be {height} lines tall")]
    NoRoomForSixWeeks { height: u32 },
}
