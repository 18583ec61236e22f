use super::cell::{AnimationPosition, CellState, DayCell, TRANSITION_FRAMES};
use super::layout::{GridLayout, GridRect, GridSize, IndexPath, ScrollDirection};
use super::month::{DayPosition, YearMonth};
use super::window::{MonthWindow, OutOfTimeError};
use super::{DateStyler, DayInfo};
use crate::config::{CalendarConfig, ConfigError};
use thiserror::Error;
use time::{Date, Duration};

/// Number of frames over which an animated scroll plays
const SCROLL_FRAMES: u32 = 5;

/// Month-level navigation, as driven by the buttons of a month header
pub(crate) trait Navigator {
    fn goto_next_month(&mut self, animated: bool) -> Result<(), NavigationError>;
    fn goto_previous_month(&mut self, animated: bool) -> Result<(), NavigationError>;
    fn goto_default_month(&mut self, animated: bool) -> Result<(), NavigationError>;
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum NavigationError {
    #[error(transparent)]
    OutOfTime(#[from] OutOfTimeError),
    #[error("cannot scroll while a day is expanded")]
    ScrollDisabled,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ScrollAnimation {
    from: u32,
    to: u32,
    frame: u32,
    /// Section that will be showing once the animation ends
    section: usize,
}

/// The scrolling, paged host of the month window and its grid layout.
///
/// The content offset runs along the layout's scroll direction and rests on a
/// multiple of the page extent whenever no scroll animation is running.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarView<S> {
    today: Date,
    default_date: Date,
    // Invariant: When no scroll is running, `selected` is in the showing month
    selected: Date,
    window: MonthWindow,
    layout: GridLayout,
    // `None` until the first time the calendar is drawn
    bounds: Option<GridSize>,
    offset: u32,
    scroll: Option<ScrollAnimation>,
    cell: DayCell,
    styler: S,
}

impl<S: DateStyler> CalendarView<S> {
    pub(crate) fn new(
        today: Date,
        default_date: Date,
        config: CalendarConfig,
        styler: S,
    ) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let window = MonthWindow::new(
            default_date,
            config.initial_month_count,
            config.growth_batch,
        );
        let layout = config.layout();
        let mut view = CalendarView {
            today,
            default_date,
            selected: default_date,
            window,
            layout,
            bounds: None,
            offset: 0,
            scroll: None,
            cell: DayCell::new(),
            styler,
        };
        view.offset = view.page_offset(view.window.index_of_default_month());
        Ok(view)
    }

    pub(crate) fn today(&self) -> Date {
        self.today
    }

    pub(crate) fn selected(&self) -> Date {
        self.selected
    }

    pub(crate) fn showing_month(&self) -> YearMonth {
        self.window.showing_month()
    }

    pub(crate) fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub(crate) fn cell(&self) -> &DayCell {
        &self.cell
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.scroll.is_some() || self.cell.is_animating()
    }

    /// Inform the view of the size of the area in which its grid is drawn.
    /// Any change in size lays the grid out anew and stops an expanding or
    /// collapsing cell where it started.
    pub(crate) fn resize(&mut self, bounds: GridSize) {
        if self.bounds == Some(bounds) {
            return;
        }
        tracing::debug!(width = bounds.width, height = bounds.height, "calendar resized");
        self.bounds = Some(bounds);
        self.cell.finish(AnimationPosition::Start);
        if let Some(anim) = self.scroll.take() {
            self.offset = anim.to;
            self.settle();
        }
        self.reload();
    }

    /// The part of the content currently scrolled into view
    pub(crate) fn visible_rect(&self) -> GridRect {
        let page = self.layout.page_size();
        let bounds = self.bounds.unwrap_or(page);
        let width = bounds.width.min(page.width);
        let height = bounds.height.min(page.height);
        match self.layout.direction() {
            ScrollDirection::Horizontal => GridRect::new(self.offset, 0, width, height),
            ScrollDirection::Vertical => GridRect::new(0, self.offset, width, height),
        }
    }

    pub(crate) fn day_info(&self, index_path: IndexPath) -> Option<DayInfo> {
        if index_path.section >= self.window.month_count() {
            // The layout is ahead of the data; treat the cell as not laid out.
            return None;
        }
        let date = self.window.day(index_path)?;
        let position = self.window.day_position(index_path);
        Some(DayInfo {
            date,
            position,
            style: self.styler.date_style(date, position),
            is_today: date == self.today,
            is_selected: date == self.selected && position == DayPosition::Inner,
        })
    }

    /// The date of the cell that is expanded or animating, if any
    pub(crate) fn expanded_date(&self) -> Option<Date> {
        self.cell
            .index_path()
            .filter(|ip| ip.section < self.window.month_count())
            .and_then(|ip| self.window.day(ip))
    }

    /// The frame of the expanded or animating cell's overlay, which grows from
    /// the cell's own frame to the whole visible rect, along with how far the
    /// expansion has progressed
    pub(crate) fn expanded_frame(&self) -> Option<(GridRect, u16)> {
        let attr = self.layout.attributes_for_item(self.cell.index_path()?)?;
        let expansion = self.cell.expansion();
        let from = attr.frame;
        let to = self.visible_rect();
        let step = u32::from(expansion);
        let total = u32::from(TRANSITION_FRAMES);
        let frame = GridRect::new(
            interpolate(from.x, to.x, step, total),
            interpolate(from.y, to.y, step, total),
            interpolate(from.width, to.width, step, total),
            interpolate(from.height, to.height, step, total),
        );
        Some((frame, expansion))
    }

    /// Advance any running animations by one frame
    pub(crate) fn tick(&mut self) {
        self.cell.tick();
        if let Some(mut anim) = self.scroll {
            anim.frame += 1;
            if anim.frame >= SCROLL_FRAMES {
                self.scroll = None;
                self.offset = anim.to;
                self.settle();
            } else {
                self.offset = interpolate(anim.from, anim.to, anim.frame, SCROLL_FRAMES);
                self.scroll = Some(anim);
            }
        }
    }

    /// Move the selection by `days` days, scrolling to the adjacent month if
    /// the new date is not in the current one
    pub(crate) fn move_selection(&mut self, days: i64) -> Result<(), NavigationError> {
        self.ensure_scrollable()?;
        let date = self
            .selected
            .checked_add(Duration::days(days))
            .ok_or(OutOfTimeError)?;
        let target = YearMonth::containing(date);
        let current = self.window.month(self.current_section());
        if target != current {
            let section = if target > current {
                self.section_after_current()?
            } else {
                self.section_before_current()?
            };
            self.selected = date;
            self.scroll_to_section(section, true);
        } else {
            self.selected = date;
        }
        Ok(())
    }

    /// Expand the selected day, or collapse it if it is expanded.  Returns
    /// `false` if this cannot be done right now.
    pub(crate) fn toggle_selected(&mut self) -> bool {
        if self.scroll.is_some() {
            return false;
        }
        let section = self.window.index_of_showing_month();
        match self.window.showing_month().index_of(self.selected) {
            Some(item) => self.cell.toggle(IndexPath::new(section, item)),
            None => false,
        }
    }

    /// Collapse the expanded day, or abandon a day's expansion part way
    /// through.  Returns `false` if there is nothing to collapse.
    pub(crate) fn collapse(&mut self) -> bool {
        if self.cell.is_animating() && self.cell.state() == CellState::Collapsed {
            self.cell.finish(AnimationPosition::Current);
            true
        } else {
            self.cell.collapse()
        }
    }

    /// Scroll straight to the month containing `date` and select it
    pub(crate) fn jump_to_date(&mut self, date: Date) -> Result<(), NavigationError> {
        self.ensure_scrollable()?;
        let section = self.window.locate(date)?;
        self.reload();
        self.selected = date;
        tracing::debug!(%date, section, "jumping to date");
        self.scroll_to_section(section, false);
        Ok(())
    }

    fn ensure_scrollable(&self) -> Result<(), NavigationError> {
        if self.cell.is_active() {
            Err(NavigationError::ScrollDisabled)
        } else {
            Ok(())
        }
    }

    fn current_section(&self) -> usize {
        match self.scroll {
            Some(anim) => anim.section,
            None => self.window.index_of_showing_month(),
        }
    }

    // The section after the current one, growing the window if the current
    // section is its last
    fn section_after_current(&mut self) -> Result<usize, OutOfTimeError> {
        let current = self.current_section();
        if current + 1 >= self.window.month_count() {
            self.window.extend_forwards()?;
            self.reload();
        }
        Ok(current + 1)
    }

    // The section before the current one, growing the window if the current
    // section is its first
    fn section_before_current(&mut self) -> Result<usize, OutOfTimeError> {
        let mut current = self.current_section();
        if current == 0 {
            let added = self.window.extend_backwards()?;
            self.shift_sections(added);
            self.reload();
            current += added;
        }
        Ok(current - 1)
    }

    // Keep the view on the same content after `added` months were inserted at
    // the front of the window
    fn shift_sections(&mut self, added: usize) {
        let shift = self.page_offset(added);
        self.offset = self.offset.saturating_add(shift);
        if let Some(anim) = self.scroll.as_mut() {
            anim.from = anim.from.saturating_add(shift);
            anim.to = anim.to.saturating_add(shift);
            anim.section += added;
        }
    }

    fn page_offset(&self, section: usize) -> u32 {
        u32::try_from(section)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.layout.page_extent())
    }

    // The section whose page is nearest to the content offset
    fn visible_section(&self) -> usize {
        let extent = self.layout.page_extent();
        if extent == 0 {
            return self.window.index_of_showing_month();
        }
        let section = self.offset.saturating_add(extent / 2) / extent;
        usize::try_from(section)
            .unwrap_or(usize::MAX)
            .min(self.window.month_count() - 1)
    }

    fn scroll_to_section(&mut self, section: usize, animated: bool) {
        let to = self.page_offset(section);
        if animated {
            self.scroll = Some(ScrollAnimation {
                from: self.offset,
                to,
                frame: 0,
                section,
            });
        } else {
            self.scroll = None;
            self.offset = to;
            self.settle();
        }
    }

    // Called whenever scrolling comes to rest
    fn settle(&mut self) {
        let section = self.visible_section();
        if let Some(destination) = self.window.request_growth_if_near_edge(section) {
            // The month window grew, so reload the grid and silently move to
            // wherever the same month now lives.
            self.reload();
            self.offset = self.page_offset(destination);
        }
        let showing = self.window.showing_month();
        if !showing.contains(self.selected) {
            let day = self
                .selected
                .day()
                .min(u8::try_from(showing.day_count()).unwrap_or(u8::MAX));
            self.selected = showing
                .first_day()
                .replace_day(day)
                .unwrap_or_else(|_| showing.first_day());
        }
        tracing::debug!(month = %showing, offset = self.offset, "scrolling settled");
    }

    fn reload(&mut self) {
        let bounds = self.bounds.unwrap_or_else(|| self.layout.page_size());
        self.layout.prepare(&self.window, bounds);
        let content = self.layout.content_size();
        tracing::debug!(
            months = self.window.month_count(),
            width = content.width,
            height = content.height,
            "reloaded calendar grid"
        );
    }
}

impl<S: DateStyler> Navigator for CalendarView<S> {
    fn goto_next_month(&mut self, animated: bool) -> Result<(), NavigationError> {
        self.ensure_scrollable()?;
        let section = self.section_after_current()?;
        self.scroll_to_section(section, animated);
        Ok(())
    }

    fn goto_previous_month(&mut self, animated: bool) -> Result<(), NavigationError> {
        self.ensure_scrollable()?;
        let section = self.section_before_current()?;
        self.scroll_to_section(section, animated);
        Ok(())
    }

    fn goto_default_month(&mut self, animated: bool) -> Result<(), NavigationError> {
        self.ensure_scrollable()?;
        self.selected = self.default_date;
        self.scroll_to_section(self.window.index_of_default_month(), animated);
        Ok(())
    }
}

/// Returns the value `step/total` of the way from `from` to `to`
fn interpolate(from: u32, to: u32, step: u32, total: u32) -> u32 {
    if total == 0 || step >= total {
        return to;
    }
    let (from, to) = (i64::from(from), i64::from(to));
    let value = from + (to - from) * i64::from(step) / i64::from(total);
    u32::try_from(value).unwrap_or(0)
}
