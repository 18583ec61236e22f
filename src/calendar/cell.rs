use super::layout::IndexPath;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

/// Number of frames over which a cell expands or collapses
pub(crate) const TRANSITION_FRAMES: u16 = 6;

static LONG_DATE_FMT: &[BorrowedFormatItem<'_>] =
    format_description!("[weekday], [month repr:long] [day padding:none], [year]");

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum CellState {
    #[default]
    Collapsed,
    Expanded,
}

impl CellState {
    pub(crate) fn opposite(self) -> CellState {
        match self {
            CellState::Collapsed => CellState::Expanded,
            CellState::Expanded => CellState::Collapsed,
        }
    }
}

/// Where a transition animation stopped
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum AnimationPosition {
    /// Stopped before it got going; the cell stays as it was before the
    /// transition was requested
    Start,
    /// Played to completion
    End,
    /// Stopped part way; the committed state is left alone
    Current,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Transition {
    target: CellState,
    frame: u16,
}

/// The expand/collapse state of the calendar's one expandable day cell
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct DayCell {
    state: CellState,
    transition: Option<Transition>,
    // Set whenever `state` is `Expanded` or a transition is running
    index_path: Option<IndexPath>,
}

impl DayCell {
    pub(crate) fn new() -> DayCell {
        DayCell::default()
    }

    pub(crate) fn state(&self) -> CellState {
        self.state
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Returns `true` if the cell is expanded or on its way to or from being
    /// expanded
    pub(crate) fn is_active(&self) -> bool {
        self.state == CellState::Expanded || self.is_animating()
    }

    /// The cell that is expanded or animating, if any
    pub(crate) fn index_path(&self) -> Option<IndexPath> {
        self.index_path
    }

    /// Start a transition of the cell at `index_path` to the opposite of its
    /// current state.  Returns `false` if a transition is already running or
    /// if a different cell is expanded.
    pub(crate) fn toggle(&mut self, index_path: IndexPath) -> bool {
        if self.is_animating() || self.index_path.is_some_and(|ip| ip != index_path) {
            return false;
        }
        self.index_path = Some(index_path);
        self.begin(self.state.opposite());
        true
    }

    /// Start a transition to the collapsed state.  Returns `false` if the cell
    /// is not expanded or is already animating.
    pub(crate) fn collapse(&mut self) -> bool {
        if self.is_animating() || self.state != CellState::Expanded {
            return false;
        }
        self.begin(CellState::Collapsed);
        true
    }

    fn begin(&mut self, target: CellState) {
        tracing::debug!(?target, index_path = ?self.index_path, "starting cell transition");
        self.transition = Some(Transition { target, frame: 0 });
    }

    /// Advance a running transition by one frame, finishing it once it has
    /// played all of its frames
    pub(crate) fn tick(&mut self) {
        if let Some(t) = self.transition.as_mut() {
            t.frame += 1;
            if t.frame >= TRANSITION_FRAMES {
                self.finish(AnimationPosition::End);
            }
        }
    }

    /// Stop a running transition and commit the resulting state
    pub(crate) fn finish(&mut self, position: AnimationPosition) {
        let Some(Transition { target, .. }) = self.transition.take() else {
            return;
        };
        match position {
            AnimationPosition::Start => self.state = target.opposite(),
            AnimationPosition::End => self.state = target,
            AnimationPosition::Current => (),
        }
        if self.state == CellState::Collapsed {
            self.index_path = None;
        }
        tracing::debug!(?position, state = ?self.state, "finished cell transition");
    }

    /// How far the cell is expanded, from 0 (collapsed) to
    /// `TRANSITION_FRAMES` (fully expanded)
    pub(crate) fn expansion(&self) -> u16 {
        match (self.transition, self.state) {
            (
                Some(Transition {
                    target: CellState::Expanded,
                    frame,
                }),
                _,
            ) => frame,
            (
                Some(Transition {
                    target: CellState::Collapsed,
                    frame,
                }),
                _,
            ) => TRANSITION_FRAMES - frame,
            (None, CellState::Expanded) => TRANSITION_FRAMES,
            (None, CellState::Collapsed) => 0,
        }
    }
}

/// Lines of detail shown for `date` in an expanded cell
pub(crate) fn day_details(date: Date, today: Date) -> Vec<String> {
    let long = date
        .format(LONG_DATE_FMT)
        .unwrap_or_else(|_| date.to_string());
    let (iso_year, iso_week, _) = date.to_iso_week_date();
    let relative = match (date - today).whole_days() {
        0 => String::from("Today"),
        1 => String::from("Tomorrow"),
        -1 => String::from("Yesterday"),
        n if n > 0 => format!("In {n} days"),
        n => format!("{} days ago", -n),
    };
    vec![
        long,
        format!("Week {iso_week} of {iso_year}"),
        format!("Day {} of the year", date.ordinal()),
        relative,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const CELL: IndexPath = IndexPath {
        section: 6,
        item: 19,
    };

    fn play_out(cell: &mut DayCell) {
        for _ in 0..TRANSITION_FRAMES {
            cell.tick();
        }
    }

    #[test]
    fn test_toggle_expands() {
        let mut cell = DayCell::new();
        assert!(!cell.is_active());
        assert!(cell.toggle(CELL));
        assert!(cell.is_animating());
        assert_eq!(cell.state(), CellState::Collapsed);
        assert_eq!(cell.expansion(), 0);
        cell.tick();
        assert_eq!(cell.expansion(), 1);
        play_out(&mut cell);
        assert!(!cell.is_animating());
        assert_eq!(cell.state(), CellState::Expanded);
        assert_eq!(cell.index_path(), Some(CELL));
        assert_eq!(cell.expansion(), TRANSITION_FRAMES);
    }

    #[test]
    fn test_toggle_twice_collapses() {
        let mut cell = DayCell::new();
        assert!(cell.toggle(CELL));
        play_out(&mut cell);
        assert!(cell.toggle(CELL));
        assert_eq!(cell.expansion(), TRANSITION_FRAMES);
        play_out(&mut cell);
        assert_eq!(cell.state(), CellState::Collapsed);
        assert_eq!(cell.index_path(), None);
        assert!(!cell.is_active());
    }

    #[test]
    fn test_collapse() {
        let mut cell = DayCell::new();
        assert!(!cell.collapse());
        assert!(cell.toggle(CELL));
        assert!(!cell.collapse());
        play_out(&mut cell);
        assert!(cell.collapse());
        cell.finish(AnimationPosition::End);
        assert_eq!(cell.state(), CellState::Collapsed);
    }

    #[test]
    fn test_interrupted_at_start_reverts() {
        let mut cell = DayCell::new();
        assert!(cell.toggle(CELL));
        cell.tick();
        cell.finish(AnimationPosition::Start);
        assert_eq!(cell.state(), CellState::Collapsed);
        assert_eq!(cell.index_path(), None);
        assert!(!cell.is_active());

        assert!(cell.toggle(CELL));
        play_out(&mut cell);
        assert!(cell.toggle(CELL));
        cell.finish(AnimationPosition::Start);
        assert_eq!(cell.state(), CellState::Expanded);
        assert_eq!(cell.index_path(), Some(CELL));
    }

    #[test]
    fn test_finish_at_current_keeps_state() {
        let mut cell = DayCell::new();
        assert!(cell.toggle(CELL));
        cell.finish(AnimationPosition::Current);
        assert_eq!(cell.state(), CellState::Collapsed);
        assert!(!cell.is_animating());
    }

    #[test]
    fn test_toggle_rejected_while_busy() {
        let mut cell = DayCell::new();
        assert!(cell.toggle(CELL));
        assert!(!cell.toggle(CELL));
        play_out(&mut cell);
        assert!(!cell.toggle(IndexPath::new(6, 20)));
        assert_eq!(cell.state(), CellState::Expanded);
    }

    #[test]
    fn test_day_details() {
        let today = date!(2024 - 03 - 15);
        assert_eq!(
            day_details(today, today),
            [
                "Friday, March 15, 2024",
                "Week 11 of 2024",
                "Day 75 of the year",
                "Today",
            ]
        );
        assert_eq!(
            day_details(date!(2024 - 03 - 16), today)[3],
            "Tomorrow"
        );
        assert_eq!(
            day_details(date!(2024 - 03 - 14), today)[3],
            "Yesterday"
        );
        assert_eq!(
            day_details(date!(2024 - 04 - 01), today)[3],
            "In 17 days"
        );
        assert_eq!(
            day_details(date!(2023 - 12 - 31), today),
            [
                "Sunday, December 31, 2023",
                "Week 52 of 2023",
                "Day 365 of the year",
                "75 days ago",
            ]
        );
    }
}
