mod cell;
mod layout;
mod month;
mod view;
mod widget;
mod window;
pub(crate) use self::layout::{GridLayout, GridSize, ScrollDirection};
pub(crate) use self::month::DayPosition;
pub(crate) use self::view::{CalendarView, Navigator};
pub(crate) use self::widget::{Calendar, DayCellView};
use crate::theme::day::{INNER_STYLE, SPILLOVER_STYLE};
use ratatui::style::Style;
use time::Date;

pub(crate) trait DateStyler {
    fn date_style(&self, date: Date, position: DayPosition) -> Style;
}

/// Styles days by whether they belong to the month whose page they're on
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct PositionStyler;

impl DateStyler for PositionStyler {
    fn date_style(&self, _date: Date, position: DayPosition) -> Style {
        match position {
            DayPosition::Inner => INNER_STYLE,
            DayPosition::Previous | DayPosition::Next => SPILLOVER_STYLE,
        }
    }
}

/// Something drawn into a slot of the calendar after being configured with
/// the data for that slot
pub(crate) trait GridItem {
    type Data;

    fn configure(&mut self, data: Self::Data);

    /// The smallest size in which the item can show all of its content
    fn intrinsic_size(&self) -> GridSize;
}

/// What a day cell needs to know to draw itself
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DayInfo {
    pub(crate) date: Date,
    pub(crate) position: DayPosition,
    pub(crate) style: Style,
    pub(crate) is_today: bool,
    pub(crate) is_selected: bool,
}
