use super::cell::{day_details, CellState, TRANSITION_FRAMES};
use super::layout::{GridRect, GridSize};
use super::month::{DayPosition, YearMonth};
use super::view::CalendarView;
use super::{DateStyler, DayInfo, GridItem};
use crate::theme::{
    day::{EXPANDED_STYLE, SELECTED_STYLE, TODAY_STYLE},
    MONTH_STYLE, NAV_STYLE, WEEKDAY_STYLE, WEEKEND_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, StatefulWidget, Widget},
};
use std::marker::PhantomData;

static WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

static PREV_HINT: &str = "< p";

static NEXT_HINT: &str = "n >";

/// Width of a day cell's label, e.g., " 15 " or "[15]"
const LABEL_WIDTH: u32 = 4;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Calendar<S> {
    _data: PhantomData<S>,
}

impl<S> Calendar<S> {
    pub(crate) fn new() -> Calendar<S> {
        Calendar { _data: PhantomData }
    }
}

impl<S: DateStyler> StatefulWidget for Calendar<S> {
    type State = CalendarView<S>;

    /*
     * < p                March 2024                n >
     *   Su     Mo     Tu     We     Th     Fr     Sa
     *  25     26     27     28     29      1      2
     *  ...
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let page = state.layout().page_size();
        let width = clamp_u16(page.width).min(area.width);
        let [area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [header_area, weekday_area, grid_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);
        state.resize(GridSize::new(
            u32::from(grid_area.width),
            u32::from(grid_area.height),
        ));

        let mut header = MonthHeader::new();
        header.configure(state.showing_month());
        header.render(header_area, buf);
        draw_weekdays(state, weekday_area, buf);

        let visible = state.visible_rect();
        let mut cell = DayCellView::new();
        for attr in state.layout().attributes_in_rect(visible) {
            let Some(frame) = attr.frame.intersection(&visible) else {
                continue;
            };
            cell.configure(state.day_info(attr.index_path));
            cell.render(to_screen(frame, visible, grid_area), buf);
        }

        if let Some((frame, expansion)) = state.expanded_frame() {
            let overlay = to_screen(frame, visible, grid_area);
            Clear.render(overlay, buf);
            let mut block = Block::bordered().style(EXPANDED_STYLE);
            let mut details = Vec::new();
            // Only show the details once there's room enough for them
            if expansion.saturating_mul(2) >= TRANSITION_FRAMES {
                if let Some(date) = state.expanded_date() {
                    block = block
                        .title(format!(" {date} "))
                        .title_alignment(Alignment::Center);
                    if state.cell().state() == CellState::Expanded {
                        block = block.title_bottom(Line::from(" Esc ").right_aligned());
                    }
                    details = day_details(date, state.today());
                }
            }
            Paragraph::new(Text::from_iter(details))
                .block(block)
                .render(overlay, buf);
        }
    }
}

fn draw_weekdays<S: DateStyler>(state: &CalendarView<S>, area: Rect, buf: &mut Buffer) {
    let layout = state.layout();
    let column_width = layout.item_size().width + layout.interitem_spacing();
    let indent = layout.item_size().width.saturating_sub(2) / 2;
    for (col, name) in std::iter::zip(0u32.., WEEKDAYS) {
        let style = if col == 0 || col == 6 {
            WEEKEND_STYLE
        } else {
            WEEKDAY_STYLE
        };
        let x = col * column_width + indent;
        if x < u32::from(area.width) {
            let x = area.x + clamp_u16(x);
            let room = usize::from(area.right() - x);
            buf.set_stringn(x, area.y, name, room, style);
        }
    }
}

/// Map a rectangle in the layout's content space that lies within `visible`
/// to the corresponding region of `area` on the screen
fn to_screen(rect: GridRect, visible: GridRect, area: Rect) -> Rect {
    Rect::new(
        area.x
            .saturating_add(clamp_u16(rect.x.saturating_sub(visible.x))),
        area.y
            .saturating_add(clamp_u16(rect.y.saturating_sub(visible.y))),
        clamp_u16(rect.width),
        clamp_u16(rect.height),
    )
    .intersection(area)
}

fn clamp_u16(n: u32) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// The contents of one day's grid cell
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct DayCellView {
    info: Option<DayInfo>,
}

impl DayCellView {
    pub(crate) fn new() -> DayCellView {
        DayCellView::default()
    }

    // Today is only marked on its own month's page
    fn marks_today(&self) -> bool {
        self.info
            .is_some_and(|info| info.is_today && info.position == DayPosition::Inner)
    }

    fn label(&self) -> Option<String> {
        let info = self.info?;
        let day = info.date.day();
        Some(if self.marks_today() {
            format!("[{day:>2}]")
        } else {
            format!(" {day:>2} ")
        })
    }
}

impl GridItem for DayCellView {
    type Data = Option<DayInfo>;

    fn configure(&mut self, data: Option<DayInfo>) {
        self.info = data;
    }

    fn intrinsic_size(&self) -> GridSize {
        GridSize::new(LABEL_WIDTH, 1)
    }
}

impl Widget for &DayCellView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (Some(info), Some(label)) = (self.info, self.label()) else {
            return;
        };
        let mut style = info.style;
        if self.marks_today() {
            style = style.patch(TODAY_STYLE);
        }
        if info.is_selected {
            style = style.patch(SELECTED_STYLE);
        }
        buf.set_style(area, style);
        if !area.is_empty() {
            buf.set_stringn(area.x, area.y, label, usize::from(area.width), style);
        }
    }
}

/// The line above the weekday names, showing the current month between
/// hints for the previous & next month keys
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct MonthHeader {
    month: Option<YearMonth>,
}

impl MonthHeader {
    pub(crate) fn new() -> MonthHeader {
        MonthHeader::default()
    }

    fn title(&self) -> String {
        match self.month {
            Some(m) => m.to_string(),
            None => String::new(),
        }
    }
}

impl GridItem for MonthHeader {
    type Data = YearMonth;

    fn configure(&mut self, data: YearMonth) {
        self.month = Some(data);
    }

    fn intrinsic_size(&self) -> GridSize {
        let title = u32::try_from(self.title().chars().count()).unwrap_or(u32::MAX);
        let hints = u32::try_from(PREV_HINT.len() + NEXT_HINT.len()).unwrap_or(u32::MAX);
        // One column of space on either side of the title
        GridSize::new(title.saturating_add(hints).saturating_add(2), 1)
    }
}

impl Widget for MonthHeader {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if u32::from(area.width) >= self.intrinsic_size().width {
            Line::styled(PREV_HINT, NAV_STYLE)
                .left_aligned()
                .render(area, buf);
            Line::styled(NEXT_HINT, NAV_STYLE)
                .right_aligned()
                .render(area, buf);
        }
        Line::styled(self.title(), MONTH_STYLE)
            .centered()
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Navigator, PositionStyler};
    use crate::config::CalendarConfig;
    use crate::theme::day::{INNER_STYLE, SPILLOVER_STYLE};
    use ratatui::style::{Color, Modifier};
    use time::macros::date;

    fn view() -> CalendarView<PositionStyler> {
        CalendarView::new(
            date!(2024 - 03 - 15),
            date!(2024 - 03 - 15),
            CalendarConfig::default(),
            PositionStyler,
        )
        .unwrap()
    }

    fn render(view: &mut CalendarView<PositionStyler>, area: Rect) -> Buffer {
        let mut buffer = Buffer::empty(area);
        Calendar::new().render(area, &mut buffer, view);
        buffer
    }

    fn lines(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_six_week_month() {
        let mut view = view();
        let buffer = render(&mut view, Rect::new(0, 0, 48, 17));
        assert_eq!(
            lines(&buffer),
            [
                "< p                March 2024                n >",
                "  Su     Mo     Tu     We     Th     Fr     Sa  ",
                " 25     26     27     28     29      1      2   ",
                "                                                ",
                "  3      4      5      6      7      8      9   ",
                "                                                ",
                " 10     11     12     13     14    [15]    16   ",
                "                                                ",
                " 17     18     19     20     21     22     23   ",
                "                                                ",
                " 24     25     26     27     28     29     30   ",
                "                                                ",
                " 31      1      2      3      4      5      6   ",
                "                                                ",
                "                                                ",
                "                                                ",
                "                                                ",
            ]
        );
        assert_eq!(buffer[(0, 2)].bg, SPILLOVER_STYLE.bg.unwrap());
        assert_eq!(buffer[(5, 3)].bg, SPILLOVER_STYLE.bg.unwrap());
        assert_eq!(buffer[(35, 2)].bg, INNER_STYLE.bg.unwrap());
        assert_eq!(buffer[(6, 2)].bg, Color::Reset);
        let today = &buffer[(36, 6)];
        assert_eq!(today.fg, Color::Red);
        assert!(today.modifier.contains(Modifier::BOLD));
        assert!(today.modifier.contains(Modifier::REVERSED));
        assert!(!buffer[(0, 6)].modifier.contains(Modifier::REVERSED));
        assert_eq!(buffer[(0, 1)].fg, Color::Reset);
        assert_eq!(buffer[(2, 1)].fg, WEEKEND_STYLE.fg.unwrap());
        assert_eq!(buffer[(44, 1)].fg, WEEKEND_STYLE.fg.unwrap());
        assert_eq!(buffer[(9, 1)].fg, WEEKDAY_STYLE.fg.unwrap());
    }

    #[test]
    fn test_five_week_month() {
        let mut view = view();
        view.jump_to_date(date!(2024 - 05 - 01)).unwrap();
        let buffer = render(&mut view, Rect::new(0, 0, 48, 17));
        let lines = lines(&buffer);
        assert_eq!(lines[0], "< p                 May 2024                 n >");
        assert_eq!(lines[2], " 28     29     30      1      2      3      4   ");
        assert_eq!(lines[3], "                                                ");
        assert_eq!(lines[4], "                                                ");
        assert_eq!(lines[5], "  5      6      7      8      9     10     11   ");
        assert_eq!(lines[14], " 26     27     28     29     30     31      1   ");
        assert_eq!(lines[16], "                                                ");
    }

    #[test]
    fn test_centered_in_wide_area() {
        let mut view = view();
        let buffer = render(&mut view, Rect::new(0, 0, 80, 20));
        let lines = lines(&buffer);
        assert_eq!(
            lines[0],
            "                < p                March 2024                n >                "
        );
        assert_eq!(&lines[6][16..64], " 10     11     12     13     14    [15]    16   ");
        assert_eq!(lines[19].trim(), "");
    }

    #[test]
    fn test_narrow_area_drops_hints() {
        let mut view = view();
        let buffer = render(&mut view, Rect::new(0, 0, 14, 17));
        let lines = lines(&buffer);
        assert_eq!(lines[0], "  March 2024  ");
        assert_eq!(lines[1], "  Su     Mo   ");
        assert_eq!(lines[2], " 25     26    ");
    }

    #[test]
    fn test_mid_scroll() {
        let mut view = view();
        render(&mut view, Rect::new(0, 0, 48, 17));
        view.goto_next_month(true).unwrap();
        view.tick();
        view.tick();
        let buffer = render(&mut view, Rect::new(0, 0, 48, 17));
        let lines = lines(&buffer);
        // Two frames into five, 19 columns of March have scrolled off
        assert_eq!(lines[0], "< p                March 2024                n >");
        assert_eq!(lines[2], "   28     29      1      2    31      1      2  ");
    }

    #[test]
    fn test_expanded_cell() {
        let mut view = view();
        render(&mut view, Rect::new(0, 0, 48, 17));
        assert!(view.toggle_selected());
        for _ in 0..TRANSITION_FRAMES {
            view.tick();
        }
        let buffer = render(&mut view, Rect::new(0, 0, 48, 17));
        let lines = lines(&buffer);
        assert_eq!(lines[0], "< p                March 2024                n >");
        assert_eq!(lines[2], "┌───────────────── 2024-03-15 ─────────────────┐");
        assert_eq!(lines[3], "│Friday, March 15, 2024                        │");
        assert_eq!(lines[4], "│Week 11 of 2024                               │");
        assert_eq!(lines[5], "│Day 75 of the year                            │");
        assert_eq!(lines[6], "│Today                                         │");
        assert_eq!(lines[7], "│                                              │");
        assert_eq!(lines[16], "└───────────────────────────────────────── Esc ┘");
    }

    #[test]
    fn test_expanding_cell_hides_details() {
        let mut view = view();
        render(&mut view, Rect::new(0, 0, 48, 17));
        assert!(view.toggle_selected());
        view.tick();
        let buffer = render(&mut view, Rect::new(0, 0, 48, 17));
        let lines = lines(&buffer);
        assert!(lines.iter().all(|ln| !ln.contains("Friday")));
        assert!(lines.iter().any(|ln| ln.contains('┌')));
    }

    #[test]
    fn test_day_cell_view() {
        let mut cell = DayCellView::new();
        assert_eq!(cell.intrinsic_size(), GridSize::new(4, 1));
        let area = Rect::new(0, 0, 6, 1);
        let mut buffer = Buffer::empty(area);
        cell.render(area, &mut buffer);
        assert_eq!(buffer, Buffer::with_lines(["      "]));
        cell.configure(Some(DayInfo {
            date: date!(2024 - 03 - 05),
            position: DayPosition::Inner,
            style: INNER_STYLE,
            is_today: false,
            is_selected: false,
        }));
        cell.render(area, &mut buffer);
        let mut expected = Buffer::with_lines(["  5   "]);
        expected.set_style(area, INNER_STYLE);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_today_marked_only_on_own_page() {
        let mut cell = DayCellView::new();
        let info = DayInfo {
            date: date!(2024 - 03 - 01),
            position: DayPosition::Inner,
            style: INNER_STYLE,
            is_today: true,
            is_selected: false,
        };
        cell.configure(Some(info));
        assert_eq!(cell.label().as_deref(), Some("[ 1]"));
        cell.configure(Some(DayInfo {
            position: DayPosition::Next,
            style: SPILLOVER_STYLE,
            ..info
        }));
        assert_eq!(cell.label().as_deref(), Some("  1 "));
        let area = Rect::new(0, 0, 6, 2);
        let mut buffer = Buffer::empty(area);
        cell.render(area, &mut buffer);
        assert_eq!(buffer[(2, 0)].fg, SPILLOVER_STYLE.fg.unwrap());
        assert!(!buffer[(2, 0)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_month_header_size() {
        let mut header = MonthHeader::new();
        header.configure(YearMonth::containing(date!(2024 - 09 - 01)));
        assert_eq!(header.title(), "September 2024");
        assert_eq!(header.intrinsic_size(), GridSize::new(22, 1));
    }
}
