use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const MONTH_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const NAV_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKEND_STYLE: Style = WEEKDAY_STYLE.fg(Color::DarkGray);

pub(crate) mod day {
    use super::*;

    pub(crate) const INNER_STYLE: Style = Style::new().fg(Color::White).bg(Color::Magenta);

    pub(crate) const SPILLOVER_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Yellow);

    pub(crate) const TODAY_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

    pub(crate) const SELECTED_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

    pub(crate) const EXPANDED_STYLE: Style = BASE_STYLE;
}

pub(crate) mod jumpto {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
