use crate::calendar::{Calendar, CalendarView, DateStyler, Navigator};
use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::theme::BASE_STYLE;
use crossterm::event::{poll, read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Time between frames of a running animation
const FRAME_INTERVAL: Duration = Duration::from_millis(30);

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<S> {
    calendar: CalendarView<S>,
    state: AppState,
    // When the next animation frame is due; `None` when nothing is animating
    next_frame: Option<Instant>,
}

impl<S: DateStyler> App<S> {
    pub(crate) fn new(calendar: CalendarView<S>) -> App<S> {
        App {
            calendar,
            state: AppState::Calendar,
            next_frame: None,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let now = Instant::now();
        self.schedule_frame(now);
        if let Some(deadline) = self.next_frame {
            if !poll(deadline.saturating_duration_since(now))? {
                self.tick_if_due(Instant::now().max(deadline));
                return Ok(());
            }
        }
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too

        self.tick_if_due(Instant::now());
        Ok(())
    }

    fn schedule_frame(&mut self, now: Instant) {
        if self.calendar.is_animating() {
            self.next_frame.get_or_insert(now + FRAME_INTERVAL);
        } else {
            self.next_frame = None;
        }
    }

    // Returns `true` if a frame was due at `now` and the animations advanced
    fn tick_if_due(&mut self, now: Instant) -> bool {
        match self.next_frame {
            Some(deadline) if now >= deadline => {
                self.calendar.tick();
                self.next_frame = self
                    .calendar
                    .is_animating()
                    .then(|| now + FRAME_INTERVAL);
                true
            }
            _ => false,
        }
    }

    // Returns `false` if the user pressed an invalid key or one that can't be
    // acted on right now
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_selection(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_selection(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_selection(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_selection(7),
                KeyCode::Char('p') | KeyCode::PageUp => {
                    self.calendar.goto_previous_month(true).is_ok()
                }
                KeyCode::Char('n') | KeyCode::PageDown => {
                    self.calendar.goto_next_month(true).is_ok()
                }
                KeyCode::Char('0') | KeyCode::Home => {
                    self.calendar.goto_default_month(true).is_ok()
                }
                KeyCode::Char('t') => self.jump_to(self.calendar.today()),
                KeyCode::Enter | KeyCode::Char(' ') => self.calendar.toggle_selected(),
                KeyCode::Esc => {
                    if self.calendar.cell().is_active() {
                        self.calendar.collapse()
                    } else {
                        self.state = AppState::Quitting;
                        true
                    }
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('q') => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char('-') => state.handle_input(JumpToInput::Negative),
                        KeyCode::Char('+') => state.handle_input(JumpToInput::Positive),
                        KeyCode::Char(c) => match c.to_digit(10).map(u8::try_from) {
                            Some(Ok(d)) => state.handle_input(JumpToInput::Digit(d)),
                            _ => JumpToOutput::Invalid,
                        },
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(JumpToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                        _ => JumpToOutput::Invalid,
                    };
                    match output {
                        JumpToOutput::Ok => true,
                        JumpToOutput::Invalid => false,
                        JumpToOutput::Jump(date) => {
                            self.state = AppState::Calendar;
                            self.jump_to(date)
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn move_selection(&mut self, days: i64) -> bool {
        match self.calendar.move_selection(days) {
            Ok(()) => {
                tracing::trace!(selected = %self.calendar.selected(), "moved selection");
                true
            }
            Err(e) => {
                tracing::debug!(days, error = %e, "could not move selection");
                false
            }
        }
    }

    fn jump_to(&mut self, date: time::Date) -> bool {
        match self.calendar.jump_to_date(date) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(%date, error = %e, "could not jump to date");
                false
            }
        }
    }
}

impl<S: DateStyler> Widget for &mut App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let cal = Calendar::<S>::new();
        cal.render(area, buf, &mut self.calendar);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}
