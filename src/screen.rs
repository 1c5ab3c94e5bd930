//! Screen state machine and derived pane geometry.

use crate::config::{Config, DefaultView};
use crate::date::{Date, DateError};
use crate::model::TaskCollection;
use log::{debug, warn};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    CalendarMonthly,
    CalendarDaily,
    Journal,
    Help,
    Exit,
}

impl Screen {
    pub fn is_calendar(self) -> bool {
        matches!(self, Screen::CalendarMonthly | Screen::CalendarDaily)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    #[error("cannot move to {0:?} after exit")]
    Exited(Screen),
}

/// A horizontal region of the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pane {
    pub x: u16,
    pub width: u16,
}

impl Pane {
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }
}

const HELP_TIMEOUT_DS: u16 = 255;
const DAILY_TIMEOUT_DS: u16 = 255;
const DEFAULT_TIMEOUT_DS: u16 = 100;

#[derive(Debug, Clone)]
pub struct ScreenState {
    screen: Screen,
    /// Screen to return to when help closes.
    previous: Screen,
    /// Calendar screen last shown; drawn behind the journal when split.
    calendar: Screen,
    pub focused: Date,
    pub today: Date,
    split: bool,
    selection_mode: bool,
    active_pane: bool,
    privacy: bool,
    rows: u16,
    cols: u16,
    pane_width_percent: u16,
    journal_width: u16,
}

impl ScreenState {
    pub fn new(config: &Config, today: Date, rows: u16, cols: u16) -> Self {
        let screen = match config.default_view {
            DefaultView::Monthly => Screen::CalendarMonthly,
            DefaultView::Daily => Screen::CalendarDaily,
            DefaultView::Journal => Screen::Journal,
        };
        let mut state = ScreenState {
            screen,
            previous: screen,
            calendar: if screen == Screen::CalendarDaily {
                Screen::CalendarDaily
            } else {
                Screen::CalendarMonthly
            },
            focused: today,
            today,
            split: config.split_screen,
            selection_mode: false,
            active_pane: false,
            privacy: config.privacy_mode,
            rows,
            cols,
            pane_width_percent: config.right_pane_percentage.min(100),
            journal_width: 0,
        };
        state.recompute_geometry();
        state
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_running(&self) -> bool {
        self.screen != Screen::Exit
    }

    /// Moves to `next`. Nothing leaves `Exit`.
    pub fn request(&mut self, next: Screen) -> Result<(), ScreenError> {
        if self.screen == Screen::Exit {
            warn!("rejected transition to {:?} after exit", next);
            return Err(ScreenError::Exited(next));
        }
        if next == self.screen {
            return Ok(());
        }
        debug!("screen {:?} -> {:?}", self.screen, next);
        if next == Screen::Help {
            self.previous = self.screen;
        }
        if next.is_calendar() {
            self.calendar = next;
        }
        self.screen = next;
        self.recompute_geometry();
        Ok(())
    }

    pub fn close_help(&mut self) -> Result<(), ScreenError> {
        let back = self.previous;
        self.request(back)
    }

    /// Calendar screen shown in the calendar pane.
    pub fn calendar_screen(&self) -> Screen {
        self.calendar
    }

    /// Calendar when on the journal and vice versa.
    pub fn toggle_calendar_journal(&mut self) -> Result<(), ScreenError> {
        let next = match self.screen {
            Screen::Journal => self.calendar,
            _ => Screen::Journal,
        };
        self.request(next)
    }

    pub fn toggle_monthly_daily(&mut self) -> Result<(), ScreenError> {
        let next = match self.calendar {
            Screen::CalendarMonthly => Screen::CalendarDaily,
            _ => Screen::CalendarMonthly,
        };
        self.request(next)
    }

    /// Screen drawn as a passive pane behind the active one, if any.
    pub fn background_screen(&self) -> Option<Screen> {
        if !self.split || self.selection_mode {
            return None;
        }
        match self.screen {
            Screen::Journal => Some(self.calendar),
            Screen::CalendarMonthly | Screen::CalendarDaily => Some(Screen::Journal),
            Screen::Help | Screen::Exit => None,
        }
    }

    pub fn split(&self) -> bool {
        self.split
    }

    pub fn set_split(&mut self, split: bool) {
        self.split = split;
        self.recompute_geometry();
    }

    pub fn selection_mode(&self) -> bool {
        self.selection_mode
    }

    pub fn set_selection_mode(&mut self, on: bool) {
        self.selection_mode = on;
    }

    pub fn active_pane(&self) -> bool {
        self.active_pane
    }

    pub fn privacy(&self) -> bool {
        self.privacy
    }

    pub fn toggle_privacy(&mut self) {
        self.privacy = !self.privacy;
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn resize(&mut self, rows: u16, cols: u16) {
        if (rows, cols) != (self.rows, self.cols) {
            debug!("resize {}x{} -> {}x{}", self.cols, self.rows, cols, rows);
            self.rows = rows;
            self.cols = cols;
            self.recompute_geometry();
        }
    }

    fn recompute_geometry(&mut self) {
        self.journal_width = if self.split {
            (u32::from(self.cols) * u32::from(self.pane_width_percent) / 100) as u16
        } else {
            self.cols
        };
        self.active_pane = self.split && matches!(
            self.screen,
            Screen::CalendarMonthly | Screen::CalendarDaily | Screen::Journal
        );
    }

    /// Column of the split separator.
    pub fn separator_column(&self) -> Option<u16> {
        self.split
            .then(|| self.cols.saturating_sub(self.journal_width))
    }

    pub fn calendar_pane(&self) -> Pane {
        match self.separator_column() {
            Some(x) => Pane { x: 0, width: x },
            None => Pane {
                x: 0,
                width: self.cols,
            },
        }
    }

    pub fn journal_pane(&self) -> Pane {
        match self.separator_column() {
            Some(x) => {
                let start = x.saturating_add(2).min(self.cols);
                Pane {
                    x: start,
                    width: self.cols - start,
                }
            }
            None => Pane {
                x: 0,
                width: self.cols,
            },
        }
    }

    pub fn pane_for(&self, screen: Screen) -> Pane {
        match screen {
            Screen::Journal => self.journal_pane(),
            Screen::CalendarMonthly | Screen::CalendarDaily => self.calendar_pane(),
            Screen::Help | Screen::Exit => Pane {
                x: 0,
                width: self.cols,
            },
        }
    }

    /// Moves focus by one month (monthly) or one day (daily).
    pub fn step(&mut self, forward: bool) -> Result<(), DateError> {
        let delta = if forward { 1 } else { -1 };
        self.focused = match self.calendar {
            Screen::CalendarDaily => self.focused.add_days(delta)?,
            _ => self.focused.add_months(delta)?,
        };
        Ok(())
    }

    pub fn focus_today(&mut self) {
        self.focused = self.today;
    }

    /// How long to wait for input before the next frame.
    pub fn input_timeout(&self, tasks: &TaskCollection, refresh_interval: u16) -> Duration {
        let deciseconds = match self.screen {
            Screen::Help => HELP_TIMEOUT_DS,
            Screen::CalendarDaily => DAILY_TIMEOUT_DS,
            Screen::Journal if tasks.any_timer_counting() => refresh_interval.max(1).saturating_mul(10),
            _ if self.split && tasks.any_timer_counting() => refresh_interval.max(1).saturating_mul(10),
            _ => DEFAULT_TIMEOUT_DS,
        };
        Duration::from_millis(u64::from(deciseconds) * 100)
    }
}
