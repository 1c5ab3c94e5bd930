//! Semantic style roles and their mapping to terminal attributes.

use crate::config::Config;
use log::warn;
use ratatui::prelude::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    DayNames,
    WeekendNames,
    Days,
    Weekends,
    Today,
    Hints,
    Prompts,
    Title,
    CalendarHeader,
    ActivePane,
    Todo,
    Done,
    Important,
    Unimportant,
    Timer,
    TimerPaused,
    Events,
    Holidays,
    Birthdays,
    Time,
    Weather,
    Separator,
    CalendarBorder,
}

impl Role {
    pub const ALL: [Role; 23] = [
        Role::DayNames,
        Role::WeekendNames,
        Role::Days,
        Role::Weekends,
        Role::Today,
        Role::Hints,
        Role::Prompts,
        Role::Title,
        Role::CalendarHeader,
        Role::ActivePane,
        Role::Todo,
        Role::Done,
        Role::Important,
        Role::Unimportant,
        Role::Timer,
        Role::TimerPaused,
        Role::Events,
        Role::Holidays,
        Role::Birthdays,
        Role::Time,
        Role::Weather,
        Role::Separator,
        Role::CalendarBorder,
    ];

    fn default_color(self) -> Color {
        match self {
            Role::DayNames | Role::Title | Role::Time => Color::Cyan,
            Role::WeekendNames | Role::Weekends | Role::Important => Color::Red,
            Role::Days | Role::Todo | Role::Events => Color::White,
            Role::Today | Role::ActivePane | Role::Prompts => Color::Green,
            Role::Hints | Role::Unimportant | Role::Separator | Role::CalendarBorder => {
                Color::DarkGray
            }
            Role::CalendarHeader | Role::Weather => Color::Magenta,
            Role::Done => Color::Gray,
            Role::Timer => Color::LightYellow,
            Role::TimerPaused => Color::Yellow,
            Role::Holidays => Color::LightBlue,
            Role::Birthdays => Color::LightMagenta,
        }
    }
}

/// Resolved style for every role.
#[derive(Debug, Clone)]
pub struct Theme {
    styles: HashMap<Role, Style>,
}

impl Theme {
    pub fn from_config(config: &Config) -> Self {
        let styles = Role::ALL
            .iter()
            .map(|&role| {
                let color = match config.colors.get(&role) {
                    Some(name) => Color::from_str(name).unwrap_or_else(|_| {
                        warn!("unknown color {:?} for {:?}, using default", name, role);
                        role.default_color()
                    }),
                    None => role.default_color(),
                };
                let mut style = Style::default().fg(color);
                if config.bold.contains(&role) {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if config.underlined.contains(&role) {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                (role, style)
            })
            .collect();
        Theme { styles }
    }

    pub fn style(&self, role: Role) -> Style {
        self.styles.get(&role).copied().unwrap_or_default()
    }
}
