//! User-facing strings.

use crate::date::CalendarSystem;

pub const APP_NAME: &str = "calgrid";

pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const MONTHS_PERSIAN: [&str; 12] = [
    "Farvardin",
    "Ordibehesht",
    "Khordad",
    "Tir",
    "Mordad",
    "Shahrivar",
    "Mehr",
    "Aban",
    "Azar",
    "Dey",
    "Bahman",
    "Esfand",
];

/// Indexed from Sunday.
pub const DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Indexed from Sunday.
pub const DAYS_PERSIAN: [&str; 7] = [
    "Yekshanbe",
    "Doshanbe",
    "Seshanbe",
    "Chaharshanbe",
    "Panjshanbe",
    "Jome",
    "Shanbe",
];

pub const MSG_NOTHING_PLANNED: &str = "Nothing planned";

pub const CALENDAR_HINT: &str =
    " Space·Switch to journal   a·Add   x·Delete   i·Important   n/p·Month   v·Daily   ?·Help   q·Quit";
pub const CALENDAR_HINT_DAILY: &str =
    " Space·Switch to journal   a·Add   x·Delete   i·Important   n/p·Day   v·Monthly   ?·Help   q·Quit";
pub const JOURNAL_HINT: &str =
    " Space·Switch to calendar   a·Add   x·Delete   d·Done   i·Important   t·Timer   ?·Help   q·Quit";

pub const TITLE_KEYS_GENERAL: &str = "GENERAL KEYBINDINGS";
pub const TITLE_KEYS_CALENDAR: &str = "CALENDAR KEYBINDINGS";
pub const TITLE_KEYS_JOURNAL: &str = "JOURNAL KEYBINDINGS";

pub const KEYS_GENERAL: [(&str, &str); 6] = [
    ("  Space ", "Switch calendar and journal"),
    ("  s     ", "Toggle split screen"),
    ("  *     ", "Toggle global privacy"),
    ("  Esc   ", "Cancel selection or input"),
    ("  ?     ", "Show this help"),
    ("  q     ", "Quit"),
];

pub const KEYS_CALENDAR: [(&str, &str); 7] = [
    ("  a     ", "Add event on focused day"),
    ("  x     ", "Delete event by number"),
    ("  i     ", "Toggle event importance"),
    ("  n / → ", "Next month or day"),
    ("  p / ← ", "Previous month or day"),
    ("  g     ", "Go to today"),
    ("  v     ", "Toggle monthly and daily view"),
];

pub const KEYS_JOURNAL: [(&str, &str); 5] = [
    ("  a     ", "Add task"),
    ("  x     ", "Delete task by number"),
    ("  d     ", "Mark task done"),
    ("  i     ", "Mark task important"),
    ("  t     ", "Start or pause the task timer"),
];

pub const MSG_INFO: &str = "Numbers appear next to items while selecting.";

pub fn month_name(system: CalendarSystem, month: u32) -> &'static str {
    let names = match system {
        CalendarSystem::Gregorian => &MONTHS,
        CalendarSystem::Persian => &MONTHS_PERSIAN,
    };
    names
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("")
}

/// Day name by weekday counted from Sunday.
pub fn day_name(system: CalendarSystem, weekday: u32) -> &'static str {
    let names = match system {
        CalendarSystem::Gregorian => &DAYS,
        CalendarSystem::Persian => &DAYS_PERSIAN,
    };
    names[weekday as usize % 7]
}
