//! Grid arithmetic for the monthly calendar.

use crate::date::{days_in_month, CalendarSystem, Date, DateError};

pub const DAYS_IN_WEEK: u16 = 7;
/// Most week rows a month can span.
pub const MAX_WEEK_ROWS: u16 = 6;
/// Header, day names and footer.
pub const RESERVED_ROWS: u16 = 3;
/// Narrower cells show icons only.
pub const MIN_TEXT_CELL_WIDTH: u16 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u16,
    pub height: u16,
}

impl CellSize {
    pub fn icon_only(&self) -> bool {
        self.width < MIN_TEXT_CELL_WIDTH
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

pub fn cell_size(rows: u16, cols: u16) -> CellSize {
    let height = if rows < RESERVED_ROWS {
        0
    } else {
        ((rows - RESERVED_ROWS) / MAX_WEEK_ROWS).max(1)
    };
    CellSize {
        width: cols / DAYS_IN_WEEK,
        height,
    }
}

/// Whether a screen may render at all at this terminal size.
pub fn can_render(rows: u16, cols: u16) -> bool {
    cols >= 6 && rows >= 3
}

fn week_shift(week_start: u8) -> u32 {
    u32::from(week_start.max(1) - 1) % 7
}

/// Natural weekday (0 = Sunday) shown in grid column `column`.
///
/// `week_start` counts from 1 = Sunday to 7 = Saturday.
pub fn weekday_for_column(column: u32, week_start: u8) -> u32 {
    let day = column + week_shift(week_start);
    if day > 6 {
        day - 7
    } else {
        day
    }
}

/// Grid column of `date` when weeks begin on `week_start`.
pub fn weekday_index(date: &Date, week_start: u8) -> u32 {
    (date.weekday_from_sunday() + 7 - week_shift(week_start)) % 7
}

/// Weekend days are numbered like `week_start`: 1 = Sunday.
pub fn is_weekend(weekday: u32, weekend_days: &[u8]) -> bool {
    weekend_days.iter().any(|&d| u32::from(d) == weekday + 1)
}

/// Week rows of day numbers for a month; `0` marks slots outside it.
pub fn month_grid(
    year: i32,
    month: u32,
    week_start: u8,
    system: CalendarSystem,
) -> Result<Vec<[u32; 7]>, DateError> {
    let first = Date::new(system, year, month, 1)?;
    let days = days_in_month(system, year, month)?;
    let lead = weekday_index(&first, week_start);

    let mut weeks = Vec::with_capacity(MAX_WEEK_ROWS as usize);
    let mut week = [0u32; 7];
    let mut column = lead as usize;
    for day in 1..=days {
        week[column] = day;
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [0; 7];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }
    Ok(weeks)
}
