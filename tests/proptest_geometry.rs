//! Property tests for grid geometry.
//!
//! 1. Cell sizes are positive and fit the terminal.
//! 2. Week-start rotation yields every weekday exactly once.
//! 3. Grid columns map back to the natural weekday.
//! 4. Month grids hold each day once, in at most six rows.

use calgrid::date::{days_in_month, CalendarSystem, Date};
use calgrid::geometry::{cell_size, month_grid, weekday_for_column, weekday_index};
use proptest::prelude::*;

fn system_strategy() -> impl Strategy<Value = CalendarSystem> {
    prop_oneof![Just(CalendarSystem::Gregorian), Just(CalendarSystem::Persian)]
}

fn date_strategy() -> impl Strategy<Value = Date> {
    (1900i32..=2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
        Date::new(CalendarSystem::Gregorian, y, m, d).expect("day 1..=28 is always valid")
    })
}

proptest! {
    #[test]
    fn cell_size_fits_terminal(rows in 3u16..=500, cols in 7u16..=1000) {
        let cell = cell_size(rows, cols);
        prop_assert!(cell.width >= 1);
        prop_assert!(cell.height >= 1);
        prop_assert!(7 * cell.width <= cols, "{:?} overflows {} columns", cell, cols);
    }
}

proptest! {
    #[test]
    fn week_start_rotations_are_distinct(date in date_strategy()) {
        let mut seen: Vec<u32> = (1u8..=7).map(|start| weekday_index(&date, start)).collect();
        prop_assert!(seen.iter().all(|&i| i < 7));
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), 7);
    }
}

proptest! {
    #[test]
    fn column_maps_back_to_weekday(date in date_strategy(), start in 1u8..=7) {
        let column = weekday_index(&date, start);
        prop_assert_eq!(weekday_for_column(column, start), date.weekday_from_sunday());
    }
}

proptest! {
    #[test]
    fn month_grid_holds_each_day_once(
        system in system_strategy(),
        year_offset in 0i32..=150,
        month in 1u32..=12,
        start in 1u8..=7,
    ) {
        let year = match system {
            CalendarSystem::Gregorian => 1950 + year_offset,
            CalendarSystem::Persian => 1330 + year_offset,
        };
        let weeks = month_grid(year, month, start, system).unwrap();
        let days = days_in_month(system, year, month).unwrap();
        prop_assert!(weeks.len() <= 6);
        let listed: Vec<u32> = weeks.iter().flatten().copied().filter(|&d| d != 0).collect();
        prop_assert_eq!(listed, (1..=days).collect::<Vec<_>>());

        let first = Date::new(system, year, month, 1).unwrap();
        let lead = weeks[0].iter().take_while(|&&d| d == 0).count() as u32;
        prop_assert_eq!(lead, weekday_index(&first, start));
    }
}
