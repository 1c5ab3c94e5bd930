//! Property tests for cell composition and frame rendering.
//!
//! 1. Cells never emit more rows than their budget; overflow takes the last row.
//! 2. Privacy masks keep the name's length.
//! 3. Composition is idempotent.
//! 4. Selection numbers over a month are exactly 1..=N.
//! 5. Split frames draw background, active pane, separator, footer in order.
//! 6. Out-of-bounds writes never panic.

use calgrid::cell::{compose_cell, CellLayout, CellSources, ComposeOptions};
use calgrid::config::Config;
use calgrid::date::{CalendarSystem, Date};
use calgrid::model::{Event, EventCollection, Task, TaskCollection};
use calgrid::render::{Collections, Layer, Renderer};
use calgrid::screen::{Screen, ScreenState};
use calgrid::style::{Role, Theme};
use calgrid::terminal::{BufferSurface, Surface};
use chrono::Local;
use proptest::prelude::*;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

fn day(d: u32) -> Date {
    Date::new(CalendarSystem::Gregorian, 2024, 2, d).expect("February 2024 has 29 days")
}

fn events_on(date: Date, names: &[String]) -> EventCollection {
    EventCollection::from_items(
        CalendarSystem::Gregorian,
        names.iter().map(|n| Event::new(n.clone(), date)).collect(),
    )
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Zé ]{1,20}"
}

/// Names that sometimes pick up the two-column meeting icon.
fn mixed_width_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        name_strategy(),
        name_strategy().prop_map(|name| format!("{} meeting", name)),
    ]
}

proptest! {
    #[test]
    fn rows_stay_within_budget(
        names in prop::collection::vec(mixed_width_name_strategy(), 0..12),
        rows in 1usize..8,
        width in 1usize..30,
    ) {
        let config = Config::default();
        let events = events_on(day(14), &names);
        let sources = CellSources::gather(day(14), &events, None, None);
        let layout = CellLayout { rows, width, icon_only: false, daily: false };
        let cell = compose_cell(day(14), &sources, layout, &ComposeOptions::new(&config, true, false), 0);

        prop_assert_eq!(cell.rows.len(), names.len().min(rows));
        prop_assert!(cell.rows.iter().all(|r| r.text.width() == width));
        if names.len() > rows {
            prop_assert!(cell.rows[rows - 1].overflow);
            prop_assert_eq!(cell.targets.len(), rows - 1);
        } else {
            prop_assert!(cell.rows.iter().all(|r| !r.overflow));
        }
    }
}

proptest! {
    #[test]
    fn privacy_mask_keeps_length(name in name_strategy()) {
        let config = Config::default();
        let events = events_on(day(3), std::slice::from_ref(&name));
        let sources = CellSources::gather(day(3), &events, None, None);
        let layout = CellLayout { rows: 2, width: 60, icon_only: false, daily: false };
        let cell = compose_cell(day(3), &sources, layout, &ComposeOptions::new(&config, false, true), 0);

        let prefix = config.icons.event.chars().count() + 1;
        let payload: String = cell.rows[0].text.chars().skip(prefix).take(name.chars().count()).collect();
        prop_assert!(payload.chars().all(|c| c == '•'));
        prop_assert_eq!(payload.chars().count(), name.chars().count());
        let rest: String = cell.rows[0].text.chars().skip(prefix + name.chars().count()).collect();
        prop_assert!(rest.trim().is_empty());
    }
}

proptest! {
    #[test]
    fn composition_is_idempotent(
        names in prop::collection::vec(name_strategy(), 0..8),
        rows in 1usize..6,
        offset in 0usize..50,
    ) {
        let config = Config::default();
        let events = events_on(day(9), &names);
        let sources = CellSources::gather(day(9), &events, None, None);
        let layout = CellLayout { rows, width: 10, icon_only: false, daily: false };
        let opts = ComposeOptions::new(&config, true, false);
        prop_assert_eq!(
            compose_cell(day(9), &sources, layout, &opts, offset),
            compose_cell(day(9), &sources, layout, &opts, offset)
        );
    }
}

proptest! {
    #[test]
    fn month_selection_numbers_are_contiguous(
        placed in prop::collection::vec((1u32..=29, name_strategy()), 0..40),
        rows in 12u16..60,
        cols in 49u16..200,
    ) {
        let config = Config::default();
        let events = EventCollection::from_items(
            CalendarSystem::Gregorian,
            placed.iter().map(|(d, n)| Event::new(n.clone(), day(*d))).collect(),
        );
        let empty = EventCollection::new(CalendarSystem::Gregorian);
        let tasks = TaskCollection::default();
        let data = Collections { events: &events, holidays: &empty, birthdays: &empty, tasks: &tasks };
        let mut state = ScreenState::new(&config, day(1), rows, cols);
        state.set_selection_mode(true);

        let frame = Renderer::new(&config, Local::now()).render(&state, &data);
        let indices: Vec<usize> = frame.selection.iter().map(|t| t.index).collect();
        prop_assert_eq!(indices, (1..=frame.selection.len()).collect::<Vec<_>>());
        prop_assert!(frame.selection.len() <= placed.len());
    }
}

proptest! {
    #[test]
    fn split_frames_keep_layer_order(
        rows in 0u16..80,
        cols in 0u16..250,
        journal in any::<bool>(),
        daily in any::<bool>(),
        borders in any::<bool>(),
    ) {
        let config = Config { split_screen: true, show_calendar_borders: borders, ..Config::default() };
        let events = EventCollection::from_items(CalendarSystem::Gregorian, vec![Event::new("lunch", day(14))]);
        let empty = EventCollection::new(CalendarSystem::Gregorian);
        let tasks = TaskCollection::from_items(vec![Task::new("write"), Task::new("--edit")]);
        let data = Collections { events: &events, holidays: &empty, birthdays: &empty, tasks: &tasks };
        let mut state = ScreenState::new(&config, day(14), rows, cols);
        if daily {
            state.toggle_monthly_daily().unwrap();
        }
        if journal {
            state.request(Screen::Journal).unwrap();
        }

        let frame = Renderer::new(&config, Local::now()).render(&state, &data);
        let rank = |layer: Layer| match layer {
            Layer::Background => 0,
            Layer::Active => 1,
            Layer::Separator => 2,
            Layer::Footer => 3,
            Layer::Help => 4,
        };
        let ranks: Vec<u8> = frame.commands.iter().map(|c| rank(c.layer)).collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }
}

proptest! {
    #[test]
    fn surface_clips_any_write(
        width in 0u16..40,
        height in 0u16..10,
        row in any::<u16>(),
        col in any::<u16>(),
        text in "\\PC{0,60}",
    ) {
        let theme = Theme::from_config(&Config::default());
        let mut buffer = Buffer::empty(Rect::new(0, 0, width, height));
        let mut surface = BufferSurface::new(&mut buffer, &theme);
        surface.write_styled_text(row, col, &text, Role::Events);
        prop_assert_eq!(surface.size(), (height, width));
    }
}
