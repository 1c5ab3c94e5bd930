//! Frame rendering.
//!
//! A frame is a flat list of draw commands plus the selection numbers it
//! showed. Nothing here touches the terminal; `terminal::paint` does that.

use crate::cell::{
    compose_cell, fit, CellLayout, CellRow, CellSources, ComposeOptions, SelectionTarget,
};
use crate::config::Config;
use crate::date::Date;
use crate::geometry::{
    can_render, cell_size, is_weekend, month_grid, weekday_for_column, CellSize, DAYS_IN_WEEK,
    MAX_WEEK_ROWS,
};
use crate::journal::compose_journal;
use crate::model::{EventCollection, TaskCollection};
use crate::screen::{Pane, Screen, ScreenState};
use crate::style::Role;
use crate::text::{
    day_name, month_name, APP_NAME, CALENDAR_HINT, CALENDAR_HINT_DAILY, JOURNAL_HINT, KEYS_CALENDAR,
    KEYS_GENERAL, KEYS_JOURNAL, MSG_INFO, TITLE_KEYS_CALENDAR, TITLE_KEYS_GENERAL,
    TITLE_KEYS_JOURNAL,
};
use chrono::{DateTime, Local, Utc};
use log::warn;
use unicode_width::UnicodeWidthStr;

/// Which pass of the frame emitted a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Active,
    Separator,
    Footer,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCommand {
    pub row: u16,
    pub col: u16,
    pub text: String,
    pub role: Role,
    pub layer: Layer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub commands: Vec<DrawCommand>,
    /// Numbers shown in the active pane.
    pub selection: Vec<SelectionTarget>,
    /// Day cells drawn in the calendar pane, in grid order.
    pub rendered_days: Vec<Date>,
}

impl Frame {
    fn push(&mut self, layer: Layer, row: u16, col: u16, text: impl Into<String>, role: Role) {
        self.commands.push(DrawCommand {
            row,
            col,
            text: text.into(),
            role,
            layer,
        });
    }

    pub fn find_target(&self, index: usize) -> Option<&SelectionTarget> {
        self.selection.iter().find(|t| t.index == index)
    }
}

/// Collections read during a frame.
#[derive(Debug, Clone, Copy)]
pub struct Collections<'a> {
    pub events: &'a EventCollection,
    pub holidays: &'a EventCollection,
    pub birthdays: &'a EventCollection,
    pub tasks: &'a TaskCollection,
}

pub struct Renderer<'a> {
    config: &'a Config,
    now: DateTime<Local>,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a Config, now: DateTime<Local>) -> Self {
        Renderer { config, now }
    }

    pub fn render(&self, state: &ScreenState, data: &Collections<'_>) -> Frame {
        let mut frame = Frame::default();
        match state.screen() {
            Screen::Exit => {}
            Screen::Help => self.help(state, &mut frame),
            active => {
                if let Some(background) = state.background_screen() {
                    self.screen(background, state, data, Layer::Background, &mut frame);
                }
                self.screen(active, state, data, Layer::Active, &mut frame);
                if state.split() {
                    self.separator(state, &mut frame);
                }
                self.footer(state, &mut frame);
            }
        }
        frame
    }

    fn screen(
        &self,
        screen: Screen,
        state: &ScreenState,
        data: &Collections<'_>,
        layer: Layer,
        frame: &mut Frame,
    ) {
        let pane = state.pane_for(screen);
        if !can_render(state.rows(), pane.width) {
            return;
        }
        match screen {
            Screen::CalendarMonthly => self.monthly(state, data, pane, layer, frame),
            Screen::CalendarDaily => self.daily(state, data, pane, layer, frame),
            Screen::Journal => self.journal(state, data, pane, layer, frame),
            Screen::Help | Screen::Exit => {}
        }
    }

    fn options(&self, state: &ScreenState, layer: Layer) -> ComposeOptions<'a> {
        ComposeOptions::new(
            self.config,
            state.selection_mode() && layer == Layer::Active,
            state.privacy(),
        )
    }

    fn sources<'d>(&self, date: Date, data: &Collections<'d>) -> CellSources<'d> {
        CellSources::gather(
            date,
            data.events,
            self.config.display_holidays.then_some(data.holidays),
            self.config.display_birthdays.then_some(data.birthdays),
        )
    }

    /// Title row with weather and clock when they fit.
    fn header(
        &self,
        pane: Pane,
        title: &str,
        role: Role,
        extras: bool,
        layer: Layer,
        frame: &mut Frame,
    ) {
        let width = usize::from(pane.width);
        frame.push(layer, 0, pane.x, title, role);
        if !extras {
            return;
        }
        let title_len = title.width();

        let mut right_edge = width;
        if let (true, Some(weather)) = (self.config.show_weather, self.config.weather.as_deref()) {
            let len = weather.width();
            if len > 0 && title_len + 1 + len + 1 <= width {
                right_edge = width - len - 1;
                frame.push(layer, 0, pane.x + right_edge as u16, weather, Role::Weather);
            }
        }
        if self.config.show_current_time {
            let clock = self.now.format("%H:%M").to_string();
            let start = (width / 2).saturating_sub(2);
            if start > title_len && start + clock.width() < right_edge {
                frame.push(layer, 0, pane.x + start as u16, clock, Role::Time);
            }
        }
    }

    fn title_role(&self, state: &ScreenState, layer: Layer) -> Role {
        if state.active_pane() && layer == Layer::Active {
            Role::ActivePane
        } else {
            Role::CalendarHeader
        }
    }

    fn day_names(&self, pane: Pane, cell: CellSize, layer: Layer, frame: &mut Frame) {
        let letters = if pane.width < 80 { 2 } else { 10 };
        for column in 0..DAYS_IN_WEEK {
            let weekday = weekday_for_column(u32::from(column), self.config.start_week_day);
            let name: String = day_name(self.config.calendar, weekday)
                .chars()
                .take(letters)
                .collect();
            let role = if is_weekend(weekday, &self.config.weekend_days) {
                Role::WeekendNames
            } else {
                Role::DayNames
            };
            frame.push(layer, 1, pane.x + column * cell.width, name, role);
        }
    }

    /// Draws a day number and returns the date it stands for.
    #[allow(clippy::too_many_arguments)]
    fn day_number(
        &self,
        date: Date,
        today: &Date,
        weekday: u32,
        x: u16,
        y: u16,
        cell: CellSize,
        layer: Layer,
        frame: &mut Frame,
    ) -> Date {
        let width = usize::from(cell.width.saturating_sub(1).max(1));
        let (text, role) = if &date == today {
            (format!("{}{}", date.day(), self.config.icons.today), Role::Today)
        } else if is_weekend(weekday, &self.config.weekend_days) {
            (date.day().to_string(), Role::Weekends)
        } else {
            (date.day().to_string(), Role::Days)
        };
        frame.push(layer, y, x, fit(&text, width, true), role);
        date
    }

    fn monthly(
        &self,
        state: &ScreenState,
        data: &Collections<'_>,
        pane: Pane,
        layer: Layer,
        frame: &mut Frame,
    ) {
        let cell = cell_size(state.rows(), pane.width);
        if cell.is_empty() {
            return;
        }
        let focused = state.focused;
        let weeks = match month_grid(
            focused.year(),
            focused.month(),
            self.config.start_week_day,
            self.config.calendar,
        ) {
            Ok(weeks) => weeks,
            Err(err) => {
                warn!("cannot lay out {}: {}", focused, err);
                return;
            }
        };

        let title = format!(
            "{} {}",
            month_name(self.config.calendar, focused.month()).to_uppercase(),
            focused.year()
        );
        self.header(pane, &title, self.title_role(state, layer), true, layer, frame);
        self.day_names(pane, cell, layer, frame);

        let borders = self.config.show_calendar_borders;
        let opts = self.options(state, layer);
        let rows = usize::from(cell.height).saturating_sub(1 + usize::from(borders));
        let mut offset = 0;
        for (row, week) in weeks.iter().enumerate() {
            let y = 2 + row as u16 * cell.height;
            for (column, &day) in week.iter().enumerate() {
                if day == 0 {
                    continue;
                }
                let x = pane.x + column as u16 * cell.width;
                let date = match focused.with_day(day) {
                    Ok(date) => date,
                    Err(err) => {
                        warn!("skipping day {} of {}: {}", day, focused, err);
                        continue;
                    }
                };
                let weekday = weekday_for_column(column as u32, self.config.start_week_day);
                let drawn = self.day_number(date, &state.today, weekday, x, y, cell, layer, frame);
                if layer == Layer::Active {
                    frame.rendered_days.push(drawn);
                }

                let width = if self.config.cut_titles || borders {
                    cell.width.saturating_sub(1)
                } else {
                    pane.right() - x
                };
                let layout = CellLayout {
                    rows,
                    width: usize::from(width),
                    icon_only: cell.icon_only(),
                    daily: false,
                };
                let composed = compose_cell(date, &self.sources(date, data), layout, &opts, offset);
                offset = composed.next_offset;
                self.cell_rows(&composed.rows, x, y + 1, layer, frame);
                if layer == Layer::Active {
                    frame.selection.extend(composed.targets);
                }
            }
        }

        if borders {
            self.borders(pane, cell, layer, frame);
        }
    }

    fn cell_rows(&self, rows: &[CellRow], x: u16, y: u16, layer: Layer, frame: &mut Frame) {
        for (i, row) in rows.iter().enumerate() {
            frame.push(layer, y + i as u16, x + row.indent, row.text.clone(), row.role);
        }
    }

    fn borders(&self, pane: Pane, cell: CellSize, layer: Layer, frame: &mut Frame) {
        let weeks = MAX_WEEK_ROWS;
        let rule: String = "─".repeat(usize::from(pane.width));
        for column in 1..DAYS_IN_WEEK {
            let x = pane.x + column * cell.width - 1;
            for row in 0..weeks * cell.height {
                frame.push(layer, 2 + row, x, "│", Role::CalendarBorder);
            }
        }
        for week in 1..=weeks {
            frame.push(layer, week * cell.height + 1, pane.x, rule.clone(), Role::CalendarBorder);
        }
        for column in 1..DAYS_IN_WEEK {
            let x = pane.x + column * cell.width - 1;
            for week in 1..weeks {
                frame.push(layer, week * cell.height + 1, x, "┼", Role::CalendarBorder);
            }
            frame.push(layer, weeks * cell.height + 1, x, "┴", Role::CalendarBorder);
        }
    }

    fn daily(
        &self,
        state: &ScreenState,
        data: &Collections<'_>,
        pane: Pane,
        layer: Layer,
        frame: &mut Frame,
    ) {
        let focused = state.focused;
        let mut title = format!(
            "{} {}, {}",
            month_name(self.config.calendar, focused.month()).to_uppercase(),
            focused.day(),
            focused.year()
        );
        if focused == state.today {
            title = format!("{} {}", title, self.config.icons.today);
        }
        self.header(pane, &title, self.title_role(state, layer), true, layer, frame);
        if layer == Layer::Active {
            frame.rendered_days.push(focused);
        }

        let layout = CellLayout {
            rows: usize::from(state.rows().saturating_sub(3)),
            width: usize::from(pane.width),
            icon_only: cell_size(state.rows(), pane.width).icon_only(),
            daily: true,
        };
        let composed = compose_cell(
            focused,
            &self.sources(focused, data),
            layout,
            &self.options(state, layer),
            0,
        );
        self.cell_rows(&composed.rows, pane.x, 2, layer, frame);
        if layer == Layer::Active {
            frame.selection.extend(composed.targets);
        }
    }

    fn journal(
        &self,
        state: &ScreenState,
        data: &Collections<'_>,
        pane: Pane,
        layer: Layer,
        frame: &mut Frame,
    ) {
        let role = if state.active_pane() && layer == Layer::Active {
            Role::ActivePane
        } else {
            Role::Title
        };
        self.header(pane, &self.config.journal_header, role, !state.split(), layer, frame);

        let budget = usize::from(state.rows().saturating_sub(3));
        let (rows, targets) = compose_journal(
            data.tasks,
            &self.options(state, layer),
            usize::from(pane.width),
            self.now.with_timezone(&Utc),
        );
        for (i, journal_row) in rows.iter().take(budget).enumerate() {
            let row = &journal_row.row;
            let y = 2 + i as u16;
            let x = pane.x + row.indent;
            frame.push(layer, y, x, row.text.clone(), row.role);
            if let Some((timer, role)) = &journal_row.timer {
                let after = x + row.text.width() as u16 + 1;
                frame.push(layer, y, after, timer.clone(), *role);
            }
        }
        if layer == Layer::Active {
            frame.selection.extend(targets.into_iter().take(budget));
        }
    }

    fn help(&self, state: &ScreenState, frame: &mut Frame) {
        let (rows, cols) = (state.rows(), state.cols());
        if !can_render(rows, cols) {
            return;
        }
        let wide = cols >= 102;
        let general = KEYS_GENERAL.len() as u16;
        let calendar = KEYS_CALENDAR.len() as u16;
        let (left, shift_x, shift_y) = if wide {
            ((cols - 102) / 2, 45, 2)
        } else {
            (0, 0, 6 + general + calendar)
        };
        let top = if wide && rows > 20 { (rows - 20) / 2 } else { 0 };

        let layer = Layer::Help;
        let version = format!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
        frame.push(layer, top, left + 1, version, Role::ActivePane);
        frame.push(layer, top + 2, left + 8, TITLE_KEYS_GENERAL, Role::Title);
        for (i, (key, text)) in KEYS_GENERAL.iter().enumerate() {
            frame.push(layer, top + 3 + i as u16, left, format!("{}{}", key, text), Role::Todo);
        }
        frame.push(layer, top + 4 + general, left + 8, TITLE_KEYS_CALENDAR, Role::Title);
        for (i, (key, text)) in KEYS_CALENDAR.iter().enumerate() {
            frame.push(
                layer,
                top + 5 + general + i as u16,
                left,
                format!("{}{}", key, text),
                Role::Todo,
            );
        }

        let (x, y) = (left + shift_x, top + shift_y);
        frame.push(layer, y, x + 8, TITLE_KEYS_JOURNAL, Role::Title);
        for (i, (key, text)) in KEYS_JOURNAL.iter().enumerate() {
            frame.push(layer, y + 1 + i as u16, x, format!("{}{}", key, text), Role::Todo);
        }
        frame.push(layer, y + 2 + KEYS_JOURNAL.len() as u16, x + 8, MSG_INFO, Role::ActivePane);
    }

    fn separator(&self, state: &ScreenState, frame: &mut Frame) {
        let Some(x) = state.separator_column() else {
            return;
        };
        let borders = self.config.show_calendar_borders;
        let cell = cell_size(state.rows(), state.calendar_pane().width);
        let height = if borders {
            MAX_WEEK_ROWS * cell.height + 2
        } else {
            state.rows()
        };
        let glyph = self.config.icons.separator.as_str();
        for row in 0..height {
            frame.push(Layer::Separator, row, x, glyph, Role::Separator);
        }
        if borders && state.calendar_screen() == Screen::CalendarMonthly {
            for week in 1..=MAX_WEEK_ROWS {
                let junction = if week == MAX_WEEK_ROWS { "┘" } else { "┤" };
                frame.push(
                    Layer::Separator,
                    week * cell.height + 1,
                    x,
                    junction,
                    Role::CalendarBorder,
                );
            }
        }
    }

    fn footer(&self, state: &ScreenState, frame: &mut Frame) {
        if !self.config.show_keybindings || state.rows() == 0 {
            return;
        }
        let hint = match state.screen() {
            Screen::CalendarMonthly => CALENDAR_HINT,
            Screen::CalendarDaily => CALENDAR_HINT_DAILY,
            Screen::Journal => JOURNAL_HINT,
            Screen::Help | Screen::Exit => return,
        };
        frame.push(Layer::Footer, state.rows() - 1, 0, hint, Role::Hints);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::CalendarSystem;
    use crate::model::{Event, Task};

    fn day(d: u32) -> Date {
        Date::new(CalendarSystem::Gregorian, 2024, 2, d).unwrap()
    }

    fn now() -> DateTime<Local> {
        Local::now()
    }

    struct Data {
        events: EventCollection,
        holidays: EventCollection,
        birthdays: EventCollection,
        tasks: TaskCollection,
    }

    impl Data {
        fn new(events: Vec<Event>, tasks: Vec<Task>) -> Self {
            Data {
                events: EventCollection::from_items(CalendarSystem::Gregorian, events),
                holidays: EventCollection::new(CalendarSystem::Gregorian),
                birthdays: EventCollection::new(CalendarSystem::Gregorian),
                tasks: TaskCollection::from_items(tasks),
            }
        }

        fn view(&self) -> Collections<'_> {
            Collections {
                events: &self.events,
                holidays: &self.holidays,
                birthdays: &self.birthdays,
                tasks: &self.tasks,
            }
        }
    }

    fn state(config: &Config, rows: u16, cols: u16) -> ScreenState {
        ScreenState::new(config, day(14), rows, cols)
    }

    #[test]
    fn split_journal_renders_background_first() {
        let config = Config {
            split_screen: true,
            ..Config::default()
        };
        let mut s = state(&config, 30, 100);
        s.request(Screen::Journal).unwrap();
        let data = Data::new(vec![Event::new("lunch", day(14))], vec![Task::new("write")]);
        let frame = Renderer::new(&config, now()).render(&s, &data.view());

        let mut layers: Vec<Layer> = frame.commands.iter().map(|c| c.layer).collect();
        layers.dedup();
        assert_eq!(
            layers,
            vec![Layer::Background, Layer::Active, Layer::Separator, Layer::Footer]
        );
        // Only the journal is numbered.
        assert!(frame.selection.iter().all(|t| t.date.is_none()));
    }

    #[test]
    fn monthly_selection_indices_are_contiguous() {
        let config = Config::default();
        let mut s = state(&config, 30, 100);
        s.set_selection_mode(true);
        let events = vec![
            Event::new("a", day(1)),
            Event::new("b", day(1)),
            Event::new("c", day(14)),
            Event::new("d", day(29)),
        ];
        let data = Data::new(events, Vec::new());
        let frame = Renderer::new(&config, now()).render(&s, &data.view());
        let indices: Vec<usize> = frame.selection.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
        assert_eq!(frame.rendered_days.len(), 29);
        assert_eq!(frame.find_target(3).and_then(|t| t.date), Some(day(14)));
    }

    #[test]
    fn degenerate_size_draws_nothing_for_the_screen() {
        let config = Config::default();
        let s = state(&config, 2, 5);
        let data = Data::new(Vec::new(), Vec::new());
        let frame = Renderer::new(&config, now()).render(&s, &data.view());
        assert!(frame.commands.iter().all(|c| c.layer == Layer::Footer));
    }

    #[test]
    fn exit_renders_empty_frame() {
        let config = Config::default();
        let mut s = state(&config, 30, 100);
        s.request(Screen::Exit).unwrap();
        let data = Data::new(Vec::new(), Vec::new());
        assert_eq!(
            Renderer::new(&config, now()).render(&s, &data.view()),
            Frame::default()
        );
    }

    #[test]
    fn weather_is_dropped_when_it_does_not_fit() {
        let config = Config {
            show_weather: true,
            weather: Some("Sunny +21°C with a light breeze from the west".into()),
            ..Config::default()
        };
        let data = Data::new(Vec::new(), Vec::new());
        let narrow = state(&config, 30, 40);
        let frame = Renderer::new(&config, now()).render(&narrow, &data.view());
        assert!(!frame.commands.iter().any(|c| c.role == Role::Weather));

        let wide = state(&config, 30, 120);
        let frame = Renderer::new(&config, now()).render(&wide, &data.view());
        let weather = frame.commands.iter().find(|c| c.role == Role::Weather).unwrap();
        assert_eq!(
            usize::from(weather.col) + weather.text.width(),
            119
        );
    }

    #[test]
    fn day_names_shorten_on_narrow_terminals() {
        let config = Config::default();
        let data = Data::new(Vec::new(), Vec::new());
        let frame = Renderer::new(&config, now()).render(&state(&config, 30, 70), &data.view());
        let names: Vec<&str> = frame
            .commands
            .iter()
            .filter(|c| c.row == 1)
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(names, vec!["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]);
        let weekend = frame.commands.iter().find(|c| c.text == "Su").unwrap();
        assert_eq!(weekend.role, Role::WeekendNames);
    }

    #[test]
    fn split_day_names_fit_the_calendar_cells() {
        let config = Config {
            split_screen: true,
            ..Config::default()
        };
        let data = Data::new(Vec::new(), Vec::new());
        let s = state(&config, 30, 80);
        let cell = cell_size(s.rows(), s.calendar_pane().width);
        let frame = Renderer::new(&config, now()).render(&s, &data.view());
        let names: Vec<&DrawCommand> = frame
            .commands
            .iter()
            .filter(|c| c.row == 1 && c.layer == Layer::Active)
            .collect();
        assert_eq!(names.len(), 7);
        assert!(names.iter().all(|c| c.text.width() < usize::from(cell.width)));
        assert_eq!(names[2].text, "We");
    }

    #[test]
    fn wide_icons_stay_inside_their_cell() {
        let config = Config {
            cut_titles: true,
            ..Config::default()
        };
        let data = Data::new(vec![Event::new("Team meeting", day(14))], Vec::new());
        let s = state(&config, 30, 100);
        let cell = cell_size(s.rows(), s.cols());
        let frame = Renderer::new(&config, now()).render(&s, &data.view());
        let row = frame.commands.iter().find(|c| c.text.contains("Team")).unwrap();
        assert_eq!(row.text, "👥 Team meeti");
        assert_eq!(row.text.width(), usize::from(cell.width - 1));
    }

    #[test]
    fn narrow_daily_view_shows_icons_only() {
        let config = Config::default();
        let data = Data::new(vec![Event::new("Team meeting", day(14))], Vec::new());
        let mut s = state(&config, 30, 40);
        s.toggle_monthly_daily().unwrap();
        let frame = Renderer::new(&config, now()).render(&s, &data.view());
        assert!(frame.commands.iter().any(|c| c.row == 2 && c.text.trim_end() == "👥"));

        s.resize(30, 60);
        let frame = Renderer::new(&config, now()).render(&s, &data.view());
        assert!(frame.commands.iter().any(|c| c.text.starts_with("👥 Team meeting")));
    }

    #[test]
    fn today_is_marked_in_grid() {
        let config = Config::default();
        let data = Data::new(Vec::new(), Vec::new());
        let frame = Renderer::new(&config, now()).render(&state(&config, 30, 100), &data.view());
        let today = frame.commands.iter().find(|c| c.role == Role::Today).unwrap();
        assert!(today.text.starts_with("14•"));
    }

    #[test]
    fn separator_height_follows_borders() {
        let mut config = Config {
            split_screen: true,
            ..Config::default()
        };
        let data = Data::new(Vec::new(), Vec::new());
        let count = |config: &Config| {
            let frame = Renderer::new(config, now()).render(&state(config, 30, 100), &data.view());
            frame
                .commands
                .iter()
                .filter(|c| c.layer == Layer::Separator && c.role == Role::Separator)
                .count()
        };
        assert_eq!(count(&config), 30);
        config.show_calendar_borders = true;
        // 75-column calendar pane, 27 usable rows: cells are 4 high.
        assert_eq!(count(&config), 6 * 4 + 2);
    }

    #[test]
    fn daily_view_shows_placeholder_and_numbers() {
        let config = Config::default();
        let mut s = state(&config, 30, 100);
        s.toggle_monthly_daily().unwrap();
        let empty = Data::new(Vec::new(), Vec::new());
        let frame = Renderer::new(&config, now()).render(&s, &empty.view());
        assert!(frame
            .commands
            .iter()
            .any(|c| c.text == crate::text::MSG_NOTHING_PLANNED));

        s.set_selection_mode(true);
        let data = Data::new(vec![Event::new("dentist", day(14))], Vec::new());
        let frame = Renderer::new(&config, now()).render(&s, &data.view());
        assert_eq!(frame.selection.len(), 1);
        assert!(frame.commands.iter().any(|c| c.text.starts_with("1 • dentist")));
    }
}
