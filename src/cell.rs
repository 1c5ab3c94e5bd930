//! Composition of a single day cell.
//!
//! Items from four sources are merged in a fixed order (user events,
//! recurring events, holidays, birthdays) and cut to the cell's row budget.
//! When items do not fit, the last visible row becomes an overflow
//! indicator. Selection numbers are threaded from cell to cell through an
//! explicit offset.

use crate::config::{Config, IconRule, Icons, IndexPolicy};
use crate::date::Date;
use crate::model::{Event, EventCollection, Status};
use crate::recurrence::RecurrenceExpander;
use crate::style::Role;
use crate::text::MSG_NOTHING_PLANNED;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    UserEvent,
    RecurringEvent,
    Holiday,
    Birthday,
    Task,
}

impl Source {
    pub fn selectable(self) -> bool {
        matches!(self, Source::UserEvent | Source::RecurringEvent | Source::Task)
    }
}

/// A number shown in selection mode and the item it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTarget {
    pub index: usize,
    pub source: Source,
    /// Position of the item in its collection.
    pub position: usize,
    pub date: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRow {
    pub text: String,
    pub role: Role,
    pub indent: u16,
    pub selection: Option<usize>,
    pub overflow: bool,
}

/// Items of each source that fall on one date.
#[derive(Debug, Default)]
pub struct CellSources<'a> {
    pub user: Vec<(usize, &'a Event)>,
    pub recurring: Vec<(usize, &'a Event)>,
    pub holidays: Vec<(usize, &'a Event)>,
    pub birthdays: Vec<(usize, &'a Event)>,
}

impl<'a> CellSources<'a> {
    /// Filters every collection to `date`. Disabled sources are `None`.
    pub fn gather(
        date: Date,
        events: &'a EventCollection,
        holidays: Option<&'a EventCollection>,
        birthdays: Option<&'a EventCollection>,
    ) -> Self {
        CellSources {
            user: events.literal_on(date).collect(),
            recurring: RecurrenceExpander::new(events).on(date).collect(),
            holidays: holidays
                .map(|h| h.filter_events_that_day(date).collect())
                .unwrap_or_default(),
            birthdays: birthdays
                .map(|b| b.filter_events_that_day(date).collect())
                .unwrap_or_default(),
        }
    }

    fn entries(&self) -> impl Iterator<Item = (Source, usize, &'a Event)> + '_ {
        tagged(Source::UserEvent, &self.user)
            .chain(tagged(Source::RecurringEvent, &self.recurring))
            .chain(tagged(Source::Holiday, &self.holidays))
            .chain(tagged(Source::Birthday, &self.birthdays))
    }

    pub fn len(&self) -> usize {
        self.user.len() + self.recurring.len() + self.holidays.len() + self.birthdays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn selectable_count(&self) -> usize {
        self.user.len() + self.recurring.len()
    }
}

fn tagged<'s, 'a: 's>(
    source: Source,
    items: &'s [(usize, &'a Event)],
) -> impl Iterator<Item = (Source, usize, &'a Event)> + 's {
    items.iter().map(move |&(pos, event)| (source, pos, event))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLayout {
    /// Rows available for items.
    pub rows: usize,
    pub width: usize,
    pub icon_only: bool,
    pub daily: bool,
}

/// Per-frame switches shared by every cell.
#[derive(Debug, Clone, Copy)]
pub struct ComposeOptions<'a> {
    pub icons: &'a Icons,
    pub icon_rules: &'a [IconRule],
    pub display_icons: bool,
    pub selection_mode: bool,
    pub privacy: bool,
    pub show_nothing_planned: bool,
    pub index_policy: IndexPolicy,
}

impl<'a> ComposeOptions<'a> {
    pub fn new(config: &'a Config, selection_mode: bool, privacy: bool) -> Self {
        ComposeOptions {
            icons: &config.icons,
            icon_rules: &config.icon_rules,
            display_icons: config.display_icons,
            selection_mode,
            privacy,
            show_nothing_planned: config.show_nothing_planned,
            index_policy: config.selection_indices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedCell {
    pub rows: Vec<CellRow>,
    /// Offset to hand to the next cell.
    pub next_offset: usize,
    pub targets: Vec<SelectionTarget>,
}

pub fn compose_cell(
    date: Date,
    sources: &CellSources<'_>,
    layout: CellLayout,
    opts: &ComposeOptions<'_>,
    index_offset: usize,
) -> ComposedCell {
    let total = sources.len();
    let mut rows = Vec::new();
    let mut targets = Vec::new();

    for (i, (source, position, event)) in sources.entries().enumerate() {
        if rows.len() == layout.rows {
            break;
        }
        if rows.len() + 1 == layout.rows && i + 1 < total {
            rows.push(CellRow {
                text: fit(&opts.icons.hidden, layout.width, true),
                role: source_role(source, event.status),
                indent: 0,
                selection: None,
                overflow: true,
            });
            break;
        }
        let selection = if source.selectable() {
            let index = index_offset + targets.len() + 1;
            targets.push(SelectionTarget {
                index,
                source,
                position,
                date: Some(date),
            });
            Some(index)
        } else {
            None
        };
        let mut text = event_text(source, event, opts, layout.icon_only);
        if let (true, Some(index)) = (opts.selection_mode, selection) {
            text = format!("{} {}", index, text);
        }
        rows.push(CellRow {
            text: fit(&text, layout.width, true),
            role: source_role(source, event.status),
            indent: 0,
            selection,
            overflow: false,
        });
    }

    if total == 0 && layout.daily && opts.show_nothing_planned && layout.rows > 0 {
        rows.push(CellRow {
            text: fit(MSG_NOTHING_PLANNED, layout.width, false),
            role: Role::Unimportant,
            indent: 0,
            selection: None,
            overflow: false,
        });
    }

    let consumed = match opts.index_policy {
        IndexPolicy::VisibleOnly => targets.len(),
        IndexPolicy::CountHidden => sources.selectable_count(),
    };
    ComposedCell {
        rows,
        next_offset: index_offset + consumed,
        targets,
    }
}

fn source_role(source: Source, status: Status) -> Role {
    match source {
        Source::Holiday => Role::Holidays,
        Source::Birthday => Role::Birthdays,
        _ => match status {
            Status::Important => Role::Important,
            Status::Unimportant => Role::Unimportant,
            Status::Done => Role::Done,
            Status::None => Role::Events,
        },
    }
}

fn event_text(source: Source, event: &Event, opts: &ComposeOptions<'_>, icon_only: bool) -> String {
    let icons = opts.icons;
    let masked = match source {
        Source::Holiday => false,
        Source::Birthday => opts.privacy,
        _ => opts.privacy || event.privacy,
    };
    let icon = match source {
        Source::Holiday => icons.holiday.as_str(),
        Source::Birthday => icons.birthday.as_str(),
        _ if opts.display_icons && !masked => {
            icon_for(&event.name, opts.icon_rules, &icons.event)
        }
        _ => icons.event.as_str(),
    };
    if icon_only {
        icon.to_string()
    } else if masked {
        format!("{} {}", icon, mask(&event.name, &icons.privacy))
    } else {
        format!("{} {}", icon, event.name)
    }
}

/// First rule whose keyword occurs in `name`, case-insensitively.
pub fn icon_for<'a>(name: &str, rules: &'a [IconRule], default: &'a str) -> &'a str {
    let lowered = name.to_lowercase();
    rules
        .iter()
        .find(|rule| !rule.keyword.is_empty() && lowered.contains(&rule.keyword.to_lowercase()))
        .map(|rule| rule.icon.as_str())
        .unwrap_or(default)
}

/// Replaces every character of `name` with the privacy character.
pub fn mask(name: &str, privacy: &str) -> String {
    let ch = privacy.chars().next().unwrap_or('•');
    std::iter::repeat(ch).take(name.chars().count()).collect()
}

/// Cuts `text` to `width` terminal columns, right-padding when `pad` is set.
/// A wide character that would straddle the edge is dropped.
pub fn fit(text: &str, width: usize, pad: bool) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    if pad {
        out.extend(std::iter::repeat(' ').take(width - used));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::CalendarSystem;
    use crate::recurrence::{Frequency, Recurrence};
    use unicode_width::UnicodeWidthStr;

    fn day() -> Date {
        Date::new(CalendarSystem::Gregorian, 2024, 5, 14).unwrap()
    }

    fn collection(names: &[&str]) -> EventCollection {
        EventCollection::from_items(
            CalendarSystem::Gregorian,
            names.iter().map(|n| Event::new(*n, day())).collect(),
        )
    }

    fn layout(rows: usize) -> CellLayout {
        CellLayout {
            rows,
            width: 12,
            icon_only: false,
            daily: false,
        }
    }

    fn options(config: &Config, selection_mode: bool) -> ComposeOptions<'_> {
        ComposeOptions::new(config, selection_mode, false)
    }

    #[test]
    fn five_events_in_three_rows_show_two_and_overflow() {
        let config = Config::default();
        let events = collection(&["e1", "e2", "e3", "e4", "e5"]);
        let sources = CellSources::gather(day(), &events, None, None);
        let cell = compose_cell(day(), &sources, layout(3), &options(&config, true), 10);

        assert_eq!(cell.rows.len(), 3);
        assert_eq!(cell.rows[0].selection, Some(11));
        assert_eq!(cell.rows[1].selection, Some(12));
        assert!(cell.rows[0].text.starts_with("11 • e1"));
        assert!(cell.rows[2].overflow);
        assert!(cell.rows[2].text.starts_with(&config.icons.hidden));
        assert_eq!(cell.rows[2].text.chars().count(), 12);
        assert_eq!(cell.next_offset, 12);
    }

    #[test]
    fn hidden_items_consume_numbers_when_configured() {
        let mut config = Config::default();
        config.selection_indices = IndexPolicy::CountHidden;
        let events = collection(&["e1", "e2", "e3", "e4", "e5"]);
        let sources = CellSources::gather(day(), &events, None, None);
        let cell = compose_cell(day(), &sources, layout(3), &options(&config, true), 10);
        assert_eq!(cell.targets.len(), 2);
        assert_eq!(cell.next_offset, 15);
    }

    #[test]
    fn exact_fit_needs_no_indicator() {
        let config = Config::default();
        let events = collection(&["e1", "e2", "e3"]);
        let sources = CellSources::gather(day(), &events, None, None);
        let cell = compose_cell(day(), &sources, layout(3), &options(&config, false), 0);
        assert_eq!(cell.rows.len(), 3);
        assert!(cell.rows.iter().all(|r| !r.overflow));
        assert!(cell.rows[0].text.starts_with("• e1"));
    }

    #[test]
    fn priority_order_and_unselectable_sources() {
        let config = Config::default();
        let mut weekly = Event::new("standup", day().add_days(-7).unwrap());
        weekly.recurrence = Some(Recurrence::new(Frequency::Weekly));
        let events = EventCollection::from_items(
            CalendarSystem::Gregorian,
            vec![weekly, Event::new("lunch", day())],
        );
        let holidays = collection(&["Fest"]);
        let birthdays = collection(&["Ann"]);
        let sources = CellSources::gather(day(), &events, Some(&holidays), Some(&birthdays));
        let cell = compose_cell(day(), &sources, layout(6), &options(&config, true), 0);

        let roles: Vec<_> = cell.rows.iter().map(|r| r.role).collect();
        assert_eq!(
            roles,
            vec![Role::Events, Role::Events, Role::Holidays, Role::Birthdays]
        );
        assert!(cell.rows[0].text.contains("lunch"));
        assert!(cell.rows[1].text.contains("standup"));
        assert_eq!(cell.rows[2].selection, None);
        assert_eq!(cell.rows[3].selection, None);
        assert_eq!(cell.targets[1].source, Source::RecurringEvent);
        assert_eq!(cell.targets[1].position, 0);
        assert_eq!(cell.next_offset, 2);
    }

    #[test]
    fn privacy_masks_with_same_length() {
        let config = Config::default();
        let mut events = collection(&["Therapy session"]);
        events.update(0, |e| e.privacy = true).unwrap();
        let sources = CellSources::gather(day(), &events, None, None);
        let wide = CellLayout {
            width: 40,
            ..layout(3)
        };
        let cell = compose_cell(day(), &sources, wide, &options(&config, false), 0);
        let text = cell.rows[0].text.trim_end();
        let payload: String = text.chars().skip(config.icons.event.chars().count() + 1).collect();
        assert_eq!(payload.chars().count(), "Therapy session".chars().count());
        assert!(payload.chars().all(|c| c == '•'));
    }

    #[test]
    fn narrow_cells_show_icons_only() {
        let config = Config::default();
        let events = collection(&["Team meeting"]);
        let sources = CellSources::gather(day(), &events, None, None);
        let narrow = CellLayout {
            width: 5,
            icon_only: true,
            ..layout(3)
        };
        let cell = compose_cell(day(), &sources, narrow, &options(&config, false), 0);
        assert_eq!(cell.rows[0].text.trim_end(), "👥");
    }

    #[test]
    fn wide_icons_count_two_columns() {
        let config = Config::default();
        let events = collection(&["Team meeting"]);
        let sources = CellSources::gather(day(), &events, None, None);
        let cell = compose_cell(day(), &sources, layout(3), &options(&config, false), 0);
        let text = &cell.rows[0].text;
        assert_eq!(text, "👥 Team meet");
        assert_eq!(UnicodeWidthStr::width(text.as_str()), 12);
    }

    #[test]
    fn fit_drops_a_wide_char_at_the_edge() {
        assert_eq!(fit("ab👥", 3, false), "ab");
        assert_eq!(fit("ab👥", 3, true), "ab ");
        assert_eq!(fit("ab👥", 4, true), "ab👥");
    }

    #[test]
    fn daily_empty_cell_shows_placeholder() {
        let config = Config::default();
        let events = collection(&[]);
        let sources = CellSources::gather(day(), &events, None, None);
        let daily = CellLayout {
            daily: true,
            width: 40,
            ..layout(10)
        };
        let cell = compose_cell(day(), &sources, daily, &options(&config, false), 0);
        assert_eq!(cell.rows.len(), 1);
        assert_eq!(cell.rows[0].text, MSG_NOTHING_PLANNED);
        let monthly = compose_cell(day(), &sources, layout(3), &options(&config, false), 0);
        assert!(monthly.rows.is_empty());
    }

    #[test]
    fn composing_twice_is_identical() {
        let config = Config::default();
        let events = collection(&["a", "b", "c", "d"]);
        let sources = CellSources::gather(day(), &events, None, None);
        let first = compose_cell(day(), &sources, layout(2), &options(&config, true), 3);
        let second = compose_cell(day(), &sources, layout(2), &options(&config, true), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn icon_lookup_takes_first_declared_match() {
        let rules = vec![
            IconRule {
                keyword: "call".into(),
                icon: "C".into(),
            },
            IconRule {
                keyword: "conference call".into(),
                icon: "X".into(),
            },
        ];
        assert_eq!(icon_for("Conference CALL", &rules, "•"), "C");
        assert_eq!(icon_for("lunch", &rules, "•"), "•");
    }
}
