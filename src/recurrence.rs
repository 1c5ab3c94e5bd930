//! Recurring events.
//!
//! A rule repeats its event's own date every `interval` days, weeks,
//! months or years, optionally stopping at an `until` date or after
//! `count` occurrences (the base date is occurrence 1). Rules that cannot
//! be evaluated never produce extra occurrences.

use crate::date::{CalendarSystem, Date};
use crate::model::{Event, EventCollection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

fn default_interval() -> u32 {
    1
}

impl Recurrence {
    pub fn new(frequency: Frequency) -> Self {
        Recurrence {
            frequency,
            interval: 1,
            until: None,
            count: None,
        }
    }

    pub fn every(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    pub fn until(mut self, until: Date) -> Self {
        self.until = Some(until);
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Whether a rule anchored at `start` lands on `target`, evaluated in
    /// `system`.
    pub fn occurs_on(&self, start: &Date, target: &Date, system: CalendarSystem) -> bool {
        let (Ok(start), Ok(target)) = (start.with_system(system), target.with_system(system))
        else {
            return false;
        };
        if target < start || self.interval == 0 {
            return false;
        }
        if self.until.is_some_and(|until| target > until) {
            return false;
        }
        let interval = i64::from(self.interval);
        let period = match self.frequency {
            Frequency::Daily => {
                let days = start.days_until(&target);
                (days % interval == 0).then_some(days / interval)
            }
            Frequency::Weekly => {
                let days = start.days_until(&target);
                (days % (7 * interval) == 0).then_some(days / (7 * interval))
            }
            Frequency::Monthly => {
                let months = start.months_until(&target);
                (target.day() == start.day() && months % interval == 0)
                    .then_some(months / interval)
            }
            Frequency::Yearly => {
                let years = i64::from(target.year() - start.year());
                (target.month() == start.month()
                    && target.day() == start.day()
                    && years % interval == 0)
                    .then_some(years / interval)
            }
            Frequency::Unknown => None,
        };
        match (period, self.count) {
            (None, _) => false,
            (Some(n), Some(count)) => n < i64::from(count),
            (Some(_), None) => true,
        }
    }
}

/// Derives the repeated occurrences of a collection's events.
pub struct RecurrenceExpander<'a> {
    events: &'a EventCollection,
}

impl<'a> RecurrenceExpander<'a> {
    pub fn new(events: &'a EventCollection) -> Self {
        RecurrenceExpander { events }
    }

    /// Recurring events repeating onto `date`, excluding their base date
    /// (those appear as plain events). Lazy and recomputed per call.
    pub fn on(&self, date: Date) -> impl Iterator<Item = (usize, &'a Event)> + 'a {
        let events = self.events;
        let system = events.system();
        events
            .items()
            .iter()
            .enumerate()
            .filter(move |(_, event)| {
                event.date != date
                    && event
                        .recurrence
                        .as_ref()
                        .is_some_and(|rule| rule.occurs_on(&event.date, &date, system))
            })
    }
}

impl EventCollection {
    /// Events on `date`, literal or by recurrence, in collection order.
    pub fn filter_events_that_day(&self, date: Date) -> impl Iterator<Item = (usize, &Event)> + '_ {
        let system = self.system();
        self.items().iter().enumerate().filter(move |(_, event)| {
            event.date == date
                || event
                    .recurrence
                    .as_ref()
                    .is_some_and(|rule| rule.occurs_on(&event.date, &date, system))
        })
    }
}
