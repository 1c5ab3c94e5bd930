use crate::date::{CalendarSystem, Date};
use crate::recurrence::Recurrence;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    None,
    Done,
    Important,
    Unimportant,
}

impl Status {
    /// Flips between `target` and `None`.
    pub fn toggled(self, target: Status) -> Status {
        if self == target {
            Status::None
        } else {
            target
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub counting: bool,
    /// Seconds accumulated before the current run.
    #[serde(default)]
    pub accumulated_secs: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resumed_at: Option<DateTime<Utc>>,
}

impl Timer {
    /// Starts, pauses or resumes the timer.
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        if self.counting {
            self.accumulated_secs = self.elapsed(now).num_seconds();
            self.counting = false;
            self.resumed_at = None;
        } else {
            self.started = true;
            self.counting = true;
            self.resumed_at = Some(now);
        }
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> ChronoDuration {
        let running = match (self.counting, self.resumed_at) {
            (true, Some(since)) => (now - since).max(ChronoDuration::zero()),
            _ => ChronoDuration::zero(),
        };
        ChronoDuration::seconds(self.accumulated_secs) + running
    }

    pub fn passed_time(&self, now: DateTime<Utc>) -> String {
        let secs = self.elapsed(now).num_seconds().max(0);
        let (hours, minutes, seconds) = (secs / 3600, secs / 60 % 60, secs % 60);
        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{:02}:{:02}", minutes, seconds)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub date: Date,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub privacy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

impl Event {
    pub fn new(name: impl Into<String>, date: Date) -> Self {
        Event {
            name: name.into(),
            date,
            status: Status::None,
            privacy: false,
            recurrence: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub privacy: bool,
    #[serde(default)]
    pub timer: Timer,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Task {
            name: name.into(),
            status: Status::None,
            privacy: false,
            timer: Timer::default(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CollectionError {
    #[error("no item at position {0}")]
    OutOfRange(usize),
}

/// Ordered events of one calendar system.
#[derive(Debug, Clone, Default)]
pub struct EventCollection {
    system: CalendarSystem,
    items: Vec<Event>,
    changed: bool,
}

impl EventCollection {
    pub fn new(system: CalendarSystem) -> Self {
        EventCollection {
            system,
            items: Vec::new(),
            changed: false,
        }
    }

    /// Builds a collection from loaded items, moving their dates into
    /// `system`. Items that cannot be expressed in `system` are dropped.
    pub fn from_items(system: CalendarSystem, items: Vec<Event>) -> Self {
        let items = items
            .into_iter()
            .filter_map(|mut event| match event.date.with_system(system) {
                Ok(date) => {
                    event.date = date;
                    Some(event)
                }
                Err(err) => {
                    warn!("dropping event {:?}: {}", event.name, err);
                    None
                }
            })
            .collect();
        EventCollection {
            system,
            items,
            changed: false,
        }
    }

    pub fn system(&self) -> CalendarSystem {
        self.system
    }

    pub fn items(&self) -> &[Event] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn clear_changed(&mut self) {
        self.changed = false;
    }

    pub fn add(&mut self, mut event: Event) {
        if let Ok(date) = event.date.with_system(self.system) {
            event.date = date;
        }
        self.items.push(event);
        self.changed = true;
    }

    pub fn remove(&mut self, position: usize) -> Result<Event, CollectionError> {
        if position >= self.items.len() {
            return Err(CollectionError::OutOfRange(position));
        }
        self.changed = true;
        Ok(self.items.remove(position))
    }

    pub fn update<F>(&mut self, position: usize, f: F) -> Result<(), CollectionError>
    where
        F: FnOnce(&mut Event),
    {
        let event = self
            .items
            .get_mut(position)
            .ok_or(CollectionError::OutOfRange(position))?;
        f(event);
        self.changed = true;
        Ok(())
    }

    /// Events stored on exactly `date`, in collection order.
    pub fn literal_on(&self, date: Date) -> impl Iterator<Item = (usize, &Event)> + '_ {
        self.items
            .iter()
            .enumerate()
            .filter(move |(_, event)| event.date == date)
    }
}

/// Ordered journal tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskCollection {
    items: Vec<Task>,
    changed: bool,
}

impl TaskCollection {
    pub fn from_items(items: Vec<Task>) -> Self {
        TaskCollection {
            items,
            changed: false,
        }
    }

    pub fn items(&self) -> &[Task] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn clear_changed(&mut self) {
        self.changed = false;
    }

    pub fn add(&mut self, task: Task) {
        self.items.push(task);
        self.changed = true;
    }

    pub fn remove(&mut self, position: usize) -> Result<Task, CollectionError> {
        if position >= self.items.len() {
            return Err(CollectionError::OutOfRange(position));
        }
        self.changed = true;
        Ok(self.items.remove(position))
    }

    pub fn update<F>(&mut self, position: usize, f: F) -> Result<(), CollectionError>
    where
        F: FnOnce(&mut Task),
    {
        let task = self
            .items
            .get_mut(position)
            .ok_or(CollectionError::OutOfRange(position))?;
        f(task);
        self.changed = true;
        Ok(())
    }

    pub fn any_timer_counting(&self) -> bool {
        self.items.iter().any(|t| t.timer.counting)
    }
}
