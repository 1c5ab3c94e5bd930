use crate::date::{CalendarSystem, Date};
use crate::model::{Event, EventCollection, Task, TaskCollection};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

const TASKS_FILE: &str = "tasks.yml";
const EVENTS_FILE: &str = "events.yml";
const HOLIDAYS_FILE: &str = "holidays.yml";
const BIRTHDAYS_FILE: &str = "birthdays.yml";

/// Where tasks, events, holidays and birthdays come from.
pub trait DataSource {
    fn load_tasks(&self) -> Result<TaskCollection>;
    fn load_events(&self, system: CalendarSystem) -> Result<EventCollection>;
    /// Holidays between `from` and `to` inclusive. An empty `country` takes every entry.
    fn load_holidays(
        &self,
        from: &Date,
        to: &Date,
        country: &str,
        system: CalendarSystem,
    ) -> Result<EventCollection>;
    /// Birthdays placed on their dates for each Gregorian year in `years`.
    fn load_birthdays(&self, years: RangeInclusive<i32>, system: CalendarSystem)
        -> Result<EventCollection>;
    fn save_tasks(&self, tasks: &TaskCollection) -> Result<()>;
    fn save_events(&self, events: &EventCollection) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Holiday {
    name: String,
    date: Date,
    /// Blank applies everywhere.
    #[serde(default)]
    country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Birthday {
    name: String,
    month: u32,
    day: u32,
}

/// YAML files in one data directory.
#[derive(Debug, Clone)]
pub struct YamlStore {
    dir: PathBuf,
}

impl YamlStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        YamlStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        debug!("{:?} not found, starting empty", path);
        return Ok(Vec::new());
    }
    let data = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items = serde_yaml::from_str(&data).with_context(|| format!("parsing {:?}", path))?;
    Ok(items)
}

fn write_list<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let serialized = serde_yaml::to_string(items).context("serializing items")?;
    fs::write(path, serialized).with_context(|| format!("writing {:?}", path))?;
    Ok(())
}

impl DataSource for YamlStore {
    fn load_tasks(&self) -> Result<TaskCollection> {
        let tasks: Vec<Task> = read_list(&self.path(TASKS_FILE))?;
        info!("loaded {} tasks", tasks.len());
        Ok(TaskCollection::from_items(tasks))
    }

    fn load_events(&self, system: CalendarSystem) -> Result<EventCollection> {
        let events: Vec<Event> = read_list(&self.path(EVENTS_FILE))?;
        info!("loaded {} events", events.len());
        Ok(EventCollection::from_items(system, events))
    }

    fn load_holidays(
        &self,
        from: &Date,
        to: &Date,
        country: &str,
        system: CalendarSystem,
    ) -> Result<EventCollection> {
        let holidays: Vec<Holiday> = read_list(&self.path(HOLIDAYS_FILE))?;
        let events: Vec<Event> = holidays
            .into_iter()
            .filter(|h| &h.date >= from && &h.date <= to)
            .filter(|h| {
                country.is_empty() || h.country.is_empty() || h.country.eq_ignore_ascii_case(country)
            })
            .map(|h| Event::new(h.name, h.date))
            .collect();
        debug!("{} holidays between {} and {}", events.len(), from, to);
        Ok(EventCollection::from_items(system, events))
    }

    fn load_birthdays(
        &self,
        years: RangeInclusive<i32>,
        system: CalendarSystem,
    ) -> Result<EventCollection> {
        let birthdays: Vec<Birthday> = read_list(&self.path(BIRTHDAYS_FILE))?;
        let mut events = Vec::new();
        for year in years {
            for birthday in &birthdays {
                match Date::new(CalendarSystem::Gregorian, year, birthday.month, birthday.day) {
                    Ok(date) => events.push(Event::new(birthday.name.clone(), date)),
                    Err(err) => debug!("no birthday for {} in {}: {}", birthday.name, year, err),
                }
            }
        }
        debug!("placed {} birthdays", events.len());
        Ok(EventCollection::from_items(system, events))
    }

    fn save_tasks(&self, tasks: &TaskCollection) -> Result<()> {
        write_list(&self.path(TASKS_FILE), tasks.items())?;
        info!("saved {} tasks", tasks.len());
        Ok(())
    }

    fn save_events(&self, events: &EventCollection) -> Result<()> {
        write_list(&self.path(EVENTS_FILE), events.items())?;
        info!("saved {} events", events.len());
        Ok(())
    }
}
