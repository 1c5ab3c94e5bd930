use crate::cli::Repeat;
use crate::ui;
use anyhow::{Context, Result};
use calgrid::cell::CellSources;
use calgrid::config::{default_config_path, Config};
use calgrid::date::{CalendarSystem, Date};
use calgrid::logging::{default_log_level, init_logging, logging_status};
use calgrid::model::{Event, EventCollection, Status, Task, TaskCollection};
use calgrid::recurrence::{Frequency, Recurrence};
use calgrid::render::Collections;
use calgrid::storage::{DataSource, YamlStore};
use chrono::Datelike;
use log::{info, warn};
use std::path::PathBuf;

/// Config and data store shared by every command.
pub struct Session {
    pub config: Config,
    pub config_path: PathBuf,
    pub store: YamlStore,
}

impl Session {
    pub fn open(config_path: Option<PathBuf>, log_level: Option<String>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => default_config_path()?,
        };
        let config = Config::load(&config_path)?;
        let data_dir = config.data_dir()?;

        let level = log_level
            .or_else(|| config.log_level.clone())
            .unwrap_or_else(|| default_log_level().to_string());
        if let Err(err) = init_logging(&level, &data_dir.join("logs")) {
            eprintln!("warning: logging disabled: {}", err);
        }
        info!("config {:?}, data in {:?}", config_path, data_dir);

        Ok(Session {
            config,
            config_path,
            store: YamlStore::new(data_dir),
        })
    }

    fn system(&self) -> CalendarSystem {
        self.config.calendar
    }

    fn parse_date(&self, input: Option<&str>) -> Result<Date> {
        match input {
            Some(raw) => {
                Date::parse(self.system(), raw).with_context(|| format!("parsing date {:?}", raw))
            }
            None => Ok(Date::today(self.system())?),
        }
    }
}

/// Everything the calendar and journal show.
pub struct Agenda {
    pub events: EventCollection,
    pub holidays: EventCollection,
    pub birthdays: EventCollection,
    pub tasks: TaskCollection,
    /// Gregorian year the holiday and birthday window is centered on.
    window_year: i32,
}

impl Agenda {
    pub fn load(session: &Session, around: &Date) -> Result<Self> {
        let store = &session.store;
        let year = around.gregorian().year();
        let mut agenda = Agenda {
            events: store.load_events(session.system()).context("loading events")?,
            holidays: EventCollection::new(session.system()),
            birthdays: EventCollection::new(session.system()),
            tasks: store.load_tasks().context("loading tasks")?,
            window_year: year,
        };
        agenda.load_window(session, year)?;
        Ok(agenda)
    }

    fn load_window(&mut self, session: &Session, year: i32) -> Result<()> {
        let system = session.system();
        let from = Date::new(CalendarSystem::Gregorian, year - 1, 1, 1)?;
        let to = Date::new(CalendarSystem::Gregorian, year + 1, 12, 31)?;
        self.holidays = session
            .store
            .load_holidays(&from, &to, &session.config.holiday_country, system)
            .context("loading holidays")?;
        self.birthdays = session
            .store
            .load_birthdays(year - 1..=year + 1, system)
            .context("loading birthdays")?;
        self.window_year = year;
        Ok(())
    }

    /// Reloads holidays and birthdays once `focused` leaves the loaded years.
    pub fn follow(&mut self, session: &Session, focused: &Date) -> Result<()> {
        let year = focused.gregorian().year();
        if year != self.window_year {
            self.load_window(session, year)?;
        }
        Ok(())
    }

    pub fn view(&self) -> Collections<'_> {
        Collections {
            events: &self.events,
            holidays: &self.holidays,
            birthdays: &self.birthdays,
            tasks: &self.tasks,
        }
    }

    /// Writes collections whose `changed` flag is set, then clears it.
    pub fn save_changed(&mut self, store: &impl DataSource) -> Result<()> {
        if self.events.changed() {
            store.save_events(&self.events).context("saving events")?;
            self.events.clear_changed();
        }
        if self.tasks.changed() {
            store.save_tasks(&self.tasks).context("saving tasks")?;
            self.tasks.clear_changed();
        }
        Ok(())
    }
}

pub fn init(session: &Session) -> Result<()> {
    if session.config_path.exists() {
        println!("Config already at {}", session.config_path.display());
    } else {
        session.config.save(&session.config_path)?;
        println!("Wrote default config to {}", session.config_path.display());
    }
    println!("Data directory: {}", session.store.dir().display());
    match logging_status() {
        Some((level, dir)) => println!("Logging at {} to {}", level, dir.display()),
        None => println!("Logging is off"),
    }
    Ok(())
}

pub fn list(session: &Session, date: Option<String>) -> Result<()> {
    let date = session.parse_date(date.as_deref())?;
    let agenda = Agenda::load(session, &date)?;
    let config = &session.config;
    let sources = CellSources::gather(
        date,
        &agenda.events,
        config.display_holidays.then_some(&agenda.holidays),
        config.display_birthdays.then_some(&agenda.birthdays),
    );

    println!("{}", date);
    if sources.is_empty() {
        println!("  (nothing planned)");
    }
    for (_, event) in sources.user.iter().chain(&sources.recurring) {
        println!("  {} {}{}", config.icons.event, event.name, status_suffix(event.status));
    }
    for (_, holiday) in &sources.holidays {
        println!("  {} {}", config.icons.holiday, holiday.name);
    }
    for (_, birthday) in &sources.birthdays {
        println!("  {} {}", config.icons.birthday, birthday.name);
    }

    if !agenda.tasks.is_empty() {
        println!();
        println!("{}", config.journal_header);
        for (i, task) in agenda.tasks.items().iter().enumerate() {
            println!("  {}. {}{}", i + 1, task.name, status_suffix(task.status));
        }
    }
    Ok(())
}

fn status_suffix(status: Status) -> &'static str {
    match status {
        Status::None => "",
        Status::Done => " (done)",
        Status::Important => " (important)",
        Status::Unimportant => " (unimportant)",
    }
}

#[allow(clippy::too_many_arguments)]
pub fn add_event(
    session: &Session,
    name: String,
    date: Option<String>,
    repeat: Option<Repeat>,
    every: u32,
    count: Option<u32>,
    until: Option<String>,
    private: bool,
) -> Result<()> {
    let date = session.parse_date(date.as_deref())?;
    let mut event = Event::new(name, date);
    event.privacy = private;
    if let Some(repeat) = repeat {
        let frequency = match repeat {
            Repeat::Daily => Frequency::Daily,
            Repeat::Weekly => Frequency::Weekly,
            Repeat::Monthly => Frequency::Monthly,
            Repeat::Yearly => Frequency::Yearly,
        };
        let mut rule = Recurrence::new(frequency).every(every);
        if let Some(count) = count {
            rule = rule.count(count);
        }
        if let Some(until) = until.as_deref() {
            let until = Date::parse(session.system(), until)
                .with_context(|| format!("parsing --until {:?}", until))?;
            if until < date {
                warn!("--until {} is before the event date {}", until, date);
            }
            rule = rule.until(until);
        }
        event.recurrence = Some(rule);
    }

    let mut events = session.store.load_events(session.system())?;
    println!("Added {:?} on {}", event.name, date);
    events.add(event);
    session.store.save_events(&events)?;
    Ok(())
}

pub fn add_task(session: &Session, name: String, private: bool) -> Result<()> {
    let mut tasks = session.store.load_tasks()?;
    let mut task = Task::new(name);
    task.privacy = private;
    println!("Added task {:?}", task.name);
    tasks.add(task);
    session.store.save_tasks(&tasks)?;
    Ok(())
}

pub fn tui(session: &Session) -> Result<()> {
    let today = Date::today(session.system())?;
    let agenda = Agenda::load(session, &today)?;
    ui::run(session, agenda, today)
}
