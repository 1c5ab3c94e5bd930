//! User configuration, read from `config.yml`.

use crate::date::CalendarSystem;
use crate::style::Role;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    #[default]
    Monthly,
    Daily,
    Journal,
}

/// How hidden (truncated) items affect selection numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexPolicy {
    /// Only rendered rows receive numbers.
    #[default]
    VisibleOnly,
    /// Hidden items still consume numbers, so later cells skip them.
    CountHidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconRule {
    pub keyword: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Icons {
    pub todo: String,
    pub done: String,
    pub important: String,
    pub event: String,
    pub holiday: String,
    pub birthday: String,
    pub hidden: String,
    pub today: String,
    /// Masking character for private items.
    pub privacy: String,
    pub separator: String,
}

impl Default for Icons {
    fn default() -> Self {
        Icons {
            todo: "•".into(),
            done: "✔".into(),
            important: "‣".into(),
            event: "•".into(),
            holiday: "⛱".into(),
            birthday: "★".into(),
            hidden: "...".into(),
            today: "•".into(),
            privacy: "•".into(),
            separator: "│".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calendar: CalendarSystem,
    /// 1 = Sunday … 7 = Saturday.
    pub start_week_day: u8,
    /// Same numbering as `start_week_day`.
    pub weekend_days: Vec<u8>,
    pub default_view: DefaultView,
    pub split_screen: bool,
    pub right_pane_percentage: u16,
    pub privacy_mode: bool,
    pub display_icons: bool,
    pub icons: Icons,
    /// Checked in order; the first keyword found in a name wins.
    pub icon_rules: Vec<IconRule>,
    pub journal_header: String,
    pub show_weather: bool,
    pub weather: Option<String>,
    pub show_current_time: bool,
    pub show_keybindings: bool,
    pub show_calendar_borders: bool,
    pub show_nothing_planned: bool,
    pub cut_titles: bool,
    pub display_holidays: bool,
    pub display_birthdays: bool,
    pub holiday_country: String,
    pub colors: HashMap<Role, String>,
    pub bold: Vec<Role>,
    pub underlined: Vec<Role>,
    /// Seconds between redraws while a task timer runs.
    pub refresh_interval: u16,
    pub selection_indices: IndexPolicy,
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            calendar: CalendarSystem::Gregorian,
            start_week_day: 2,
            weekend_days: vec![1, 7],
            default_view: DefaultView::Monthly,
            split_screen: false,
            right_pane_percentage: 25,
            privacy_mode: false,
            display_icons: true,
            icons: Icons::default(),
            icon_rules: default_icon_rules(),
            journal_header: "JOURNAL".into(),
            show_weather: false,
            weather: None,
            show_current_time: false,
            show_keybindings: true,
            show_calendar_borders: false,
            show_nothing_planned: true,
            cut_titles: false,
            display_holidays: true,
            display_birthdays: true,
            holiday_country: String::new(),
            colors: HashMap::new(),
            bold: vec![Role::Title, Role::ActivePane, Role::Today, Role::DayNames],
            underlined: Vec::new(),
            refresh_interval: 1,
            selection_indices: IndexPolicy::VisibleOnly,
            data_dir: None,
            log_level: None,
        }
    }
}

fn default_icon_rules() -> Vec<IconRule> {
    [
        ("meeting", "👥"),
        ("call", "☎"),
        ("flight", "✈"),
        ("birthday", "★"),
        ("doctor", "✚"),
        ("gym", "⚒"),
    ]
    .into_iter()
    .map(|(keyword, icon)| IconRule {
        keyword: keyword.into(),
        icon: icon.into(),
    })
    .collect()
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "calgrid").context("locating config directory")
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.yml"))
}

impl Config {
    /// Loads `path`, or defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
        let config: Config = serde_yaml::from_str(&data).context("parsing config file")?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
        }
        let serialized = serde_yaml::to_string(self).context("serializing config")?;
        fs::write(path, serialized).with_context(|| format!("writing {:?}", path))?;
        Ok(())
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }
}
