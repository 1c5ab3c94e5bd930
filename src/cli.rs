use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "calgrid", version, about = "Terminal calendar and task journal")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the default config file if none exists
    Init,
    /// List events and tasks for a day
    List {
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Add an event
    AddEvent {
        /// Name of the event
        name: String,
        /// Day in YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Repeat the event
        #[arg(long, value_enum)]
        repeat: Option<Repeat>,
        /// Repeat every N days, weeks, months or years
        #[arg(long, default_value_t = 1, requires = "repeat")]
        every: u32,
        /// Stop after N occurrences, counting the first
        #[arg(long, requires = "repeat", conflicts_with = "until")]
        count: Option<u32>,
        /// Last day the event may repeat on (YYYY-MM-DD)
        #[arg(long, requires = "repeat")]
        until: Option<String>,
        /// Hide the name on screen
        #[arg(long)]
        private: bool,
    },
    /// Add a task to the journal
    AddTask {
        /// Task text; prefix with -- or ---- for subtasks
        name: String,
        /// Hide the text on screen
        #[arg(long)]
        private: bool,
    },
    /// Launch the interactive TUI
    Tui,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}
