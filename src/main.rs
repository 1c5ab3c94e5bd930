mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let session = commands::Session::open(args.config, args.log_level)?;
    let command = args.command.unwrap_or(cli::Command::Tui);
    match command {
        cli::Command::Init => commands::init(&session),
        cli::Command::List { date } => commands::list(&session, date),
        cli::Command::AddEvent {
            name,
            date,
            repeat,
            every,
            count,
            until,
            private,
        } => commands::add_event(&session, name, date, repeat, every, count, until, private),
        cli::Command::AddTask { name, private } => commands::add_task(&session, name, private),
        cli::Command::Tui => commands::tui(&session),
    }
}
