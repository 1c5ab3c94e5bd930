//! Row composition for the task journal.

use crate::cell::{fit, icon_for, mask, CellRow, ComposeOptions, SelectionTarget, Source};
use crate::model::{Status, Task, TaskCollection};
use crate::style::Role;
use crate::text::MSG_NOTHING_PLANNED;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalRow {
    pub row: CellRow,
    /// Elapsed-time suffix drawn after the task text.
    pub timer: Option<(String, Role)>,
}

/// Subtask depth from leading dashes.
pub fn indent_of(name: &str) -> usize {
    if name.starts_with("----") {
        4
    } else if name.starts_with("--") {
        2
    } else {
        0
    }
}

fn task_role(status: Status) -> Role {
    match status {
        Status::Done => Role::Done,
        Status::Important => Role::Important,
        Status::Unimportant => Role::Unimportant,
        Status::None => Role::Todo,
    }
}

fn task_icon<'a>(task: &Task, opts: &ComposeOptions<'a>) -> &'a str {
    match task.status {
        Status::Done => opts.icons.done.as_str(),
        Status::Important => opts.icons.important.as_str(),
        _ if opts.display_icons => icon_for(&task.name, opts.icon_rules, &opts.icons.todo),
        _ => opts.icons.todo.as_str(),
    }
}

pub fn compose_journal(
    tasks: &TaskCollection,
    opts: &ComposeOptions<'_>,
    width: usize,
    now: DateTime<Utc>,
) -> (Vec<JournalRow>, Vec<SelectionTarget>) {
    if tasks.is_empty() {
        let rows = if opts.show_nothing_planned {
            vec![JournalRow {
                row: CellRow {
                    text: fit(MSG_NOTHING_PLANNED, width, false),
                    role: Role::Unimportant,
                    indent: 0,
                    selection: None,
                    overflow: false,
                },
                timer: None,
            }]
        } else {
            Vec::new()
        };
        return (rows, Vec::new());
    }

    let mut rows = Vec::with_capacity(tasks.len());
    let mut targets = Vec::with_capacity(tasks.len());
    for (position, task) in tasks.items().iter().enumerate() {
        let index = position + 1;
        targets.push(SelectionTarget {
            index,
            source: Source::Task,
            position,
            date: None,
        });
        let indent = indent_of(&task.name);
        let name: String = task.name.chars().skip(indent).collect();
        let mut text = if opts.privacy || task.privacy {
            format!("{} {}", opts.icons.todo, mask(&name, &opts.icons.privacy))
        } else {
            format!("{} {}", task_icon(task, opts), name)
        };
        if opts.selection_mode {
            text = format!("{} {}", index, text);
        }
        let timer = task.timer.started.then(|| {
            let icon = match (opts.display_icons, task.timer.counting) {
                (true, true) => "⏵ ",
                (true, false) => "⏯ ",
                (false, _) => "",
            };
            let role = if task.timer.counting {
                Role::Timer
            } else {
                Role::TimerPaused
            };
            (format!("{}{}", icon, task.timer.passed_time(now)), role)
        });
        rows.push(JournalRow {
            row: CellRow {
                text: fit(&text, width.saturating_sub(indent), false),
                role: task_role(task.status),
                indent: indent as u16,
                selection: Some(index),
                overflow: false,
            },
            timer,
        });
    }
    (rows, targets)
}
