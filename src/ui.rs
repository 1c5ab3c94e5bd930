use crate::commands::{Agenda, Session};
use anyhow::Result;
use calgrid::cell::{fit, SelectionTarget, Source};
use calgrid::date::Date;
use calgrid::model::{CollectionError, Event, Status, Task};
use calgrid::render::{Frame, Renderer};
use calgrid::screen::{Screen, ScreenState};
use calgrid::style::{Role, Theme};
use calgrid::terminal::{paint, BufferSurface, Surface};
use chrono::{Local, Utc};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{debug, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{stdout, Stdout};

pub fn run(session: &Session, agenda: Agenda, today: Date) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let size = terminal.size()?;
    let mut app = App::new(session, agenda, today, size.height, size.width);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

struct App<'s> {
    session: &'s Session,
    theme: Theme,
    agenda: Agenda,
    state: ScreenState,
    mode: Mode,
    status: String,
    /// Numbers shown by the last drawn frame.
    last_frame: Frame,
}

enum Mode {
    Normal,
    Selecting { action: Action, digits: String },
    Adding(FieldValue),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Action {
    Delete,
    Important,
    Done,
    Timer,
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Action::Delete => "Delete",
            Action::Important => "Toggle important",
            Action::Done => "Toggle done",
            Action::Timer => "Start/pause timer",
        }
    }
}

#[derive(Default)]
struct FieldValue {
    value: String,
    cursor: usize,
}

impl FieldValue {
    fn move_left(&mut self) {
        if let Some(ch) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
        }
    }

    fn move_right(&mut self) {
        if let Some(ch) = self.value[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let end = self.cursor;
        self.move_left();
        self.value.drain(self.cursor..end);
    }

    fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn with_caret(&self) -> String {
        let mut text = self.value.clone();
        text.insert(self.cursor, '▌');
        text
    }
}

impl<'s> App<'s> {
    fn new(session: &'s Session, agenda: Agenda, today: Date, rows: u16, cols: u16) -> Self {
        App {
            session,
            theme: Theme::from_config(&session.config),
            agenda,
            state: ScreenState::new(&session.config, today, rows, cols),
            mode: Mode::Normal,
            status: String::new(),
            last_frame: Frame::default(),
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while self.state.is_running() {
            let size = terminal.size()?;
            self.refresh(size.height, size.width)?;
            let frame = self.frame();
            terminal.draw(|f| self.draw(f, &frame))?;
            self.last_frame = frame;

            let timeout = self
                .state
                .input_timeout(&self.agenda.tasks, self.session.config.refresh_interval);
            if event::poll(timeout)? {
                if let TermEvent::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key)?;
                    }
                }
            }
            self.agenda.save_changed(&self.session.store)?;
        }
        Ok(())
    }

    fn refresh(&mut self, rows: u16, cols: u16) -> Result<()> {
        self.state.resize(rows, cols);
        self.state.today = Date::today(self.session.config.calendar)?;
        self.agenda.follow(self.session, &self.state.focused)?;
        Ok(())
    }

    fn frame(&self) -> Frame {
        Renderer::new(&self.session.config, Local::now()).render(&self.state, &self.agenda.view())
    }

    fn draw(&self, f: &mut ratatui::Frame<'_>, frame: &Frame) {
        let mut surface = BufferSurface::new(f.buffer_mut(), &self.theme);
        paint(frame, &mut surface);
        let (rows, cols) = surface.size();
        if let (Some(line), true) = (self.prompt_line(), rows > 0) {
            surface.write_styled_text(rows - 1, 0, &fit(&line, usize::from(cols), true), Role::Prompts);
        }
    }

    fn prompt_line(&self) -> Option<String> {
        match &self.mode {
            Mode::Adding(field) if self.state.screen() == Screen::Journal => {
                Some(format!(" New task: {}", field.with_caret()))
            }
            Mode::Adding(field) => Some(format!(
                " New event on {}: {}",
                self.state.focused,
                field.with_caret()
            )),
            Mode::Selecting { action, digits } => Some(format!(
                " {} number: {}▌  (Enter to confirm, Esc to cancel)",
                action.label(),
                digits
            )),
            Mode::Normal if !self.status.is_empty() => Some(format!(" {}", self.status)),
            Mode::Normal => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.state.request(Screen::Exit)?;
            return Ok(());
        }
        let mode = std::mem::replace(&mut self.mode, Mode::Normal);
        self.mode = match mode {
            Mode::Normal => {
                self.status.clear();
                self.handle_normal_key(key)?
            }
            Mode::Selecting { action, digits } => self.handle_selecting_key(key, action, digits),
            Mode::Adding(field) => self.handle_adding_key(key, field),
        };
        Ok(())
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<Mode> {
        if self.state.screen() == Screen::Help {
            match key.code {
                KeyCode::Char('q') => self.state.request(Screen::Exit)?,
                _ => self.state.close_help()?,
            }
            return Ok(Mode::Normal);
        }

        let journal = self.state.screen() == Screen::Journal;
        match key.code {
            KeyCode::Char('q') => self.state.request(Screen::Exit)?,
            KeyCode::Char('?') => self.state.request(Screen::Help)?,
            KeyCode::Char(' ') => self.state.toggle_calendar_journal()?,
            KeyCode::Char('v') => self.state.toggle_monthly_daily()?,
            KeyCode::Char('s') => {
                let split = !self.state.split();
                self.state.set_split(split);
            }
            KeyCode::Char('*') => self.state.toggle_privacy(),
            KeyCode::Char('n') | KeyCode::Right if !journal => self.step(true),
            KeyCode::Char('p') | KeyCode::Left if !journal => self.step(false),
            KeyCode::Char('g') if !journal => self.state.focus_today(),
            KeyCode::Char('a') if journal || self.focused_day_drawn() => {
                return Ok(Mode::Adding(FieldValue::default()))
            }
            KeyCode::Char('a') => self.status = "Enlarge the terminal to add events".into(),
            KeyCode::Char('x') => return Ok(self.start_selecting(Action::Delete)),
            KeyCode::Char('i') => return Ok(self.start_selecting(Action::Important)),
            KeyCode::Char('d') if journal => return Ok(self.start_selecting(Action::Done)),
            KeyCode::Char('t') if journal => return Ok(self.start_selecting(Action::Timer)),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    /// Whether the last frame showed the day a new event would land on.
    fn focused_day_drawn(&self) -> bool {
        self.last_frame.rendered_days.contains(&self.state.focused)
    }

    fn step(&mut self, forward: bool) {
        if let Err(err) = self.state.step(forward) {
            warn!("cannot move focus: {}", err);
            self.status = err.to_string();
        }
    }

    fn start_selecting(&mut self, action: Action) -> Mode {
        self.state.set_selection_mode(true);
        Mode::Selecting {
            action,
            digits: String::new(),
        }
    }

    fn handle_selecting_key(&mut self, key: KeyEvent, action: Action, mut digits: String) -> Mode {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => digits.push(c),
            KeyCode::Backspace => {
                digits.pop();
            }
            KeyCode::Enter => {
                self.state.set_selection_mode(false);
                self.apply_selected(action, &digits);
                return Mode::Normal;
            }
            KeyCode::Esc => {
                self.state.set_selection_mode(false);
                return Mode::Normal;
            }
            _ => {}
        }
        Mode::Selecting { action, digits }
    }

    fn apply_selected(&mut self, action: Action, digits: &str) {
        let target = digits
            .parse::<usize>()
            .ok()
            .and_then(|index| self.last_frame.find_target(index))
            .cloned();
        let Some(target) = target else {
            self.status = format!("No item numbered {:?}", digits);
            return;
        };
        debug!("{:?} on {:?}", action, target);
        if let Err(err) = self.apply(action, &target) {
            warn!("{:?} failed on {:?}: {}", action, target, err);
            self.status = err.to_string();
        }
    }

    fn apply(&mut self, action: Action, target: &SelectionTarget) -> Result<(), CollectionError> {
        let position = target.position;
        match target.source {
            Source::UserEvent | Source::RecurringEvent => {
                let events = &mut self.agenda.events;
                match action {
                    Action::Delete => {
                        let removed = events.remove(position)?;
                        self.status = format!("Deleted {:?}", removed.name);
                    }
                    Action::Important => events.update(position, |e: &mut Event| {
                        e.status = e.status.toggled(Status::Important)
                    })?,
                    Action::Done => events.update(position, |e: &mut Event| {
                        e.status = e.status.toggled(Status::Done)
                    })?,
                    Action::Timer => self.status = "Timers belong to tasks".into(),
                }
            }
            Source::Task => {
                let tasks = &mut self.agenda.tasks;
                match action {
                    Action::Delete => {
                        let removed = tasks.remove(position)?;
                        self.status = format!("Deleted {:?}", removed.name);
                    }
                    Action::Important => tasks.update(position, |t: &mut Task| {
                        t.status = t.status.toggled(Status::Important)
                    })?,
                    Action::Done => tasks.update(position, |t: &mut Task| {
                        t.status = t.status.toggled(Status::Done)
                    })?,
                    Action::Timer => {
                        let now = Utc::now();
                        tasks.update(position, |t: &mut Task| t.timer.toggle(now))?
                    }
                }
            }
            Source::Holiday | Source::Birthday => {}
        }
        Ok(())
    }

    fn handle_adding_key(&mut self, key: KeyEvent, mut field: FieldValue) -> Mode {
        match key.code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Enter => {
                let name = field.value.trim();
                if !name.is_empty() {
                    if self.state.screen() == Screen::Journal {
                        self.agenda.tasks.add(Task::new(name));
                    } else {
                        self.agenda.events.add(Event::new(name, self.state.focused));
                    }
                }
                return Mode::Normal;
            }
            KeyCode::Left => field.move_left(),
            KeyCode::Right => field.move_right(),
            KeyCode::Backspace => field.backspace(),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                field.insert_char(c)
            }
            _ => {}
        }
        Mode::Adding(field)
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
