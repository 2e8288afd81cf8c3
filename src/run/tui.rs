use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use crate::ledger::Direction;
use crate::ui::app::{App, DetailOutcome, FormMode, InputMode, Screen};
use crate::ui::commands;
use crate::ui::screens::list;
use crate::worker::Worker;

/// How long to wait for a key before checking the worker for replies.
const TICK: Duration = Duration::from_millis(50);

pub(crate) fn as_tui(worker: &mut Worker) -> Result<()> {
    let mut app = App::new();
    app.reload(worker);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    tracing::info!("interactive session started");

    let result = run_app(&mut terminal, &mut app, worker);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    tracing::info!("interactive session ended");

    if let Err(ref e) = result {
        tracing::error!(error = ?e, "interactive session failed");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &mut Worker,
) -> Result<()> {
    while app.running {
        drain_replies(app, worker)?;

        terminal.draw(|f| {
            app.visible_rows = list::visible_rows(f.area().height);
            crate::ui::render::render(f, app);
        })?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, worker)?,
                InputMode::Command => handle_command_input(key, app, worker)?,
                InputMode::Form => handle_form_input(key, app, worker),
                InputMode::Confirm => handle_confirm_input(key, app, worker),
            }
        }
    }
    Ok(())
}

/// Apply every reply the worker has finished since the last frame.
fn drain_replies(app: &mut App, worker: &Worker) -> Result<()> {
    while let Some(reply) = worker
        .try_recv()
        .context("Storage worker stopped unexpectedly")?
    {
        app.handle_reply(reply);
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, worker: &mut Worker) -> Result<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => {
            app.running = false;
        }
        KeyCode::Char('d') if ctrl => app.move_half_page(Direction::Down),
        KeyCode::Char('u') if ctrl => app.move_half_page(Direction::Up),
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(Direction::Down),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(Direction::Up),
        KeyCode::Char('g') => app.move_to_top(),
        KeyCode::Char('G') => app.move_to_bottom(),
        KeyCode::Char('1') => app.screen = Screen::Transactions,
        KeyCode::Char('2') => app.screen = Screen::Chart,
        KeyCode::Tab | KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let step = if key.code == KeyCode::Tab {
                1
            } else {
                screens.len() - 1
            };
            app.screen = screens[(idx + step) % screens.len()];
        }
        KeyCode::Char('a') => {
            app.screen = Screen::Transactions;
            app.open_add_form(Local::now().date_naive());
        }
        KeyCode::Enter if app.screen == Screen::Transactions => app.open_detail(),
        KeyCode::Char('D') if app.screen == Screen::Transactions => app.request_delete(),
        KeyCode::Char('u') => app.undo(worker),
        KeyCode::Char('r') => commands::handle_command("reload", app, worker)?,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: KeyEvent, app: &mut App, worker: &mut Worker) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            commands::handle_command(&input, app, worker)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_form_input(key: KeyEvent, app: &mut App, worker: &mut Worker) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let Some(state) = app.form.as_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };

    match key.code {
        KeyCode::Esc => match state.mode {
            FormMode::Add => {
                app.close_form();
                app.set_status("Cancelled");
            }
            FormMode::Edit(_) => app.finish_detail(DetailOutcome::Unchanged),
        },
        KeyCode::Enter => app.submit_form(worker),
        KeyCode::Char('t') if ctrl => state.form.toggle_kind(),
        KeyCode::Char('d') if ctrl => {
            if state.editing_id().is_some() {
                app.request_delete();
            }
        }
        KeyCode::Char('c') if ctrl => app.running = false,
        KeyCode::Tab | KeyCode::Down => state.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => state.form.focus_prev(),
        KeyCode::Backspace => state.form.pop_char(),
        KeyCode::Char(c) if !ctrl => state.form.push_char(c),
        _ => {}
    }
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, worker: &mut Worker) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm(worker),
        _ => app.cancel_confirm(),
    }
}
