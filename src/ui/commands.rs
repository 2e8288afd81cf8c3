use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::Local;

use super::app::{App, Screen};
use crate::config::{expand_home, Config};
use crate::worker::Worker;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Worker) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit", cmd_quit, r);
    register_command!("quit", "Quit", cmd_quit, r);
    register_command!("a", "Add a transaction", cmd_add, r);
    register_command!("add", "Add a transaction", cmd_add, r);
    register_command!("t", "Go to Transactions", cmd_list, r);
    register_command!("list", "Go to Transactions", cmd_list, r);
    register_command!("c", "Go to Chart", cmd_chart, r);
    register_command!("chart", "Go to Chart", cmd_chart, r);
    register_command!("r", "Reload transactions from disk", cmd_reload, r);
    register_command!("reload", "Reload transactions from disk", cmd_reload, r);
    register_command!("u", "Restore the last deleted transaction", cmd_undo, r);
    register_command!("undo", "Restore the last deleted transaction", cmd_undo, r);
    register_command!("delete", "Delete selected transaction", cmd_delete, r);
    register_command!(
        "export",
        "Export to CSV (e.g. :export ~/budget.csv)",
        cmd_export,
        r
    );
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("help", "Show available commands", cmd_help, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, worker: &mut Worker) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let (cmd_name, args) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let args = args.trim();

    if cmd_name.is_empty() {
        return Ok(());
    }

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, worker)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> &'static str {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .copied()
        .unwrap_or("help")
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _worker: &mut Worker) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_add(_args: &str, app: &mut App, _worker: &mut Worker) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    app.open_add_form(Local::now().date_naive());
    Ok(())
}

fn cmd_list(_args: &str, app: &mut App, _worker: &mut Worker) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    Ok(())
}

fn cmd_chart(_args: &str, app: &mut App, _worker: &mut Worker) -> anyhow::Result<()> {
    app.screen = Screen::Chart;
    Ok(())
}

fn cmd_reload(_args: &str, app: &mut App, worker: &mut Worker) -> anyhow::Result<()> {
    app.reload(worker);
    app.set_status("Reloading…");
    Ok(())
}

fn cmd_undo(_args: &str, app: &mut App, worker: &mut Worker) -> anyhow::Result<()> {
    app.undo(worker);
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _worker: &mut Worker) -> anyhow::Result<()> {
    app.request_delete();
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, worker: &mut Worker) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        Config::default_export_path()
    } else {
        expand_home(args)
    };
    app.set_status(format!("Exporting to {}…", path.display()));
    app.export(worker, path);
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _worker: &mut Worker) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}
