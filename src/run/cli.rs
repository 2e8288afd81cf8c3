use anyhow::{Context, Result};

use crate::config::{expand_home, Config};
use crate::db::{write_csv, Database, TransactionStore};
use crate::error::FormField;
use crate::form::{format_date, TransactionForm};
use crate::ledger::{prepare_rows, Totals};
use crate::models::{DisplayRow, NewTransaction, TransactionKind};
use crate::ui::util::{format_amount, format_signed};

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "list" | "ls" => cli_list(db),
        "summary" | "s" => cli_summary(db),
        "add" => cli_add(&args[2..], db),
        "delete" | "rm" => cli_delete(&args[2..], db),
        "export" => cli_export(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budget_tracker {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Budget Tracker, a local income and expense log");
    println!();
    println!("Usage: budget_tracker [command]");
    println!();
    println!("Commands:");
    println!("  (none)                              Launch interactive TUI");
    println!("  list                                Print transactions grouped by day");
    println!("  summary                             Print balance, income and expenses");
    println!("  add <label> <amount> <DD/MM/YYYY>   Record a transaction (income by default)");
    println!("    --expense                         Record it as an expense");
    println!("    --description <text>              Attach a note");
    println!("  delete <id>                         Delete a transaction");
    println!("  export [path]                       Export transactions to CSV");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
}

fn cli_list(db: &Database) -> Result<()> {
    let transactions = db.read_all()?;
    if transactions.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    for row in prepare_rows(&transactions) {
        match row {
            DisplayRow::DateHeader(day) => {
                println!();
                println!("{}", format_date(day));
            }
            DisplayRow::TransactionRow(txn) => {
                let note = if txn.description.is_empty() {
                    String::new()
                } else {
                    format!("  ({})", txn.description)
                };
                println!(
                    "  #{:<5} {:>14}  {}{note}",
                    txn.id.unwrap_or(0),
                    format_signed(txn.amount),
                    txn.label,
                );
            }
        }
    }
    Ok(())
}

fn cli_summary(db: &Database) -> Result<()> {
    let totals = Totals::from_transactions(&db.read_all()?);
    let txn_count = db.get_transaction_count()?;

    println!("Budget Tracker summary");
    println!("{}", "─".repeat(40));
    println!("  Balance:    {:>14}", format_amount(totals.balance));
    println!(
        "  Income:     {:>14}  ({} txns)",
        format_amount(totals.income),
        totals.income_count
    );
    println!(
        "  Expenses:   {:>14}  ({} txns)",
        format_amount(totals.expense_abs()),
        totals.expense_count
    );
    println!("  Total Txns: {txn_count}");
    Ok(())
}

fn cli_add(args: &[String], db: &mut Database) -> Result<()> {
    let new = parse_add(args)?;
    let created = db.create(&new)?;
    println!(
        "Added #{} {} {}",
        created.id.unwrap_or(0),
        created.label,
        format_signed(created.amount)
    );
    Ok(())
}

/// Turn `add` arguments into a record, applying the same checks as the form.
fn parse_add(args: &[String]) -> Result<NewTransaction> {
    const USAGE: &str =
        "Usage: budget_tracker add <label> <amount> <DD/MM/YYYY> [--expense] [--description <text>]";

    let mut positional = Vec::new();
    let mut kind = TransactionKind::Income;
    let mut description = String::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--expense" => kind = TransactionKind::Expense,
            "--description" => {
                description = iter
                    .next()
                    .with_context(|| format!("--description needs a value\n{USAGE}"))?
                    .clone();
            }
            _ => positional.push(arg.clone()),
        }
    }

    let [label, amount, date] = positional.as_slice() else {
        anyhow::bail!(USAGE);
    };

    let form = TransactionForm {
        label: label.clone(),
        amount: amount.clone(),
        date: date.clone(),
        description,
        kind,
        focus: FormField::Label,
        error: None,
    };
    Ok(form.validate()?)
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let id: i64 = args
        .first()
        .context("Usage: budget_tracker delete <id>")?
        .parse()
        .context("Transaction id must be a number")?;

    match db.delete(id) {
        Ok(removed) => {
            println!("Deleted #{id} {} {}", removed.label, format_signed(removed.amount));
            Ok(())
        }
        Err(e) if e.is_not_found() => anyhow::bail!("Transaction {id} not found"),
        Err(e) => Err(e.into()),
    }
}

fn cli_export(args: &[String], db: &Database) -> Result<()> {
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| expand_home(a))
        .unwrap_or_else(Config::default_export_path);

    let count = write_csv(&output_path, &db.read_all()?)?;
    if count == 0 {
        println!("No transactions to export");
    } else {
        println!("Exported {count} transactions to {}", output_path.display());
    }
    Ok(())
}
