use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use crate::form::format_date;
use crate::models::DisplayRow;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_signed, truncate};

const CARDS_HEIGHT: u16 = 5;

/// Rows of the list that fit on screen for a terminal `height` rows tall:
/// everything minus tab, status and command bars, the cards, the table's
/// borders and its column header.
pub(crate) fn visible_rows(height: u16) -> usize {
    usize::from(height.saturating_sub(3 + CARDS_HEIGHT + 3)).max(1)
}

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(CARDS_HEIGHT), Constraint::Min(3)])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_rows(f, chunks[1], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let totals = &app.totals;
    render_card(
        f,
        cards[0],
        "Balance",
        format_amount(totals.balance),
        theme::amount_color(totals.balance < Decimal::ZERO),
        format!("{} txns", app.transactions.len()),
    );
    render_card(
        f,
        cards[1],
        "Income",
        format_amount(totals.income),
        theme::GREEN,
        format!("{} txns", totals.income_count),
    );
    render_card(
        f,
        cards[2],
        "Expenses",
        format_amount(totals.expense_abs()),
        theme::RED,
        format!("{} txns", totals.expense_count),
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color, sub: String) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sub, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_rows(f: &mut Frame, area: Rect, app: &App) {
    let title = Span::styled(
        format!(" Transactions ({}) ", app.transactions.len()),
        theme::title_style(),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(title);

    if app.rows.is_empty() {
        let msg = if app.loaded {
            vec![
                Line::from(""),
                Line::from(Span::styled("No transactions yet", theme::dim_style())),
                Line::from(""),
                Line::from(Span::styled("Press a to add one", theme::dim_style())),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled("Loading…", theme::dim_style())),
            ]
        };
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let label_width = usize::from(area.width.saturating_sub(2 + 18 + 2)) / 2;

    let header = Row::new(
        ["Label", "Description", "Amount"]
            .into_iter()
            .map(|h| Cell::from(h).style(theme::title_style())),
    );

    let rows: Vec<Row> = app
        .rows
        .iter()
        .enumerate()
        .skip(app.row_scroll)
        .take(app.visible_rows)
        .map(|(i, row)| match row {
            DisplayRow::DateHeader(day) => {
                Row::new(vec![Cell::from(format_date(*day))]).style(theme::date_header_style())
            }
            DisplayRow::TransactionRow(txn) => {
                let style = if i == app.row_index {
                    theme::selected_style()
                } else {
                    theme::normal_style()
                };
                Row::new(vec![
                    Cell::from(format!("  {}", truncate(&txn.label, label_width))),
                    Cell::from(Span::styled(
                        truncate(&txn.description, label_width),
                        theme::dim_style(),
                    )),
                    Cell::from(Span::styled(format_signed(txn.amount), theme::amount_style(txn))),
                ])
                .style(style)
            }
        })
        .collect();

    let widths = [
        Constraint::Percentage(45),
        Constraint::Percentage(35),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
