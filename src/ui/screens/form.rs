use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::error::FormField;
use crate::models::TransactionKind;
use crate::ui::app::{FormMode, FormState};
use crate::ui::theme;
use crate::ui::util::centered_rect;

const LABEL_COLUMN: usize = 20;

/// Draw the add/detail form as a popup over whatever screen is active.
pub(crate) fn render(f: &mut Frame, area: Rect, state: &FormState) {
    let form = &state.form;
    let title = match &state.mode {
        FormMode::Add => " Add transaction ".to_string(),
        FormMode::Edit(txn) => match txn.id {
            Some(id) => format!(" Transaction #{id} "),
            None => " Transaction ".to_string(),
        },
    };

    let mut lines = vec![kind_line(form.kind), Line::from("")];
    let mut cursor = None;

    for &field in FormField::all() {
        let focused = field == form.focus;
        let value = form.field(field);
        let label_style = if focused {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        };
        if focused {
            cursor = Some((LABEL_COLUMN + value.chars().count(), lines.len()));
        }
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<width$}", field.as_str(), width = LABEL_COLUMN - 1), label_style),
            Span::styled(value.to_string(), theme::normal_style()),
        ]));
        lines.push(match form.error_for(field) {
            Some(msg) => Line::from(Span::styled(
                format!("{}{msg}", " ".repeat(LABEL_COLUMN)),
                theme::error_style(),
            )),
            None => Line::from(""),
        });
    }

    let hints = match (&state.mode, state.saving) {
        (_, true) => " Saving…",
        (FormMode::Add, false) => " Enter save · Tab next field · Ctrl-t income/expense · Esc cancel",
        (FormMode::Edit(_), false) => {
            " Enter save · Ctrl-t income/expense · Ctrl-d delete · Esc close"
        }
    };
    lines.push(Line::from(Span::styled(hints, theme::dim_style())));

    let popup = centered_rect(area, 72, lines.len() as u16 + 2);
    f.render_widget(Clear, popup);
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .title(Span::styled(title, theme::title_style()))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(widget, popup);

    if let Some((x, y)) = cursor {
        let x = popup.x.saturating_add(1).saturating_add(x as u16);
        let y = popup.y.saturating_add(1).saturating_add(y as u16);
        if x < popup.right().saturating_sub(1) && y < popup.bottom().saturating_sub(1) {
            f.set_cursor_position((x, y));
        }
    }
}

fn kind_line(kind: TransactionKind) -> Line<'static> {
    let chip = |k: TransactionKind| {
        let text = format!(" {} ", k.as_str());
        if k == kind {
            let bg = match k {
                TransactionKind::Income => theme::GREEN,
                TransactionKind::Expense => theme::RED,
            };
            Span::styled(
                text,
                Style::default()
                    .fg(theme::HEADER_BG)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(text, theme::dim_style())
        }
    };
    Line::from(vec![
        Span::styled(format!(" {:<width$}", "Kind", width = LABEL_COLUMN - 1), theme::dim_style()),
        chip(TransactionKind::Income),
        Span::raw(" "),
        chip(TransactionKind::Expense),
    ])
}
