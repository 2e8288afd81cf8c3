use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ledger::ChartData;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::format_amount;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(" Income vs Expenses ", theme::title_style()));

    if app.chart.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Nothing to chart yet", theme::dim_style())),
        ])
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(block.inner(area));
    f.render_widget(block, area);

    let bars = bars(&app.chart);
    let bar_width = (chunks[0].width.saturating_sub(6) / 2).clamp(3, 24);

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(4);
    let chart_area = center_horizontally(chunks[0], bar_width * 2 + 4);
    f.render_widget(chart, chart_area);

    let net = app.totals.balance;
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("Net ", theme::dim_style()),
        Span::styled(
            format_amount(net),
            Style::default()
                .fg(theme::amount_color(net < Decimal::ZERO))
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .centered();
    f.render_widget(footer, chunks[1]);
}

/// One bar per bucket. Bar heights are whole units; the printed value keeps
/// the exact amount.
fn bars(chart: &ChartData) -> Vec<Bar<'static>> {
    chart
        .buckets()
        .into_iter()
        .map(|(label, amount)| {
            let color = if label == ChartData::INCOME_LABEL {
                theme::GREEN
            } else {
                theme::RED
            };
            Bar::default()
                .value(amount.round().to_u64().unwrap_or(0))
                .text_value(format_amount(amount))
                .label(Line::from(label))
                .style(Style::default().fg(color))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect()
}

fn center_horizontally(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y,
        width,
        area.height,
    )
}
