use ratatui::style::{Color, Modifier, Style};

use crate::models::Transaction;

pub(crate) const HEADER_BG: Color = Color::Rgb(30, 30, 46);
pub(crate) const ACCENT: Color = Color::Rgb(137, 180, 250);
pub(crate) const GREEN: Color = Color::Rgb(166, 227, 161);
pub(crate) const RED: Color = Color::Rgb(243, 139, 168);
pub(crate) const YELLOW: Color = Color::Rgb(249, 226, 175);
pub(crate) const SURFACE: Color = Color::Rgb(49, 50, 68);
pub(crate) const TEXT: Color = Color::Rgb(205, 214, 244);
pub(crate) const TEXT_DIM: Color = Color::Rgb(127, 132, 156);
pub(crate) const OVERLAY: Color = Color::Rgb(69, 71, 90);
pub(crate) const COMMAND_BG: Color = Color::Rgb(24, 24, 37);

pub(crate) fn title_style() -> Style {
    Style::default()
        .fg(TEXT_DIM)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn date_header_style() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(HEADER_BG)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn selected_style() -> Style {
    Style::default().fg(HEADER_BG).bg(ACCENT)
}

pub(crate) fn normal_style() -> Style {
    Style::default().fg(TEXT)
}

pub(crate) fn dim_style() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Style for a transaction's amount column. Zero amounts read as income.
pub(crate) fn amount_style(txn: &Transaction) -> Style {
    Style::default().fg(amount_color(txn.is_expense()))
}

/// Green for zero and above, red below.
pub(crate) fn amount_color(is_negative: bool) -> Color {
    if is_negative {
        RED
    } else {
        GREEN
    }
}

pub(crate) fn error_style() -> Style {
    Style::default().fg(RED).add_modifier(Modifier::ITALIC)
}

pub(crate) fn border_style() -> Style {
    Style::default().fg(OVERLAY)
}

pub(crate) fn command_bar_style() -> Style {
    Style::default().fg(TEXT).bg(COMMAND_BG)
}

pub(crate) fn status_bar_style() -> Style {
    Style::default().fg(TEXT_DIM).bg(SURFACE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn txn(amount: Decimal) -> Transaction {
        Transaction {
            id: Some(1),
            label: "x".into(),
            amount,
            date: NaiveDate::from_ymd_opt(2024, 1, 5)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            description: String::new(),
        }
    }

    #[test]
    fn test_amount_style_by_sign() {
        assert_eq!(amount_style(&txn(dec!(10))).fg, Some(GREEN));
        assert_eq!(amount_style(&txn(dec!(-10))).fg, Some(RED));
    }

    #[test]
    fn test_zero_amount_styled_as_income() {
        assert_eq!(amount_style(&txn(Decimal::ZERO)).fg, Some(GREEN));
    }
}
