use rust_decimal::Decimal;

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `-1234567.8` → `"-1,234,567.80"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let sign = if val < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{}", group_thousands(val.abs()))
}

/// Like [`format_amount`] but always shows the sign, as list rows do.
/// Zero counts as income and gets a `+`.
pub(crate) fn format_signed(val: Decimal) -> String {
    let sign = if val < Decimal::ZERO { "-" } else { "+" };
    format!("{sign}{}", group_thousands(val.abs()))
}

fn group_thousands(abs: Decimal) -> String {
    let formatted = format!("{abs:.2}");
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    format!("{with_commas}.{dec_part}")
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max - 1).collect();
    format!("{truncated}…")
}

/// Scroll offset that keeps row `index` inside a window of `page` rows,
/// moving the window as little as possible.
pub(crate) fn keep_in_view(index: usize, scroll: usize, page: usize) -> usize {
    let page = page.max(1);
    if index < scroll {
        index
    } else if index >= scroll + page {
        index + 1 - page
    } else {
        scroll
    }
}

/// Center a `width` x `height` box inside `area`, clamped to fit.
pub(crate) fn centered_rect(
    area: ratatui::layout::Rect,
    width: u16,
    height: u16,
) -> ratatui::layout::Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    ratatui::layout::Rect::new(x, y, width, height)
}
