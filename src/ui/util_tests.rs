#![allow(clippy::unwrap_used)]

use ratatui::layout::Rect;
use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("Coffee", 10), "Coffee");
    assert_eq!(truncate("Coffee", 6), "Coffee");
}

#[test]
fn test_truncate_long_label() {
    assert_eq!(truncate("Monthly salary", 7), "Monthl…");
}

#[test]
fn test_truncate_zero_and_one() {
    assert_eq!(truncate("Rent", 0), "");
    assert_eq!(truncate("Rent", 1), "…");
    assert_eq!(truncate("R", 1), "R");
}

#[test]
fn test_truncate_multibyte() {
    assert_eq!(truncate("Зарплата за січень", 9), "Зарплата…");
    assert_eq!(truncate("café résumé", 5), "café…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_groups_thousands() {
    assert_eq!(format_amount(dec!(1234.56)), "1,234.56");
    assert_eq!(format_amount(dec!(1234567.89)), "1,234,567.89");
    assert_eq!(format_amount(dec!(999.99)), "999.99");
}

#[test]
fn test_format_amount_pads_decimals() {
    assert_eq!(format_amount(dec!(0)), "0.00");
    assert_eq!(format_amount(dec!(5)), "5.00");
    assert_eq!(format_amount(dec!(1.5)), "1.50");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50)), "-42.50");
    assert_eq!(format_amount(dec!(-99999.01)), "-99,999.01");
}

// ── format_signed ─────────────────────────────────────────────

#[test]
fn test_format_signed() {
    assert_eq!(format_signed(dec!(100)), "+100.00");
    assert_eq!(format_signed(dec!(-20)), "-20.00");
    assert_eq!(format_signed(dec!(0)), "+0.00");
    assert_eq!(format_signed(dec!(-1500.5)), "-1,500.50");
}

// ── keep_in_view ──────────────────────────────────────────────

#[test]
fn test_keep_in_view_inside_window_keeps_scroll() {
    assert_eq!(keep_in_view(5, 3, 10), 3);
    assert_eq!(keep_in_view(3, 3, 10), 3);
    assert_eq!(keep_in_view(12, 3, 10), 3);
}

#[test]
fn test_keep_in_view_below_window_scrolls_down() {
    assert_eq!(keep_in_view(13, 3, 10), 4);
    assert_eq!(keep_in_view(30, 0, 10), 21);
}

#[test]
fn test_keep_in_view_above_window_scrolls_up() {
    assert_eq!(keep_in_view(1, 3, 10), 1);
    assert_eq!(keep_in_view(0, 8, 4), 0);
}

#[test]
fn test_keep_in_view_zero_page() {
    assert_eq!(keep_in_view(4, 0, 0), 4);
}

// ── centered_rect ─────────────────────────────────────────────

#[test]
fn test_centered_rect_fits_inside() {
    let area = Rect::new(0, 0, 100, 40);
    let popup = centered_rect(area, 60, 12);
    assert_eq!(popup, Rect::new(20, 14, 60, 12));
}

#[test]
fn test_centered_rect_clamps_to_small_terminal() {
    let area = Rect::new(0, 0, 30, 8);
    let popup = centered_rect(area, 60, 12);
    assert_eq!(popup.width, 26);
    assert_eq!(popup.height, 6);
    assert_eq!(popup.x, 2);
    assert_eq!(popup.y, 1);
}
