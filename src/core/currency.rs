//! Brazilian Real (pt-BR) currency handling.
//!
//! Amounts are written with `.` as the thousands separator and `,` as the
//! decimal separator, e.g. `R$ 1.234,50`. Field parsing is lenient in the way
//! browser form handling is: leading numeric content is taken and trailing
//! junk is ignored, while text without any numeric prefix yields `None`.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

const CURRENCY_SYMBOL: &str = "R$";
/// Separator between symbol and amount in pt-BR output.
const SYMBOL_SEPARATOR: char = '\u{a0}';

/// Parses a localized currency amount such as `1.234,50` or `R$ 1.234,50`.
pub fn parse_currency(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };
    let rest = rest
        .strip_prefix(CURRENCY_SYMBOL)
        .map(str::trim_start)
        .unwrap_or(rest);
    if rest.is_empty() {
        return None;
    }

    let mut normalized = String::with_capacity(rest.len() + 1);
    if negative {
        normalized.push('-');
    }
    normalized.push_str(&rest.replace('.', "").replacen(',', ".", 1));
    parse_float_prefix(&normalized)
}

/// Parses a plain decimal field such as a tax rate (`27.5` or `27,5`).
pub fn parse_decimal_field(text: &str) -> Option<f64> {
    parse_float_prefix(&text.trim().replacen(',', ".", 1))
}

/// Parses the leading integer of a field; `"12.7"` yields `12`.
pub fn parse_integer_field(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    let end = numeric_prefix_len(trimmed, false)?;
    trimmed[..end].parse::<i64>().ok()
}

/// Live-typing mask for currency inputs: every digit typed so far is read as
/// cents and re-rendered with separators. `"123456"` becomes `"1.234,56"`.
pub fn mask_currency_input(text: &str) -> String {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }

    let significant = digits.trim_start_matches('0');
    let padded = format!("{significant:0>3}");
    let (units, cents) = padded.split_at(padded.len() - 2);
    format!("{},{}", group_thousands(units), cents)
}

/// Formats an amount for display, e.g. `R$ 4.520,59`, always with two
/// fraction digits. Rounding works on the shortest decimal form of `value`,
/// half away from zero, so `1.005` shows as `R$ 1,01`.
pub fn format_brl(value: f64) -> String {
    let amount = Decimal::from_str(&value.to_string())
        .or_else(|_| Decimal::try_from(value))
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", amount.abs());
    let (units, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!(
        "{sign}{CURRENCY_SYMBOL}{SYMBOL_SEPARATOR}{},{cents}",
        group_thousands(units)
    )
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

fn parse_float_prefix(text: &str) -> Option<f64> {
    let end = numeric_prefix_len(text, true)?;
    text[..end].parse::<f64>().ok()
}

/// Length of the leading `[+-]digits[.digits]` run, or `None` when it holds no
/// digit at all.
fn numeric_prefix_len(text: &str, allow_fraction: bool) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        pos += 1;
    }

    let mut digits = 0;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
        digits += 1;
    }

    if allow_fraction && pos < bytes.len() && bytes[pos] == b'.' {
        let mut fraction_end = pos + 1;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
            digits += 1;
        }
        if fraction_end > pos + 1 {
            pos = fraction_end;
        }
    }

    (digits > 0).then_some(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_approx(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn parse_currency_reads_localized_amounts() {
        assert_eq!(parse_currency("1.234,50"), Some(1234.5));
        assert_eq!(parse_currency("100.000,00"), Some(100_000.0));
        assert_eq!(parse_currency("20000"), Some(20_000.0));
        assert_eq!(parse_currency("  3.561,5 "), Some(3561.5));
    }

    #[test]
    fn parse_currency_accepts_symbol_and_sign() {
        assert_eq!(parse_currency("R$\u{a0}1.234,50"), Some(1234.5));
        assert_eq!(parse_currency("R$ 10,00"), Some(10.0));
        assert_eq!(parse_currency("-R$\u{a0}1,00"), Some(-1.0));
    }

    #[test]
    fn parse_currency_rejects_empty_and_non_numeric() {
        assert_eq!(parse_currency(""), None);
        assert_eq!(parse_currency("   "), None);
        assert_eq!(parse_currency("R$"), None);
        assert_eq!(parse_currency("abc"), None);
        assert_eq!(parse_currency(","), None);
    }

    #[test]
    fn parse_currency_ignores_trailing_text() {
        assert_eq!(parse_currency("1.500,25 por ano"), Some(1500.25));
    }

    #[test]
    fn parse_decimal_field_handles_both_separators() {
        assert_eq!(parse_decimal_field("27.5"), Some(27.5));
        assert_eq!(parse_decimal_field("22,5"), Some(22.5));
        assert_eq!(parse_decimal_field("15%"), Some(15.0));
        assert_eq!(parse_decimal_field(""), None);
    }

    #[test]
    fn parse_integer_field_takes_leading_integer() {
        assert_eq!(parse_integer_field("10"), Some(10));
        assert_eq!(parse_integer_field(" 12.7 "), Some(12));
        assert_eq!(parse_integer_field("-3"), Some(-3));
        assert_eq!(parse_integer_field("anos"), None);
        assert_eq!(parse_integer_field("-"), None);
    }

    #[test]
    fn mask_currency_input_treats_digits_as_cents() {
        assert_eq!(mask_currency_input("123456"), "1.234,56");
        assert_eq!(mask_currency_input("5"), "0,05");
        assert_eq!(mask_currency_input("0001"), "0,01");
        assert_eq!(mask_currency_input("0"), "0,00");
        assert_eq!(mask_currency_input("10.000,0"), "1.000,00");
        assert_eq!(mask_currency_input("12345678901"), "123.456.789,01");
    }

    #[test]
    fn mask_currency_input_empty_when_no_digits() {
        assert_eq!(mask_currency_input(""), "");
        assert_eq!(mask_currency_input("R$ ,."), "");
    }

    #[test]
    fn format_brl_uses_pt_br_layout() {
        assert_eq!(format_brl(1234.5), "R$\u{a0}1.234,50");
        assert_eq!(format_brl(0.0), "R$\u{a0}0,00");
        assert_eq!(format_brl(4520.5875), "R$\u{a0}4.520,59");
        assert_eq!(format_brl(1_000_000.0), "R$\u{a0}1.000.000,00");
        assert_eq!(format_brl(999.999), "R$\u{a0}1.000,00");
    }

    #[test]
    fn format_brl_signs_negative_amounts_only_when_nonzero() {
        assert_eq!(format_brl(-1.0), "-R$\u{a0}1,00");
        assert_eq!(format_brl(-0.001), "R$\u{a0}0,00");
    }

    #[test]
    fn format_brl_rounds_decimal_midpoints_away_from_zero() {
        assert_eq!(format_brl(1.005), "R$\u{a0}1,01");
        assert_eq!(format_brl(1.015), "R$\u{a0}1,02");
        assert_eq!(format_brl(-1.005), "-R$\u{a0}1,01");
        assert_eq!(format_brl(81_370.575), "R$\u{a0}81.370,58");
    }

    #[test]
    fn format_then_parse_round_trips() {
        let parsed = parse_currency(&format_brl(1234.5)).expect("formatted amount parses");
        assert_approx(parsed, 1234.5, 0.01);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_format_parse_round_trip_within_a_cent(cents in 0u64..100_000_000_000) {
            let value = cents as f64 / 100.0 + 0.004;
            let parsed = parse_currency(&format_brl(value));
            prop_assert!(parsed.is_some());
            prop_assert!((parsed.unwrap_or_default() - value).abs() <= 0.01);
        }

        #[test]
        fn prop_mask_output_parses_back_to_typed_cents(cents in 0u64..1_000_000_000_000) {
            let masked = mask_currency_input(&cents.to_string());
            let parsed = parse_currency(&masked).unwrap_or(-1.0);
            prop_assert!((parsed - cents as f64 / 100.0).abs() < 1e-6 * (1.0 + cents as f64 / 100.0));
        }
    }
}
