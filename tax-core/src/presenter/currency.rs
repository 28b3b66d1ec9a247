//! Pound sterling formatting in the en-GB style.

use rust_decimal::{Decimal, RoundingStrategy};

const CURRENCY_SYMBOL: char = '£';

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::presenter::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as pounds and pence with thousands separators.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::presenter::format_currency;
///
/// assert_eq!(format_currency(dec!(1234.5)), "£1,234.50");
/// assert_eq!(format_currency(dec!(0)), "£0.00");
/// assert_eq!(format_currency(dec!(-12)), "-£12.00");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let negative = rounded < Decimal::ZERO;

    let digits = format!("{:.2}", rounded.abs());
    let (whole, pence) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut out = String::with_capacity(digits.len() + whole.len() / 3 + 2);
    if negative {
        out.push('-');
    }
    out.push(CURRENCY_SYMBOL);
    out.push_str(&group_thousands(whole));
    out.push('.');
    out.push_str(pence);
    out
}

/// Inserts a comma every three digits from the right.
fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
