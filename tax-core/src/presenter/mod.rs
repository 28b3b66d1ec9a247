//! Pure display formatting.
//!
//! Nothing in here touches the network or [`crate::state::AppState`]; the
//! view layer calls these when turning state into text.

mod currency;
mod timestamp;

use rust_decimal::Decimal;

pub use currency::{format_currency, round_half_up};
pub use timestamp::{INVALID_DATE, TIMESTAMP_FORMAT, format_timestamp, format_timestamp_in};

/// Number of characters of the encrypted identifier shown with a result.
pub const MASKED_PREVIEW_LEN: usize = 40;

/// Formats a percentage with two decimals: `24.00%`.
pub fn format_percentage(rate: Decimal) -> String {
    format!("{:.2}%", round_half_up(rate))
}

/// First [`MASKED_PREVIEW_LEN`] characters of the encrypted identifier
/// followed by an ellipsis.
pub fn masked_preview(masked: &str) -> String {
    let prefix: String = masked.chars().take(MASKED_PREVIEW_LEN).collect();
    format!("{prefix}...")
}

/// The part of a subsystem health descriptor before the first `:`.
///
/// `"unhealthy: dial tcp 10.0.0.1:5432"` becomes `"unhealthy"`.
pub fn health_summary(descriptor: &str) -> &str {
    descriptor.split(':').next().unwrap_or(descriptor)
}
