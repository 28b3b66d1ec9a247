//! Plain-text rendering of the session state.

use std::fmt::Write;

use tax_core::presenter::{
    format_currency, format_percentage, format_timestamp, health_summary, masked_preview,
};
use tax_core::{AppState, CalculationResult, HISTORY_LIMIT, HealthStatus, HistoryEntry};

pub const TITLE: &str = "UK Tax Calculator";
pub const EMPTY_HISTORY: &str = "No calculations yet. Try calculating your tax above!";

/// The whole screen: health banner, submission status, result and history.
pub fn render(state: &AppState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE}");
    if let Some(health) = state.health() {
        let _ = writeln!(out, "{}", render_health(health));
    }
    out.push('\n');

    if state.is_loading() {
        let _ = writeln!(out, "Calculating...");
    }
    if let Some(error) = state.error() {
        let _ = writeln!(out, "Error: {error}");
    }
    if let Some(result) = state.result() {
        out.push_str(&render_result(result));
        out.push('\n');
    }

    out.push_str(&render_history(state.history()));
    out
}

/// `[healthy] Vault: healthy | Database: unhealthy`
pub fn render_health(health: &HealthStatus) -> String {
    format!(
        "[{}] Vault: {} | Database: {}",
        health.status.as_str(),
        health_summary(&health.vault),
        health_summary(&health.database)
    )
}

/// Result card for a fresh calculation. The encrypted identifier is
/// abbreviated.
pub fn render_result(result: &CalculationResult) -> String {
    render_calculation(result, &masked_preview(&result.masked_national_insurance))
}

/// Full record as returned by a lookup, encrypted identifier unabridged.
pub fn render_record(result: &CalculationResult) -> String {
    let mut out = render_calculation(result, &result.masked_national_insurance);
    if let Some(ts) = &result.timestamp {
        let _ = writeln!(out, "  {:<20}{}", "Calculated:", format_timestamp(ts));
    }
    out
}

fn render_calculation(
    result: &CalculationResult,
    encrypted: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tax Calculation Result");
    let _ = writeln!(out, "  {:<20}{}", "Gross Income:", format_currency(result.income));
    let _ = writeln!(
        out,
        "  {:<20}-{}",
        "Income Tax:",
        format_currency(result.income_tax)
    );
    let _ = writeln!(
        out,
        "  {:<20}-{}",
        "National Insurance:",
        format_currency(result.national_insurance_contribution)
    );
    let _ = writeln!(out, "  {:<20}{}", "Take Home Pay:", format_currency(result.take_home));
    let _ = writeln!(
        out,
        "  {:<20}{}",
        "Effective Tax Rate:",
        format_percentage(result.effective_rate)
    );
    let _ = writeln!(out, "  {:<20}{}", "Calculation ID:", result.id);
    let _ = writeln!(out, "  {:<20}{}", "Encrypted NI:", encrypted);
    out
}

/// History list in the order given, or the empty-state line.
pub fn render_history(entries: &[HistoryEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Calculation History (showing last {HISTORY_LIMIT})");
    if entries.is_empty() {
        let _ = writeln!(out, "  {EMPTY_HISTORY}");
        return out;
    }

    for entry in entries {
        let _ = writeln!(
            out,
            "  {}  {}",
            format_currency(entry.income),
            format_timestamp(&entry.timestamp)
        );
        let _ = writeln!(
            out,
            "    Tax: {}  NI: {}  Take home: {}",
            format_currency(entry.income_tax),
            format_currency(entry.national_insurance_contribution),
            format_currency(entry.take_home)
        );
        let _ = writeln!(out, "    Encrypted NI: {}", entry.masked_national_insurance);
    }
    out
}
