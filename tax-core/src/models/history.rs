use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound on the number of history entries the service returns and
/// the client keeps.
pub const HISTORY_LIMIT: usize = 50;

/// One prior calculation as listed by `GET /api/history`.
///
/// `timestamp` is kept as the raw string the service sent; the presenter
/// decides how to render it (and what to show when it does not parse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    pub income: Decimal,
    pub income_tax: Decimal,
    pub national_insurance_contribution: Decimal,
    pub take_home: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_rate: Option<Decimal>,
    /// Already truncated by the service.
    #[serde(rename = "encrypted_ni", default)]
    pub masked_national_insurance: String,
}

/// Deserializes a history body, treating JSON `null` as an empty list.
///
/// The service encodes an empty result set as `null`.
pub fn deserialize_history<'de, D>(deserializer: D) -> Result<Vec<HistoryEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<Vec<HistoryEntry>> = Option::deserialize(deserializer)?;
    Ok(entries.unwrap_or_default())
}

/// Wire wrapper for the history body so callers can use
/// `serde_json::from_slice::<HistoryPayload>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryPayload(pub Vec<HistoryEntry>);

impl<'de> Deserialize<'de> for HistoryPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_history(deserializer).map(Self)
    }
}
