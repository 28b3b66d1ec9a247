use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::NationalInsuranceNumber;

/// Tax year label sent with every calculation request.
pub const DEFAULT_TAX_YEAR: &str = "2024/2025";

/// Body of `POST /api/calculate`.
///
/// Built fresh for each submission by [`crate::validation::validate_form`];
/// never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculationRequest {
    /// Gross annual income. Sent as a JSON number.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub income: Decimal,
    pub national_insurance: NationalInsuranceNumber,
    pub tax_year: String,
}

/// Tax breakdown returned by the calculation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub id: String,
    pub income: Decimal,
    pub income_tax: Decimal,
    pub national_insurance_contribution: Decimal,
    pub take_home: Decimal,
    /// Percentage, e.g. `24.0` for 24 %.
    pub effective_rate: Decimal,
    /// Server-side encrypted form of the national insurance number.
    #[serde(rename = "encrypted_ni", default)]
    pub masked_national_insurance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}
