//! Checks the raw form fields before anything is sent to the service.
//!
//! The income field mirrors a numeric input with `min = 0` and
//! `step = 0.01`; the national insurance field mirrors a text input with
//! the pattern `[A-Z]{2}[0-9]{6}[A-D]`. Nothing that fails here reaches the
//! network layer.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{CalculationRequest, NationalInsuranceNumber};

/// Largest number of fractional digits accepted for income (whole pence).
pub const INCOME_MAX_SCALE: u32 = 2;

/// Why the form could not be turned into a [`CalculationRequest`].
///
/// Variants concerning the national insurance number never carry the
/// entered value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Annual income is required")]
    IncomeRequired,

    #[error("Annual income '{0}' is not a number")]
    IncomeNotANumber(String),

    #[error("Annual income must not be negative, got {0}")]
    IncomeNegative(Decimal),

    #[error("Annual income must have at most two decimal places, got {0}")]
    IncomeTooPrecise(Decimal),

    #[error("National Insurance number is required")]
    NationalInsuranceRequired,

    #[error("National Insurance number must be 2 letters, 6 numbers, 1 letter (A-D)")]
    NationalInsuranceFormat,
}

/// Parses the income field.
///
/// Surrounding whitespace is ignored; anything else that does not parse as
/// a plain decimal is rejected.
pub fn parse_income(raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::IncomeRequired);
    }

    let income = Decimal::from_str(trimmed)
        .map_err(|_| ValidationError::IncomeNotANumber(trimmed.to_string()))?;

    if income.is_sign_negative() && !income.is_zero() {
        return Err(ValidationError::IncomeNegative(income));
    }
    if income.normalize().scale() > INCOME_MAX_SCALE {
        return Err(ValidationError::IncomeTooPrecise(income));
    }

    Ok(income)
}

/// Parses the national insurance field. The value is matched as entered.
pub fn parse_national_insurance(raw: &str) -> Result<NationalInsuranceNumber, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::NationalInsuranceRequired);
    }
    NationalInsuranceNumber::parse(raw).ok_or(ValidationError::NationalInsuranceFormat)
}

/// Turns the two raw form fields into a request, reporting the first
/// invalid field (income is checked first).
pub fn validate_form(
    income: &str,
    national_insurance: &str,
    tax_year: &str,
) -> Result<CalculationRequest, ValidationError> {
    let income = parse_income(income)?;
    let national_insurance = parse_national_insurance(national_insurance)?;

    Ok(CalculationRequest {
        income,
        national_insurance,
        tax_year: tax_year.to_string(),
    })
}
