mod calculation;
mod health;
mod history;
mod national_insurance;

pub use calculation::{CalculationRequest, CalculationResult, DEFAULT_TAX_YEAR};
pub use health::{HealthStatus, OverallStatus};
pub use history::{HISTORY_LIMIT, HistoryEntry, HistoryPayload, deserialize_history};
pub use national_insurance::NationalInsuranceNumber;
