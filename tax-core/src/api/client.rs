use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CalculationRequest, CalculationResult, HealthStatus, HistoryEntry};

/// Fixed message shown to the user when a submission fails.
pub const CALCULATION_FAILED: &str = "Calculation failed";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connection refused, reset, DNS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("Service returned {status}")]
    Status {
        status: u16,
        /// Plain-text body of the error response, when there was one.
        reason: Option<String>,
    },

    #[error("Record not found")]
    NotFound,

    /// The body could not be decoded into the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Message suitable for the error banner of a failed submission.
    ///
    /// Always starts with [`CALCULATION_FAILED`]. When the service gave a
    /// reason with its error status, the reason is appended.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                reason: Some(reason),
                ..
            } => format!("{CALCULATION_FAILED}: {reason}"),
            _ => CALCULATION_FAILED.to_string(),
        }
    }
}

/// The three (plus one lookup) operations the client performs against the
/// calculation service.
///
/// Implementations must not retry and must not log the raw national
/// insurance number carried by [`CalculationRequest`].
#[async_trait]
pub trait CalculatorApi: Send + Sync {
    /// `GET /health`
    async fn health(&self) -> Result<HealthStatus, ApiError>;

    /// `GET /api/history`, newest first. A `null` body yields an empty list.
    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError>;

    /// `POST /api/calculate`
    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, ApiError>;

    /// `GET /api/history/{id}`, with the full encrypted identifier.
    async fn get_calculation(
        &self,
        id: &str,
    ) -> Result<CalculationResult, ApiError>;
}
