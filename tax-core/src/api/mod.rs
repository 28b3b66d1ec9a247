pub mod client;
pub mod config;

pub use client::{ApiError, CALCULATION_FAILED, CalculatorApi};
pub use config::ApiConfig;
