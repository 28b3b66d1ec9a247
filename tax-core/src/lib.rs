pub mod api;
pub mod models;
pub mod presenter;
pub mod state;
pub mod validation;

pub use api::{ApiConfig, ApiError, CALCULATION_FAILED, CalculatorApi};
pub use models::*;
pub use state::{AppEvent, AppState, Generation, Transition};
pub use validation::{ValidationError, validate_form};
