use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_TAX_YEAR;

/// Where the calculation service lives and which tax year to ask for.
///
/// `base_url` is joined with the endpoint paths below; a trailing slash is
/// ignored.
///
/// | endpoint                 | method |
/// |--------------------------|--------|
/// | `/health`                | GET    |
/// | `/api/history`           | GET    |
/// | `/api/history/{id}`      | GET    |
/// | `/api/calculate`         | POST   |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Absolute `http` or `https` URL of the service origin.
    pub base_url: String,
    /// Tax year label sent with every calculation.
    pub tax_year: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            tax_year: DEFAULT_TAX_YEAR.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Full URL for `path`, which must start with `/`.
    pub fn endpoint(
        &self,
        path: &str,
    ) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
