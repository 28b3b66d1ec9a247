use serde::{Deserialize, Serialize};

/// Overall service status. Anything other than `"healthy"` is unhealthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OverallStatus {
    Healthy,
    Unhealthy,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl From<String> for OverallStatus {
    fn from(s: String) -> Self {
        if s == "healthy" {
            Self::Healthy
        } else {
            Self::Unhealthy
        }
    }
}

impl From<OverallStatus> for String {
    fn from(status: OverallStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Body of `GET /health`.
///
/// `vault` and `database` are free-form descriptors such as `"healthy"` or
/// `"unhealthy: dial tcp ..."`. Display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: OverallStatus,
    #[serde(default)]
    pub vault: String,
    #[serde(default)]
    pub database: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}
