use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url, header::CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::debug;

use tax_core::{
    ApiConfig, ApiError, CalculationRequest, CalculationResult, CalculatorApi, HealthStatus,
    HistoryEntry, HistoryPayload,
};

/// Longest service-provided error reason carried into [`ApiError::Status`].
const MAX_REASON_LEN: usize = 200;

/// [`CalculatorApi`] over HTTP/JSON.
///
/// No retries and no request timeout: every call is one request, resolved
/// by whatever the transport reports.
#[derive(Debug, Clone)]
pub struct HttpCalculatorApi {
    client: Client,
    config: ApiConfig,
}

impl HttpCalculatorApi {
    /// Build a client for `config.base_url`.
    ///
    /// # Errors
    /// [`ApiError::Configuration`] when the base URL is not an absolute
    /// `http`/`https` URL.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Self::with_client(Client::new(), config)
    }

    /// Same as [`new`](Self::new) but reuses an existing `reqwest` client.
    pub fn with_client(
        client: Client,
        config: ApiConfig,
    ) -> Result<Self, ApiError> {
        validate_base_url(&config.base_url)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let url = self.config.endpoint(path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        read_json(response).await
    }
}

fn validate_base_url(base_url: &str) -> Result<(), ApiError> {
    let url = Url::parse(base_url)
        .map_err(|e| ApiError::Configuration(format!("invalid base URL '{base_url}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ApiError::Configuration(format!(
            "base URL '{base_url}' must use http or https, not '{other}'"
        ))),
    }
}

/// Maps a response to the decoded body or the matching [`ApiError`].
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    if !status.is_success() {
        let reason = error_reason(response).await;
        debug!(status = status.as_u16(), ?reason, "request rejected");
        return Err(ApiError::Status {
            status: status.as_u16(),
            reason,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// A plain-text error body, trimmed and bounded. Anything else (HTML error
/// pages from a proxy, JSON, empty bodies) yields `None`.
async fn error_reason(response: Response) -> Option<String> {
    let is_plain_text = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/plain"));
    if !is_plain_text {
        return None;
    }

    let text = response.text().await.ok()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_REASON_LEN).collect())
}

#[async_trait]
impl CalculatorApi for HttpCalculatorApi {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("/health").await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        let HistoryPayload(entries) = self.get_json("/api/history").await?;
        Ok(entries)
    }

    async fn calculate(
        &self,
        request: &CalculationRequest,
    ) -> Result<CalculationResult, ApiError> {
        let url = self.config.endpoint("/api/calculate");
        debug!(%url, tax_year = %request.tax_year, "POST");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        read_json(response).await
    }

    async fn get_calculation(
        &self,
        id: &str,
    ) -> Result<CalculationResult, ApiError> {
        let mut url = Url::parse(&self.config.endpoint("/api/history"))
            .map_err(|e| ApiError::Configuration(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Configuration("base URL cannot have a path".to_string()))?
            .push(id);
        debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use tax_core::validate_form;

    use super::*;

    fn api_for(server: &MockServer) -> HttpCalculatorApi {
        HttpCalculatorApi::new(ApiConfig::new(server.base_url())).unwrap()
    }

    // ── construction ─────────────────────────────────────────────────────
    #[test]
    fn rejects_relative_base_url() {
        assert!(matches!(
            HttpCalculatorApi::new(ApiConfig::new("")),
            Err(ApiError::Configuration(_))
        ));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = HttpCalculatorApi::new(ApiConfig::new("ftp://tax.example")).unwrap_err();

        match err {
            ApiError::Configuration(msg) => assert!(msg.contains("ftp")),
            other => panic!("expected Configuration error, got {other:#?}"),
        }
    }

    // ── health ───────────────────────────────────────────────────────────
    #[tokio::test]
    async fn health_decodes_body() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200).json_body(json!({
                "status": "healthy",
                "vault": "healthy",
                "database": "unhealthy: connection refused",
                "timestamp": "2025-01-01T00:00:00Z"
            }));
        });

        let health = api_for(&server).health().await.unwrap();

        assert!(health.status.is_healthy());
        assert_eq!(health.database, "unhealthy: connection refused");
    }

    #[tokio::test]
    async fn malformed_health_body_is_decode_error() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200).body("<html>gateway</html>");
        });

        let err = api_for(&server).health().await.unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
    }

    // ── history ──────────────────────────────────────────────────────────
    #[tokio::test]
    async fn null_history_is_empty() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/api/history");
            then.status(200)
                .header("content-type", "application/json")
                .body("null");
        });

        let history = api_for(&server).history().await.unwrap();

        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn history_server_error_is_status_error() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/api/history");
            then.status(500)
                .header("content-type", "text/plain; charset=utf-8")
                .body("Failed to fetch history\n");
        });

        let err = api_for(&server).history().await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                reason: Some("Failed to fetch history".to_string()),
            }
        );
    }

    // ── calculate ────────────────────────────────────────────────────────
    #[tokio::test]
    async fn calculate_posts_numeric_income_and_decodes_result() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST).path("/api/calculate").json_body(json!({
                "income": 50000.0,
                "national_insurance": "AB123456C",
                "tax_year": "2024/2025"
            }));
            then.status(200).json_body(json!({
                "id": "abc123",
                "income": 50000,
                "income_tax": 7500,
                "national_insurance_contribution": 4500,
                "take_home": 38000,
                "effective_rate": 24.0,
                "timestamp": "2025-01-01T12:00:00Z",
                "encrypted_ni": "vault:v1:xxxxxxxx"
            }));
        });
        let request = validate_form("50000", "AB123456C", "2024/2025").unwrap();

        let result = api_for(&server).calculate(&request).await.unwrap();

        m.assert();
        assert_eq!(result.id, "abc123");
        assert_eq!(result.take_home, dec!(38000));
        assert_eq!(result.effective_rate, dec!(24));
        assert_eq!(result.masked_national_insurance, "vault:v1:xxxxxxxx");
    }

    #[tokio::test]
    async fn calculate_server_error_without_text_has_no_reason() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(POST).path("/api/calculate");
            then.status(500);
        });
        let request = validate_form("50000", "AB123456C", "2024/2025").unwrap();

        let err = api_for(&server).calculate(&request).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                reason: None,
            }
        );
        assert_eq!(err.user_message(), "Calculation failed");
    }

    #[tokio::test]
    async fn html_error_page_is_not_used_as_reason() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(POST).path("/api/calculate");
            then.status(502)
                .header("content-type", "text/html")
                .body("<h1>Bad Gateway</h1>");
        });
        let request = validate_form("50000", "AB123456C", "2024/2025").unwrap();

        let err = api_for(&server).calculate(&request).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Status {
                status: 502,
                reason: None,
            }
        );
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        let api = HttpCalculatorApi::new(ApiConfig::new("http://127.0.0.1:1")).unwrap();
        let request = validate_form("50000", "AB123456C", "2024/2025").unwrap();

        let err = api.calculate(&request).await.unwrap_err();

        assert!(matches!(err, ApiError::Transport(_)));
    }

    // ── get_calculation ──────────────────────────────────────────────────
    #[tokio::test]
    async fn get_calculation_missing_is_not_found() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/api/history/nope");
            then.status(404)
                .header("content-type", "text/plain; charset=utf-8")
                .body("Calculation not found\n");
        });

        let err = api_for(&server).get_calculation("nope").await.unwrap_err();

        assert_eq!(err, ApiError::NotFound);
    }

    #[tokio::test]
    async fn get_calculation_returns_full_record() {
        let server = MockServer::start();
        let _m = server.mock(|when, then| {
            when.method(GET).path("/api/history/abc123");
            then.status(200).json_body(json!({
                "id": "abc123",
                "income": 30000,
                "income_tax": 3486,
                "national_insurance_contribution": 2091.6,
                "take_home": 24422.4,
                "effective_rate": 18.59,
                "timestamp": "2025-01-01T12:00:00Z",
                "encrypted_ni": "vault:v1:full-ciphertext-value"
            }));
        });

        let result = api_for(&server).get_calculation("abc123").await.unwrap();

        assert_eq!(result.national_insurance_contribution, dec!(2091.6));
        assert_eq!(result.masked_national_insurance, "vault:v1:full-ciphertext-value");
    }
}
