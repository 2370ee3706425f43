use crate::config::GatewaySettings;
use crate::domain::payment::{GatewayResponse, PaymentRequestPayload};
use crate::domain::ports::GatewayClient;
use crate::error::GatewayError;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const SANDBOX_URL: &str = "https://sandbox.ebanx.com";
pub const LIVE_URL: &str = "https://api.ebanx.com";

/// Body of `POST /ws/request`: credentials plus the payment link payload.
#[derive(Serialize)]
struct RequestBody<'a> {
    integration_key: &'a str,
    operation: &'static str,
    #[serde(flatten)]
    payload: &'a PaymentRequestPayload,
}

/// EBANX request API over HTTPS, in redirect (non-direct) mode.
#[derive(Clone)]
pub struct EbanxHttpClient {
    client: reqwest::Client,
    base_url: String,
    integration_key: String,
}

impl EbanxHttpClient {
    pub fn new(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        let base_url = settings
            .base_url
            .clone()
            .unwrap_or_else(|| {
                if settings.sandbox {
                    SANDBOX_URL.to_string()
                } else {
                    LIVE_URL.to_string()
                }
            });
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            integration_key: settings.integration_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/ws/request", self.base_url)
    }
}

#[async_trait]
impl GatewayClient for EbanxHttpClient {
    #[instrument(skip_all, fields(merchant_payment_code = %payload.merchant_payment_code))]
    async fn request(
        &self,
        payload: &PaymentRequestPayload,
    ) -> Result<GatewayResponse, GatewayError> {
        let body = RequestBody {
            integration_key: &self.integration_key,
            operation: "request",
            payload,
        };

        let response = self.client.post(self.endpoint()).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(%status, "EBANX API error: {}", error_text);
            return Err(GatewayError::Transport(format!(
                "EBANX API returned {}",
                status
            )));
        }

        let decoded: GatewayResponse = response.json().await?;
        debug!(status = ?decoded.status, "EBANX response decoded");
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::ResponseStatus;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> PaymentRequestPayload {
        PaymentRequestPayload {
            name: "Ana Souza".into(),
            email: "ana@example.com".into(),
            country: "br".into(),
            payment_type_code: "_all".into(),
            merchant_payment_code: "42_0123456789abcdef0123456789abcdef".into(),
            currency_code: "BRL".into(),
            amount: dec!(99.90),
        }
    }

    fn client_for(server: &MockServer) -> EbanxHttpClient {
        let settings = GatewaySettings {
            integration_key: "test_ik".into(),
            base_url: Some(server.uri()),
            ..GatewaySettings::default()
        };
        EbanxHttpClient::new(&settings).unwrap()
    }

    #[tokio::test]
    async fn test_request_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ws/request"))
            .and(body_partial_json(json!({
                "integration_key": "test_ik",
                "operation": "request",
                "country": "br",
                "amount": "99.90",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "payment": {"hash": "abc123"},
                "redirect_url": "https://sandbox.ebanx.com/checkout/?hash=abc123",
                "status": "SUCCESS",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).request(&payload()).await.unwrap();
        assert_eq!(response.status, ResponseStatus::Success);
        assert_eq!(response.issued().unwrap().hash, "abc123");
    }

    #[tokio::test]
    async fn test_request_rejection_is_structured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ERROR",
                "status_code": "DA-1",
                "status_message": "Invalid integration key",
            })))
            .mount(&server)
            .await;

        let response = client_for(&server).request(&payload()).await.unwrap();
        assert_eq!(response.status, ResponseStatus::Error);
        assert_eq!(
            response.status_line().as_deref(),
            Some("DA-1: Invalid integration key")
        );
    }

    #[tokio::test]
    async fn test_server_error_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client_for(&server).request(&payload()).await;
        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }

    #[tokio::test]
    async fn test_garbage_body_is_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).request(&payload()).await;
        assert!(matches!(result, Err(GatewayError::Decode(_))));
    }
}
