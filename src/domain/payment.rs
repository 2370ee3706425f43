use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalized request sent to EBANX to issue a payment link.
///
/// Built once per invocation and passed verbatim to the gateway client.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentRequestPayload {
    pub name: String,
    pub email: String,
    /// Lowercase two-letter country code.
    pub country: String,
    pub payment_type_code: String,
    /// Merchant reference correlating the local order with the EBANX payment.
    pub merchant_payment_code: String,
    /// Uppercase ISO 4217 code.
    pub currency_code: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct GatewayPayment {
    pub hash: String,
}

/// Structured answer of the EBANX request endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct GatewayResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub status_code: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub payment: Option<GatewayPayment>,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

impl GatewayResponse {
    pub fn success(hash: impl Into<String>, redirect_url: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            status_code: None,
            status_message: None,
            payment: Some(GatewayPayment { hash: hash.into() }),
            redirect_url: Some(redirect_url.into()),
        }
    }

    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            status_code: Some(code.into()),
            status_message: Some(message.into()),
            payment: None,
            redirect_url: None,
        }
    }

    /// The issued link, when the response is a success carrying both artifacts.
    pub fn issued(&self) -> Option<IssuedPayment> {
        if self.status != ResponseStatus::Success {
            return None;
        }
        let hash = self.payment.as_ref()?.hash.clone();
        let redirect_url = self.redirect_url.clone()?;
        Some(IssuedPayment { hash, redirect_url })
    }

    /// `"{status_code}: {status_message}"`, used in debug mode.
    ///
    /// `None` when EBANX sent neither a code nor a message.
    pub fn status_line(&self) -> Option<String> {
        if self.status_code.is_none() && self.status_message.is_none() {
            return None;
        }
        Some(format!(
            "{}: {}",
            self.status_code.as_deref().unwrap_or_default(),
            self.status_message.as_deref().unwrap_or_default()
        ))
    }
}

/// Artifacts of a successful payment link request.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct IssuedPayment {
    pub hash: String,
    pub redirect_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success_response() {
        let body = r#"{
            "payment": {"hash": "5a3c1b", "status": "OP"},
            "redirect_url": "https://sandbox.ebanx.com/print/?hash=5a3c1b",
            "status": "SUCCESS"
        }"#;
        let response: GatewayResponse = serde_json::from_str(body).unwrap();
        let issued = response.issued().unwrap();
        assert_eq!(issued.hash, "5a3c1b");
        assert_eq!(
            issued.redirect_url,
            "https://sandbox.ebanx.com/print/?hash=5a3c1b"
        );
    }

    #[test]
    fn test_decode_error_response() {
        let body = r#"{"status": "ERROR", "status_code": "BP-R-4", "status_message": "Field amount is invalid"}"#;
        let response: GatewayResponse = serde_json::from_str(body).unwrap();
        assert!(response.issued().is_none());
        assert_eq!(
            response.status_line().as_deref(),
            Some("BP-R-4: Field amount is invalid")
        );
    }

    #[test]
    fn test_success_without_redirect_is_not_issued() {
        let mut response = GatewayResponse::success("h", "u");
        response.redirect_url = None;
        assert!(response.issued().is_none());
        assert!(response.status_line().is_none());
    }
}
