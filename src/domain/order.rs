use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key holding the hash EBANX assigned to the payment.
pub const META_PAYMENT_HASH: &str = "_ebanx_payment_hash";
/// Metadata key holding the hosted checkout URL of an issued payment link.
pub const META_CHECKOUT_URL: &str = "_ebanx_checkout_url";
/// Metadata key holding the printable banking ticket of a boleto payment.
pub const META_BANKING_TICKET_URL: &str = "Banking Ticket URL";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    #[default]
    Pending,
    OnHold,
    Processing,
    Completed,
    Cancelled,
    Refunded,
    Failed,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::OnHold => "on-hold",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Billing details the customer entered at checkout.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Billing {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Two-letter country code, in whatever case the store captured it.
    pub country: String,
}

impl Billing {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn country_code(&self) -> String {
        self.country.to_lowercase()
    }
}

/// A commerce order as owned by the host platform.
///
/// The payment link pipeline only reads it; notes and metadata are written back
/// through [`OrderStore`](crate::domain::ports::OrderStore).
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Order {
    pub id: u64,
    pub status: OrderStatus,
    pub billing: Billing,
    pub total: Decimal,
    /// Store currency the order was placed in.
    pub currency: String,
    /// Gateway id chosen at checkout (e.g. `ebanx-oxxo`), if any.
    pub payment_method: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl Order {
    pub fn new(id: u64, billing: Billing, total: Decimal, currency: impl Into<String>) -> Self {
        Self {
            id,
            status: OrderStatus::Pending,
            billing,
            total,
            currency: currency.into(),
            payment_method: None,
            notes: Vec::new(),
            meta: BTreeMap::new(),
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// Chosen payment method, treating an empty string as "not chosen yet".
    pub fn chosen_method(&self) -> Option<&str> {
        self.payment_method.as_deref().filter(|m| !m.is_empty())
    }
}
