use super::log::{LogEntry, NewLogEntry};
use super::order::Order;
use super::payment::{GatewayResponse, PaymentRequestPayload};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Access to the host platform's orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn store(&self, order: Order) -> Result<()>;
    async fn get(&self, order_id: u64) -> Result<Option<Order>>;
    /// Adds `note` and every `meta` entry in one write; on error nothing is applied.
    async fn annotate(&self, order_id: u64, note: &str, meta: &[(&str, &str)]) -> Result<()>;
}

/// Client for the EBANX request API, always used in non-direct (redirect) mode.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn request(
        &self,
        payload: &PaymentRequestPayload,
    ) -> std::result::Result<GatewayResponse, GatewayError>;
}

/// User-facing notices shown after an admin action.
#[async_trait]
pub trait FlashMessages: Send + Sync {
    async fn clear_messages(&self);
    async fn add_message(&self, message: &str);
    async fn messages(&self) -> Vec<String>;
}

/// Append-only event log tables.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Logical table name to physical table name.
    fn tables(&self) -> BTreeMap<String, String>;
    /// Creates missing tables; a no-op for existing ones.
    async fn migrate(&self) -> Result<()>;
    async fn insert(&self, table: &str, entry: NewLogEntry) -> Result<LogEntry>;
    async fn truncate(&self, table: &str) -> Result<()>;
    async fn select(&self, table: &str) -> Result<Vec<LogEntry>>;
}

pub type OrderStoreBox = Box<dyn OrderStore>;
pub type GatewayClientBox = Box<dyn GatewayClient>;
pub type FlashMessagesBox = Box<dyn FlashMessages>;
pub type LogStoreBox = Box<dyn LogStore>;
