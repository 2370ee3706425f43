use crate::domain::log::{LOGS_TABLE, LogEntry, NewLogEntry};
use crate::domain::order::Order;
use crate::domain::ports::{FlashMessages, LogStore, OrderStore};
use crate::error::{PaylinkError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for orders.
///
/// Uses `Arc<RwLock<HashMap<u64, Order>>>`; clones share the same orders.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<u64, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn store(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order);
        Ok(())
    }

    async fn get(&self, order_id: u64) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&order_id).cloned())
    }

    async fn annotate(&self, order_id: u64, note: &str, meta: &[(&str, &str)]) -> Result<()> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or(PaylinkError::OrderNotFound(order_id))?;
        order.notes.push(note.to_string());
        for (key, value) in meta {
            order.meta.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

/// Flash messages kept in memory until the next invocation clears them.
#[derive(Default, Clone)]
pub struct InMemoryFlashMessages {
    messages: Arc<RwLock<Vec<String>>>,
}

impl InMemoryFlashMessages {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlashMessages for InMemoryFlashMessages {
    async fn clear_messages(&self) {
        self.messages.write().await.clear();
    }

    async fn add_message(&self, message: &str) {
        self.messages.write().await.push(message.to_string());
    }

    async fn messages(&self) -> Vec<String> {
        self.messages.read().await.clone()
    }
}

#[derive(Default)]
struct LogTables {
    // Last id handed out per table; truncate resets it.
    sequences: HashMap<String, u64>,
    tables: HashMap<String, Vec<LogEntry>>,
}

/// In-memory log tables, addressed by their prefixed physical names.
#[derive(Default, Clone)]
pub struct InMemoryLogStore {
    prefix: String,
    inner: Arc<RwLock<LogTables>>,
}

impl InMemoryLogStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            inner: Arc::default(),
        }
    }

    fn physical(&self, table: &str) -> Result<String> {
        self.tables()
            .remove(table)
            .ok_or_else(|| PaylinkError::UnknownTable(table.to_string()))
    }
}

#[async_trait]
impl LogStore for InMemoryLogStore {
    fn tables(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(
            LOGS_TABLE.to_string(),
            format!("{}ebanx_{}", self.prefix, LOGS_TABLE),
        )])
    }

    async fn migrate(&self) -> Result<()> {
        let mut inner = self.inner.write().await;
        for name in self.tables().into_values() {
            inner.tables.entry(name).or_default();
        }
        Ok(())
    }

    async fn insert(&self, table: &str, entry: NewLogEntry) -> Result<LogEntry> {
        let name = self.physical(table)?;
        let mut inner = self.inner.write().await;
        if !inner.tables.contains_key(&name) {
            return Err(PaylinkError::UnknownTable(name));
        }
        let id = inner.sequences.entry(name.clone()).or_default();
        *id += 1;
        let entry = entry.with_id(*id);
        inner.tables.entry(name).or_default().push(entry.clone());
        Ok(entry)
    }

    async fn truncate(&self, table: &str) -> Result<()> {
        let name = self.physical(table)?;
        let mut inner = self.inner.write().await;
        if let Some(rows) = inner.tables.get_mut(&name) {
            rows.clear();
        }
        inner.sequences.remove(&name);
        Ok(())
    }

    async fn select(&self, table: &str) -> Result<Vec<LogEntry>> {
        let name = self.physical(table)?;
        let inner = self.inner.read().await;
        Ok(inner.tables.get(&name).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Billing;
    use rust_decimal_macros::dec;
    use serde_json::Map;

    #[tokio::test]
    async fn test_in_memory_order_store() {
        let store = InMemoryOrderStore::new();
        let order = Order::new(1, Billing::default(), dec!(10.0), "BRL");

        store.store(order.clone()).await.unwrap();

        let retrieved = store.get(1).await.unwrap().unwrap();
        assert_eq!(retrieved, order);
        assert!(store.get(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_annotate_applies_note_and_meta() {
        let store = InMemoryOrderStore::new();
        store
            .store(Order::new(3, Billing::default(), dec!(10.0), "BRL"))
            .await
            .unwrap();

        store
            .annotate(3, "created", &[("hash", "abc"), ("url", "https://x")])
            .await
            .unwrap();

        let order = store.get(3).await.unwrap().unwrap();
        assert_eq!(order.notes, vec!["created".to_string()]);
        assert_eq!(order.meta("hash"), Some("abc"));
        assert_eq!(order.meta("url"), Some("https://x"));

        assert!(matches!(
            store.annotate(4, "created", &[("hash", "abc")]).await,
            Err(PaylinkError::OrderNotFound(4))
        ));
    }

    #[tokio::test]
    async fn test_in_memory_flash_messages() {
        let flash = InMemoryFlashMessages::new();
        flash.add_message("one").await;
        flash.add_message("two").await;
        assert_eq!(flash.messages().await.len(), 2);

        flash.clear_messages().await;
        assert!(flash.messages().await.is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_log_store_lifecycle() {
        let store = InMemoryLogStore::new("wp_");
        assert_eq!(store.tables()[LOGS_TABLE], "wp_ebanx_logs");

        // Insert before migrate has no table to write into.
        let entry = NewLogEntry::new("checkout", &Map::new()).unwrap();
        assert!(store.insert(LOGS_TABLE, entry.clone()).await.is_err());

        store.migrate().await.unwrap();
        let first = store.insert(LOGS_TABLE, entry.clone()).await.unwrap();
        store.migrate().await.unwrap();
        let second = store.insert(LOGS_TABLE, entry.clone()).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(store.select(LOGS_TABLE).await.unwrap().len(), 2);

        // Truncate empties the table and restarts its ids.
        store.truncate(LOGS_TABLE).await.unwrap();
        assert!(store.select(LOGS_TABLE).await.unwrap().is_empty());

        let third = store.insert(LOGS_TABLE, entry).await.unwrap();
        assert_eq!(third.id, 1);
    }

    #[tokio::test]
    async fn test_in_memory_log_store_unknown_table() {
        let store = InMemoryLogStore::new("");
        assert!(matches!(
            store.select("orders").await,
            Err(PaylinkError::UnknownTable(t)) if t == "orders"
        ));
    }
}
