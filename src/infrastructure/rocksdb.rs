use crate::domain::log::{LOGS_TABLE, LogEntry, NewLogEntry};
use crate::domain::order::Order;
use crate::domain::ports::{LogStore, OrderStore};
use crate::error::{PaylinkError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing orders.
pub const CF_ORDERS: &str = "orders";
/// Column Family for storing log rows of every log table.
pub const CF_LOGS: &str = "logs";
/// Column Family for schema markers and id sequences.
pub const CF_META: &str = "meta";

fn internal(message: String) -> PaylinkError {
    PaylinkError::InternalError(Box::new(std::io::Error::other(message)))
}

/// A persistent store implementation using RocksDB.
///
/// Orders are JSON values keyed by their big-endian id. Log rows of a table are
/// keyed by `{table}\0{id}` so a table can be scanned or truncated as one range.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    prefix: String,
    // Serializes read-modify-write of orders and log sequences.
    write_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    /// * `prefix` - Prefix of the physical log table names.
    pub fn open<P: AsRef<Path>>(path: P, prefix: impl Into<String>) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = [CF_ORDERS, CF_LOGS, CF_META]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, cfs)?;

        Ok(Self {
            db: Arc::new(db),
            prefix: prefix.into(),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| internal(format!("{} column family not found", name)))
    }

    fn physical(&self, table: &str) -> Result<String> {
        self.tables()
            .remove(table)
            .ok_or_else(|| PaylinkError::UnknownTable(table.to_string()))
    }

    fn schema_key(name: &str) -> Vec<u8> {
        format!("schema:{}", name).into_bytes()
    }

    fn sequence_key(name: &str) -> Vec<u8> {
        format!("seq:{}", name).into_bytes()
    }

    fn row_prefix(name: &str) -> Vec<u8> {
        let mut key = name.as_bytes().to_vec();
        key.push(0);
        key
    }

    fn ensure_migrated(&self, name: &str) -> Result<()> {
        let meta = self.cf(CF_META)?;
        if self.db.get_pinned_cf(meta, Self::schema_key(name))?.is_none() {
            return Err(PaylinkError::UnknownTable(name.to_string()));
        }
        Ok(())
    }

    fn load_order(&self, order_id: u64) -> Result<Option<Order>> {
        let cf = self.cf(CF_ORDERS)?;
        match self.db.get_cf(cf, order_id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save_order(&self, order: &Order) -> Result<()> {
        let cf = self.cf(CF_ORDERS)?;
        self.db
            .put_cf(cf, order.id.to_be_bytes(), serde_json::to_vec(order)?)?;
        Ok(())
    }

    async fn modify_order(&self, order_id: u64, apply: impl FnOnce(&mut Order)) -> Result<()> {
        let _lock = self.write_lock.lock().await;
        let mut order = self
            .load_order(order_id)?
            .ok_or(PaylinkError::OrderNotFound(order_id))?;
        apply(&mut order);
        self.save_order(&order)
    }
}

#[async_trait]
impl OrderStore for RocksDBStore {
    async fn store(&self, order: Order) -> Result<()> {
        let _lock = self.write_lock.lock().await;
        self.save_order(&order)
    }

    async fn get(&self, order_id: u64) -> Result<Option<Order>> {
        self.load_order(order_id)
    }

    async fn annotate(&self, order_id: u64, note: &str, meta: &[(&str, &str)]) -> Result<()> {
        self.modify_order(order_id, |order| {
            order.notes.push(note.to_string());
            for (key, value) in meta {
                order.meta.insert(key.to_string(), value.to_string());
            }
        })
        .await
    }
}

#[async_trait]
impl LogStore for RocksDBStore {
    fn tables(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(
            LOGS_TABLE.to_string(),
            format!("{}ebanx_{}", self.prefix, LOGS_TABLE),
        )])
    }

    async fn migrate(&self) -> Result<()> {
        let meta = self.cf(CF_META)?;
        for name in self.tables().into_values() {
            let key = Self::schema_key(&name);
            if self.db.get_pinned_cf(meta, &key)?.is_some() {
                continue;
            }
            self.db.put_cf(meta, &key, b"1")?;
        }
        Ok(())
    }

    async fn insert(&self, table: &str, entry: NewLogEntry) -> Result<LogEntry> {
        let name = self.physical(table)?;
        self.ensure_migrated(&name)?;

        let _lock = self.write_lock.lock().await;
        let meta = self.cf(CF_META)?;
        let seq_key = Self::sequence_key(&name);
        let last = match self.db.get_cf(meta, &seq_key)? {
            Some(bytes) => u64::from_be_bytes(
                bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| internal(format!("Corrupt sequence for {}", name)))?,
            ),
            None => 0,
        };
        let entry = entry.with_id(last + 1);

        let mut key = Self::row_prefix(&name);
        key.extend_from_slice(&entry.id.to_be_bytes());
        self.db
            .put_cf(self.cf(CF_LOGS)?, key, serde_json::to_vec(&entry)?)?;
        self.db.put_cf(meta, &seq_key, entry.id.to_be_bytes())?;

        Ok(entry)
    }

    async fn truncate(&self, table: &str) -> Result<()> {
        let name = self.physical(table)?;
        self.ensure_migrated(&name)?;

        let _lock = self.write_lock.lock().await;
        let from = Self::row_prefix(&name);
        let mut to = name.as_bytes().to_vec();
        to.push(1);
        self.db.delete_range_cf(self.cf(CF_LOGS)?, from, to)?;
        self.db.delete_cf(self.cf(CF_META)?, Self::sequence_key(&name))?;
        Ok(())
    }

    async fn select(&self, table: &str) -> Result<Vec<LogEntry>> {
        let name = self.physical(table)?;
        self.ensure_migrated(&name)?;

        let prefix = Self::row_prefix(&name);
        let iter = self.db.iterator_cf(
            self.cf(CF_LOGS)?,
            IteratorMode::From(&prefix, Direction::Forward),
        );

        let mut rows = Vec::new();
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            rows.push(serde_json::from_slice(&value)?);
        }
        Ok(rows)
    }
}
