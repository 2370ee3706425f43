use crate::domain::log::{LOGS_TABLE, LogEntry, NewLogEntry};
use crate::domain::ports::LogStore;
use crate::error::Result;
use serde_json::{Map, Value, json};
use tracing::debug;

/// Environment details attached to every persisted event.
pub fn platform_info() -> Map<String, Value> {
    let mut info = Map::new();
    info.insert(
        "platform".into(),
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }),
    );
    info.insert(
        "server".into(),
        json!({
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }),
    );
    info
}

/// Persists one kind of event into the logs table.
///
/// The stored payload is [`platform_info`] merged with the caller's data; caller
/// keys win on conflict.
pub trait EventLogger {
    const EVENT: &'static str;

    #[allow(async_fn_in_trait)]
    async fn persist(store: &dyn LogStore, data: Map<String, Value>) -> Result<LogEntry> {
        let mut payload = platform_info();
        payload.extend(data);
        let entry = NewLogEntry::new(Self::EVENT, &payload)?;
        debug!(event = Self::EVENT, "persisting log event");
        store.insert(LOGS_TABLE, entry).await
    }
}

/// Checkout attempts and their outcome.
pub struct CheckoutLogger;

impl EventLogger for CheckoutLogger {
    const EVENT: &'static str = "checkout";
}

/// The integration being switched off.
pub struct PluginDeactivateLogger;

impl EventLogger for PluginDeactivateLogger {
    const EVENT: &'static str = "plugin_deactivate";
}
