use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Logical name of the table holding plugin events.
pub const LOGS_TABLE: &str = "logs";
/// Longest event name the log table accepts.
pub const MAX_EVENT_LEN: usize = 150;

/// One persisted log row.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LogEntry {
    /// Assigned by the store on insert; unique and increasing.
    pub id: u64,
    pub time: DateTime<Utc>,
    pub event: String,
    /// Serialized JSON payload.
    pub log: Vec<u8>,
}

/// A log row before the store assigns its id.
#[derive(Debug, PartialEq, Clone)]
pub struct NewLogEntry {
    pub time: DateTime<Utc>,
    pub event: String,
    pub log: Vec<u8>,
}

impl NewLogEntry {
    pub fn new(event: &str, payload: &Map<String, Value>) -> serde_json::Result<Self> {
        let event: String = event.chars().take(MAX_EVENT_LEN).collect();
        Ok(Self {
            time: Utc::now(),
            event,
            log: serde_json::to_vec(payload)?,
        })
    }

    pub fn with_id(self, id: u64) -> LogEntry {
        LogEntry {
            id,
            time: self.time,
            event: self.event,
            log: self.log,
        }
    }
}

impl LogEntry {
    pub fn payload(&self) -> serde_json::Result<Map<String, Value>> {
        serde_json::from_slice(&self.log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_name_is_truncated() {
        let long = "x".repeat(MAX_EVENT_LEN + 20);
        let entry = NewLogEntry::new(&long, &Map::new()).unwrap();
        assert_eq!(entry.event.len(), MAX_EVENT_LEN);
    }

    #[test]
    fn test_payload_survives_storage_format() {
        let mut payload = Map::new();
        payload.insert("order".into(), json!(42));
        let entry = NewLogEntry::new("checkout", &payload).unwrap().with_id(7);
        assert_eq!(entry.id, 7);
        assert_eq!(entry.payload().unwrap()["order"], json!(42));
    }
}
