use crate::domain::order::{Billing, Order, OrderStatus};
use crate::error::{PaylinkError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

/// One CSV row: `id, status, first_name, last_name, email, country, total, currency, payment_method`.
#[derive(Debug, Deserialize)]
struct OrderRecord {
    id: u64,
    status: OrderStatus,
    first_name: String,
    last_name: String,
    email: String,
    country: String,
    total: Decimal,
    currency: String,
    payment_method: Option<String>,
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        let billing = Billing {
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            country: record.country,
        };
        let mut order =
            Order::new(record.id, billing, record.total, record.currency).with_status(record.status);
        order.payment_method = record.payment_method.filter(|m| !m.is_empty());
        order
    }
}

/// Reads orders from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<Order>`.
/// It handles whitespace trimming and flexible record lengths automatically.
pub struct OrderReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OrderReader<R> {
    /// Creates a new `OrderReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes orders.
    pub fn orders(self) -> impl Iterator<Item = Result<Order>> {
        self.reader
            .into_deserialize::<OrderRecord>()
            .map(|result| result.map(Order::from).map_err(PaylinkError::from))
    }
}
