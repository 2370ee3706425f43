use ebanx_paylink::domain::log::{LOGS_TABLE, NewLogEntry};
use ebanx_paylink::domain::order::{Billing, Order};
use ebanx_paylink::domain::ports::{FlashMessagesBox, LogStoreBox, OrderStoreBox};
use ebanx_paylink::infrastructure::in_memory::{
    InMemoryFlashMessages, InMemoryLogStore, InMemoryOrderStore,
};
use rust_decimal_macros::dec;
use serde_json::Map;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let order_store: OrderStoreBox = Box::new(InMemoryOrderStore::new());
    let log_store: LogStoreBox = Box::new(InMemoryLogStore::new("wp_"));
    let flash: FlashMessagesBox = Box::new(InMemoryFlashMessages::new());

    let order = Order::new(1, Billing::default(), dec!(100.0), "BRL");

    // Verify Send + Sync by spawning tasks
    let os_handle = tokio::spawn(async move {
        order_store.store(order).await.unwrap();
        order_store
            .annotate(1, "note", &[("_ebanx_payment_hash", "h")])
            .await
            .unwrap();
        order_store.get(1).await.unwrap().unwrap()
    });

    let ls_handle = tokio::spawn(async move {
        log_store.migrate().await.unwrap();
        let entry = NewLogEntry::new("checkout", &Map::new()).unwrap();
        log_store.insert(LOGS_TABLE, entry).await.unwrap()
    });

    let fl_handle = tokio::spawn(async move {
        flash.add_message("hello").await;
        flash.messages().await
    });

    let retrieved_order = os_handle.await.unwrap();
    assert_eq!(retrieved_order.meta("_ebanx_payment_hash"), Some("h"));

    let entry = ls_handle.await.unwrap();
    assert_eq!(entry.event, "checkout");

    assert_eq!(fl_handle.await.unwrap(), vec!["hello".to_string()]);
}
