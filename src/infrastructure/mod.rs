pub mod ebanx_http;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
