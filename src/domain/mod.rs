pub mod catalog;
pub mod log;
pub mod order;
pub mod payment;
pub mod ports;
