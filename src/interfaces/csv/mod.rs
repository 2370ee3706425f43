pub mod log_writer;
pub mod order_reader;
