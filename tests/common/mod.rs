#![allow(dead_code)]

use assert_cmd::cargo_bin;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

pub const HEADER: &str =
    "id,status,first_name,last_name,email,country,total,currency,payment_method";

/// Writes `rows` under the orders CSV header into a temporary file.
pub fn orders_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

/// The binary configured against `base_url` with a test integration key.
pub fn paylink(base_url: &str) -> Command {
    let mut cmd = Command::new(cargo_bin!("ebanx-paylink"));
    cmd.env("PAYLINK__GATEWAY__INTEGRATION_KEY", "test_ik")
        .env("PAYLINK__GATEWAY__BASE_URL", base_url)
        .env("PAYLINK__LOG_LEVEL", "warn")
        .env_remove("RUST_LOG");
    cmd
}
