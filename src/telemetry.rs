use tracing_subscriber::EnvFilter;

/// Initializes tracing with `level` as the default filter for this crate.
///
/// `RUST_LOG`, when set, takes precedence. Output goes to stderr so command
/// output on stdout stays machine readable.
pub fn init_tracing(level: &str, json: bool) {
    let default_directive = format!("ebanx_paylink={}", level);
    let filter_directive = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter_directive))
        .with_writer(std::io::stderr);

    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}
