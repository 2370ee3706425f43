use clap::{Parser, Subcommand};
use ebanx_paylink::application::loggers::{CheckoutLogger, EventLogger, PluginDeactivateLogger};
use ebanx_paylink::application::payment_link::{LinkOutcome, PaymentLinkService};
use ebanx_paylink::application::thankyou::{ThankYouRegistry, my_orders_actions};
use ebanx_paylink::config::Settings;
use ebanx_paylink::domain::log::LOGS_TABLE;
use ebanx_paylink::domain::ports::{
    FlashMessages, LogStore, LogStoreBox, OrderStore, OrderStoreBox,
};
use ebanx_paylink::infrastructure::ebanx_http::EbanxHttpClient;
use ebanx_paylink::infrastructure::in_memory::{
    InMemoryFlashMessages, InMemoryLogStore, InMemoryOrderStore,
};
use ebanx_paylink::interfaces::csv::log_writer::LogWriter;
use ebanx_paylink::interfaces::csv::order_reader::OrderReader;
use ebanx_paylink::telemetry::init_tracing;
use miette::{IntoDiagnostic, Result, miette};
use serde_json::{Map, json};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to config/paylink.* when present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Issue an EBANX payment link for an order
    Create {
        /// Orders CSV file
        #[arg(long)]
        orders: PathBuf,
        #[arg(long)]
        order_id: u64,
        /// Report raw EBANX status codes on rejection
        #[arg(long)]
        debug: bool,
    },
    /// Print the thank-you content and account actions of an order
    Thankyou {
        #[arg(long)]
        orders: PathBuf,
        #[arg(long)]
        order_id: u64,
    },
    /// Create the log tables if they do not exist
    Migrate,
    /// Record that the integration was deactivated
    Deactivate,
    /// Inspect or clear persisted logs
    Logs {
        #[command(subcommand)]
        action: LogsAction,
    },
}

#[derive(Subcommand)]
enum LogsAction {
    /// Write every log row to stdout as CSV
    Dump,
    /// Remove every log row
    Truncate,
}

fn open_stores(db_path: Option<PathBuf>, prefix: &str) -> Result<(OrderStoreBox, LogStoreBox)> {
    #[cfg(feature = "storage-rocksdb")]
    if let Some(db_path) = db_path {
        use ebanx_paylink::infrastructure::rocksdb::RocksDBStore;

        let store = RocksDBStore::open(db_path, prefix).into_diagnostic()?;
        let order_store: OrderStoreBox = Box::new(store.clone());
        let log_store: LogStoreBox = Box::new(store);
        return Ok((order_store, log_store));
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }

    let order_store: OrderStoreBox = Box::new(InMemoryOrderStore::new());
    let log_store: LogStoreBox = Box::new(InMemoryLogStore::new(prefix));
    Ok((order_store, log_store))
}

/// Loads orders from CSV, leaving orders already known to the store untouched.
async fn import_orders(path: &Path, store: &dyn OrderStore) -> Result<()> {
    let file = File::open(path).into_diagnostic()?;
    let reader = OrderReader::new(file);
    for order_result in reader.orders() {
        match order_result {
            Ok(order) => {
                if store.get(order.id).await.into_diagnostic()?.is_none() {
                    store.store(order).await.into_diagnostic()?;
                }
            }
            Err(e) => {
                eprintln!("Error reading order: {}", e);
            }
        }
    }
    Ok(())
}

fn outcome_label(outcome: &LinkOutcome) -> &'static str {
    match outcome {
        LinkOutcome::GatedOut(_) => "gated_out",
        LinkOutcome::Invalid(_) => "invalid",
        LinkOutcome::Failed(_) => "failed",
        LinkOutcome::Busy(_) => "busy",
        LinkOutcome::Succeeded(_) => "succeeded",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).into_diagnostic()?;
    init_tracing(&settings.log_level, settings.log_json);
    info!(sandbox = settings.gateway.sandbox, "configuration loaded");

    let (order_store, log_store) = open_stores(cli.db_path, &settings.table_prefix)?;
    log_store.migrate().await.into_diagnostic()?;

    match cli.command {
        Command::Create {
            orders,
            order_id,
            debug,
        } => {
            import_orders(&orders, order_store.as_ref()).await?;
            settings.gateway.validate().into_diagnostic()?;

            let gateway = EbanxHttpClient::new(&settings.gateway).into_diagnostic()?;
            let service = PaymentLinkService::new(
                order_store,
                Box::new(gateway),
                Box::new(InMemoryFlashMessages::new()),
            )
            .with_catalog(settings.catalog.clone())
            .with_debug(debug || settings.gateway.debug);

            let outcome = service.create(order_id).await.into_diagnostic()?;

            let mut data = Map::new();
            data.insert("order_id".into(), json!(order_id));
            data.insert("outcome".into(), json!(outcome_label(&outcome)));
            data.insert("errors".into(), json!(outcome.errors()));
            CheckoutLogger::persist(log_store.as_ref(), data)
                .await
                .into_diagnostic()?;

            match outcome {
                LinkOutcome::Succeeded(issued) => {
                    println!("payment_hash,checkout_url");
                    println!("{},{}", issued.hash, issued.redirect_url);
                }
                _ => {
                    for message in service.flash().messages().await {
                        eprintln!("{}", message);
                    }
                    return Err(miette!("No payment link was issued for order {}", order_id));
                }
            }
        }
        Command::Thankyou { orders, order_id } => {
            import_orders(&orders, order_store.as_ref()).await?;
            let order = order_store
                .get(order_id)
                .await
                .into_diagnostic()?
                .ok_or_else(|| miette!("Order {} not found", order_id))?;

            if let Some(content) = ThankYouRegistry::default().render(&order) {
                println!("{}", content);
            }
            for action in my_orders_actions(&order, Vec::new()) {
                println!("{}: {}", action.name, action.url);
            }
        }
        Command::Migrate => {
            for (logical, physical) in log_store.tables() {
                println!("{} -> {}", logical, physical);
            }
        }
        Command::Deactivate => {
            PluginDeactivateLogger::persist(log_store.as_ref(), Map::new())
                .await
                .into_diagnostic()?;
        }
        Command::Logs { action } => match action {
            LogsAction::Dump => {
                let entries = log_store.select(LOGS_TABLE).await.into_diagnostic()?;
                let stdout = io::stdout();
                let mut writer = LogWriter::new(stdout.lock());
                writer.write_entries(entries).into_diagnostic()?;
            }
            LogsAction::Truncate => {
                log_store.truncate(LOGS_TABLE).await.into_diagnostic()?;
            }
        },
    }

    Ok(())
}
