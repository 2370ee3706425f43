use super::request_builder::build_request;
use super::validator::{ErrorSet, validate};
use crate::domain::catalog::Catalog;
use crate::domain::order::{META_CHECKOUT_URL, META_PAYMENT_HASH, Order};
use crate::domain::payment::IssuedPayment;
use crate::domain::ports::{FlashMessages, FlashMessagesBox, GatewayClientBox, OrderStoreBox};
use crate::error::{PaylinkError, Result};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::{info, instrument, warn};

pub const ORDER_CREATED_NOTE: &str = "Order created via EBANX.";
pub const GENERIC_FAILURE: &str =
    "We couldn't create your EBANX order. Could you review your fields and try again?";
pub const ALREADY_IN_FLIGHT: &str = "A payment link is already being created for this order.";

/// Terminal state of one `create` invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    /// The order is not eligible at all; validation stopped at a gate.
    GatedOut(Vec<String>),
    /// Field checks failed; nothing was sent to EBANX.
    Invalid(Vec<String>),
    /// EBANX rejected the request or could not be reached.
    Failed(Vec<String>),
    /// Another invocation for the same order is still running.
    Busy(Vec<String>),
    Succeeded(IssuedPayment),
}

impl LinkOutcome {
    pub fn errors(&self) -> &[String] {
        match self {
            Self::GatedOut(e) | Self::Invalid(e) | Self::Failed(e) | Self::Busy(e) => e,
            Self::Succeeded(_) => &[],
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// State owned by a single invocation.
struct LinkContext<'a> {
    order: Order,
    catalog: &'a Catalog,
    errors: ErrorSet,
}

/// Removes the order from the in-flight set when the invocation ends.
struct InFlightGuard<'a> {
    in_flight: &'a Mutex<HashSet<u64>>,
    order_id: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.remove(&self.order_id);
    }
}

/// Issues EBANX payment links for pending orders.
///
/// Every call to [`create`](Self::create) validates the order, asks the gateway for
/// a link in redirect mode and, only on success, stores the payment hash and
/// checkout URL on the order. Failures end up as flash messages.
pub struct PaymentLinkService {
    orders: OrderStoreBox,
    gateway: GatewayClientBox,
    flash: FlashMessagesBox,
    catalog: Catalog,
    debug: bool,
    in_flight: Mutex<HashSet<u64>>,
}

impl PaymentLinkService {
    pub fn new(orders: OrderStoreBox, gateway: GatewayClientBox, flash: FlashMessagesBox) -> Self {
        Self {
            orders,
            gateway,
            flash,
            catalog: Catalog::default(),
            debug: false,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// In debug mode gateway rejections are reported with the raw EBANX code and message.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn flash(&self) -> &dyn FlashMessages {
        self.flash.as_ref()
    }

    /// Runs the whole pipeline for `order_id`.
    ///
    /// Validation, gateway and transport failures are reported through flash
    /// messages and returned in the outcome; only store failures are `Err`.
    #[instrument(skip(self))]
    pub async fn create(&self, order_id: u64) -> Result<LinkOutcome> {
        let Some(_guard) = self.claim(order_id) else {
            warn!(order_id, "payment link creation already in progress");
            let mut errors = ErrorSet::new();
            errors.add(ALREADY_IN_FLIGHT);
            self.send_errors(&errors).await;
            return Ok(LinkOutcome::Busy(errors.into_messages()));
        };

        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(PaylinkError::OrderNotFound(order_id))?;
        let mut ctx = LinkContext {
            order,
            catalog: &self.catalog,
            errors: ErrorSet::new(),
        };

        if let Some(gate) = validate(&ctx.order, ctx.catalog, &mut ctx.errors) {
            info!(order_id, ?gate, "order not eligible for a payment link");
            self.send_errors(&ctx.errors).await;
            return Ok(LinkOutcome::GatedOut(ctx.errors.into_messages()));
        }
        if !ctx.errors.is_empty() {
            info!(order_id, errors = ctx.errors.len(), "payment link validation failed");
            self.send_errors(&ctx.errors).await;
            return Ok(LinkOutcome::Invalid(ctx.errors.into_messages()));
        }

        let payload = match build_request(&ctx.order, ctx.catalog, Utc::now()) {
            Ok(payload) => payload,
            Err(e) => {
                ctx.errors.add(e.to_string());
                self.send_errors(&ctx.errors).await;
                return Ok(LinkOutcome::Invalid(ctx.errors.into_messages()));
            }
        };

        let response = match self.gateway.request(&payload).await {
            Ok(response) => response,
            Err(e) => {
                warn!(order_id, error = %e, "EBANX request failed");
                ctx.errors.add(e.to_string());
                self.send_errors(&ctx.errors).await;
                return Ok(LinkOutcome::Failed(ctx.errors.into_messages()));
            }
        };

        let Some(issued) = response.issued() else {
            warn!(
                order_id,
                status_code = response.status_code.as_deref().unwrap_or_default(),
                "EBANX rejected the payment link request"
            );
            let message = match response.status_line() {
                Some(line) if self.debug => line,
                _ => GENERIC_FAILURE.to_string(),
            };
            ctx.errors.add(message);
            self.send_errors(&ctx.errors).await;
            return Ok(LinkOutcome::Failed(ctx.errors.into_messages()));
        };

        self.post_request(order_id, &issued).await?;
        self.flash.clear_messages().await;
        info!(order_id, hash = %issued.hash, "payment link issued");
        Ok(LinkOutcome::Succeeded(issued))
    }

    fn claim(&self, order_id: u64) -> Option<InFlightGuard<'_>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.insert(order_id).then(|| InFlightGuard {
            in_flight: &self.in_flight,
            order_id,
        })
    }

    async fn post_request(&self, order_id: u64, issued: &IssuedPayment) -> Result<()> {
        self.orders
            .annotate(
                order_id,
                ORDER_CREATED_NOTE,
                &[
                    (META_PAYMENT_HASH, issued.hash.as_str()),
                    (META_CHECKOUT_URL, issued.redirect_url.as_str()),
                ],
            )
            .await
    }

    async fn send_errors(&self, errors: &ErrorSet) {
        self.flash.clear_messages().await;
        for error in errors.iter() {
            self.flash.add_message(error).await;
        }
    }
}
