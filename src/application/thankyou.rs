//! Post-payment instructions shown on the order details page, keyed by gateway.

use crate::domain::order::{META_BANKING_TICKET_URL, META_CHECKOUT_URL, Order, OrderStatus};
use std::collections::HashMap;

pub const BANKING_TICKET: &str = "ebanx-banking-ticket";
pub const VIEW_BANKING_TICKET: &str = "View Banking Ticket";

/// Renders the thank-you content of one payment method.
pub trait ThankYouRenderer: Send + Sync {
    /// `None` when there is nothing to show for the order's current state.
    fn render(&self, order: &Order) -> Option<String>;
}

/// Gateways that hand the customer a voucher or redirect to pay later.
struct VoucherInstructions {
    title: &'static str,
    meta_key: &'static str,
}

impl ThankYouRenderer for VoucherInstructions {
    fn render(&self, order: &Order) -> Option<String> {
        if !matches!(order.status, OrderStatus::Pending | OrderStatus::OnHold) {
            return None;
        }
        let url = order.meta(self.meta_key).filter(|u| !u.is_empty())?;
        Some(format!("{}: complete your payment at {}", self.title, url))
    }
}

/// Gateways that settle immediately.
struct PaidInstructions {
    title: &'static str,
}

impl ThankYouRenderer for PaidInstructions {
    fn render(&self, order: &Order) -> Option<String> {
        match order.status {
            OrderStatus::Processing | OrderStatus::OnHold | OrderStatus::Completed => Some(
                format!("{}: your payment for order #{} was received.", self.title, order.id),
            ),
            _ => None,
        }
    }
}

/// Maps a gateway id to the handler rendering its thank-you content.
pub struct ThankYouRegistry {
    renderers: HashMap<String, Box<dyn ThankYouRenderer>>,
}

impl Default for ThankYouRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(
            BANKING_TICKET,
            VoucherInstructions {
                title: "Boleto",
                meta_key: META_BANKING_TICKET_URL,
            },
        );
        for (gateway, title) in [
            ("ebanx-oxxo", "OXXO"),
            ("ebanx-pagoefectivo", "PagoEfectivo"),
        ] {
            registry.register(
                gateway,
                VoucherInstructions {
                    title,
                    meta_key: META_CHECKOUT_URL,
                },
            );
        }
        for (gateway, title) in [
            ("ebanx-credit-card", "Credit Card"),
            ("ebanx-eft", "PSE"),
            ("ebanx-safetypay", "SafetyPay"),
            ("ebanx-servipag", "Servipag"),
            ("ebanx-tef", "Online Banking"),
        ] {
            registry.register(gateway, PaidInstructions { title });
        }
        registry
    }
}

impl ThankYouRegistry {
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    pub fn register(&mut self, gateway: &str, renderer: impl ThankYouRenderer + 'static) {
        self.renderers
            .insert(gateway.to_string(), Box::new(renderer));
    }

    pub fn is_registered(&self, gateway: &str) -> bool {
        self.renderers.contains_key(gateway)
    }

    /// Thank-you content for the order's payment method; unknown methods render nothing.
    pub fn render(&self, order: &Order) -> Option<String> {
        let method = order.chosen_method()?;
        self.renderers.get(method)?.render(order)
    }
}

/// An extra action offered next to an order in the customer's order list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAction {
    pub url: String,
    pub name: String,
}

/// Adds a "View Banking Ticket" action for unpaid boleto orders.
pub fn my_orders_actions(order: &Order, mut actions: Vec<OrderAction>) -> Vec<OrderAction> {
    if order.chosen_method() == Some(BANKING_TICKET)
        && matches!(order.status, OrderStatus::Pending | OrderStatus::OnHold)
        && let Some(url) = order.meta(META_BANKING_TICKET_URL).filter(|u| !u.is_empty())
    {
        actions.push(OrderAction {
            url: url.to_string(),
            name: VIEW_BANKING_TICKET.to_string(),
        });
    }
    actions
}
