use crate::domain::catalog::{Catalog, EBANX_ACCOUNT};
use crate::domain::order::{Order, OrderStatus};
use rust_decimal::Decimal;
use std::collections::HashSet;

pub const NOT_PENDING: &str = "You can only create payment links on pending orders.";
pub const MIN_AMOUNT: &str = "The total amount needs to be greater than $1.";
pub const UNSUPPORTED_COUNTRY: &str = "EBANX only support the countries: Brazil, Mexico, Peru, Colombia and Chile. Please, use one of these.";
pub const INVALID_EMAIL: &str =
    "The customer e-mail is required, please provide a valid customer e-mail.";
pub const ACCOUNT_UNAVAILABLE: &str = "Paying with EBANX account is not available yet.";
pub const UNSUPPORTED_METHOD: &str = "EBANX does not support the selected payment method.";
pub const METHOD_NOT_IN_COUNTRY: &str =
    "The selected payment method is not available on the selected country.";

pub fn currency_not_accepted(currency: &str) -> String {
    format!("We can't process {} in the selected country.", currency)
}

/// Error messages deduplicated by content, kept in the order they were raised.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ErrorSet {
    seen: HashSet<String>,
    messages: Vec<String>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the same text was already recorded.
    pub fn add(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        if self.seen.insert(message.clone()) {
            self.messages.push(message);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

/// Why validation stopped before running the field checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    NotPending,
    AccountMethod,
}

/// Runs every payment link check against `order`, recording failures in `errors`.
///
/// A non-pending order records only [`NOT_PENDING`], and an order paying with the
/// EBANX account records only [`ACCOUNT_UNAVAILABLE`]. Otherwise all checks run
/// and every distinct failure is kept. Returns the gate that stopped validation, if any.
pub fn validate(order: &Order, catalog: &Catalog, errors: &mut ErrorSet) -> Option<Gate> {
    if order.status != OrderStatus::Pending {
        errors.add(NOT_PENDING);
        return Some(Gate::NotPending);
    }
    if order.chosen_method() == Some(EBANX_ACCOUNT) {
        errors.add(ACCOUNT_UNAVAILABLE);
        return Some(Gate::AccountMethod);
    }

    check_currency_over_country(order, catalog, errors);
    check_min_amount(order, errors);
    check_supported_country(order, catalog, errors);
    check_valid_email(order, errors);
    if let Some(method) = order.chosen_method() {
        check_payment_method(order, method, catalog, errors);
    }
    None
}

fn check_currency_over_country(order: &Order, catalog: &Catalog, errors: &mut ErrorSet) {
    let currency = order.currency.to_uppercase();
    if !catalog.accepts_currency(&order.billing.country_code(), &currency) {
        errors.add(currency_not_accepted(&currency));
    }
}

fn check_min_amount(order: &Order, errors: &mut ErrorSet) {
    if order.total < Decimal::ONE {
        errors.add(MIN_AMOUNT);
    }
}

fn check_supported_country(order: &Order, catalog: &Catalog, errors: &mut ErrorSet) {
    if !catalog.supports_country(&order.billing.country_code()) {
        errors.add(UNSUPPORTED_COUNTRY);
    }
}

fn check_valid_email(order: &Order, errors: &mut ErrorSet) {
    let email = order.billing.email.as_str();
    // The host part must be a dotted domain.
    let dotted_domain = email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'));
    if !::validator::validate_email(email) || !dotted_domain {
        errors.add(INVALID_EMAIL);
    }
}

fn check_payment_method(order: &Order, method: &str, catalog: &Catalog, errors: &mut ErrorSet) {
    if catalog.payment_type_code(method).is_none() {
        errors.add(UNSUPPORTED_METHOD);
    } else if let Some(allowed) = catalog.allowed_gateways(&order.billing.country_code())
        && !allowed.iter().any(|g| g == method)
    {
        errors.add(METHOD_NOT_IN_COUNTRY);
    }
}
