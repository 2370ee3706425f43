use crate::domain::catalog::{ALL_METHODS, Catalog};
use crate::domain::order::Order;
use crate::domain::payment::PaymentRequestPayload;
use crate::error::{PaylinkError, Result};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Maps a validated order into the payload for the EBANX request API.
///
/// `now` feeds the merchant payment code so repeated requests for the same order
/// never collide on the EBANX side.
pub fn build_request(
    order: &Order,
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> Result<PaymentRequestPayload> {
    let payment_type_code = match order.chosen_method() {
        None => ALL_METHODS.to_string(),
        Some(method) => catalog
            .payment_type_code(method)
            .ok_or_else(|| PaylinkError::UnknownPaymentMethod(method.to_string()))?
            .to_string(),
    };

    Ok(PaymentRequestPayload {
        name: order.billing.full_name(),
        email: order.billing.email.clone(),
        country: order.billing.country_code(),
        payment_type_code,
        merchant_payment_code: merchant_payment_code(order.id, now),
        currency_code: order.currency.to_uppercase(),
        amount: order.total,
    })
}

/// `{order_id}_{32 hex chars}`, the hex being derived from `now`.
pub fn merchant_payment_code(order_id: u64, now: DateTime<Utc>) -> String {
    let nanos = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp());
    let digest = Sha256::digest(nanos.to_be_bytes());
    format!("{}_{}", order_id, hex::encode(&digest[..16]))
}
