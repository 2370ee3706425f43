//! Application layer orchestrating the payment link workflow.
//!
//! `PaymentLinkService` is the primary entry point: it validates an order, builds
//! the EBANX request and records the result through the domain ports.

pub mod loggers;
pub mod payment_link;
pub mod request_builder;
pub mod thankyou;
pub mod validator;
