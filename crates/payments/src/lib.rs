//! Payment-processor integration: hosted checkout sessions and signed
//! webhook verification.
//!
//! Checkout-session creation sits behind the [`CheckoutProvider`] trait so
//! the order and subscription flows can be tested with an in-process fake.
//! Webhook verification is pure (no I/O) and lives in [`webhook`].

pub mod checkout;
pub mod webhook;

pub use checkout::{CheckoutProvider, CheckoutRequest, CheckoutSession, StripeCheckout};

/// Errors from the payment-processor layer.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The processor returned a non-2xx status code.
    #[error("Payment API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The webhook signature header is missing, malformed, stale, or wrong.
    #[error("Webhook signature verification failed: {0}")]
    InvalidSignature(String),

    /// The webhook payload could not be parsed as an event.
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}
