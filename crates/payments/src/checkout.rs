//! Hosted checkout-session creation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::PaymentError;

/// HTTP request timeout for a single checkout-session call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default payment-processor API base.
const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Next-day shipping surcharge in cents.
const NEXT_DAY_SHIPPING_CENTS: i64 = 1500;

/// Everything needed to build a hosted checkout page for one line item.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub product_name: String,
    /// Unit amount in the smallest currency unit (cents).
    pub unit_amount_cents: i64,
    pub quantity: i64,
    /// Metadata echoed back on the completion webhook; carries the internal
    /// order id or user id + subscription type.
    pub metadata: Vec<(String, String)>,
    pub success_url: String,
    pub cancel_url: String,
    /// Offer the free / next-day shipping choice (physical orders only).
    pub with_shipping_options: bool,
    /// Collect the customer's phone number on the hosted page.
    pub collect_phone: bool,
}

/// A created checkout session: its processor-side id and the redirect URL
/// handed back to the client.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Creates hosted checkout sessions with the payment processor.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a session and return its id and redirect URL.
    async fn create_session(&self, request: &CheckoutRequest)
        -> Result<CheckoutSession, PaymentError>;
}

/// Stripe-backed [`CheckoutProvider`] speaking the form-encoded
/// `/v1/checkout/sessions` API.
pub struct StripeCheckout {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeCheckout {
    /// Create a client authenticating with the given secret key.
    pub fn new(secret_key: String) -> Self {
        Self::with_api_base(secret_key, DEFAULT_API_BASE.to_string())
    }

    /// Create a client against a non-default API base (tests, mocks).
    pub fn with_api_base(secret_key: String, api_base: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            secret_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Flatten a [`CheckoutRequest`] into the processor's bracketed form
    /// parameters.
    fn form_params(request: &CheckoutRequest) -> Vec<(String, String)> {
        let mut params = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            (
                "line_items[0][price_data][currency]".to_string(),
                "usd".to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                request.product_name.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                request.unit_amount_cents.to_string(),
            ),
            (
                "line_items[0][quantity]".to_string(),
                request.quantity.to_string(),
            ),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
        ];

        if request.with_shipping_options {
            params.extend([
                (
                    "shipping_options[0][shipping_rate_data][type]".to_string(),
                    "fixed_amount".to_string(),
                ),
                (
                    "shipping_options[0][shipping_rate_data][fixed_amount][amount]".to_string(),
                    "0".to_string(),
                ),
                (
                    "shipping_options[0][shipping_rate_data][fixed_amount][currency]".to_string(),
                    "usd".to_string(),
                ),
                (
                    "shipping_options[0][shipping_rate_data][display_name]".to_string(),
                    "Free shipping".to_string(),
                ),
                (
                    "shipping_options[1][shipping_rate_data][type]".to_string(),
                    "fixed_amount".to_string(),
                ),
                (
                    "shipping_options[1][shipping_rate_data][fixed_amount][amount]".to_string(),
                    NEXT_DAY_SHIPPING_CENTS.to_string(),
                ),
                (
                    "shipping_options[1][shipping_rate_data][fixed_amount][currency]".to_string(),
                    "usd".to_string(),
                ),
                (
                    "shipping_options[1][shipping_rate_data][display_name]".to_string(),
                    "Next day air".to_string(),
                ),
            ]);
        }

        if request.collect_phone {
            params.push((
                "phone_number_collection[enabled]".to_string(),
                "true".to_string(),
            ));
        }

        for (key, value) in &request.metadata {
            params.push((format!("metadata[{key}]"), value.clone()));
        }

        params
    }
}

#[async_trait]
impl CheckoutProvider for StripeCheckout {
    async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let params = Self::form_params(request);

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<CheckoutSession>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            product_name: "My Memoir".to_string(),
            unit_amount_cents: 2500,
            quantity: 2,
            metadata: vec![("order_id".to_string(), "42".to_string())],
            success_url: "http://client/order-success/42".to_string(),
            cancel_url: "http://client/order-cancel/42".to_string(),
            with_shipping_options: true,
            collect_phone: true,
        }
    }

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn form_params_encode_the_line_item() {
        let params = StripeCheckout::form_params(&request());

        assert_eq!(param(&params, "mode"), Some("payment"));
        assert_eq!(
            param(&params, "line_items[0][price_data][product_data][name]"),
            Some("My Memoir")
        );
        assert_eq!(
            param(&params, "line_items[0][price_data][unit_amount]"),
            Some("2500")
        );
        assert_eq!(param(&params, "line_items[0][quantity]"), Some("2"));
        assert_eq!(param(&params, "metadata[order_id]"), Some("42"));
    }

    #[test]
    fn shipping_options_include_free_and_next_day() {
        let params = StripeCheckout::form_params(&request());

        assert_eq!(
            param(
                &params,
                "shipping_options[0][shipping_rate_data][fixed_amount][amount]"
            ),
            Some("0")
        );
        assert_eq!(
            param(
                &params,
                "shipping_options[1][shipping_rate_data][fixed_amount][amount]"
            ),
            Some("1500")
        );
        assert_eq!(
            param(&params, "phone_number_collection[enabled]"),
            Some("true")
        );
    }

    #[test]
    fn shipping_and_phone_are_omitted_when_disabled() {
        let mut req = request();
        req.with_shipping_options = false;
        req.collect_phone = false;
        let params = StripeCheckout::form_params(&req);

        assert!(param(&params, "shipping_options[0][shipping_rate_data][type]").is_none());
        assert!(param(&params, "phone_number_collection[enabled]").is_none());
    }
}
