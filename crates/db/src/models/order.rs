//! Order entity model and DTOs.

use fableloom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Order status before payment completes.
pub const ORDER_PENDING: &str = "pending";

/// Order status set by a verified checkout-completed webhook.
pub const ORDER_CONFIRMED: &str = "confirmed";

/// Order status for abandoned or rejected orders.
pub const ORDER_CANCELLED: &str = "cancelled";

/// The set of order statuses accepted by the admin status update.
pub const ORDER_STATUSES: &[&str] = &[ORDER_PENDING, ORDER_CONFIRMED, ORDER_CANCELLED];

/// Full order row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub user_id: DbId,
    pub book_title: String,
    pub quantity: i64,
    pub price: f64,
    pub total: f64,
    pub status: String,
    pub payment_id: Option<String>,
    pub shipping_line1: Option<String>,
    pub shipping_line2: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_postal_code: Option<String>,
    pub shipping_country: Option<String>,
    pub shipping_method: String,
    pub pdf_link: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order row joined with the owning customer's identity, for admin listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderWithCustomer {
    pub id: DbId,
    pub user_id: DbId,
    pub book_title: String,
    pub quantity: i64,
    pub price: f64,
    pub total: f64,
    pub status: String,
    pub payment_id: Option<String>,
    pub shipping_method: String,
    pub pdf_link: String,
    pub created_at: Timestamp,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_picture: String,
}

/// Shipping address as sent by clients (a JSON object, possibly delivered as
/// a string field inside a multipart form).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ShippingAddress {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// DTO for inserting a new order. The total is computed by the caller at
/// creation time and never recomputed.
#[derive(Debug)]
pub struct CreateOrder {
    pub user_id: DbId,
    pub book_title: String,
    pub quantity: i64,
    pub price: f64,
    pub total: f64,
    pub shipping_address: ShippingAddress,
    pub pdf_link: String,
}

/// Customer details copied from a completed checkout session.
#[derive(Debug, Default)]
pub struct CheckoutCustomer {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
}
