//! Repository for the `orders` table.

use fableloom_core::types::DbId;
use sqlx::PgPool;

use crate::models::order::{CheckoutCustomer, CreateOrder, Order, OrderWithCustomer};

const COLUMNS: &str = "id, user_id, book_title, quantity, price, total, status, payment_id, \
                        shipping_line1, shipping_line2, shipping_city, shipping_state, \
                        shipping_postal_code, shipping_country, shipping_method, pdf_link, \
                        customer_email, customer_phone, customer_name, created_at, updated_at";

/// Provides CRUD operations for orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert a new pending order, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders (user_id, book_title, quantity, price, total,
                                 shipping_line1, shipping_line2, shipping_city, shipping_state,
                                 shipping_postal_code, shipping_country, pdf_link)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(input.user_id)
            .bind(&input.book_title)
            .bind(input.quantity)
            .bind(input.price)
            .bind(input.total)
            .bind(&input.shipping_address.line1)
            .bind(&input.shipping_address.line2)
            .bind(&input.shipping_address.city)
            .bind(&input.shipping_address.state)
            .bind(&input.shipping_address.postal_code)
            .bind(&input.shipping_address.country)
            .bind(&input.pdf_link)
            .fetch_one(pool)
            .await
    }

    /// Find an order by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every order joined with its customer, newest first (admin view).
    pub async fn list_with_customers(pool: &PgPool) -> Result<Vec<OrderWithCustomer>, sqlx::Error> {
        sqlx::query_as::<_, OrderWithCustomer>(
            "SELECT o.id, o.user_id, o.book_title, o.quantity, o.price, o.total, o.status,
                    o.payment_id, o.shipping_method, o.pdf_link, o.created_at,
                    u.first_name, u.last_name, u.email, u.profile_picture
             FROM orders o
             JOIN users u ON u.id = o.user_id
             ORDER BY o.created_at DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// Overwrite an order's status (admin path, already validated).
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Confirm an order from a completed checkout: status, payment id, and
    /// the customer details reported by the payment processor.
    ///
    /// A full overwrite, so webhook replays re-apply the same values.
    pub async fn confirm_payment(
        pool: &PgPool,
        id: DbId,
        payment_id: &str,
        customer: &CheckoutCustomer,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET
                status = 'confirmed',
                payment_id = $2,
                customer_email = COALESCE($3, customer_email),
                customer_phone = COALESCE($4, customer_phone),
                customer_name = COALESCE($5, customer_name),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(payment_id)
            .bind(&customer.email)
            .bind(&customer.phone)
            .bind(&customer.name)
            .fetch_optional(pool)
            .await
    }
}
