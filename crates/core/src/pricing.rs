//! Order and subscription-plan pricing rules.

use crate::error::CoreError;

/// Compute an order total at creation time.
///
/// Quantity and price must both be positive; the total is always
/// `quantity * price` and is never recomputed after creation.
pub fn order_total(quantity: i64, price: f64) -> Result<f64, CoreError> {
    if quantity <= 0 {
        return Err(CoreError::Validation(
            "Quantity must be greater than zero".into(),
        ));
    }
    if price <= 0.0 {
        return Err(CoreError::Validation(
            "Price must be greater than zero".into(),
        ));
    }
    Ok(quantity as f64 * price)
}

/// Compute a subscription plan's discounted price from its base price and
/// discount percentage.
///
/// Recomputed on every save so the stored `discounted_price` can never drift
/// from `price` and `discount`. A zero discount yields the base price.
pub fn discounted_price(price: f64, discount: f64) -> f64 {
    if discount > 0.0 {
        price - price * discount / 100.0
    } else {
        price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_quantity_times_price() {
        assert_eq!(order_total(3, 25.0).unwrap(), 75.0);
        assert_eq!(order_total(1, 49.99).unwrap(), 49.99);
    }

    #[test]
    fn non_positive_quantity_or_price_is_rejected() {
        assert!(order_total(0, 25.0).is_err());
        assert!(order_total(-2, 25.0).is_err());
        assert!(order_total(1, 0.0).is_err());
        assert!(order_total(1, -5.0).is_err());
    }

    #[test]
    fn discounted_price_applies_percentage() {
        assert_eq!(discounted_price(100.0, 30.0), 70.0);
        assert_eq!(discounted_price(80.0, 0.0), 80.0);
    }
}
