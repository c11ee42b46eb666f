//! Coupon validity window checks and discount math.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Coupon status value for a redeemable coupon.
pub const COUPON_ACTIVE: &str = "active";

/// Coupon status value for a disabled coupon.
pub const COUPON_INACTIVE: &str = "inactive";

/// Result of applying a percentage coupon to an order total.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCoupon {
    pub discount_amount: f64,
    pub final_price: f64,
}

/// Check that a coupon is redeemable at `now`.
///
/// A coupon applies only when its status is `active` and `now` falls inside
/// the inclusive `[start_date, end_date]` window.
pub fn check_validity(
    status: &str,
    start_date: Timestamp,
    end_date: Timestamp,
    now: Timestamp,
) -> Result<(), CoreError> {
    if status != COUPON_ACTIVE {
        return Err(CoreError::Validation("Coupon is not active".into()));
    }
    if now < start_date || now > end_date {
        return Err(CoreError::Validation(
            "Coupon is not valid at this time".into(),
        ));
    }
    Ok(())
}

/// Apply a percentage discount to a total price.
///
/// `discount` is a percentage in [0, 100]; values outside that range are
/// rejected rather than clamped.
pub fn apply_discount(total_price: f64, discount: f64) -> Result<AppliedCoupon, CoreError> {
    if !(0.0..=100.0).contains(&discount) {
        return Err(CoreError::Validation(
            "Discount must be between 0 and 100".into(),
        ));
    }
    if total_price < 0.0 {
        return Err(CoreError::Validation(
            "Total price must not be negative".into(),
        ));
    }
    let discount_amount = total_price * discount / 100.0;
    Ok(AppliedCoupon {
        discount_amount,
        final_price: total_price - discount_amount,
    })
}
