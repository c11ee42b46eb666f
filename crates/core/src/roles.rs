//! Role and subscription-tier name constants.
//!
//! Roles and tiers are stored as lowercase strings on the `users` table and
//! compared against these constants everywhere, so a typo fails to match
//! instead of silently creating a new role.

/// Regular platform user.
pub const ROLE_USER: &str = "user";

/// Administrator (user management, catalog editing, order oversight).
pub const ROLE_ADMIN: &str = "admin";

/// Default subscription tier.
pub const SUBSCRIPTION_FREE: &str = "free";

/// Paid subscription tier unlocked via a completed checkout.
pub const SUBSCRIPTION_PREMIUM: &str = "premium";

/// Monthly income credited to a user on a premium upgrade.
pub const PREMIUM_INCOME: f64 = 20.0;
