//! User entity model and DTOs.

use chrono::NaiveDate;
use fableloom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash and token hashes -- NEVER serialize this to
/// API responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub mobile: String,
    pub location: Option<String>,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub profile_picture: String,
    pub preferred_language: String,
    pub role: String,
    pub subscription_type: String,
    pub income: f64,
    pub is_blocked: bool,
    pub refresh_token_hash: Option<String>,
    pub password_reset_token_hash: Option<String>,
    pub password_reset_expires: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no credential material).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub location: Option<String>,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub profile_picture: String,
    pub preferred_language: String,
    pub role: String,
    pub subscription_type: String,
    pub is_blocked: bool,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            mobile: user.mobile,
            location: user.location,
            gender: user.gender,
            date_of_birth: user.date_of_birth,
            profile_picture: user.profile_picture,
            preferred_language: user.preferred_language,
            role: user.role,
            subscription_type: user.subscription_type,
            is_blocked: user.is_blocked,
            created_at: user.created_at,
        }
    }
}

/// DTO for inserting a new user. The password is already hashed by the
/// caller; repositories never see plaintext credentials.
#[derive(Debug)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub mobile: String,
    pub location: Option<String>,
    pub gender: String,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_picture: String,
    pub role: String,
}

/// DTO for profile updates. Only non-`None` fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub location: Option<String>,
    #[serde(skip)]
    pub profile_picture: Option<String>,
}
