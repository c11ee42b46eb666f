//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })` to get
//! compile-time type safety and consistent serialization.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "message": ..., "data": T }` envelope for mutations that also report
/// a human-readable outcome.
#[derive(Debug, Serialize)]
pub struct MessageResponse<T: Serialize> {
    pub message: &'static str,
    pub data: T,
}
