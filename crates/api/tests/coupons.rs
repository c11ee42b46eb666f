//! Coupon administration and the user-facing apply endpoint.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use fableloom_core::roles::ROLE_ADMIN;
use serde_json::json;
use sqlx::PgPool;

use common::{build_app, seed_regular_user, seed_user, send_json};

async fn create_coupon(
    app: &axum::Router,
    admin_token: &str,
    code: &str,
    discount: f64,
    starts_in_days: i64,
    ends_in_days: i64,
) -> (StatusCode, serde_json::Value) {
    let now = Utc::now();
    send_json(
        app,
        "POST",
        "/api/coupon",
        Some(admin_token),
        Some(json!({
            "name": format!("{code} promo"),
            "code": code,
            "discount": discount,
            "start_date": now + Duration::days(starts_in_days),
            "end_date": now + Duration::days(ends_in_days),
        })),
    )
    .await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn valid_coupon_discounts_the_total(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_admin, admin_token) = seed_user(&pool, "admin@x.com", ROLE_ADMIN).await;
    let (_user, token) = seed_regular_user(&pool, "shopper@x.com").await;

    let (status, _) = create_coupon(&app, &admin_token, "SPRING25", 25.0, -1, 1).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = send_json(
        &app,
        "POST",
        "/api/coupon/apply",
        Some(&token),
        Some(json!({ "code": "SPRING25", "total_price": 200.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["discount_amount"], 50.0);
    assert_eq!(response["final_price"], 150.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn coupon_outside_window_or_inactive_is_rejected(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_admin, admin_token) = seed_user(&pool, "admin@x.com", ROLE_ADMIN).await;
    let (_user, token) = seed_regular_user(&pool, "shopper@x.com").await;

    // Expired yesterday.
    create_coupon(&app, &admin_token, "EXPIRED", 10.0, -10, -1).await;
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/coupon/apply",
        Some(&token),
        Some(json!({ "code": "EXPIRED", "total_price": 100.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Not started yet.
    create_coupon(&app, &admin_token, "SOON", 10.0, 1, 10).await;
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/coupon/apply",
        Some(&token),
        Some(json!({ "code": "SOON", "total_price": 100.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Deactivated inside its window.
    let (_, response) = create_coupon(&app, &admin_token, "PAUSED", 10.0, -1, 1).await;
    let coupon_id = response["data"]["id"].as_i64().unwrap();
    send_json(
        &app,
        "PUT",
        &format!("/api/coupon/{coupon_id}"),
        Some(&admin_token),
        Some(json!({ "status": "inactive" })),
    )
    .await;
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/coupon/apply",
        Some(&token),
        Some(json!({ "code": "PAUSED", "total_price": 100.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_code_is_not_found(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_user, token) = seed_regular_user(&pool, "shopper@x.com").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/coupon/apply",
        Some(&token),
        Some(json!({ "code": "NOPE", "total_price": 100.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_code_conflicts(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_admin, admin_token) = seed_user(&pool, "admin@x.com", ROLE_ADMIN).await;

    let (status, _) = create_coupon(&app, &admin_token, "ONCE", 10.0, -1, 1).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = create_coupon(&app, &admin_token, "ONCE", 15.0, -1, 1).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn coupon_management_requires_admin(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_user, token) = seed_regular_user(&pool, "shopper@x.com").await;

    let (status, _) = create_coupon(&app, &token, "SNEAKY", 99.0, -1, 1).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(&app, "GET", "/api/coupon", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn listing_filters_by_status(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_admin, admin_token) = seed_user(&pool, "admin@x.com", ROLE_ADMIN).await;

    create_coupon(&app, &admin_token, "A", 10.0, -1, 1).await;
    let (_, response) = create_coupon(&app, &admin_token, "B", 10.0, -1, 1).await;
    let coupon_id = response["data"]["id"].as_i64().unwrap();
    send_json(
        &app,
        "PUT",
        &format!("/api/coupon/{coupon_id}"),
        Some(&admin_token),
        Some(json!({ "status": "inactive" })),
    )
    .await;

    let (_, response) = send_json(
        &app,
        "GET",
        "/api/coupon?status=active",
        Some(&admin_token),
        None,
    )
    .await;
    let active = response["data"].as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["code"], "A");
}
