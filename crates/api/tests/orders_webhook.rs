//! Order creation, the checkout handoff, and the signed completion webhook.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use fableloom_core::roles::ROLE_ADMIN;
use fableloom_db::models::subscription_plan::CreateSubscriptionPlan;
use fableloom_db::repositories::{OrderRepo, SubscriptionPlanRepo, UserRepo};
use fableloom_payments::webhook::sign_payload;
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{
    build_app, multipart_body, seed_regular_user, seed_user, send_json, send_multipart,
    WEBHOOK_SECRET,
};

/// POST a raw webhook payload with the given signature header.
async fn post_webhook(
    app: &axum::Router,
    payload: &[u8],
    signature: &str,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .header("stripe-signature", signature)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_vec()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn completed_event(metadata: serde_json::Value) -> Vec<u8> {
    json!({
        "id": "evt_1",
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_1",
                "metadata": metadata,
                "customer_details": {
                    "email": "buyer@x.com",
                    "phone": "+15550100",
                    "name": "Ada Lovelace",
                },
            }
        }
    })
    .to_string()
    .into_bytes()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn order_creation_hands_off_to_checkout(pool: PgPool) {
    let (app, checkout) = build_app(pool.clone());
    let (user, token) = seed_regular_user(&pool, "buyer@x.com").await;

    let body = multipart_body(
        &[
            ("book_title", "My Memoir"),
            ("quantity", "2"),
            ("price", "25"),
            (
                "shipping_address",
                r#"{"line1":"1 Main St","city":"Springfield","country":"US"}"#,
            ),
        ],
        None,
    );
    let (status, response) =
        send_multipart(&app, "POST", "/api/order/create-order", Some(&token), body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["url"], "https://checkout.test/session/cs_test_1");

    // The pending order carries total = quantity * price.
    let orders = OrderRepo::list_with_customers(&pool).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, "pending");
    assert_eq!(orders[0].total, 50.0);

    // The checkout session metadata references the order.
    let metadata = checkout.last_metadata();
    assert_eq!(
        metadata,
        vec![("order_id".to_string(), orders[0].id.to_string())]
    );

    // Placing the order notified the admins.
    let (_admin, admin_token) = seed_user(&pool, "admin@x.com", ROLE_ADMIN).await;
    let (status, response) =
        send_json(&app, "GET", "/api/admin/notifications", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let feed = response["data"].as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["user_id"], user.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn signed_webhook_confirms_the_order(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_user, token) = seed_regular_user(&pool, "buyer@x.com").await;

    let body = multipart_body(&[("book_title", "My Memoir"), ("price", "25")], None);
    send_multipart(&app, "POST", "/api/order/create-order", Some(&token), body).await;
    let order = &OrderRepo::list_with_customers(&pool).await.unwrap()[0];

    let payload = completed_event(json!({ "order_id": order.id.to_string() }));
    let signature = sign_payload(&payload, WEBHOOK_SECRET, Utc::now().timestamp());

    let (status, response) = post_webhook(&app, &payload, &signature).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["received"], true);

    let confirmed = OrderRepo::find_by_id(&pool, order.id).await.unwrap().unwrap();
    assert_eq!(confirmed.status, "confirmed");
    assert_eq!(confirmed.payment_id.as_deref(), Some("cs_test_1"));
    assert_eq!(confirmed.customer_name.as_deref(), Some("Ada Lovelace"));

    // A replayed delivery re-applies the same overwrite harmlessly.
    let (status, _) = post_webhook(&app, &payload, &signature).await;
    assert_eq!(status, StatusCode::OK);
    let replayed = OrderRepo::find_by_id(&pool, order.id).await.unwrap().unwrap();
    assert_eq!(replayed.status, "confirmed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn bad_signature_is_rejected_without_state_change(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_user, token) = seed_regular_user(&pool, "buyer@x.com").await;

    let body = multipart_body(&[("book_title", "My Memoir"), ("price", "25")], None);
    send_multipart(&app, "POST", "/api/order/create-order", Some(&token), body).await;
    let order = &OrderRepo::list_with_customers(&pool).await.unwrap()[0];

    let payload = completed_event(json!({ "order_id": order.id.to_string() }));

    // Wrong secret.
    let signature = sign_payload(&payload, "whsec_other", Utc::now().timestamp());
    let (status, response) = post_webhook(&app, &payload, &signature).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "WEBHOOK_SIGNATURE");

    // Stale timestamp.
    let signature = sign_payload(&payload, WEBHOOK_SECRET, Utc::now().timestamp() - 3600);
    let (status, _) = post_webhook(&app, &payload, &signature).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Missing header entirely.
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .body(Body::from(payload.clone()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let untouched = OrderRepo::find_by_id(&pool, order.id).await.unwrap().unwrap();
    assert_eq!(untouched.status, "pending");
    assert!(untouched.payment_id.is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn subscription_webhook_upgrades_the_user(pool: PgPool) {
    let (app, checkout) = build_app(pool.clone());
    let (user, token) = seed_regular_user(&pool, "member@x.com").await;

    let plan = SubscriptionPlanRepo::create(
        &pool,
        &CreateSubscriptionPlan {
            title: "Premium".to_string(),
            description: "All features".to_string(),
            price: 25.0,
            discount: 20.0,
            benefits: vec!["Unlimited books".to_string()],
            start_date: None,
            end_date: None,
        },
    )
    .await
    .unwrap();

    let (status, response) = send_json(
        &app,
        "POST",
        "/api/subscription/create-subscription",
        Some(&token),
        Some(json!({ "plan_id": plan.id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["url"], "https://checkout.test/session/cs_test_1");

    // Checkout was charged the discounted price, in cents.
    let captured = checkout.requests.lock().unwrap().last().unwrap().clone();
    assert_eq!(captured.unit_amount_cents, 2000);

    let payload = completed_event(json!({
        "user_id": user.id.to_string(),
        "subscription_type": "premium",
    }));
    let signature = sign_payload(&payload, WEBHOOK_SECRET, Utc::now().timestamp());
    let (status, _) = post_webhook(&app, &payload, &signature).await;
    assert_eq!(status, StatusCode::OK);

    let upgraded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(upgraded.subscription_type, "premium");
    assert_eq!(upgraded.income, 20.0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_can_override_order_status(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_user, token) = seed_regular_user(&pool, "buyer@x.com").await;
    let (_admin, admin_token) = seed_user(&pool, "admin@x.com", ROLE_ADMIN).await;

    let body = multipart_body(&[("book_title", "My Memoir"), ("price", "25")], None);
    send_multipart(&app, "POST", "/api/order/create-order", Some(&token), body).await;
    let order_id = OrderRepo::list_with_customers(&pool).await.unwrap()[0].id;

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/order/update-status/{order_id}"),
        Some(&admin_token),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/order/update-status/{order_id}"),
        Some(&admin_token),
        Some(json!({ "status": "shipped" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/order/update-status/{order_id}"),
        Some(&token),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn zero_quantity_order_is_rejected(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_user, token) = seed_regular_user(&pool, "buyer@x.com").await;

    let body = multipart_body(
        &[("book_title", "My Memoir"), ("quantity", "0"), ("price", "25")],
        None,
    );
    let (status, _) =
        send_multipart(&app, "POST", "/api/order/create-order", Some(&token), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
