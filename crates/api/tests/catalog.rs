//! Section and question catalog: creation, batch inserts, and the
//! question-count bookkeeping kept in sync by the handlers.

mod common;

use axum::http::StatusCode;
use fableloom_core::roles::ROLE_ADMIN;
use fableloom_core::story::Episode;
use fableloom_db::models::book::CreateBook;
use fableloom_db::repositories::BookRepo;
use serde_json::json;
use sqlx::PgPool;

use common::{build_app, seed_regular_user, seed_user, send_json};

/// Create a section via the API and a book whose first episode backs it.
async fn seed_section_and_book(
    app: &axum::Router,
    pool: &PgPool,
    token: &str,
    user_id: i64,
) -> (i64, i64) {
    let (status, response) = send_json(
        app,
        "POST",
        "/api/section",
        Some(token),
        Some(json!({ "name_en": "Childhood", "name_es": "Infancia" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let section_id = response["data"]["id"].as_i64().unwrap();

    let book = BookRepo::create(
        pool,
        &CreateBook {
            user_id,
            title: "My Memoir".to_string(),
            cover_image: String::new(),
            episodes: vec![Episode {
                title: "Childhood".to_string(),
                section_id: Some(section_id),
                cover_image: String::new(),
                percentage: 0,
                conversations: Vec::new(),
            }],
        },
    )
    .await
    .unwrap();

    (section_id, book.id)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn question_count_tracks_inserts_and_deletes(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (user, token) = seed_regular_user(&pool, "author@x.com").await;
    let (_admin, admin_token) = seed_user(&pool, "admin@x.com", ROLE_ADMIN).await;
    let (section_id, book_id) = seed_section_and_book(&app, &pool, &token, user.id).await;

    // Insert a batch of three questions.
    let (status, response) = send_json(
        &app,
        "POST",
        "/api/question",
        Some(&token),
        Some(json!({
            "book_id": book_id,
            "episode_index": 0,
            "questions": [
                { "en": "Where were you born?", "es": "Donde naciste?" },
                { "en": "Who raised you?", "es": "Quien te crio?" },
                { "en": "First memory?", "es": "Primer recuerdo?" },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let inserted = response["data"].as_array().unwrap();
    assert_eq!(inserted.len(), 3);

    // Delete one (admin only); the section counter follows.
    let first_id = inserted[0]["id"].as_i64().unwrap();
    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/question/{first_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, response) = send_json(&app, "GET", "/api/section", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let section = response["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"].as_i64() == Some(section_id))
        .unwrap();
    assert_eq!(section["number_of_questions"], 2);
    assert_eq!(section["questions_count"], 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn question_delete_requires_admin(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (user, token) = seed_regular_user(&pool, "author@x.com").await;
    let (_section_id, book_id) = seed_section_and_book(&app, &pool, &token, user.id).await;

    let (_, response) = send_json(
        &app,
        "POST",
        "/api/question",
        Some(&token),
        Some(json!({
            "book_id": book_id,
            "episode_index": 0,
            "questions": [{ "en": "Q", "es": "P" }],
        })),
    )
    .await;
    let question_id = response["data"][0]["id"].as_i64().unwrap();

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/question/{question_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn section_delete_cascades_questions(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (user, token) = seed_regular_user(&pool, "author@x.com").await;
    let (_admin, admin_token) = seed_user(&pool, "admin@x.com", ROLE_ADMIN).await;
    let (section_id, book_id) = seed_section_and_book(&app, &pool, &token, user.id).await;

    send_json(
        &app,
        "POST",
        "/api/question",
        Some(&token),
        Some(json!({
            "book_id": book_id,
            "episode_index": 0,
            "questions": [{ "en": "Q1", "es": "P1" }, { "en": "Q2", "es": "P2" }],
        })),
    )
    .await;

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/section/{section_id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, response) = send_json(
        &app,
        "GET",
        &format!("/api/question/section/{section_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_question_batch_is_rejected(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_user, token) = seed_regular_user(&pool, "author@x.com").await;

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/question",
        Some(&token),
        Some(json!({ "book_id": 1, "episode_index": 0, "questions": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
