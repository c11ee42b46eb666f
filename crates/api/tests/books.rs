//! Book lifecycle: creation from the section catalog, status transitions,
//! and chat-generated books.

mod common;

use axum::http::StatusCode;
use fableloom_db::models::section::CreateSection;
use fableloom_db::repositories::SectionRepo;
use serde_json::json;
use sqlx::PgPool;

use common::{build_app, multipart_body, seed_regular_user, send_json, send_multipart};

async fn seed_sections(pool: &PgPool, names: &[&str]) {
    for name in names {
        SectionRepo::create(
            pool,
            &CreateSection {
                name_en: name.to_string(),
                name_es: name.to_string(),
                number_of_questions: 0,
                episode_index: None,
            },
        )
        .await
        .unwrap();
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn creating_a_book_snapshots_catalog_sections(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_user, token) = seed_regular_user(&pool, "writer@x.com").await;
    seed_sections(&pool, &["Childhood", "School Years", "First Job"]).await;

    let body = multipart_body(&[("title", "My Memoir")], None);
    let (status, response) =
        send_multipart(&app, "POST", "/api/book/create", Some(&token), body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["data"]["status"], "draft");
    assert_eq!(response["data"]["percentage"], 0);

    let episodes = response["data"]["episodes"].as_array().unwrap();
    assert_eq!(episodes.len(), 3);
    assert_eq!(episodes[0]["title"], "Childhood");
    assert!(episodes[0]["conversations"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_title_is_rejected(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_user, token) = seed_regular_user(&pool, "writer@x.com").await;

    let body = multipart_body(&[("title", "   ")], None);
    let (status, _) = send_multipart(&app, "POST", "/api/book/create", Some(&token), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_moves_draft_to_final_exactly_once(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_user, token) = seed_regular_user(&pool, "writer@x.com").await;

    let body = multipart_body(&[("title", "My Memoir")], None);
    let (_, response) = send_multipart(&app, "POST", "/api/book/create", Some(&token), body).await;
    let book_id = response["data"]["id"].as_i64().unwrap();

    // Finalize.
    let body = multipart_body(&[("status", "final"), ("percentage", "100")], None);
    let (status, response) = send_multipart(
        &app,
        "PUT",
        &format!("/api/book/{book_id}"),
        Some(&token),
        body,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["status"], "final");
    assert!(!response["data"]["finalized_at"].is_null());

    // Reverting to draft is rejected.
    let body = multipart_body(&[("status", "draft")], None);
    let (status, _) = send_multipart(
        &app,
        "PUT",
        &format!("/api/book/{book_id}"),
        Some(&token),
        body,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn percentage_out_of_range_is_rejected(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_user, token) = seed_regular_user(&pool, "writer@x.com").await;

    let body = multipart_body(&[("title", "My Memoir")], None);
    let (_, response) = send_multipart(&app, "POST", "/api/book/create", Some(&token), body).await;
    let book_id = response["data"]["id"].as_i64().unwrap();

    let body = multipart_body(&[("percentage", "101")], None);
    let (status, _) = send_multipart(
        &app,
        "PUT",
        &format!("/api/book/{book_id}"),
        Some(&token),
        body,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn chat_chapters_become_a_book(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_user, token) = seed_regular_user(&pool, "writer@x.com").await;

    let (status, response) = send_json(
        &app,
        "POST",
        "/api/chat/generate-book",
        Some(&token),
        Some(json!({
            "title": "Collected Chats",
            "chapters": [
                { "title": "Beginnings", "content": "It started with a question." },
                { "title": "Endings", "content": "And it ended with an answer." },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let episodes = response["data"]["episodes"].as_array().unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0]["title"], "Beginnings");
    let turn = &episodes[0]["conversations"][0];
    assert_eq!(turn["story_generated"], true);
    assert_eq!(turn["bot_response"], "It started with a question.");

    // Chat-generated episodes have no backing section to serve questions.
    let book_id = response["data"]["id"].as_i64().unwrap();
    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/api/book/{book_id}/episode/0/start-conversation"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_a_book_requires_ownership(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (_owner, owner_token) = seed_regular_user(&pool, "owner@x.com").await;
    let (_other, other_token) = seed_regular_user(&pool, "other@x.com").await;

    let body = multipart_body(&[("title", "Private Memoir")], None);
    let (_, response) =
        send_multipart(&app, "POST", "/api/book/create", Some(&owner_token), body).await;
    let book_id = response["data"]["id"].as_i64().unwrap();

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/book/{book_id}"),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        "DELETE",
        &format!("/api/book/{book_id}"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
