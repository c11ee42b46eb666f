//! The conversational episode flow: question serving, relevance branching,
//! sub-questions, exhaustion, and story generation.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use fableloom_core::story::Episode;
use fableloom_db::models::book::CreateBook;
use fableloom_db::models::question::QuestionText;
use fableloom_db::models::section::CreateSection;
use fableloom_db::repositories::{BookRepo, QuestionRepo, SectionRepo};
use serde_json::json;
use sqlx::PgPool;

use common::{build_app, build_app_with_ai, seed_regular_user, send_json, FakeStoryAi};

/// Seed a section with two catalog questions and a book whose first episode
/// backs it. Returns the book id.
async fn seed_flow(pool: &PgPool, user_id: i64) -> i64 {
    let section = SectionRepo::create(
        pool,
        &CreateSection {
            name_en: "Childhood".to_string(),
            name_es: "Infancia".to_string(),
            number_of_questions: 0,
            episode_index: None,
        },
    )
    .await
    .unwrap();

    QuestionRepo::insert_many(
        pool,
        section.id,
        &[
            QuestionText {
                en: "Where were you born?".to_string(),
                es: "Donde naciste?".to_string(),
            },
            QuestionText {
                en: "Who raised you?".to_string(),
                es: "Quien te crio?".to_string(),
            },
        ],
    )
    .await
    .unwrap();

    let book = BookRepo::create(
        pool,
        &CreateBook {
            user_id,
            title: "My Memoir".to_string(),
            cover_image: String::new(),
            episodes: vec![Episode {
                title: "Childhood".to_string(),
                section_id: Some(section.id),
                cover_image: String::new(),
                percentage: 0,
                conversations: Vec::new(),
            }],
        },
    )
    .await
    .unwrap();

    book.id
}

async fn answer(
    app: &Router,
    token: &str,
    book_id: i64,
    question: &str,
    user_answer: &str,
) -> (StatusCode, serde_json::Value) {
    send_json(
        app,
        "POST",
        &format!("/api/book/{book_id}/episode/0/answer"),
        Some(token),
        Some(json!({ "question": question, "user_answer": user_answer })),
    )
    .await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn questions_advance_only_on_main_turns(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (user, token) = seed_regular_user(&pool, "writer@x.com").await;
    let book_id = seed_flow(&pool, user.id).await;

    // The conversation opens with the first catalog question.
    let (status, response) = send_json(
        &app,
        "GET",
        &format!("/api/book/{book_id}/episode/0/start-conversation"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["question"]["en"], "Where were you born?");

    // A relevant answer advances the flow to the second question.
    let (status, response) = answer(
        &app,
        &token,
        book_id,
        "Where were you born?",
        "In a small coastal town.",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["is_sub_question"], false);

    let (status, response) = send_json(
        &app,
        "GET",
        &format!("/api/book/{book_id}/episode/0/next-question"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["question"]["en"], "Who raised you?");

    // An off-topic answer triggers a sub-question, which does NOT advance
    // the index: the next question is still the second one.
    let (status, response) = answer(
        &app,
        &token,
        book_id,
        "Who raised you?",
        "off-topic rambling",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["is_sub_question"], true);
    assert!(response["bot_response"]
        .as_str()
        .unwrap()
        .contains("Who raised you?"));

    let (status, response) = send_json(
        &app,
        "GET",
        &format!("/api/book/{book_id}/episode/0/next-question"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"]["question"]["en"], "Who raised you?");

    // A second relevant answer exhausts the two-question section.
    answer(&app, &token, book_id, "Who raised you?", "My grandparents.").await;

    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/api/book/{book_id}/episode/0/next-question"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn story_generation_appends_terminal_turn(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (user, token) = seed_regular_user(&pool, "writer@x.com").await;
    let book_id = seed_flow(&pool, user.id).await;

    // Generating with no history is a 400.
    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/book/{book_id}/episode/0/generate-story"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    answer(
        &app,
        &token,
        book_id,
        "Where were you born?",
        "In a small coastal town.",
    )
    .await;

    let (status, response) = send_json(
        &app,
        "POST",
        &format!("/api/book/{book_id}/episode/0/generate-story"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["story"], "A story woven from 1 answers.");

    // The terminal turn is flagged and carries an empty answer.
    let (_, response) = send_json(
        &app,
        "GET",
        &format!("/api/book/{book_id}/episode/0"),
        Some(&token),
        None,
    )
    .await;
    let turns = response["data"]["conversations"].as_array().unwrap();
    let last = turns.last().unwrap();
    assert_eq!(last["story_generated"], true);
    assert_eq!(last["user_answer"], "");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn ai_outage_degrades_to_fallback_turns(pool: PgPool) {
    let (app, _) = build_app_with_ai(pool.clone(), Arc::new(FakeStoryAi::failing()));
    let (user, token) = seed_regular_user(&pool, "writer@x.com").await;
    let book_id = seed_flow(&pool, user.id).await;

    // The answer is still recorded with the fallback bot response.
    let (status, response) = answer(
        &app,
        &token,
        book_id,
        "Where were you born?",
        "In a small coastal town.",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["bot_response"], "AI processing failed. Please try again.");
    assert_eq!(response["is_sub_question"], false);

    // Story generation failure stores the placeholder in the turn itself.
    let (status, response) = send_json(
        &app,
        "POST",
        &format!("/api/book/{book_id}/episode/0/generate-story"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["story"], "Story generation failed.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn books_are_owner_scoped(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (owner, _) = seed_regular_user(&pool, "owner@x.com").await;
    let (_other, other_token) = seed_regular_user(&pool, "other@x.com").await;
    let book_id = seed_flow(&pool, owner.id).await;

    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/api/book/{book_id}"),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn episode_index_out_of_range_is_not_found(pool: PgPool) {
    let (app, _) = build_app(pool.clone());
    let (user, token) = seed_regular_user(&pool, "writer@x.com").await;
    let book_id = seed_flow(&pool, user.id).await;

    let (status, _) = send_json(
        &app,
        "GET",
        &format!("/api/book/{book_id}/episode/5"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
