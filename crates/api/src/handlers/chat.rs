//! Handlers for the `/chat` resource: raw prompt capture, curation, and
//! turning curated chapters into a book.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fableloom_core::error::CoreError;
use fableloom_core::story::{ConversationTurn, Episode};
use fableloom_core::types::DbId;
use fableloom_db::models::book::CreateBook;
use fableloom_db::models::chat_history::{ChatHistory, CHAT_CATEGORIZED};
use fableloom_db::repositories::{BookRepo, ChatHistoryRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::StatusFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct SaveChatRequest {
    pub prompts: Vec<String>,
}

/// Request body for `PUT /chat/{id}/categorize`.
#[derive(Debug, Deserialize)]
pub struct CategorizeRequest {
    pub categorized_data: Vec<String>,
}

/// One curated chapter for book generation.
#[derive(Debug, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub content: String,
}

/// Request body for `POST /chat/generate-book`.
#[derive(Debug, Deserialize)]
pub struct GenerateBookRequest {
    pub title: String,
    pub chapters: Vec<Chapter>,
}

/// POST /api/chat
///
/// Capture a batch of raw prompts for later curation.
pub async fn save_chat(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SaveChatRequest>,
) -> AppResult<impl IntoResponse> {
    if input.prompts.is_empty() {
        return Err(AppError::BadRequest(
            "Prompts must be a non-empty array".into(),
        ));
    }

    let chat = ChatHistoryRepo::create(&state.pool, auth.user.id, &input.prompts).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: chat })))
}

/// GET /api/chat
///
/// List chat histories by curation status (defaults to `categorized`).
pub async fn list_chats(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StatusFilterParams>,
) -> AppResult<Json<DataResponse<Vec<ChatHistory>>>> {
    let status = params.status.as_deref().unwrap_or(CHAT_CATEGORIZED);
    let chats = ChatHistoryRepo::list_by_status(&state.pool, status).await?;
    Ok(Json(DataResponse { data: chats }))
}

/// PUT /api/chat/{id}/categorize
///
/// Attach curated data to a captured chat and mark it categorized.
pub async fn categorize_chat(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(chat_id): Path<DbId>,
    Json(input): Json<CategorizeRequest>,
) -> AppResult<Json<DataResponse<ChatHistory>>> {
    if input.categorized_data.is_empty() {
        return Err(AppError::BadRequest(
            "categorized_data must be a non-empty array".into(),
        ));
    }

    let chat = ChatHistoryRepo::categorize(&state.pool, chat_id, &input.categorized_data)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Chat history",
            id: chat_id,
        }))?;

    Ok(Json(DataResponse { data: chat }))
}

/// POST /api/chat/generate-book
///
/// Build a draft book directly from supplied chapters. Each chapter becomes
/// an episode whose story turn carries the chapter text; these episodes
/// have no backing section and serve no catalog questions.
pub async fn generate_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerateBookRequest>,
) -> AppResult<impl IntoResponse> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".into()));
    }
    if input.chapters.is_empty() {
        return Err(AppError::BadRequest(
            "Chapters must be a non-empty array".into(),
        ));
    }

    let episodes: Vec<Episode> = input
        .chapters
        .iter()
        .map(|chapter| Episode {
            title: chapter.title.clone(),
            section_id: None,
            cover_image: String::new(),
            percentage: 100,
            conversations: vec![ConversationTurn::generated_story(chapter.content.clone())],
        })
        .collect();

    let book = BookRepo::create(
        &state.pool,
        &CreateBook {
            user_id: auth.user.id,
            title: input.title.trim().to_string(),
            cover_image: String::new(),
            episodes,
        },
    )
    .await?;

    tracing::info!(
        book_id = book.id,
        user_id = auth.user.id,
        chapters = book.episodes.len(),
        "Book generated from chat chapters"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: book })))
}
