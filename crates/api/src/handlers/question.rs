//! Handlers for the `/question` resource.
//!
//! Questions are added in batches against a book episode's backing section;
//! the section's `number_of_questions` counter moves with every insert and
//! delete so listings stay in sync without a trigger.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fableloom_core::error::CoreError;
use fableloom_core::types::DbId;
use fableloom_db::models::question::{Question, QuestionText, UpdateQuestion};
use fableloom_db::repositories::{BookRepo, QuestionRepo, SectionRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for the batch question insert.
#[derive(Debug, Deserialize)]
pub struct AddQuestionsRequest {
    pub book_id: DbId,
    pub episode_index: usize,
    pub questions: Vec<QuestionText>,
}

/// POST /api/question
///
/// Add a batch of bilingual questions to the section backing a book
/// episode, bumping the section's question counter by the batch size.
pub async fn add_questions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AddQuestionsRequest>,
) -> AppResult<impl IntoResponse> {
    if input.questions.is_empty() {
        return Err(AppError::BadRequest(
            "Questions must be a non-empty array".into(),
        ));
    }

    let book = BookRepo::find_by_id(&state.pool, input.book_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Book",
            id: input.book_id,
        }))?;

    let episode = book
        .episodes
        .get(input.episode_index)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Episode",
            id: input.episode_index as DbId,
        }))?;

    let section_id = episode.section_id.ok_or_else(|| {
        AppError::Core(CoreError::NotFoundMessage(
            "Corresponding section not found".into(),
        ))
    })?;

    SectionRepo::find_by_id(&state.pool, section_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Section",
            id: section_id,
        }))?;

    let saved = QuestionRepo::insert_many(&state.pool, section_id, &input.questions).await?;
    SectionRepo::adjust_question_count(&state.pool, section_id, saved.len() as i32).await?;

    tracing::info!(section_id, count = saved.len(), "Questions added");

    Ok((StatusCode::CREATED, Json(DataResponse { data: saved })))
}

/// PUT /api/question/{id}
pub async fn update_question(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(question_id): Path<DbId>,
    Json(input): Json<UpdateQuestion>,
) -> AppResult<Json<DataResponse<Question>>> {
    if input.text.en.trim().is_empty() || input.text.es.trim().is_empty() {
        return Err(AppError::BadRequest("Question text is required".into()));
    }

    let question = QuestionRepo::update_text(&state.pool, question_id, &input.text)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Question",
            id: question_id,
        }))?;

    Ok(Json(DataResponse { data: question }))
}

/// DELETE /api/question/{id}
///
/// Admin only. Decrements the owning section's question counter.
pub async fn delete_question(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(question_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Question>>> {
    let question = QuestionRepo::delete(&state.pool, question_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Question",
            id: question_id,
        }))?;

    SectionRepo::adjust_question_count(&state.pool, question.section_id, -1).await?;

    Ok(Json(DataResponse { data: question }))
}

/// GET /api/question/section/{section_id}
pub async fn list_by_section(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(section_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Question>>>> {
    let questions = QuestionRepo::list_by_section(&state.pool, section_id).await?;
    Ok(Json(DataResponse { data: questions }))
}
