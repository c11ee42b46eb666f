//! Handlers for the `/book` resource: book CRUD, index-addressed episodes,
//! and the conversational Q&A flow that builds each episode's story.
//!
//! Every query is scoped to the authenticated owner. The AI service is
//! consulted for answer relevance, clarifying sub-questions, and final
//! story assembly; any AI failure degrades to a fixed fallback message and
//! the conversation turn is still recorded -- the flow never surfaces an AI
//! outage to the user as an error.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fableloom_core::error::CoreError;
use fableloom_core::story::{
    next_question_index, validate_percentage, validate_status_transition, ConversationTurn,
    Episode,
};
use fableloom_core::types::DbId;
use fableloom_db::models::book::{Book, CreateBook, UpdateBook};
use fableloom_db::models::question::Question;
use fableloom_db::repositories::{BookRepo, QuestionRepo, SectionRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::media::{self, MultipartForm, UploadKind};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Bot response for a relevant answer.
const ACKNOWLEDGEMENT: &str = "Thank you! Let's move to the next question.";

/// Bot response recorded when an AI call fails mid-conversation.
const AI_FALLBACK: &str = "AI processing failed. Please try again.";

/// Story text recorded when the generation call fails outright.
const STORY_FAILURE: &str = "Story generation failed.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for submitting an answer.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    pub user_answer: String,
}

/// Episode as returned to clients, addressed by its index in the book.
#[derive(Debug, Serialize)]
pub struct EpisodeView {
    pub episode_index: usize,
    pub title: String,
    pub cover_image: String,
    pub percentage: i32,
    pub conversations: Vec<ConversationTurn>,
}

/// A catalog question served into the conversation.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub question_id: DbId,
    pub question: BilingualText,
}

/// Bilingual text pair for served questions.
#[derive(Debug, Serialize)]
pub struct BilingualText {
    pub en: String,
    pub es: String,
}

impl From<Question> for QuestionView {
    fn from(q: Question) -> Self {
        Self {
            question_id: q.id,
            question: BilingualText {
                en: q.text_en,
                es: q.text_es,
            },
        }
    }
}

impl EpisodeView {
    fn new(index: usize, episode: &Episode) -> Self {
        Self {
            episode_index: index,
            title: episode.title.clone(),
            cover_image: episode.cover_image.clone(),
            percentage: episode.percentage,
            conversations: episode.conversations.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Book CRUD
// ---------------------------------------------------------------------------

/// POST /api/book/create
///
/// Create a draft book, snapshotting every catalog section into an empty
/// episode. Multipart with a required `title` field and an optional
/// `cover_image` file.
pub async fn create_book(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = MultipartForm::parse(multipart).await?;

    let title = form.field("title").map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title is required".into()));
    }

    let cover_image = match form.file("cover_image") {
        Some(file) => media::store_upload(&state.config, file, UploadKind::Image, None).await?,
        None => String::new(),
    };

    let sections = SectionRepo::list(&state.pool).await?;
    let episodes: Vec<Episode> = sections
        .iter()
        .map(|section| Episode {
            title: section.name_en.clone(),
            section_id: Some(section.id),
            cover_image: String::new(),
            percentage: 0,
            conversations: Vec::new(),
        })
        .collect();

    let book = BookRepo::create(
        &state.pool,
        &CreateBook {
            user_id: auth.user.id,
            title: title.to_string(),
            cover_image,
            episodes,
        },
    )
    .await?;

    tracing::info!(book_id = book.id, user_id = auth.user.id, "Book created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: book })))
}

/// GET /api/book/user-books
pub async fn list_books(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Book>>>> {
    let books = BookRepo::list_for_user(&state.pool, auth.user.id).await?;
    Ok(Json(DataResponse { data: books }))
}

/// GET /api/book/{id}
pub async fn get_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Book>>> {
    let book = find_owned_book(&state, book_id, auth.user.id).await?;
    Ok(Json(DataResponse { data: book }))
}

/// PUT /api/book/{id}
///
/// Update title, completion percentage, cover image, and/or status.
/// Status may only move draft -> final; the repository stamps
/// `finalized_at` on that transition.
pub async fn update_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Book>>> {
    let form = MultipartForm::parse(multipart).await?;
    let book = find_owned_book(&state, book_id, auth.user.id).await?;

    let percentage = match form.field("percentage") {
        Some(raw) => {
            let value: i32 = raw.trim().parse().map_err(|_| {
                AppError::BadRequest("Percentage must be a number between 0 and 100".into())
            })?;
            validate_percentage(value)?;
            Some(value)
        }
        None => None,
    };

    let status = form.field("status").map(str::to_string);
    if let Some(next) = &status {
        validate_status_transition(&book.status, next)?;
    }

    let cover_image = match form.file("cover_image") {
        Some(file) => {
            Some(media::store_upload(&state.config, file, UploadKind::Image, None).await?)
        }
        None => None,
    };

    let update = UpdateBook {
        title: form
            .field("title")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string),
        percentage,
        cover_image,
        status,
    };

    let book = BookRepo::update(&state.pool, book_id, auth.user.id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        }))?;

    Ok(Json(DataResponse { data: book }))
}

/// DELETE /api/book/{id}
pub async fn delete_book(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = BookRepo::delete(&state.pool, book_id, auth.user.id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        }));
    }
    Ok(Json(
        serde_json::json!({ "message": "Book deleted successfully" }),
    ))
}

// ---------------------------------------------------------------------------
// Episodes
// ---------------------------------------------------------------------------

/// GET /api/book/{book_id}/episodes
pub async fn list_episodes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<EpisodeView>>>> {
    let book = find_owned_book(&state, book_id, auth.user.id).await?;
    let episodes = book
        .episodes
        .iter()
        .enumerate()
        .map(|(index, episode)| EpisodeView::new(index, episode))
        .collect();
    Ok(Json(DataResponse { data: episodes }))
}

/// GET /api/book/{book_id}/episode/{episode_index}
pub async fn get_episode(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((book_id, episode_index)): Path<(DbId, usize)>,
) -> AppResult<Json<DataResponse<EpisodeView>>> {
    let book = find_owned_book(&state, book_id, auth.user.id).await?;
    let episode = episode_at(&book, episode_index)?;
    Ok(Json(DataResponse {
        data: EpisodeView::new(episode_index, episode),
    }))
}

/// PUT /api/book/{book_id}/episode/{episode_index}
///
/// Only the episode's cover image and completion percentage are mutable.
pub async fn update_episode(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((book_id, episode_index)): Path<(DbId, usize)>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<EpisodeView>>> {
    let form = MultipartForm::parse(multipart).await?;
    let book = find_owned_book(&state, book_id, auth.user.id).await?;
    episode_at(&book, episode_index)?;

    let percentage = match form.field("percentage") {
        Some(raw) => {
            let value: i32 = raw.trim().parse().map_err(|_| {
                AppError::BadRequest("Percentage must be a number between 0 and 100".into())
            })?;
            validate_percentage(value)?;
            Some(value)
        }
        None => None,
    };

    let cover_image = match form.file("cover_image") {
        Some(file) => {
            Some(media::store_upload(&state.config, file, UploadKind::Image, None).await?)
        }
        None => None,
    };

    if percentage.is_none() && cover_image.is_none() {
        return Err(AppError::BadRequest(
            "No valid fields provided to update".into(),
        ));
    }

    let mut episodes = book.episodes.0.clone();
    {
        let episode = &mut episodes[episode_index];
        if let Some(value) = percentage {
            episode.percentage = value;
        }
        if let Some(url) = cover_image {
            episode.cover_image = url;
        }
    }

    let book = save_episodes(&state, book_id, auth.user.id, &episodes).await?;
    let episode = episode_at(&book, episode_index)?;

    Ok(Json(DataResponse {
        data: EpisodeView::new(episode_index, episode),
    }))
}

/// DELETE /api/book/{book_id}/episode/{episode_index}
pub async fn delete_episode(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((book_id, episode_index)): Path<(DbId, usize)>,
) -> AppResult<Json<DataResponse<Vec<EpisodeView>>>> {
    let book = find_owned_book(&state, book_id, auth.user.id).await?;
    episode_at(&book, episode_index)?;

    let mut episodes = book.episodes.0.clone();
    episodes.remove(episode_index);

    let book = save_episodes(&state, book_id, auth.user.id, &episodes).await?;
    let episodes = book
        .episodes
        .iter()
        .enumerate()
        .map(|(index, episode)| EpisodeView::new(index, episode))
        .collect();

    Ok(Json(DataResponse { data: episodes }))
}

// ---------------------------------------------------------------------------
// Conversational flow
// ---------------------------------------------------------------------------

/// GET /api/book/{book_id}/episode/{episode_index}/start-conversation
///
/// Serve the first catalog question of the episode's section.
pub async fn start_conversation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((book_id, episode_index)): Path<(DbId, usize)>,
) -> AppResult<Json<DataResponse<QuestionView>>> {
    let book = find_owned_book(&state, book_id, auth.user.id).await?;
    let episode = episode_at(&book, episode_index)?;
    let section_id = section_id_of(episode)?;

    let first = QuestionRepo::nth_for_section(&state.pool, section_id, 0)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundMessage(
                "No questions found for this episode".into(),
            ))
        })?;

    Ok(Json(DataResponse {
        data: QuestionView::from(first),
    }))
}

/// POST /api/book/{book_id}/episode/{episode_index}/answer
///
/// Record an answer turn. The relevance check decides whether the bot
/// acknowledges and moves on or asks a generated sub-question; an AI
/// failure records the fallback response instead of erroring.
pub async fn submit_answer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((book_id, episode_index)): Path<(DbId, usize)>,
    Json(input): Json<AnswerRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let book = find_owned_book(&state, book_id, auth.user.id).await?;
    episode_at(&book, episode_index)?;

    let mut bot_response = ACKNOWLEDGEMENT.to_string();
    let mut is_sub_question = false;

    match state
        .story_ai
        .check_relevance(&input.question, &input.user_answer)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            match state
                .story_ai
                .generate_sub_question(&input.question, &input.user_answer)
                .await
            {
                Ok(sub_question) => {
                    bot_response = sub_question;
                    is_sub_question = true;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Sub-question generation failed");
                    bot_response = AI_FALLBACK.to_string();
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Relevance check failed");
            bot_response = AI_FALLBACK.to_string();
        }
    }

    let mut episodes = book.episodes.0.clone();
    episodes[episode_index].conversations.push(ConversationTurn::answered(
        input.question,
        input.user_answer,
        bot_response.clone(),
        is_sub_question,
    ));
    save_episodes(&state, book_id, auth.user.id, &episodes).await?;

    Ok(Json(serde_json::json!({
        "message": "Answer processed",
        "bot_response": bot_response,
        "is_sub_question": is_sub_question,
    })))
}

/// GET /api/book/{book_id}/episode/{episode_index}/next-question
///
/// The next catalog question is indexed by the count of non-sub-question
/// turns recorded so far; past the end of the section's list, 404.
pub async fn next_question(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((book_id, episode_index)): Path<(DbId, usize)>,
) -> AppResult<Json<DataResponse<QuestionView>>> {
    let book = find_owned_book(&state, book_id, auth.user.id).await?;
    let episode = episode_at(&book, episode_index)?;
    let section_id = section_id_of(episode)?;

    let index = next_question_index(&episode.conversations) as i64;
    let total = QuestionRepo::count_for_section(&state.pool, section_id).await?;
    if index >= total {
        return Err(AppError::Core(CoreError::NotFoundMessage(
            "No more pre-added questions available".into(),
        )));
    }

    let question = QuestionRepo::nth_for_section(&state.pool, section_id, index)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundMessage(
                "No more pre-added questions available".into(),
            ))
        })?;

    Ok(Json(DataResponse {
        data: QuestionView::from(question),
    }))
}

/// POST /api/book/{book_id}/episode/{episode_index}/generate-story
///
/// Send every recorded Q&A pair to the generator and append the result as
/// the terminal story turn. A failed generation stores the failure
/// placeholder in the turn rather than erroring.
pub async fn generate_story(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((book_id, episode_index)): Path<(DbId, usize)>,
) -> AppResult<Json<serde_json::Value>> {
    let book = find_owned_book(&state, book_id, auth.user.id).await?;
    let episode = episode_at(&book, episode_index)?;

    if episode.conversations.is_empty() {
        return Err(AppError::BadRequest(
            "No conversation history to generate a story".into(),
        ));
    }

    let questions: Vec<String> = episode
        .conversations
        .iter()
        .map(|turn| turn.question.clone())
        .collect();
    let answers: Vec<String> = episode
        .conversations
        .iter()
        .map(|turn| turn.user_answer.clone())
        .collect();

    let story = match state.story_ai.generate_story(&questions, &answers).await {
        Ok(story) => story,
        Err(e) => {
            tracing::error!(error = %e, "Story generation failed");
            STORY_FAILURE.to_string()
        }
    };

    let mut episodes = book.episodes.0.clone();
    episodes[episode_index]
        .conversations
        .push(ConversationTurn::generated_story(story.clone()));
    save_episodes(&state, book_id, auth.user.id, &episodes).await?;

    Ok(Json(serde_json::json!({
        "message": "Story generated successfully",
        "story": story,
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a book scoped to its owner, 404 otherwise.
async fn find_owned_book(state: &AppState, book_id: DbId, user_id: DbId) -> AppResult<Book> {
    BookRepo::find_for_user(&state.pool, book_id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        }))
}

/// Borrow the episode at `index`, 404 when out of range.
fn episode_at(book: &Book, index: usize) -> AppResult<&Episode> {
    book.episodes.get(index).ok_or(AppError::Core(CoreError::NotFound {
        entity: "Episode",
        id: index as DbId,
    }))
}

/// Resolve the episode's backing section, 404 when it has none.
fn section_id_of(episode: &Episode) -> AppResult<DbId> {
    episode.section_id.ok_or_else(|| {
        AppError::Core(CoreError::NotFoundMessage(
            "Corresponding section not found".into(),
        ))
    })
}

/// Persist a replacement episode list and return the updated book.
async fn save_episodes(
    state: &AppState,
    book_id: DbId,
    user_id: DbId,
    episodes: &[Episode],
) -> AppResult<Book> {
    BookRepo::update_episodes(&state.pool, book_id, user_id, episodes)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Book",
            id: book_id,
        }))
}
