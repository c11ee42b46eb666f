use std::sync::Arc;

use fableloom_ai::StoryAi;
use fableloom_payments::CheckoutProvider;

use crate::config::ServerConfig;
use crate::mailer::Mailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The AI and
/// checkout integrations are trait objects so tests can substitute fakes.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fableloom_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Story-AI service (relevance check, sub-questions, story generation).
    pub story_ai: Arc<dyn StoryAi>,
    /// Payment-processor checkout sessions.
    pub checkout: Arc<dyn CheckoutProvider>,
    /// Outbound email (password resets). No-op when SMTP is unconfigured.
    pub mailer: Arc<Mailer>,
}
