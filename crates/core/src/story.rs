//! Episode and conversation-turn domain types for the book-building flow.
//!
//! A book owns an ordered list of [`Episode`]s; each episode owns its
//! [`ConversationTurn`] history. Both are persisted inside the book row as a
//! single JSONB document so a book is always read and written whole.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Book status while the user is still answering questions.
pub const BOOK_DRAFT: &str = "draft";

/// Terminal book status; a book moves draft -> final exactly once.
pub const BOOK_FINAL: &str = "final";

/// Question text shown on the generated-story terminal turn.
pub const GENERATED_STORY_QUESTION: &str = "Generated Story";

/// One chapter-like unit of a book, built from a sequence of Q&A turns.
///
/// `section_id` is snapshotted at book creation so the episode keeps working
/// even if the section is later renamed. Episodes created outside the
/// section catalog (chat-generated books) carry no section and cannot serve
/// catalog questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    #[serde(default)]
    pub section_id: Option<DbId>,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub percentage: i32,
    #[serde(default)]
    pub conversations: Vec<ConversationTurn>,
}

/// One question/answer/bot-response record inside an episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub question: String,
    /// Empty only for generated-story terminal turns.
    #[serde(default)]
    pub user_answer: String,
    pub bot_response: String,
    #[serde(default)]
    pub is_sub_question: bool,
    #[serde(default)]
    pub story_generated: bool,
}

impl ConversationTurn {
    /// Build a regular answered turn.
    pub fn answered(
        question: impl Into<String>,
        user_answer: impl Into<String>,
        bot_response: impl Into<String>,
        is_sub_question: bool,
    ) -> Self {
        Self {
            question: question.into(),
            user_answer: user_answer.into(),
            bot_response: bot_response.into(),
            is_sub_question,
            story_generated: false,
        }
    }

    /// Build the terminal generated-story turn.
    pub fn generated_story(story: impl Into<String>) -> Self {
        Self {
            question: GENERATED_STORY_QUESTION.to_string(),
            user_answer: String::new(),
            bot_response: story.into(),
            is_sub_question: false,
            story_generated: true,
        }
    }
}

/// Index of the next catalog question to serve for an episode.
///
/// Sub-question turns are clarifications of the current question and do not
/// advance the flow, so the index is the count of non-sub-question turns.
/// Once this reaches the section's question count there are no more
/// questions to serve.
pub fn next_question_index(turns: &[ConversationTurn]) -> usize {
    turns.iter().filter(|t| !t.is_sub_question).count()
}

/// Validate an episode/book completion percentage.
pub fn validate_percentage(percentage: i32) -> Result<(), CoreError> {
    if !(0..=100).contains(&percentage) {
        return Err(CoreError::Validation(
            "Percentage must be a number between 0 and 100".into(),
        ));
    }
    Ok(())
}

/// Validate a book status transition.
///
/// The only permitted transition is draft -> final; everything else
/// (including final -> draft) is rejected.
pub fn validate_status_transition(current: &str, next: &str) -> Result<(), CoreError> {
    if current == next {
        return Ok(());
    }
    if current == BOOK_DRAFT && next == BOOK_FINAL {
        return Ok(());
    }
    Err(CoreError::Validation(format!(
        "Invalid status transition: {current} -> {next}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(is_sub: bool) -> ConversationTurn {
        ConversationTurn::answered("q", "a", "ok", is_sub)
    }

    #[test]
    fn next_index_counts_only_main_questions() {
        let turns = vec![turn(false), turn(true), turn(false), turn(true)];
        assert_eq!(next_question_index(&turns), 2);
    }

    #[test]
    fn next_index_is_zero_for_empty_history() {
        assert_eq!(next_question_index(&[]), 0);
    }

    #[test]
    fn generated_story_turn_has_empty_answer_and_flag() {
        let t = ConversationTurn::generated_story("Once upon a time.");
        assert_eq!(t.question, GENERATED_STORY_QUESTION);
        assert!(t.user_answer.is_empty());
        assert!(t.story_generated);
        assert!(!t.is_sub_question);
    }

    #[test]
    fn percentage_bounds() {
        assert!(validate_percentage(0).is_ok());
        assert!(validate_percentage(100).is_ok());
        assert!(validate_percentage(-1).is_err());
        assert!(validate_percentage(101).is_err());
    }

    #[test]
    fn only_draft_to_final_transition_is_allowed() {
        assert!(validate_status_transition(BOOK_DRAFT, BOOK_FINAL).is_ok());
        assert!(validate_status_transition(BOOK_DRAFT, BOOK_DRAFT).is_ok());
        assert!(validate_status_transition(BOOK_FINAL, BOOK_FINAL).is_ok());
        assert!(validate_status_transition(BOOK_FINAL, BOOK_DRAFT).is_err());
        assert!(validate_status_transition(BOOK_DRAFT, "published").is_err());
    }

    #[test]
    fn episode_round_trips_through_json() {
        let episode = Episode {
            title: "Childhood".to_string(),
            section_id: Some(7),
            cover_image: String::new(),
            percentage: 40,
            conversations: vec![turn(false), turn(true)],
        };
        let json = serde_json::to_string(&episode).unwrap();
        let back: Episode = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title, "Childhood");
        assert_eq!(back.section_id, Some(7));
        assert_eq!(back.conversations.len(), 2);
    }
}
