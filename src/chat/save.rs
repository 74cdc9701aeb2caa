//! Chat persistence requests.
//!
//! Saving is a background concern: the answered turn is already on screen
//! when the save request goes out, and a save failure must never roll it
//! back. The save runs on its own coroutine with an explicit outcome
//! value; failures are logged at WARN and otherwise invisible to the
//! user (see DESIGN.md - flagged as a stakeholder question rather than
//! silently replicated without comment).
//!
//! The first save of a session sends `chatId: null`; the backend mints a
//! chat id which becomes the session's active chat for subsequent
//! appends.

use serde_json::Value;

use crate::api::SaveChatRequest;

/// Maximum preview length stored as the chat's sidebar content.
const PREVIEW_CHARS: usize = 40;

/// Preview text for a new chat: the first 40 characters of the question,
/// with an ellipsis marker when truncated.
pub fn chat_preview(question: &str) -> String {
    let preview: String = question.chars().take(PREVIEW_CHARS).collect();
    if question.chars().count() > PREVIEW_CHARS {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Build the save request for an answered turn.
///
/// With no active chat the request creates one (null chat id plus preview
/// content); otherwise it appends to the active chat.
pub fn build_save_request(
    active_chat: Option<i64>,
    user_id: i64,
    question: &str,
    sql_attributes: &Value,
) -> SaveChatRequest {
    SaveChatRequest {
        chat_id: active_chat,
        user_id,
        chat_content: active_chat.is_none().then(|| chat_preview(question)),
        message_content: question.to_string(),
        sql_attributes: sql_attributes.clone(),
    }
}

/// Result of one background save, reported back to the view.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// A new chat was created; its id becomes the active chat.
    Created { chat_id: i64 },
    /// A message was appended to the existing active chat.
    Appended { chat_id: i64 },
    /// The save failed. Logged only; the answered turn stays as-is.
    Failed { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_question_preview_untruncated() {
        assert_eq!(chat_preview("total sales?"), "total sales?");
    }

    #[test]
    fn test_long_question_preview_truncated_with_marker() {
        let question = "what is the sales count and gross earning by region and status";
        let preview = chat_preview(question);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));
        assert!(question.starts_with(preview.trim_end_matches("...")));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let question = "é".repeat(50);
        assert_eq!(chat_preview(&question), format!("{}...", "é".repeat(40)));
    }

    #[test]
    fn test_first_save_creates_chat() {
        let request = build_save_request(None, 7, "total sales?", &json!(["A"]));
        assert_eq!(request.chat_id, None);
        assert_eq!(request.user_id, 7);
        assert_eq!(request.chat_content.as_deref(), Some("total sales?"));
        assert_eq!(request.message_content, "total sales?");
        assert_eq!(request.sql_attributes, json!(["A"]));
    }

    #[test]
    fn test_later_saves_append_to_active_chat() {
        let request = build_save_request(Some(42), 7, "by region?", &json!(null));
        assert_eq!(request.chat_id, Some(42));
        assert_eq!(request.chat_content, None);
    }
}
