//! Chat-turn state machine.
//!
//! A turn is one question/answer exchange. It is created optimistically
//! when the user submits (`pending`), then mutated in place exactly once:
//!
//! ```text
//! pending ──query ok──▶ answered
//! pending ──query err─▶ failed
//! ```
//!
//! Turns live only in memory; a page reload loses them and only saved
//! chat content survives via the backend history fetch.
//!
//! Submissions are single-flight: the view rejects a submit while one is
//! pending. Each submission also carries a request generation; a
//! completion whose generation no longer matches the latest one is
//! discarded, so a late response for a superseded view state can never
//! mutate a newer turn list.

pub mod save;

use crate::api::{QueryResponse, SavedChat};

/// Unique id for one submission. Ids are never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(pub u64);

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One question/answer exchange in the chat view.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub id: TurnId,
    pub question: String,
    /// Set exactly once on query success.
    pub response: Option<QueryResponse>,
    /// Set exactly once on query failure, shown inline.
    pub error: Option<String>,
}

impl Turn {
    /// Fresh pending turn for a submitted question.
    pub fn pending(id: TurnId, question: String) -> Self {
        Turn {
            id,
            question,
            response: None,
            error: None,
        }
    }
}

/// Whether a submission should proceed. Rejects blank questions and
/// overlapping submissions; returns the trimmed question otherwise.
pub fn accept_submission(raw: &str, in_flight: bool) -> Option<String> {
    let question = raw.trim();
    if question.is_empty() || in_flight {
        return None;
    }
    Some(question.to_string())
}

/// Transition the matching turn to `answered`. A missing id is a no-op
/// (the turn list was reset while the query was in flight).
pub fn answer_turn(turns: &mut [Turn], id: TurnId, response: QueryResponse) {
    if let Some(turn) = turns.iter_mut().find(|t| t.id == id) {
        turn.response = Some(response);
    }
}

/// Transition the matching turn to `failed` with an inline message.
pub fn fail_turn(turns: &mut [Turn], id: TurnId, message: String) {
    if let Some(turn) = turns.iter_mut().find(|t| t.id == id) {
        turn.error = Some(message);
    }
}

/// Whether a completed request is still current. Stale generations are
/// discarded without touching state.
pub fn is_current_request(generation: u64, latest: u64) -> bool {
    generation == latest
}

/// How a completed query was applied to the view state.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled {
    /// Current completion; the turn was answered. Carries the response
    /// for the follow-up save.
    Answered(QueryResponse),
    /// Current completion; the turn was marked failed.
    Failed,
    /// Superseded completion; the turn list was left untouched.
    Stale,
}

/// Apply one completed query to the turn list and release the submission
/// gate. The gate belongs to the submission, not to the turn list, so it
/// is released even when the completion is stale.
pub fn settle_submission(
    turns: &mut [Turn],
    in_flight: &mut bool,
    id: TurnId,
    generation: u64,
    latest: u64,
    result: Result<QueryResponse, String>,
) -> Settled {
    *in_flight = false;
    if !is_current_request(generation, latest) {
        return Settled::Stale;
    }
    match result {
        Ok(response) => {
            answer_turn(turns, id, response.clone());
            Settled::Answered(response)
        }
        Err(message) => {
            fail_turn(turns, id, message);
            Settled::Failed
        }
    }
}

/// Rehydrate a saved chat as turns. Historical turns show only the
/// original question text; answers are not replayed. Messages with a
/// malformed (negative) id are skipped.
pub fn turns_from_saved_chat(chat: &SavedChat) -> Vec<Turn> {
    chat.messages
        .iter()
        .filter_map(|message| {
            let id = u64::try_from(message.message_id).ok()?;
            Some(Turn {
                id: TurnId(id),
                question: message.content.clone(),
                response: None,
                error: None,
            })
        })
        .collect()
}
