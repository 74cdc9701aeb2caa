//! Integration tests for the client-side flows that do not need a
//! browser: cookie codecs, the bootstrap decision, the turn state
//! machine, chat persistence chaining, and result formatting.

use serde_json::json;

use sqlchat::api::{extract_error_message, QueryResponse, SaveChatRequest, SavedChat};
use sqlchat::chat::save::build_save_request;
use sqlchat::chat::{
    accept_submission, answer_turn, fail_turn, settle_submission, turns_from_saved_chat, Settled,
    Turn, TurnId,
};
use sqlchat::export::{build_workbook, TableData};
use sqlchat::session::cookies::{LoginRecord, TokenRecord};
use sqlchat::session::{bootstrap_action, BootstrapAction, CookieSnapshot};
use sqlchat::utils::format_cell;

fn cookie_snapshot() -> CookieSnapshot {
    CookieSnapshot {
        token: Some(TokenRecord {
            user_token: "tok".to_string(),
            token_expires_at: json!("2026-09-01T00:00:00Z"),
        }),
        login: Some(LoginRecord {
            user_login: "alice".to_string(),
            contact_id: json!("1042"),
        }),
    }
}

#[test]
fn sso_parameters_always_trigger_the_exchange() {
    // Even with a full cookie session present, fresh code/login URL
    // parameters re-run the token + WMS login exchange.
    let action = bootstrap_action("?code=abc&login=xyz", &cookie_snapshot());
    match action {
        BootstrapAction::SsoExchange(params) => {
            assert_eq!(params.code, "abc");
            assert_eq!(params.login, "xyz");
        }
        other => panic!("expected SsoExchange, got {:?}", other),
    }
}

#[test]
fn cookie_restore_synthesizes_session_without_network() {
    let action = bootstrap_action("", &cookie_snapshot());
    match action {
        BootstrapAction::Restore(user) => {
            assert_eq!(user.name, "alice");
            assert_eq!(user.contact_id, Some(1042));
        }
        other => panic!("expected Restore, got {:?}", other),
    }
}

#[test]
fn login_round_trip_preserves_name_and_integer_contact_id() {
    let record = LoginRecord {
        user_login: "alice".to_string(),
        contact_id: json!(7),
    };
    let encoded = serde_json::to_string(&record).unwrap();
    let restored = LoginRecord::from_json(&encoded).unwrap();
    assert_eq!(restored.user_login, "alice");
    assert_eq!(restored.contact_id_value(), Some(7));
}

#[test]
fn whitespace_submission_never_creates_a_turn() {
    assert_eq!(accept_submission("   \t  ", false), None);
    assert_eq!(accept_submission("", false), None);
}

#[test]
fn single_row_query_renders_with_two_decimal_formatting() {
    let response: QueryResponse =
        serde_json::from_value(json!({"columns": ["A"], "table": [{"A": 1}]})).unwrap();
    assert!(response.has_table());

    let row = &response.table[0];
    assert_eq!(format_cell(row.get("A")), "1.00");
}

#[test]
fn first_save_has_null_chat_id_then_adopts_the_minted_one() {
    let first = build_save_request(None, 1042, "total sales?", &json!(["A"]));
    assert_eq!(first.chat_id, None);
    assert_eq!(
        serde_json::to_value(&first).unwrap()["chatId"],
        serde_json::Value::Null
    );

    // Backend mints ChatId 42; subsequent saves append to it
    let minted: sqlchat::api::SaveChatResponse =
        serde_json::from_str(r#"{"ChatId":42}"#).unwrap();
    let second: SaveChatRequest =
        build_save_request(Some(minted.chat_id), 1042, "by region?", &json!(null));
    assert_eq!(second.chat_id, Some(42));
    assert_eq!(second.chat_content, None);
}

#[test]
fn query_failure_surfaces_backend_error_inline() {
    let message = extract_error_message(r#"{"error":"quota exceeded"}"#).unwrap();

    let mut turns = vec![Turn::pending(TurnId(1), "q".to_string())];
    fail_turn(&mut turns, TurnId(1), message);

    assert_eq!(turns[0].error.as_deref(), Some("quota exceeded"));
    // No table/chart renders for a failed turn
    assert!(turns[0].response.is_none());
}

#[test]
fn answered_and_historical_turns_differ() {
    let response: QueryResponse =
        serde_json::from_value(json!({"columns": ["A"], "table": [{"A": 1}]})).unwrap();

    let mut turns = vec![Turn::pending(TurnId(1), "live question".to_string())];
    answer_turn(&mut turns, TurnId(1), response);
    assert!(turns[0].response.is_some());

    // Historical turns show only the original question text
    let chat: SavedChat = serde_json::from_value(json!({
        "ChatId": 5,
        "Messages": [{"MessageId": 9, "Content": "old question"}]
    }))
    .unwrap();
    let history = turns_from_saved_chat(&chat);
    assert_eq!(history[0].question, "old question");
    assert!(history[0].response.is_none());
}

#[test]
fn switching_chats_mid_flight_never_wedges_the_input() {
    // Submit a question (generation 1), then start a new chat while the
    // query is in flight (latest generation 2, turn list reset).
    let mut turns = vec![Turn::pending(TurnId(1), "total sales?".to_string())];
    let mut in_flight = true;
    turns.clear();

    let response: QueryResponse =
        serde_json::from_value(json!({"columns": ["A"], "table": [{"A": 1}]})).unwrap();
    let settled = settle_submission(&mut turns, &mut in_flight, TurnId(1), 1, 2, Ok(response));

    // The late completion is discarded but the gate is released, so the
    // next question still goes through.
    assert_eq!(settled, Settled::Stale);
    assert!(turns.is_empty());
    assert_eq!(
        accept_submission("by region?", in_flight),
        Some("by region?".to_string())
    );
}

#[test]
fn exported_workbook_keeps_numbers_numeric() {
    let data = TableData {
        headers: vec!["A".to_string(), "Region".to_string()],
        rows: vec![vec!["1,234.50".to_string(), "North".to_string()]],
    };
    let bytes = build_workbook(&data).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}
