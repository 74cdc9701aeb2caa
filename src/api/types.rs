//! Wire types for the backend REST surface.
//!
//! Field spellings are pinned to what the backend actually sends
//! (PascalCase for login/chat responses, snake_case for the token and
//! query endpoints) via serde renames.

use crate::session::cookies::contact_id_from_value;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `GET /api/token?Code={code}` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Advisory expiry; stored in the token cookie, never checked
    /// client-side.
    #[serde(default)]
    pub expires: Value,
}

/// `POST /api/login` request body (JSON, credential path).
#[derive(Debug, Clone, Serialize)]
pub struct CredentialLogin<'a> {
    pub username: &'a str,
    pub password: &'a str,
    #[serde(rename = "LoginType")]
    pub login_type: &'a str,
}

/// `POST /api/login` request body (form-encoded, SSO path).
#[derive(Debug, Clone, Serialize)]
pub struct WmsLogin<'a> {
    #[serde(rename = "EncryptedCred")]
    pub encrypted_cred: &'a str,
    #[serde(rename = "LoginType")]
    pub login_type: &'a str,
}

/// `POST /api/login` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "ContactID", default)]
    contact_id: Value,
}

impl LoginResponse {
    /// Contact id as an integer, tolerating number or string encodings.
    pub fn contact_id(&self) -> Option<i64> {
        contact_id_from_value(&self.contact_id)
    }
}

/// `POST /api/query` request body.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub question: &'a str,
}

/// `POST /api/query` response: columns plus row objects, the SQL column
/// attributes to persist with the chat, and an optional chart.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub table: Vec<Map<String, Value>>,
    #[serde(default)]
    pub sql_query_columns: Value,
    #[serde(default)]
    pub chart_url: Option<String>,
    #[serde(default)]
    pub chart_title: Option<String>,
}

impl QueryResponse {
    /// Whether the response carries a renderable table.
    pub fn has_table(&self) -> bool {
        !self.columns.is_empty() && !self.table.is_empty()
    }
}

/// One message inside a saved chat.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "MessageId")]
    pub message_id: i64,
    #[serde(rename = "Content", default)]
    pub content: String,
}

/// `GET /api/chat/history/{contactId}` response element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SavedChat {
    #[serde(rename = "ChatId")]
    pub chat_id: i64,
    #[serde(rename = "Chat_Content", default)]
    pub content: Option<String>,
    #[serde(rename = "Messages", default)]
    pub messages: Vec<ChatMessage>,
}

impl SavedChat {
    /// Sidebar label: chat preview, else first message, else a placeholder.
    pub fn label(&self) -> String {
        let pick = |s: &str| {
            let trimmed: String = s.chars().take(30).collect();
            (!trimmed.is_empty()).then_some(trimmed)
        };
        self.content
            .as_deref()
            .and_then(pick)
            .or_else(|| self.messages.first().and_then(|m| pick(&m.content)))
            .unwrap_or_else(|| "Untitled Chat".to_string())
    }
}

/// `POST /api/chat/save` request body.
///
/// The first save of a session sends `chatId: null`; the backend mints a
/// new chat id which subsequent saves include.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveChatRequest {
    #[serde(rename = "chatId")]
    pub chat_id: Option<i64>,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "chatContent", skip_serializing_if = "Option::is_none")]
    pub chat_content: Option<String>,
    #[serde(rename = "messageContent")]
    pub message_content: String,
    #[serde(rename = "sqlAttributes")]
    pub sql_attributes: Value,
}

/// `POST /api/chat/save` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaveChatResponse {
    #[serde(rename = "ChatId")]
    pub chat_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_response_decode() {
        let parsed: TokenResponse =
            serde_json::from_str(r#"{"access_token":"tok","expires":"2026-09-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(parsed.access_token, "tok");
        assert_eq!(parsed.expires, json!("2026-09-01T00:00:00Z"));
    }

    #[test]
    fn test_login_response_contact_id_encodings() {
        let numeric: LoginResponse =
            serde_json::from_str(r#"{"Name":"Alice","ContactID":1042}"#).unwrap();
        assert_eq!(numeric.contact_id(), Some(1042));

        let stringy: LoginResponse =
            serde_json::from_str(r#"{"Name":"Alice","ContactID":"1042"}"#).unwrap();
        assert_eq!(stringy.contact_id(), Some(1042));

        let missing: LoginResponse = serde_json::from_str(r#"{"Name":"Alice"}"#).unwrap();
        assert_eq!(missing.contact_id(), None);
    }

    #[test]
    fn test_query_response_decode() {
        let parsed: QueryResponse = serde_json::from_str(
            r#"{
                "columns": ["A"],
                "table": [{"A": 1}],
                "sql_query_columns": ["A"],
                "chart_url": "https://charts.example/1.png",
                "chart_title": "Totals"
            }"#,
        )
        .unwrap();
        assert!(parsed.has_table());
        assert_eq!(parsed.columns, vec!["A"]);
        assert_eq!(parsed.table[0]["A"], json!(1));
        assert_eq!(parsed.chart_title.as_deref(), Some("Totals"));
    }

    #[test]
    fn test_query_response_all_fields_optional() {
        let parsed: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(!parsed.has_table());
        assert_eq!(parsed.sql_query_columns, Value::Null);
        assert_eq!(parsed.chart_url, None);
    }

    #[test]
    fn test_save_request_serializes_null_chat_id() {
        let request = SaveChatRequest {
            chat_id: None,
            user_id: 7,
            chat_content: Some("preview".to_string()),
            message_content: "question".to_string(),
            sql_attributes: json!(["A", "B"]),
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded,
            json!({
                "chatId": null,
                "userId": 7,
                "chatContent": "preview",
                "messageContent": "question",
                "sqlAttributes": ["A", "B"]
            })
        );
    }

    #[test]
    fn test_save_request_append_omits_chat_content() {
        let request = SaveChatRequest {
            chat_id: Some(42),
            user_id: 7,
            chat_content: None,
            message_content: "question".to_string(),
            sql_attributes: Value::Null,
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["chatId"], json!(42));
        assert!(encoded.get("chatContent").is_none());
    }

    #[test]
    fn test_saved_chat_label_fallbacks() {
        let with_content: SavedChat = serde_json::from_str(
            r#"{"ChatId":1,"Chat_Content":"What is the total sales for June 2025? And more","Messages":[]}"#,
        )
        .unwrap();
        assert_eq!(with_content.label(), "What is the total sales for Ju");

        let from_message: SavedChat = serde_json::from_str(
            r#"{"ChatId":2,"Messages":[{"MessageId":9,"Content":"top 5 companies"}]}"#,
        )
        .unwrap();
        assert_eq!(from_message.label(), "top 5 companies");

        let empty: SavedChat = serde_json::from_str(r#"{"ChatId":3}"#).unwrap();
        assert_eq!(empty.label(), "Untitled Chat");
    }

    #[test]
    fn test_wms_login_form_encoding() {
        let body = serde_urlencoded::to_string(WmsLogin {
            encrypted_cred: "a+b==",
            login_type: "wms",
        })
        .unwrap();
        assert_eq!(body, "EncryptedCred=a%2Bb%3D%3D&LoginType=wms");
    }
}
