//! Cookie-backed persistence for the token and login records.
//!
//! Two cookies hold JSON blobs: `sales_bot_token` wraps the bearer token
//! plus its advisory expiry, `sales_bot_login` wraps the display name and
//! contact id. Both are written with a 1-day expiry and values are
//! URI-component encoded, matching what the backend's other clients write.
//!
//! Every getter fails soft: malformed JSON logs an error and degrades to
//! "no session" instead of propagating. `clear_all` guarantees that no
//! residual session material survives a logout - it removes both named
//! cookies, sweeps every other cookie by name, and clears local and
//! session storage.
//!
//! The JSON codecs and cookie-header parsing are pure and unit-tested;
//! only the `document.cookie` / storage glue is wasm-specific.

use dioxus::logger::tracing::error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cookie holding the bearer token record.
pub const TOKEN_COOKIE: &str = "sales_bot_token";

/// Cookie holding the login record.
pub const LOGIN_COOKIE: &str = "sales_bot_login";

/// Cookie lifetime in milliseconds (1 day).
#[cfg(target_arch = "wasm32")]
const COOKIE_TTL_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// JSON payload of the token cookie.
///
/// `token_expires_at` is advisory only: it is stored and never checked
/// client-side. A stale token is rejected by the backend with a 401.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub user_token: String,
    #[serde(default)]
    pub token_expires_at: Value,
}

/// JSON payload of the login cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRecord {
    #[serde(rename = "user_Login")]
    pub user_login: String,
    #[serde(rename = "ContactID", default)]
    pub contact_id: Value,
}

impl TokenRecord {
    /// Parse a token cookie value, failing soft on malformed JSON.
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                error!("Error decoding user token: {}", e);
                None
            }
        }
    }
}

impl LoginRecord {
    /// Parse a login cookie value, failing soft on malformed JSON.
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                error!("Error decoding user login: {}", e);
                None
            }
        }
    }

    /// Contact id as an integer, tolerating number or string encodings.
    pub fn contact_id_value(&self) -> Option<i64> {
        contact_id_from_value(&self.contact_id)
    }
}

/// Interpret a contact id that the backend may encode as a number or a
/// numeric string.
pub fn contact_id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Find a named cookie's (still-encoded) value in a `document.cookie`
/// header string.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then_some(value.trim())
    })
}

// ============================================================================
// Browser glue (document.cookie + storage)
// ============================================================================

#[cfg(target_arch = "wasm32")]
fn html_document() -> Option<web_sys::HtmlDocument> {
    use wasm_bindgen::JsCast;
    web_sys::window()?
        .document()?
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()
}

/// Raw decoded value of a named cookie, or None if absent.
#[cfg(target_arch = "wasm32")]
pub fn get_cookie(name: &str) -> Option<String> {
    let header = html_document()?.cookie().ok()?;
    let encoded = find_cookie(&header, name)?;
    match js_sys::decode_uri_component(encoded) {
        Ok(decoded) => Some(String::from(decoded)),
        Err(_) => Some(encoded.to_string()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn get_cookie(_name: &str) -> Option<String> {
    None
}

#[cfg(target_arch = "wasm32")]
fn set_cookie(name: &str, value: &str) {
    let Some(doc) = html_document() else { return };
    let encoded = js_sys::encode_uri_component(value);
    let expires = js_sys::Date::new_0();
    expires.set_time(js_sys::Date::now() + COOKIE_TTL_MS);
    let cookie = format!(
        "{}={}; expires={}; path=/",
        name,
        encoded,
        expires.to_utc_string()
    );
    if let Err(e) = doc.set_cookie(&cookie) {
        error!("Failed to set cookie {}: {:?}", name, e);
    }
}

#[cfg(target_arch = "wasm32")]
fn expire_cookie(doc: &web_sys::HtmlDocument, name: &str) {
    let cookie = format!("{}=; expires=Thu, 01 Jan 1970 00:00:00 UTC; path=/", name);
    let _ = doc.set_cookie(&cookie);
}

/// Persist the bearer token and its advisory expiry.
#[cfg(target_arch = "wasm32")]
pub fn save_token(token: &str, expires_at: &Value) {
    let record = TokenRecord {
        user_token: token.to_string(),
        token_expires_at: expires_at.clone(),
    };
    match serde_json::to_string(&record) {
        Ok(json) => set_cookie(TOKEN_COOKIE, &json),
        Err(e) => error!("Failed to encode token cookie: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_token(_token: &str, _expires_at: &Value) {}

/// Persist the display name and contact id.
#[cfg(target_arch = "wasm32")]
pub fn save_login(name: &str, contact_id: Option<i64>) {
    let record = LoginRecord {
        user_login: name.to_string(),
        contact_id: contact_id.map(Value::from).unwrap_or(Value::Null),
    };
    match serde_json::to_string(&record) {
        Ok(json) => set_cookie(LOGIN_COOKIE, &json),
        Err(e) => error!("Failed to encode login cookie: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_login(_name: &str, _contact_id: Option<i64>) {}

/// Parsed token record from the token cookie, or None.
pub fn get_token() -> Option<TokenRecord> {
    TokenRecord::from_json(&get_cookie(TOKEN_COOKIE)?)
}

/// Parsed login record from the login cookie, or None.
pub fn get_login() -> Option<LoginRecord> {
    LoginRecord::from_json(&get_cookie(LOGIN_COOKIE)?)
}

/// Bearer token string from the token cookie, or None.
pub fn token_value() -> Option<String> {
    get_token().map(|record| record.user_token)
}

/// Display name from the login cookie, or None.
pub fn login_value() -> Option<String> {
    get_login().map(|record| record.user_login)
}

/// Contact id from the login cookie, or None.
pub fn contact_id() -> Option<i64> {
    get_login()?.contact_id_value()
}

/// Remove both named cookies, sweep all other cookies by name, and clear
/// local and session storage.
#[cfg(target_arch = "wasm32")]
pub fn clear_all() {
    let Some(doc) = html_document() else { return };

    expire_cookie(&doc, TOKEN_COOKIE);
    expire_cookie(&doc, LOGIN_COOKIE);

    if let Ok(header) = doc.cookie() {
        for pair in header.split(';') {
            let name = pair.split('=').next().unwrap_or("").trim();
            if !name.is_empty() {
                expire_cookie(&doc, name);
            }
        }
    }

    if let Some(window) = web_sys::window() {
        if let Ok(Some(local)) = window.local_storage() {
            let _ = local.clear();
        }
        if let Ok(Some(session)) = window.session_storage() {
            let _ = session.clear();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn clear_all() {}
