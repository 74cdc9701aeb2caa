//! Session lifecycle and bootstrap decision.
//!
//! The page-level session is an explicit finite-state machine:
//!
//! ```text
//! Unknown ──bootstrap──▶ Unauthenticated | Authenticated
//! ```
//!
//! A single bootstrap routine inspects the URL query string and the cookie
//! snapshot and produces one [`BootstrapAction`]. The decision is a pure
//! table - in particular, the SSO exchange runs if and only if both `code`
//! and `login` query parameters are present, independent of any prior-run
//! state. It is evaluated once per navigation event.

pub mod cookies;

use cookies::{LoginRecord, TokenRecord};
use serde::Deserialize;

/// Minimal authenticated identity, derived from the login response or the
/// login cookie. Owned by the top-level shell for the page lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSession {
    pub name: String,
    pub contact_id: Option<i64>,
}

/// Page-level session lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Bootstrap has not completed yet; show the loading overlay.
    #[default]
    Unknown,
    /// No usable session; show the login screen.
    Unauthenticated,
    /// Session established from login, SSO, or cookie restore.
    Authenticated(UserSession),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&UserSession> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// SSO entry parameters carried in the URL query string.
#[derive(Debug, Clone, PartialEq)]
pub struct SsoParams {
    pub code: String,
    pub login: String,
}

/// What the bootstrap routine should do for this navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapAction {
    /// Both `code` and `login` URL parameters present: run the single-shot
    /// token + WMS login exchange.
    SsoExchange(SsoParams),
    /// Both cookies present: restore the session without a network call.
    Restore(UserSession),
    /// Nothing to go on: show the login screen.
    ShowLogin,
}

/// Snapshot of the two session cookies at bootstrap time.
#[derive(Debug, Clone, Default)]
pub struct CookieSnapshot {
    pub token: Option<TokenRecord>,
    pub login: Option<LoginRecord>,
}

impl CookieSnapshot {
    /// Read both cookies from the browser.
    pub fn read() -> Self {
        CookieSnapshot {
            token: cookies::get_token(),
            login: cookies::get_login(),
        }
    }
}

#[derive(Deserialize)]
struct RawQuery {
    code: Option<String>,
    login: Option<String>,
}

/// Extract SSO parameters from a URL query string (with or without the
/// leading `?`). Returns Some only when both parameters are present and
/// non-empty.
pub fn sso_params(query: &str) -> Option<SsoParams> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let raw: RawQuery = serde_urlencoded::from_str(query).ok()?;
    match (raw.code, raw.login) {
        (Some(code), Some(login)) if !code.is_empty() && !login.is_empty() => {
            Some(SsoParams { code, login })
        }
        _ => None,
    }
}

/// The bootstrap decision table.
///
/// | URL has code+login | token cookie | login cookie | action      |
/// |--------------------|--------------|--------------|-------------|
/// | yes                | -            | -            | SsoExchange |
/// | no                 | yes          | yes          | Restore     |
/// | no                 | otherwise    |              | ShowLogin   |
pub fn bootstrap_action(query: &str, cookies: &CookieSnapshot) -> BootstrapAction {
    if let Some(params) = sso_params(query) {
        return BootstrapAction::SsoExchange(params);
    }

    match (&cookies.token, &cookies.login) {
        (Some(_), Some(login)) => BootstrapAction::Restore(UserSession {
            name: login.user_login.clone(),
            contact_id: login.contact_id_value(),
        }),
        _ => BootstrapAction::ShowLogin,
    }
}
