//! HTTP client for the backend REST surface.
//!
//! Thin wrapper over the browser fetch API (via `gloo-net`) that attaches
//! the bearer token, maps non-success statuses to [`ApiError::Backend`]
//! with the backend's own error text when the body carries one, and
//! decodes JSON bodies into the types in [`super::types`].
//!
//! Non-wasm builds get compile-only fallbacks that return
//! [`ApiError::Unsupported`]; they are never called at runtime but allow
//! the crate to build and test natively.

use crate::config::ApiBase;
use crate::error::ApiError;
use crate::session::cookies;

use super::types::{
    CredentialLogin, LoginResponse, QueryRequest, QueryResponse, SaveChatRequest,
    SaveChatResponse, SavedChat, TokenResponse, WmsLogin,
};

/// Fallback shown when a login-path endpoint gives no usable error text.
pub const GENERIC_LOGIN_ERROR: &str = "Login failed";

/// Fallback for every other endpoint.
pub const GENERIC_ERROR: &str = "An error occurred";

/// Pull the backend's `error` field out of a response body, if present.
///
/// Backends on this surface report failures as `{"error": "..."}`; any
/// other body shape yields None and the caller falls back to a generic
/// message.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

/// Backend error text from a failure body, or the endpoint's fallback.
pub fn error_message_or(body: &str, fallback: &str) -> String {
    extract_error_message(body).unwrap_or_else(|| fallback.to_string())
}

/// Client bound to a resolved base URL, optionally carrying a bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: ApiBase,
    bearer: Option<String>,
}

impl ApiClient {
    /// Client with no bearer token (token exchange only).
    pub fn new(base: ApiBase) -> Self {
        ApiClient { base, bearer: None }
    }

    /// Client carrying a bearer token for authenticated calls.
    pub fn with_bearer(base: ApiBase, token: String) -> Self {
        ApiClient {
            base,
            bearer: Some(token),
        }
    }

    /// Client using the bearer token from the token cookie, if present.
    pub fn from_cookie(base: ApiBase) -> Self {
        ApiClient {
            base,
            bearer: cookies::token_value(),
        }
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    /// `GET /api/token?Code={code}` - exchange a client code for a bearer
    /// token.
    pub async fn fetch_token(&self, code: &str) -> Result<TokenResponse, ApiError> {
        self.get_json(&format!("/api/token?Code={}", code), GENERIC_LOGIN_ERROR)
            .await
    }

    /// `POST /api/login` (JSON) - credential login.
    pub async fn login(&self, request: &CredentialLogin<'_>) -> Result<LoginResponse, ApiError> {
        self.post_json("/api/login", request, GENERIC_LOGIN_ERROR).await
    }

    /// `POST /api/login` (form-encoded) - SSO login with an encrypted
    /// credential string.
    pub async fn login_encrypted(&self, request: &WmsLogin<'_>) -> Result<LoginResponse, ApiError> {
        let body = serde_urlencoded::to_string(request)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.post_form("/api/login", body, GENERIC_LOGIN_ERROR).await
    }

    /// `POST /api/query` - submit a natural-language question.
    pub async fn query(&self, question: &str) -> Result<QueryResponse, ApiError> {
        self.post_json("/api/query", &QueryRequest { question }, GENERIC_ERROR)
            .await
    }

    /// `GET /api/chat/history/{contactId}` - saved chats for a user.
    pub async fn chat_history(&self, contact_id: i64) -> Result<Vec<SavedChat>, ApiError> {
        self.get_json(&format!("/api/chat/history/{}", contact_id), GENERIC_ERROR)
            .await
    }

    /// `POST /api/chat/save` - create or append to a saved chat.
    pub async fn save_chat(&self, request: &SaveChatRequest) -> Result<SaveChatResponse, ApiError> {
        self.post_json("/api/chat/save", request, GENERIC_ERROR).await
    }
}

// ============================================================================
// wasm transport
// ============================================================================

#[cfg(target_arch = "wasm32")]
impl ApiClient {
    fn apply_bearer(&self, builder: gloo_net::http::RequestBuilder) -> gloo_net::http::RequestBuilder {
        match &self.bearer {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let request = self
            .apply_bearer(gloo_net::http::Request::get(&self.base.url_for(path)))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::handle_response(request.send().await, fallback).await
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let request = self
            .apply_bearer(gloo_net::http::Request::post(&self.base.url_for(path)))
            .json(body)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::handle_response(request.send().await, fallback).await
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: String,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let request = self
            .apply_bearer(gloo_net::http::Request::post(&self.base.url_for(path)))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::handle_response(request.send().await, fallback).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        outcome: Result<gloo_net::http::Response, gloo_net::Error>,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = outcome.map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.ok() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message_or(&body, fallback);
            return Err(ApiError::Backend {
                status: response.status(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

// ============================================================================
// Non-wasm fallbacks (compile-only, never called at runtime)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
impl ApiClient {
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        _path: &str,
        _fallback: &str,
    ) -> Result<T, ApiError> {
        Err(ApiError::Unsupported)
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        _path: &str,
        _body: &B,
        _fallback: &str,
    ) -> Result<T, ApiError> {
        Err(ApiError::Unsupported)
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        _path: &str,
        _body: String,
        _fallback: &str,
    ) -> Result<T, ApiError> {
        Err(ApiError::Unsupported)
    }
}
