//! Backend REST surface: wire types and the HTTP client.

pub mod client;
pub mod types;

pub use client::{
    error_message_or, extract_error_message, ApiClient, GENERIC_ERROR, GENERIC_LOGIN_ERROR,
};
pub use types::{
    ChatMessage, CredentialLogin, LoginResponse, QueryRequest, QueryResponse, SaveChatRequest,
    SaveChatResponse, SavedChat, TokenResponse, WmsLogin,
};
