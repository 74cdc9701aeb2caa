//! SqlChat - web client for a natural-language-to-SQL chatbot.
//!
//! A single-page Dioxus application that authenticates a user against the
//! backend token/login endpoints, sends free-text questions to the query
//! API, renders tabular and chart results, and exports them as Excel
//! workbooks or landscape PDFs.
//!
//! # Architecture
//!
//! - **Session**: cookie-backed token/login records with an explicit
//!   lifecycle (`Unknown` → `Unauthenticated` | `Authenticated`)
//! - **Auth**: client-code token exchange plus credential or SSO login
//! - **Chat**: per-turn state machine (`pending` → `answered` | `failed`)
//!   with fire-and-forget persistence to the chat-history store
//! - **Export**: table → xlsx workbook, chart image → landscape PDF
//!
//! The NL→SQL engine, chart renderer, and chat storage are external HTTP
//! collaborators; this crate is only the client in front of them.

// Enforce memory safety: forbid all unsafe code
#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod chat;
pub mod components;
pub mod config;
pub mod error;
pub mod export;
pub mod session;
pub mod utils;
