//! Error types for the SqlChat client.
//!
//! The taxonomy follows the failure modes the UI actually has to handle:
//! transport failures, non-success HTTP statuses (with the backend's own
//! error text when it provides one), malformed responses, and a session
//! that is missing its contact id. Cookie parse failures are deliberately
//! not errors - the cookie getters fail soft to `None` instead.

use thiserror::Error;

/// Errors that can occur while talking to the backend REST surface.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request never produced a response (DNS, CORS, connection reset).
    #[error("Network error: {0}")]
    Network(String),
    /// Backend answered with a non-success status. `message` carries the
    /// backend's `error` field verbatim when the body had one.
    #[error("{message}")]
    Backend { status: u16, message: String },
    /// Response arrived but the body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Decode(String),
    /// The session has no contact id, so per-user calls cannot be made.
    #[error("User ID is missing from user session")]
    MissingContactId,
    /// Compile-only fallback for non-wasm builds; never hit at runtime.
    #[error("HTTP is not available on this platform")]
    Unsupported,
}

impl ApiError {
    /// Message shown to the user for this failure.
    ///
    /// Backend-provided text is surfaced verbatim; everything else gets
    /// the error's display form.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Errors that can occur while building or downloading an export artifact.
///
/// An absent export target region is not an error - the export operations
/// silently return when the DOM region for a turn does not exist.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// Failed to assemble the xlsx workbook
    #[error("Workbook build failed: {0}")]
    Workbook(String),
    /// Failed to assemble the PDF document
    #[error("PDF build failed: {0}")]
    Pdf(String),
    /// Failed to fetch the chart image bytes
    #[error("Chart fetch failed: {0}")]
    ChartFetch(String),
    /// Failed to hand the artifact to the browser download machinery
    #[error("Download failed: {0}")]
    Download(String),
}
