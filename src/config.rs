//! Backend base-URL resolution.
//!
//! The backend origin is derived from the hostname the page was served
//! from: the production domain talks to the fixed production API origin
//! over HTTPS, everything else (localhost, preview builds) uses a relative
//! path so the dev server can proxy same-origin.
//!
//! The resolved value is a pure function of the hostname. It is resolved
//! once at startup and treated as immutable for the page lifetime.

use dioxus::logger::tracing::debug;

/// Hostname the production frontend is served from.
const PRODUCTION_HOST: &str = "ai.iconnectgroup.com";

/// Dot-suffix shared by all production hostnames.
const PRODUCTION_SUFFIX: &str = ".iconnectgroup.com";

/// Fixed production API origin. HTTPS is forced.
const PRODUCTION_API_ORIGIN: &str = "https://apiai.iconnectgroup.com";

/// Relative fallback for same-origin/dev proxying.
const RELATIVE_API_BASE: &str = "/api";

/// Resolved backend base URL. Endpoint paths are appended verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(String);

impl ApiBase {
    /// Derive the base URL from a hostname (exact or suffix match on the
    /// production domain).
    pub fn for_hostname(hostname: &str) -> Self {
        if hostname == PRODUCTION_HOST || hostname.ends_with(PRODUCTION_SUFFIX) {
            ApiBase(PRODUCTION_API_ORIGIN.to_string())
        } else {
            ApiBase(RELATIVE_API_BASE.to_string())
        }
    }

    /// Whether this base points at the production backend.
    pub fn is_production(&self) -> bool {
        self.0.contains("iconnectgroup.com")
    }

    /// Join an endpoint path (e.g. `/api/token`) onto the base.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.0, path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Resolve the backend base from the browser's current hostname.
///
/// Call once at startup and keep the result for the page lifetime.
pub fn resolve_api_base() -> ApiBase {
    #[cfg(target_arch = "wasm32")]
    let base = {
        let hostname = web_sys::window()
            .and_then(|w| w.location().hostname().ok())
            .unwrap_or_default();
        ApiBase::for_hostname(&hostname)
    };

    // Non-wasm builds (docs, tests) have no window; use the dev fallback.
    #[cfg(not(target_arch = "wasm32"))]
    let base = ApiBase(RELATIVE_API_BASE.to_string());

    if !base.is_production() {
        debug!("[DEV] Backend base: {}", base.as_str());
    }

    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_hostname_exact_match() {
        let base = ApiBase::for_hostname("ai.iconnectgroup.com");
        assert_eq!(base.as_str(), "https://apiai.iconnectgroup.com");
        assert!(base.is_production());
    }

    #[test]
    fn test_production_hostname_suffix_match() {
        let base = ApiBase::for_hostname("staging.iconnectgroup.com");
        assert_eq!(base.as_str(), "https://apiai.iconnectgroup.com");
    }

    #[test]
    fn test_dev_hostname_uses_relative_base() {
        for hostname in ["localhost", "127.0.0.1", "app.example.com", ""] {
            let base = ApiBase::for_hostname(hostname);
            assert_eq!(base.as_str(), "/api");
            assert!(!base.is_production());
        }
    }

    #[test]
    fn test_lookalike_hostname_is_not_production() {
        // Suffix match requires the leading dot
        let base = ApiBase::for_hostname("eviliconnectgroup.com");
        assert_eq!(base.as_str(), "/api");
    }

    #[test]
    fn test_url_join() {
        let base = ApiBase::for_hostname("ai.iconnectgroup.com");
        assert_eq!(
            base.url_for("/api/token"),
            "https://apiai.iconnectgroup.com/api/token"
        );

        let dev = ApiBase::for_hostname("localhost");
        assert_eq!(dev.url_for("/api/query"), "/api/api/query");
    }
}
