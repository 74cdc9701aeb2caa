//! Authentication flows.
//!
//! Two entry paths produce a session:
//!
//! 1. **Credential login**: exchange the fixed client code for a bearer
//!    token, then POST username/password as JSON.
//! 2. **SSO entry**: exchange the URL-supplied `code` for a bearer token,
//!    then POST the URL-supplied `login` value as a form-encoded
//!    `EncryptedCred` with `LoginType: "wms"`.
//!
//! Both persist the token and login cookies on success. Any failure
//! clears partial session state and surfaces the backend's error text
//! when it provided one.

use dioxus::logger::tracing::{error, info};

use crate::api::{ApiClient, CredentialLogin, WmsLogin};
use crate::config::ApiBase;
use crate::error::ApiError;
use crate::session::{cookies, UserSession};

/// Fixed client code used for the credential-login token exchange.
const CLIENT_CODE: &str = "act2";

/// Default login type for the credential path.
const LOGIN_TYPE_POS: &str = "pos";

/// Login type for the SSO path.
const LOGIN_TYPE_WMS: &str = "wms";

/// Credential login: token exchange with the fixed client code, then a
/// JSON login POST. Persists both cookies on success.
pub async fn credential_login(
    base: ApiBase,
    username: &str,
    password: &str,
) -> Result<UserSession, ApiError> {
    let outcome = credential_exchange(base, username, password).await;
    if let Err(e) = &outcome {
        error!("Login error: {}", e);
        cookies::clear_all();
    }
    outcome
}

async fn credential_exchange(
    base: ApiBase,
    username: &str,
    password: &str,
) -> Result<UserSession, ApiError> {
    let token = ApiClient::new(base.clone()).fetch_token(CLIENT_CODE).await?;
    let client = ApiClient::with_bearer(base, token.access_token.clone());

    let login = client
        .login(&CredentialLogin {
            username,
            password,
            login_type: LOGIN_TYPE_POS,
        })
        .await?;

    let session = UserSession {
        name: login.name.clone(),
        contact_id: login.contact_id(),
    };

    cookies::save_token(&token.access_token, &token.expires);
    cookies::save_login(&session.name, session.contact_id);
    info!("Credential login succeeded for {}", session.name);
    Ok(session)
}

/// SSO login: token exchange with the URL `code`, then a form-encoded WMS
/// login POST with the URL `login` value. Persists both cookies on
/// success; clears session state on failure.
pub async fn sso_login(base: ApiBase, code: &str, login: &str) -> Result<UserSession, ApiError> {
    let outcome = sso_exchange(base, code, login).await;
    if let Err(e) = &outcome {
        error!("WMS login error: {}", e);
        cookies::clear_all();
    }
    outcome
}

async fn sso_exchange(base: ApiBase, code: &str, login: &str) -> Result<UserSession, ApiError> {
    let token = ApiClient::new(base.clone()).fetch_token(code).await?;
    let client = ApiClient::with_bearer(base, token.access_token.clone());

    let response = client
        .login_encrypted(&WmsLogin {
            encrypted_cred: login,
            login_type: LOGIN_TYPE_WMS,
        })
        .await?;

    let session = UserSession {
        name: response.name.clone(),
        contact_id: response.contact_id(),
    };

    cookies::save_token(&token.access_token, &token.expires);
    cookies::save_login(&session.name, session.contact_id);
    info!("WMS login succeeded for {}", session.name);
    Ok(session)
}
