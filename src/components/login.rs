//! Credential login form.

use dioxus::logger::tracing::error;
use dioxus::prelude::*;

use crate::auth;
use crate::components::{use_session, Route};
use crate::config;
use crate::session::SessionState;

/// Username/password form. On success the session context becomes
/// `Authenticated` and the router moves to the chat view; failures show
/// the backend's error text in a banner.
#[component]
pub fn LoginPage() -> Element {
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error_message = use_signal(String::new);
    let mut busy = use_signal(|| false);

    let mut session = use_session();
    let navigator = use_navigator();

    let mut submit = move || {
        if busy() {
            return;
        }
        error_message.set(String::new());

        let user = username.read().clone();
        let pass = password.read().clone();
        if user.is_empty() || pass.is_empty() {
            error_message.set("Username and Password are required.".to_string());
            return;
        }

        busy.set(true);
        spawn(async move {
            let base = config::resolve_api_base();
            match auth::credential_login(base, &user, &pass).await {
                Ok(user_session) => {
                    session.set(SessionState::Authenticated(user_session));
                    navigator.push(Route::Chat {});
                }
                Err(e) => {
                    error!("Login error: {}", e);
                    session.set(SessionState::Unauthenticated);
                    error_message.set(e.user_message());
                }
            }
            busy.set(false);
        });
    };

    let handle_keypress = move |evt: KeyboardEvent| {
        if evt.key() == Key::Enter {
            submit();
        }
    };

    rsx! {
        div { class: "sc-login",
            div { class: "sc-login-form",
                h2 { class: "sc-login-heading", "Login" }

                if !error_message.read().is_empty() {
                    div { class: "sc-login-error", "{error_message}" }
                }

                div { class: "sc-login-field",
                    label { "Username" }
                    input {
                        r#type: "text",
                        value: "{username}",
                        disabled: busy(),
                        oninput: move |evt| username.set(evt.value()),
                        onkeypress: handle_keypress,
                    }
                }

                div { class: "sc-login-field",
                    label { "Password" }
                    input {
                        r#type: "password",
                        value: "{password}",
                        disabled: busy(),
                        oninput: move |evt| password.set(evt.value()),
                        onkeypress: handle_keypress,
                    }
                }

                button {
                    class: "sc-login-button",
                    disabled: busy(),
                    onclick: move |_| submit(),
                    if busy() {
                        span { class: "sc-spinner sc-spinner--small" }
                        "Logging in..."
                    } else {
                        "Login"
                    }
                }
            }
        }
    }
}
