//! UI components and the top-level router.
//!
//! The shell owns the page-level session state and runs the bootstrap
//! decision exactly once per page load: SSO exchange when the URL carries
//! both `code` and `login` parameters, cookie restore when both session
//! cookies are present, otherwise the login screen. Child views read the
//! session through the [`use_session`] context.

mod chat_view;
mod login;

pub use chat_view::ChatView;
pub use login::LoginPage;

use dioxus::logger::tracing::error;
use dioxus::prelude::*;

use crate::auth;
use crate::config;
use crate::session::{bootstrap_action, cookies, BootstrapAction, SessionState};

/// Client-visible routes.
#[derive(Routable, Clone, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/login")]
        Login {},
        #[route("/chat")]
        Chat {},
        #[route("/logout")]
        Logout {},
        #[route("/unauthorized")]
        Unauthorized {},
}

/// Session context accessor for child components.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

#[component]
pub fn App() -> Element {
    rsx! {
        Router::<Route> {}
    }
}

/// URL query string of the current page (with the leading `?`).
#[cfg(target_arch = "wasm32")]
fn current_query_string() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn current_query_string() -> String {
    String::new()
}

/// Layout component that owns the session lifecycle.
///
/// Renders a loading overlay until the bootstrap routine resolves the
/// session to authenticated or unauthenticated, then the routed view.
#[component]
fn Shell() -> Element {
    let mut session = use_signal(SessionState::default);
    use_context_provider(|| session);

    let mut loading_message = use_signal(|| "Initializing...".to_string());
    let navigator = use_navigator();

    use_effect(move || {
        if !matches!(*session.peek(), SessionState::Unknown) {
            return;
        }

        spawn(async move {
            let action = bootstrap_action(&current_query_string(), &crate::session::CookieSnapshot::read());
            match action {
                BootstrapAction::SsoExchange(params) => {
                    loading_message.set("Authenticating...".to_string());
                    let base = config::resolve_api_base();
                    match auth::sso_login(base, &params.code, &params.login).await {
                        Ok(user) => {
                            session.set(SessionState::Authenticated(user));
                            navigator.replace(Route::Chat {});
                        }
                        Err(e) => {
                            error!("WMS login error: {}", e);
                            session.set(SessionState::Unauthenticated);
                            navigator.replace(Route::Unauthorized {});
                        }
                    }
                }
                BootstrapAction::Restore(user) => {
                    session.set(SessionState::Authenticated(user));
                    navigator.replace(Route::Chat {});
                }
                BootstrapAction::ShowLogin => {
                    session.set(SessionState::Unauthenticated);
                }
            }
        });
    });

    rsx! {
        if matches!(*session.read(), SessionState::Unknown) {
            div { class: "sc-boot-overlay",
                div { class: "sc-spinner" }
                p { class: "sc-boot-message", "{loading_message}" }
            }
        } else {
            Outlet::<Route> {}
        }
    }
}

/// `/` - chat when authenticated, login form otherwise.
#[component]
fn Home() -> Element {
    let session = use_session();
    let navigator = use_navigator();

    use_effect(move || {
        if session.read().is_authenticated() {
            navigator.replace(Route::Chat {});
        }
    });

    if session.read().is_authenticated() {
        rsx! {}
    } else {
        rsx! {
            LoginPage {}
        }
    }
}

/// `/login`
#[component]
fn Login() -> Element {
    rsx! {
        LoginPage {}
    }
}

/// `/chat` - guarded view.
///
/// Single presence check on mount: both cookie values must be non-empty.
/// No network validation happens here; a stale token is rejected by the
/// backend on first use.
#[component]
fn Chat() -> Element {
    let mut allowed = use_signal(|| None::<bool>);
    let navigator = use_navigator();

    use_effect(move || {
        if allowed.peek().is_none() {
            let ok = cookies::token_value().is_some() && cookies::login_value().is_some();
            if !ok {
                navigator.replace(Route::Login {});
            }
            allowed.set(Some(ok));
        }
    });

    if allowed() == Some(true) {
        rsx! {
            ChatView {}
        }
    } else {
        rsx! {}
    }
}

/// `/logout` - clears all session material, then redirects to the login
/// screen after a short delay.
#[component]
fn Logout() -> Element {
    let mut session = use_session();
    let navigator = use_navigator();

    use_effect(move || {
        cookies::clear_all();
        session.set(SessionState::Unauthenticated);

        spawn(async move {
            #[cfg(target_arch = "wasm32")]
            gloo_timers::future::TimeoutFuture::new(2_000).await;
            navigator.replace(Route::Login {});
        });
    });

    rsx! {
        div { class: "sc-fullscreen-notice",
            div {
                h2 { "Logged Out Successfully" }
                p { "Redirecting to login..." }
            }
        }
    }
}

/// `/unauthorized`
#[component]
fn Unauthorized() -> Element {
    rsx! {
        div { class: "sc-fullscreen-notice",
            div {
                h2 { "Access Denied" }
                p { "Please Login to continue." }
            }
        }
    }
}
