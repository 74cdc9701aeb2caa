//! Chat session view.
//!
//! Owns the list of question/response turns, dispatches queries, hands
//! answered turns to the background save task, and renders tables, charts,
//! and their export buttons.
//!
//! Concurrency model: `is_loading` is the sole submission gate (at most
//! one turn in flight). Requests are never aborted; instead every
//! submission carries a generation number, and a completion whose
//! generation no longer matches the latest one is discarded, so late
//! responses for a superseded view state cannot mutate newer turns.

use dioxus::logger::tracing::{debug, error, info, warn};
use dioxus::prelude::*;
use futures_channel::mpsc::UnboundedReceiver;
use futures_util::StreamExt;

use crate::api::{ApiClient, QueryResponse, SavedChat};
use crate::chat::save::{build_save_request, SaveOutcome};
use crate::chat::{
    accept_submission, settle_submission, turns_from_saved_chat, Settled, Turn, TurnId,
};
use crate::components::{use_session, Route};
use crate::config;
use crate::error::ApiError;
use crate::export::{export_chart_pdf, export_table_excel};
use crate::session::{cookies, SessionState, UserSession};
use crate::utils::format_cell;

/// One submission handed to the query coroutine.
struct AskTurn {
    id: TurnId,
    generation: u64,
    question: String,
}

/// Fetch the saved chats for a user into the sidebar signal.
async fn refresh_saved_chats(
    api: ApiClient,
    contact_id: Option<i64>,
    mut chats: Signal<Vec<SavedChat>>,
) {
    let Some(contact_id) = contact_id else {
        debug!("No contact id in session; skipping chat history fetch");
        return;
    };
    match api.chat_history(contact_id).await {
        Ok(list) => {
            debug!("Fetched {} saved chats", list.len());
            chats.set(list);
        }
        Err(e) => error!("Failed to fetch saved chats: {}", e),
    }
}

#[component]
pub fn ChatView() -> Element {
    let mut session = use_session();
    let navigator = use_navigator();

    // Restore path synthesizes the identity from the login cookie when the
    // guard admitted us without a bootstrap (e.g. direct /chat load).
    let user = session.read().user().cloned().unwrap_or_else(|| UserSession {
        name: cookies::login_value().unwrap_or_default(),
        contact_id: cookies::contact_id(),
    });
    let contact_id = user.contact_id;

    let api = use_hook(|| ApiClient::from_cookie(config::resolve_api_base()));

    let mut sidebar_open = use_signal(|| true);
    let mut history_open = use_signal(|| false);
    let mut question = use_signal(String::new);
    let mut is_loading = use_signal(|| false);
    let mut turns = use_signal(Vec::<Turn>::new);
    let saved_chats = use_signal(Vec::<SavedChat>::new);
    let mut active_chat = use_signal(|| None::<i64>);
    let mut id_counter = use_signal(|| 1u64);
    let mut latest_generation = use_signal(|| 0u64);

    // Initial history fetch
    {
        let api = api.clone();
        use_effect(move || {
            let api = api.clone();
            spawn(async move {
                refresh_saved_chats(api, contact_id, saved_chats).await;
            });
        });
    }

    // Background save task (explicit result channel; failures are logged
    // and never roll back the answered turn)
    let save_task = use_coroutine({
        let api = api.clone();
        move |mut rx: UnboundedReceiver<crate::api::SaveChatRequest>| {
            let api = api.clone();
            async move {
                while let Some(request) = rx.next().await {
                    let creating = request.chat_id.is_none();
                    let outcome = match api.save_chat(&request).await {
                        Ok(response) if creating => SaveOutcome::Created {
                            chat_id: response.chat_id,
                        },
                        Ok(response) => SaveOutcome::Appended {
                            chat_id: response.chat_id,
                        },
                        Err(e) => SaveOutcome::Failed {
                            message: e.user_message(),
                        },
                    };

                    match outcome {
                        SaveOutcome::Created { chat_id } => {
                            // Adopt the minted id unless the user already
                            // switched to another chat meanwhile
                            if active_chat.peek().is_none() {
                                active_chat.set(Some(chat_id));
                            }
                            refresh_saved_chats(api.clone(), contact_id, saved_chats).await;
                        }
                        SaveOutcome::Appended { .. } => {
                            refresh_saved_chats(api.clone(), contact_id, saved_chats).await;
                        }
                        SaveOutcome::Failed { message } => {
                            // Deliberately not surfaced in the UI
                            warn!("Chat save failed: {}", message);
                        }
                    }
                }
            }
        }
    });

    // Query coroutine: one submission at a time, chained save on success
    let submit_task = use_coroutine({
        let api = api.clone();
        move |mut rx: UnboundedReceiver<AskTurn>| {
            let api = api.clone();
            async move {
                while let Some(ask) = rx.next().await {
                    let result = match api.query(&ask.question).await {
                        Ok(response) => Ok(response),
                        Err(e) => {
                            error!("Query failed: {}", e);
                            Err(e.user_message())
                        }
                    };

                    // Every completion releases the gate, current or not
                    let latest = *latest_generation.peek();
                    let settled = is_loading.with_mut(|gate| {
                        turns.with_mut(|t| {
                            settle_submission(t, gate, ask.id, ask.generation, latest, result)
                        })
                    });

                    match settled {
                        Settled::Answered(response) => match contact_id {
                            Some(user_id) => save_task.send(build_save_request(
                                *active_chat.peek(),
                                user_id,
                                &ask.question,
                                &response.sql_query_columns,
                            )),
                            None => {
                                warn!("{}; chat not saved", ApiError::MissingContactId)
                            }
                        },
                        Settled::Failed => {}
                        Settled::Stale => {
                            info!("Discarding stale response for turn {}", ask.id)
                        }
                    }
                }
            }
        }
    });

    let mut handle_submit = move || {
        let Some(text) = accept_submission(&question.read(), is_loading()) else {
            return;
        };

        let id = TurnId(id_counter());
        id_counter.set(id_counter() + 1);
        let generation = latest_generation() + 1;
        latest_generation.set(generation);

        turns.with_mut(|t| t.push(Turn::pending(id, text.clone())));
        question.set(String::new());
        is_loading.set(true);
        submit_task.send(AskTurn {
            id,
            generation,
            question: text,
        });
    };

    let handle_keypress = move |evt: KeyboardEvent| {
        if evt.key() == Key::Enter {
            handle_submit();
        }
    };

    // Switching chats abandons any in-flight submission and its gate
    let mut handle_new_chat = move || {
        active_chat.set(None);
        turns.set(Vec::new());
        latest_generation.set(latest_generation() + 1);
        is_loading.set(false);
    };

    let mut handle_select_chat = move |chat: SavedChat| {
        active_chat.set(Some(chat.chat_id));
        turns.set(turns_from_saved_chat(&chat));
        latest_generation.set(latest_generation() + 1);
        is_loading.set(false);
    };

    let handle_logout = move |_| {
        cookies::clear_all();
        session.set(SessionState::Unauthenticated);
        navigator.push(Route::Logout {});
    };

    // Keep the newest turn in view
    use_effect(move || {
        let _count = turns.read().len();
        #[cfg(target_arch = "wasm32")]
        if let Some(end) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("messages-end"))
        {
            end.scroll_into_view();
        }
    });

    let container_class = if sidebar_open() {
        "chat-container"
    } else {
        "chat-container sidebar-closed"
    };

    rsx! {
        div { class: "{container_class}",
            aside { class: "sidebar",
                div { class: "sidebar-content-wrapper",
                    header { class: "sidebar-profile",
                        p {
                            "Logged in as: "
                            strong { "{user.name}" }
                        }
                        button {
                            class: "logout-btn",
                            title: "Logout",
                            onclick: handle_logout,
                            "Logout"
                        }
                    }

                    div { class: "sidebar-actions",
                        button {
                            class: "new-chat-btn",
                            onclick: move |_| handle_new_chat(),
                            "New Chat"
                        }
                    }

                    div { class: "sidebar-footer-info",
                        div { class: "info-panel",
                            div { class: "message-content",
                                h2 { "How SQL Agent Works" }
                                ol {
                                    li {
                                        strong { "Training" }
                                        ": SQL Agent learns your database schema automatically"
                                    }
                                    li {
                                        strong { "Processing" }
                                        ": Your natural language question is analyzed"
                                    }
                                    li {
                                        strong { "SQL Generation" }
                                        ": AI generates appropriate SQL queries"
                                    }
                                    li {
                                        strong { "Execution" }
                                        ": Query runs on your SQL Server database"
                                    }
                                    li {
                                        strong { "Results" }
                                        ": Data is returned with explanations and visualizations"
                                    }
                                }
                                br {}
                                h2 { "Sample Questions" }
                                ul {
                                    li { "What is the total sales for June 2025?" }
                                    li { "Show me average ticket sale by region and its total gross earning in May" }
                                    li { "What is the sales count and gross earning by region and status show its trend" }
                                    li { "What is the gross margin of june?" }
                                    li { "Show me sales trends over time" }
                                    li { "What are the top 5 companies by sales?" }
                                }
                                br {}
                                h2 { "Powered by:" }
                                p { class: "powered-by", "iVantage360 GenAI" }
                            }
                        }
                    }
                }

                div { class: "history-dropdown",
                    div {
                        class: "history-header",
                        onclick: move |_| history_open.set(!history_open()),
                        span { class: "menu-item", "History" }
                        span { class: "arrow",
                            if history_open() { "▾" } else { "▸" }
                        }
                    }
                    if history_open() {
                        div { class: "conversation-list",
                            for chat in saved_chats() {
                                div {
                                    key: "{chat.chat_id}",
                                    class: if active_chat() == Some(chat.chat_id) {
                                        "conversation-item active"
                                    } else {
                                        "conversation-item"
                                    },
                                    onclick: {
                                        let chat = chat.clone();
                                        move |_| handle_select_chat(chat.clone())
                                    },
                                    "{chat.label()}"
                                }
                            }
                        }
                    }
                }
            }

            main { class: "chat-main",
                header { class: "chat-main-header",
                    button {
                        class: "sidebar-toggle-btn",
                        title: "Toggle Sidebar",
                        onclick: move |_| sidebar_open.set(!sidebar_open()),
                        "☰"
                    }
                }

                div { class: "chat-content-area",
                    div { class: "chat-messages",
                        div { class: "welcome-message",
                            h1 { "SQL Database Chatbot" }
                        }

                        for turn in turns() {
                            TurnCard { key: "{turn.id}", turn: turn.clone() }
                        }

                        div { id: "messages-end" }
                    }
                }

                div { class: "chat-input-area",
                    div { class: "chat-input-form",
                        input {
                            r#type: "text",
                            class: "chat-input",
                            placeholder: "Ask a question about your data...",
                            value: "{question}",
                            oninput: move |evt| question.set(evt.value()),
                            onkeypress: handle_keypress,
                        }
                        button {
                            class: "send-btn",
                            title: "Send",
                            disabled: is_loading(),
                            onclick: move |_| handle_submit(),
                            if is_loading() {
                                span { class: "loader" }
                            } else {
                                "➤"
                            }
                        }
                    }
                }
            }
        }
    }
}

/// One rendered turn: the question box, then the inline error or the
/// table/chart sections once the response arrives.
#[component]
fn TurnCard(turn: Turn) -> Element {
    let error_banner = turn
        .error
        .as_ref()
        .map(|message| rsx! { p { class: "error-message", "{message}" } });

    let response_block = turn
        .response
        .as_ref()
        .map(|response| render_response(turn.id, response));

    rsx! {
        div { class: "question-wrapper",
            p { class: "question-box", "{turn.question}" }
        }
        {error_banner}
        {response_block}
    }
}

fn render_response(id: TurnId, response: &QueryResponse) -> Element {
    let chart = response.chart_url.as_ref().map(|url| {
        let title = response
            .chart_title
            .clone()
            .unwrap_or_else(|| "Chart Visualization".to_string());
        rsx! {
            div { class: "chart-section",
                header { class: "section-header",
                    h2 { class: "section-heading", "{title}" }
                    button {
                        class: "export-btn",
                        onclick: move |_| {
                            spawn(export_chart_pdf(id));
                        },
                        "Export as PDF"
                    }
                }
                div { class: "chart-container", id: "chart-container-{id}",
                    img { src: "{url}", alt: "{title}" }
                }
            }
        }
    });

    rsx! {
        div { class: "chat-response",
            if response.has_table() {
                div { class: "table-section",
                    header { class: "section-header",
                        h2 { class: "section-heading", "Table Results" }
                        button {
                            class: "export-btn",
                            onclick: move |_| {
                                spawn(export_table_excel(id));
                            },
                            "Export as Excel"
                        }
                    }
                    div { class: "table-container",
                        table { class: "styled-table", id: "data-table-{id}",
                            thead {
                                tr {
                                    for col in response.columns.iter() {
                                        th { key: "{col}", "{col}" }
                                    }
                                }
                            }
                            tbody {
                                for (idx, row) in response.table.iter().enumerate() {
                                    tr { key: "{idx}",
                                        for col in response.columns.iter() {
                                            td { key: "{col}", {format_cell(row.get(col.as_str()))} }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            {chart}
        }
    }
}
