//! Storefront page and its form handlers.
//!
//! Every form posts back here, mutates the visitor's session and redirects
//! (303) to `/` with the filter query the form carried in `return_query`.
//! Failures the visitor should see become a one-shot notice on the next render.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use stride_catalog::filter_products;
use stride_core::types::ChatTurn;
use stride_session::SessionAccess;
use tracing::{debug, warn};

use crate::cookie::{session_id, with_session_cookie};
use crate::error::ApiError;
use crate::handlers::parse_bag_index;
use crate::query::StoreQuery;
use crate::render::{ErrorView, StorefrontInput, StorefrontView};
use crate::state::{AppState, CatalogState};

#[derive(Debug, Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub return_query: String,
}

#[derive(Debug, Deserialize)]
pub struct AddForm {
    pub product_id: String,
    #[serde(default)]
    pub return_query: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    #[serde(default)]
    pub index: String,
    #[serde(default)]
    pub return_query: String,
}

#[derive(Debug, Deserialize)]
pub struct ReturnForm {
    #[serde(default)]
    pub return_query: String,
}

#[derive(Debug, Deserialize)]
pub struct AssistantForm {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub return_query: String,
}

fn back_to_store<T>(access: &SessionAccess<T>, return_query: &str) -> Response {
    let location = StoreQuery::from_query_string(return_query).location();
    with_session_cookie(access, Redirect::to(&location))
}

fn catalog_error_page(state: &AppState, path: &str, message: &str) -> Result<Response, ApiError> {
    let html = state.templates.error_page(&ErrorView {
        title: "Catalog unavailable".to_string(),
        path: path.to_string(),
        message: message.to_string(),
    })?;
    Ok((StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response())
}

/// GET /
pub async fn storefront(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<StoreQuery>,
) -> Result<Response, ApiError> {
    let catalog = match state.catalog.as_ref() {
        CatalogState::Ready(catalog) => Arc::clone(catalog),
        CatalogState::Failed { path, message } => {
            return catalog_error_page(&state, path, message);
        }
    };

    let access = state.sessions.with_session(session_id(&jar), |s| {
        let notice = s.take_notice();
        (s.clone(), notice)
    })?;
    let (session, notice) = &access.value;

    let selection = query.selection(&catalog);
    let products = filter_products(&catalog, &selection);
    let view = StorefrontView::build(StorefrontInput {
        catalog: &catalog,
        selection: &selection,
        products: &products,
        session,
        notice: notice.clone(),
        assistant_enabled: state.assistant.is_enabled(),
        assistant_unavailable: state.assistant.disabled_reason(),
    });

    let html = state.templates.storefront(&view)?;
    Ok(with_session_cookie(&access, Html(html)))
}

/// POST /name
pub async fn set_name(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<NameForm>,
) -> Result<Response, ApiError> {
    let access = state
        .sessions
        .with_session(session_id(&jar), |s| s.set_name(&form.name))?;
    Ok(back_to_store(&access, &form.return_query))
}

/// POST /bag/add
pub async fn add_to_bag(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AddForm>,
) -> Result<Response, ApiError> {
    let product_id = form.product_id.trim();
    let product = state
        .catalog
        .catalog()
        .and_then(|catalog| catalog.get(product_id).cloned());

    let access = state.sessions.with_session(session_id(&jar), |s| match product {
        Some(product) => {
            s.bag.add(product);
            true
        }
        None => {
            s.set_notice("That product is no longer available.");
            false
        }
    })?;

    if access.value {
        debug!(session_id = %access.id, product_id, "Added to bag");
    } else {
        warn!(session_id = %access.id, product_id, "Add to bag for unknown product");
    }
    Ok(back_to_store(&access, &form.return_query))
}

/// POST /bag/remove
pub async fn remove_from_bag(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RemoveForm>,
) -> Result<Response, ApiError> {
    let index = parse_bag_index(&form.index);
    let access = state.sessions.with_session(session_id(&jar), |s| match index {
        Some(index) => {
            if let Err(e) = s.bag.remove(index) {
                s.set_notice(e.to_string());
            }
        }
        None => s.set_notice("That bag position is not valid."),
    })?;
    Ok(back_to_store(&access, &form.return_query))
}

/// POST /bag/clear
pub async fn clear_bag(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ReturnForm>,
) -> Result<Response, ApiError> {
    let access = state
        .sessions
        .with_session(session_id(&jar), |s| s.bag.clear())?;
    Ok(back_to_store(&access, &form.return_query))
}

/// POST /assistant
///
/// The shopper's turn is kept even when the chat API fails; the failure is
/// shown as a notice and the rest of the page is unaffected.
pub async fn ask_assistant(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AssistantForm>,
) -> Result<Response, ApiError> {
    let id = session_id(&jar);
    let validated = state.assistant.validate_message(&form.message);
    let catalog = state.catalog.catalog().cloned();

    let (message, catalog) = match (validated, catalog) {
        (Ok(message), Some(catalog)) => (message, catalog),
        (Err(e), _) => {
            let access = state
                .sessions
                .with_session(id, |s| s.set_notice(e.to_string()))?;
            return Ok(back_to_store(&access, &form.return_query));
        }
        (Ok(_), None) => {
            let access = state.sessions.with_session(id, |_| ())?;
            return Ok(back_to_store(&access, &form.return_query));
        }
    };

    let access = state.sessions.with_session(id, |s| {
        s.push_turn(ChatTurn::user(message));
        (s.name.clone(), s.messages.clone())
    })?;
    let (name, transcript) = &access.value;

    let outcome = state.assistant.reply(name, transcript, &catalog).await;
    state
        .sessions
        .with_session(Some(access.id), |s| match outcome {
            Ok(reply) => s.push_turn(ChatTurn::assistant(reply)),
            Err(e) => s.set_notice(format!("The assistant couldn't respond right now: {e}")),
        })?;

    Ok(back_to_store(&access, &form.return_query))
}
