//! JSON API handlers.
//!
//! Each handler resolves the visitor's session from the cookie, works against
//! AppState, and returns a JSON body. A new session cookie is attached
//! whenever the request created one.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use stride_assistant::Capability;
use stride_catalog::filter::ALL_CATEGORIES;
use stride_catalog::{filter_products, Catalog, FilterSelection, PriceRange};
use stride_core::types::{ChatTurn, Product};
use stride_session::Bag;

use crate::cookie::{session_id, with_session_cookie};
use crate::error::ApiError;
use crate::query::StoreQuery;
use crate::state::{AppState, CatalogState};

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddToBagRequest {
    pub product_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub catalog_loaded: bool,
    pub product_count: usize,
    pub assistant_enabled: bool,
    pub active_sessions: usize,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub filter: FilterSelection,
    pub total: usize,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
    pub price_bounds: PriceRange,
}

#[derive(Debug, Serialize)]
pub struct BagResponse {
    pub count: usize,
    pub total: f64,
    pub items: Vec<Product>,
}

impl From<&Bag> for BagResponse {
    fn from(bag: &Bag) -> Self {
        Self {
            count: bag.len(),
            total: bag.total(),
            items: bag.items().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub assistant: Capability,
    pub messages: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    pub reply: ChatTurn,
    pub message_count: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub name: String,
    pub bag_count: usize,
    pub message_count: usize,
}

fn ready_catalog(state: &AppState) -> Result<Arc<Catalog>, ApiError> {
    match state.catalog.as_ref() {
        CatalogState::Ready(catalog) => Ok(Arc::clone(catalog)),
        CatalogState::Failed { path, message } => Err(ApiError::ServiceUnavailable(format!(
            "catalog {path} failed to load: {message}"
        ))),
    }
}

/// Zero-based bag position from a path segment or form field.
pub(crate) fn parse_bag_index(raw: &str) -> Option<usize> {
    raw.trim().parse().ok()
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let status = match state.catalog.as_ref() {
        CatalogState::Ready(_) => "ok",
        CatalogState::Failed { .. } => "degraded",
    };

    let active_sessions = state.sessions.len()?;

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        catalog_loaded: state.catalog.catalog().is_some(),
        product_count: state.catalog.product_count(),
        assistant_enabled: state.assistant.is_enabled(),
        active_sessions,
    }))
}

/// GET /api/products?category=&min=&max=
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let catalog = ready_catalog(&state)?;
    let selection = query.selection(&catalog);
    let products: Vec<Product> = filter_products(&catalog, &selection)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ProductsResponse {
        filter: selection,
        total: products.len(),
        products,
    }))
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let catalog = ready_catalog(&state)?;
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    categories.extend(catalog.categories());

    Ok(Json(CategoriesResponse {
        categories,
        price_bounds: catalog.slider_bounds(),
    }))
}

/// GET /api/session
pub async fn get_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let access = state.sessions.with_session(session_id(&jar), |s| SessionResponse {
        name: s.name.clone(),
        bag_count: s.bag.len(),
        message_count: s.messages.len(),
    })?;
    let body = Json(&access.value);
    Ok(with_session_cookie(&access, body))
}

/// PUT /api/session/name
pub async fn set_name(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<NameRequest>,
) -> Result<Response, ApiError> {
    let access = state.sessions.with_session(session_id(&jar), |s| {
        s.set_name(&req.name);
        SessionResponse {
            name: s.name.clone(),
            bag_count: s.bag.len(),
            message_count: s.messages.len(),
        }
    })?;
    tracing::debug!(session_id = %access.id, "Shopper name updated");
    let body = Json(&access.value);
    Ok(with_session_cookie(&access, body))
}

/// GET /api/bag
pub async fn get_bag(State(state): State<AppState>, jar: CookieJar) -> Result<Response, ApiError> {
    let access = state
        .sessions
        .with_session(session_id(&jar), |s| BagResponse::from(&s.bag))?;
    let body = Json(&access.value);
    Ok(with_session_cookie(&access, body))
}

/// POST /api/bag
pub async fn add_to_bag(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<AddToBagRequest>,
) -> Result<Response, ApiError> {
    let catalog = ready_catalog(&state)?;
    let product = catalog
        .get(req.product_id.trim())
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Product not found: {}", req.product_id)))?;

    let access = state.sessions.with_session(session_id(&jar), |s| {
        s.bag.add(product);
        BagResponse::from(&s.bag)
    })?;
    tracing::debug!(session_id = %access.id, product_id = %req.product_id, "Added to bag");
    let body = Json(&access.value);
    Ok(with_session_cookie(&access, body))
}

/// DELETE /api/bag/{index}
pub async fn remove_from_bag(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(index): Path<String>,
) -> Result<Response, ApiError> {
    let index = parse_bag_index(&index)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid bag index: {index:?}")))?;
    let access = state.sessions.with_session(session_id(&jar), |s| {
        s.bag.remove(index).map(|_| BagResponse::from(&s.bag))
    })?;
    let bag = access.value.as_ref().map_err(|e| ApiError::NotFound(e.to_string()))?;
    let body = Json(bag);
    Ok(with_session_cookie(&access, body))
}

/// DELETE /api/bag
pub async fn clear_bag(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let access = state.sessions.with_session(session_id(&jar), |s| {
        s.bag.clear();
        BagResponse::from(&s.bag)
    })?;
    let body = Json(&access.value);
    Ok(with_session_cookie(&access, body))
}

/// GET /api/messages
pub async fn get_messages(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    let access = state
        .sessions
        .with_session(session_id(&jar), |s| s.messages.clone())?;
    let body = Json(MessagesResponse {
        assistant: state.assistant.capability().clone(),
        messages: access.value.clone(),
    });
    Ok(with_session_cookie(&access, body))
}

/// POST /api/assistant
///
/// The shopper's turn is recorded before the chat API is called, so it stays
/// in the transcript even when the request fails.
pub async fn post_assistant(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<AssistantRequest>,
) -> Result<Response, ApiError> {
    let catalog = ready_catalog(&state)?;
    let message = state.assistant.validate_message(&req.message)?;

    let access = state.sessions.with_session(session_id(&jar), |s| {
        s.push_turn(ChatTurn::user(message));
        (s.name.clone(), s.messages.clone())
    })?;
    let (name, transcript) = &access.value;

    let reply = match state.assistant.reply(name, transcript, &catalog).await {
        Ok(reply) => reply,
        Err(e) => return Ok(with_session_cookie(&access, ApiError::from(e))),
    };
    let turn = ChatTurn::assistant(reply);

    let recorded = state.sessions.with_session(Some(access.id), |s| {
        s.push_turn(turn.clone());
        s.messages.len()
    })?;

    let body = Json(AssistantResponse {
        reply: turn,
        message_count: recorded.value,
    });
    Ok(with_session_cookie(&access, body))
}
