//! Router setup with all page and API routes and middleware.
//!
//! Configures the axum Router with tracing, compression, a request body limit,
//! and every endpoint handler.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use stride_core::config::StrideConfig;
use stride_core::error::StrideError;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::pages;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/", get(pages::storefront))
        .route("/name", post(pages::set_name))
        .route("/bag/add", post(pages::add_to_bag))
        .route("/bag/remove", post(pages::remove_from_bag))
        .route("/bag/clear", post(pages::clear_bag))
        .route("/assistant", post(pages::ask_assistant));

    let api_routes = Router::new()
        .route("/products", get(handlers::list_products))
        .route("/categories", get(handlers::list_categories))
        .route("/session", get(handlers::get_session))
        .route("/session/name", put(handlers::set_name))
        .route(
            "/bag",
            get(handlers::get_bag)
                .post(handlers::add_to_bag)
                .delete(handlers::clear_bag),
        )
        .route("/bag/{index}", delete(handlers::remove_from_bag))
        .route("/messages", get(handlers::get_messages))
        .route("/assistant", post(handlers::post_assistant));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(page_routes)
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server on the configured address.
pub async fn start_server(config: &StrideConfig, state: AppState) -> Result<(), StrideError> {
    let addr = format!("{}:{}", config.general.bind_address, config.general.port);
    let router = create_router(state);

    tracing::info!("Starting storefront on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StrideError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| StrideError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
