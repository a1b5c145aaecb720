//! Stride web crate - axum HTTP server, storefront pages and JSON API.
//!
//! Serves the server-rendered storefront (product grid, filters, bag and
//! assistant panel) plus a JSON API over the same session state.

pub mod cookie;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod query;
pub mod render;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::{AppState, CatalogState};
