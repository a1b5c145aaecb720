//! Application state shared across all route handlers.
//!
//! AppState holds the catalog, the session store and the assistant. It is
//! passed to handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use stride_assistant::Assistant;
use stride_catalog::{Catalog, CatalogError};
use stride_core::config::StrideConfig;
use stride_core::error::StrideError;
use stride_session::SessionStore;

use crate::render::Templates;

/// Outcome of loading the catalog at startup.
#[derive(Debug)]
pub enum CatalogState {
    Ready(Arc<Catalog>),
    /// The catalog could not be loaded; every page shows this error instead.
    Failed { path: String, message: String },
}

impl CatalogState {
    /// Wrap a load result, keeping the source path for the error page.
    pub fn from_result(path: impl Into<String>, result: Result<Catalog, CatalogError>) -> Self {
        match result {
            Ok(catalog) => CatalogState::Ready(Arc::new(catalog)),
            Err(e) => CatalogState::Failed {
                path: path.into(),
                message: e.to_string(),
            },
        }
    }

    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        match self {
            CatalogState::Ready(catalog) => Some(catalog),
            CatalogState::Failed { .. } => None,
        }
    }

    pub fn product_count(&self) -> usize {
        self.catalog().map(|c| c.len()).unwrap_or(0)
    }
}

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<StrideConfig>,
    pub catalog: Arc<CatalogState>,
    /// Per-visitor name, bag and transcript.
    pub sessions: Arc<SessionStore>,
    /// Computed once at startup; disabled when no credential is present.
    pub assistant: Arc<Assistant>,
    pub templates: Arc<Templates>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState with the given components.
    pub fn new(
        config: StrideConfig,
        catalog: CatalogState,
        assistant: Assistant,
    ) -> Result<Self, StrideError> {
        let templates = Templates::new()
            .map_err(|e| StrideError::Api(format!("failed to load templates: {e}")))?;
        let sessions = SessionStore::new(config.session.idle_timeout_minutes);

        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            sessions: Arc::new(sessions),
            assistant: Arc::new(assistant),
            templates: Arc::new(templates),
            start_time: Instant::now(),
        })
    }
}
