//! Storefront query string: the filter the visitor is looking at.
//!
//! The same three parameters drive `GET /`, `GET /api/products` and the
//! redirect after every form post.

use serde::{Deserialize, Serialize};
use stride_catalog::{Catalog, FilterSelection};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

impl StoreQuery {
    /// Parse a raw query string, ignoring anything malformed.
    pub fn from_query_string(raw: &str) -> Self {
        let raw = raw.trim().trim_start_matches('?');
        serde_urlencoded::from_str(raw).unwrap_or_default()
    }

    /// Resolve against the catalog. Unparseable bounds count as missing.
    pub fn selection(&self, catalog: &Catalog) -> FilterSelection {
        FilterSelection::resolve(
            catalog,
            self.category.as_deref(),
            parse_bound(self.min.as_deref()),
            parse_bound(self.max.as_deref()),
        )
    }

    /// Canonical query string for a resolved selection.
    pub fn from_selection(selection: &FilterSelection) -> Self {
        Self {
            category: Some(selection.category.label().to_string()),
            min: Some(format_bound(selection.price.min)),
            max: Some(format_bound(selection.price.max)),
        }
    }

    /// Encoded query string without the leading `?`.
    pub fn encode(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_default()
    }

    /// Location of the storefront showing this filter.
    pub fn location(&self) -> String {
        let encoded = self.encode();
        if encoded.is_empty() {
            "/".to_string()
        } else {
            format!("/?{encoded}")
        }
    }
}

fn parse_bound(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
}

/// Shortest text that parses back to the same bound. Whole numbers carry
/// no decimal point.
pub fn format_bound(value: f64) -> String {
    format!("{value}")
}
