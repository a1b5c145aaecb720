//! Server-rendered storefront pages.
//!
//! Templates are embedded at compile time via `include_str!` so the binary has
//! no runtime asset dependencies. Handlers build a view model here and hand it
//! to minijinja; every price is formatted before it reaches a template.

use minijinja::Environment;
use serde::Serialize;
use stride_catalog::filter::ALL_CATEGORIES;
use stride_catalog::{Catalog, CategoryFilter, FilterSelection};
use stride_core::types::{ChatRole, Product};
use stride_session::{Bag, Session};

use crate::query::{format_bound, StoreQuery};

pub const STOREFRONT_HTML: &str = include_str!("../assets/storefront.html");
pub const ERROR_HTML: &str = include_str!("../assets/error.html");

/// Compiled page templates.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("storefront.html", STOREFRONT_HTML)?;
        env.add_template("error.html", ERROR_HTML)?;
        Ok(Self { env })
    }

    pub fn storefront(&self, view: &StorefrontView) -> Result<String, minijinja::Error> {
        self.env.get_template("storefront.html")?.render(view)
    }

    pub fn error_page(&self, view: &ErrorView) -> Result<String, minijinja::Error> {
        self.env.get_template("error.html")?.render(view)
    }
}

/// `$123.00`
pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

/// `3 items • $297.00`
pub fn bag_summary(bag: &Bag) -> String {
    let noun = if bag.len() == 1 { "item" } else { "items" };
    format!("{} {} • {}", bag.len(), noun, format_price(bag.total()))
}

#[derive(Debug, Serialize)]
pub struct ErrorView {
    pub title: String,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: format_price(product.price),
            image: product.image.clone(),
            description: product.description.clone(),
            tags: product.tag_list.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryOption {
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct BagLine {
    pub index: usize,
    pub name: String,
    pub price: String,
}

#[derive(Debug, Serialize)]
pub struct BagView {
    pub count: usize,
    pub summary: String,
    pub items: Vec<BagLine>,
}

impl From<&Bag> for BagView {
    fn from(bag: &Bag) -> Self {
        Self {
            count: bag.len(),
            summary: bag_summary(bag),
            items: bag
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| BagLine {
                    index,
                    name: item.name.clone(),
                    price: format_price(item.price),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageView {
    pub from_shopper: bool,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantView {
    pub enabled: bool,
    pub unavailable_reason: Option<String>,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Serialize)]
pub struct FilterView {
    pub categories: Vec<CategoryOption>,
    pub bound_min: String,
    pub bound_max: String,
    pub min: String,
    pub max: String,
}

#[derive(Debug, Serialize)]
pub struct StorefrontView {
    pub shopper_name: String,
    /// "you" once a name is set.
    pub greeting_target: String,
    pub notice: Option<String>,
    pub filter: FilterView,
    pub products: Vec<ProductCard>,
    pub result_count: usize,
    pub bag: BagView,
    pub assistant: AssistantView,
    /// Encoded filter query carried through every form post.
    pub return_query: String,
}

/// Everything the storefront template needs for one render.
pub struct StorefrontInput<'a> {
    pub catalog: &'a Catalog,
    pub selection: &'a FilterSelection,
    pub products: &'a [&'a Product],
    pub session: &'a Session,
    pub notice: Option<String>,
    pub assistant_enabled: bool,
    pub assistant_unavailable: Option<&'a str>,
}

impl StorefrontView {
    pub fn build(input: StorefrontInput<'_>) -> Self {
        let StorefrontInput {
            catalog,
            selection,
            products,
            session,
            notice,
            assistant_enabled,
            assistant_unavailable,
        } = input;

        let selected = selection.category.label();
        let mut categories = vec![CategoryOption {
            label: ALL_CATEGORIES.to_string(),
            selected: selection.category == CategoryFilter::All,
        }];
        categories.extend(catalog.categories().into_iter().map(|label| CategoryOption {
            selected: label == selected,
            label,
        }));

        let bounds = catalog.slider_bounds();
        let greeting_target = if session.has_name() {
            "you"
        } else {
            "your journey"
        };

        Self {
            shopper_name: session.name.clone(),
            greeting_target: greeting_target.to_string(),
            notice,
            filter: FilterView {
                categories,
                bound_min: format_bound(bounds.min),
                bound_max: format_bound(bounds.max),
                min: format_bound(selection.price.min),
                max: format_bound(selection.price.max),
            },
            products: products.iter().map(|p| ProductCard::from(*p)).collect(),
            result_count: products.len(),
            bag: BagView::from(&session.bag),
            assistant: AssistantView {
                enabled: assistant_enabled,
                unavailable_reason: assistant_unavailable.map(str::to_string),
                messages: session
                    .messages
                    .iter()
                    .map(|turn| MessageView {
                        from_shopper: turn.role == ChatRole::User,
                        content: turn.content.clone(),
                    })
                    .collect(),
            },
            return_query: StoreQuery::from_selection(selection).encode(),
        }
    }
}
