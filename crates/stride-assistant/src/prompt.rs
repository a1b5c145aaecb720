//! System prompt for the shopping assistant.

use std::fmt::Write;

use stride_catalog::Catalog;

/// Products listed in the prompt before the remainder is summarized.
const MAX_LISTED_PRODUCTS: usize = 60;

const PERSONA: &str = "You are an AI stylist for an athletic footwear and apparel store. \
Help the shopper pick gear for their sport, style or goal: ask about fit and use when it \
matters, compare options, and recommend specific products from the catalog below by name \
and price. Never invent products that are not listed. Keep answers short.";

/// Build the system prompt for a shopper.
///
/// `shopper_name` may be empty, in which case the shopper is not addressed by
/// name.
pub fn system_prompt(shopper_name: &str, catalog: &Catalog) -> String {
    let mut prompt = String::from(PERSONA);

    let name = shopper_name.trim();
    if !name.is_empty() {
        let _ = write!(prompt, "\n\nThe shopper's name is {name}.");
    }

    prompt.push_str("\n\nCatalog (id | name | category | price | tags):");
    for product in catalog.products().iter().take(MAX_LISTED_PRODUCTS) {
        let _ = write!(
            prompt,
            "\n- {} | {} | {} | ${:.2}",
            product.id, product.name, product.category, product.price
        );
        if !product.tag_list.is_empty() {
            let _ = write!(prompt, " | {}", product.tag_list.join(", "));
        }
    }

    if catalog.len() > MAX_LISTED_PRODUCTS {
        let _ = write!(
            prompt,
            "\n- ... and {} more products",
            catalog.len() - MAX_LISTED_PRODUCTS
        );
    }

    prompt
}
