//! CSV ingestion: header validation, column normalization, tag derivation.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use stride_core::types::Product;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::CatalogError;

/// Columns every products CSV must carry, matched case-insensitively.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "id",
    "name",
    "category",
    "price",
    "image",
    "description",
    "tags",
];

/// Positions of the required columns within a CSV record.
struct ColumnMap {
    id: usize,
    name: usize,
    category: usize,
    price: usize,
    image: usize,
    description: usize,
    tags: usize,
}

impl ColumnMap {
    /// Resolve required columns against the header row.
    ///
    /// Headers are trimmed and lowercased before matching. The first header
    /// that normalizes to a required name wins; unknown columns are ignored.
    fn from_headers(headers: &StringRecord) -> Result<Self, CatalogError> {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = normalized
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| CatalogError::MissingColumn(column.to_string()))?;
        }

        let [id, name, category, price, image, description, tags] = positions;
        Ok(Self {
            id,
            name,
            category,
            price,
            image,
            description,
            tags,
        })
    }
}

fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Split a raw tags cell into a clean tag list.
///
/// Both `,` and `|` act as delimiters and may be mixed. Tokens are trimmed and
/// empty tokens dropped, so a missing or blank cell yields an empty list.
pub fn split_tags(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.split([',', '|'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a products CSV from any reader.
///
/// Short rows are padded with empty cells, so a missing trailing tags cell
/// yields an empty tag list. Rows wider than the header are an error. A row
/// whose price is blank or unparseable is skipped with a warning.
pub fn parse_catalog<R: Read>(reader: R) -> Result<Catalog, CatalogError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut products = Vec::new();
    let mut skipped = 0usize;
    for (index, record) in rdr.records().enumerate() {
        let record = record?;
        let row = index + 1;
        if record.len() > headers.len() {
            return Err(CatalogError::Csv(format!(
                "row {row} has {} fields but the header has {}",
                record.len(),
                headers.len()
            )));
        }
        match product_from_record(&record, &columns, row) {
            Ok(product) => products.push(product),
            Err(CatalogError::InvalidPrice { row, value }) => {
                warn!(row, value = %value, "Skipping catalog row with invalid price");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    debug!(rows = products.len(), skipped, "Parsed catalog records");
    Ok(Catalog::new(products))
}

/// Load the products CSV at `path`.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let catalog = parse_catalog(file)?;
    info!(
        path = %path.display(),
        products = catalog.len(),
        categories = catalog.categories().len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

fn product_from_record(
    record: &StringRecord,
    columns: &ColumnMap,
    row: usize,
) -> Result<Product, CatalogError> {
    let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();

    let raw_price = record.get(columns.price).unwrap_or("");
    let price = raw_price
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| CatalogError::InvalidPrice {
            row,
            value: raw_price.to_string(),
        })?;

    let raw_tags = record.get(columns.tags);

    Ok(Product {
        id: field(columns.id),
        name: field(columns.name),
        category: field(columns.category),
        price,
        image: field(columns.image),
        description: field(columns.description),
        tags: raw_tags.unwrap_or("").to_string(),
        tag_list: split_tags(raw_tags),
    })
}
