//! Catalog
//!
//! Product rows as supplied by the grocery-catalog feeds, plus YAML
//! loading for fixture sets and the command-line report.

use std::{fs, path::Path, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::{comparison::GroupProduct, mechanisms::calculate_bonus_deal};

/// Errors from loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file.
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// One tracked product row.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogProduct {
    /// Stable identifier used to correlate results.
    pub id: String,

    /// Product title as shown by the shop.
    pub name: String,

    /// Shop the price was observed at.
    #[serde(default)]
    pub store: Option<String>,

    /// Current shelf price for one package.
    pub price: f64,

    /// Structured packaging-unit field, when the shop provides one.
    #[serde(default)]
    pub unit: Option<String>,

    /// Active promotional mechanism, when the product is in the bonus.
    #[serde(default)]
    pub mechanism: Option<String>,
}

impl CatalogProduct {
    /// The price actually paid per item: the bonus-deal unit price when
    /// the mechanism is recognised, the shelf price otherwise.
    #[must_use]
    pub fn effective_price(&self) -> f64 {
        self.mechanism
            .as_deref()
            .and_then(|mechanism| calculate_bonus_deal(mechanism, self.price))
            .map_or(self.price, |deal| deal.unit_price)
    }
}

/// A set of tracked products.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    /// Product rows, in catalog order.
    pub products: Vec<CatalogProduct>,
}

impl FromStr for Catalog {
    type Err = CatalogError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        Ok(serde_norway::from_str(contents)?)
    }
}

impl Catalog {
    /// Loads a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] when the file cannot be read and
    /// [`CatalogError::Yaml`] when it cannot be parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        fs::read_to_string(path)?.parse()
    }

    /// Adapts the catalog rows to comparison-group products, pricing each
    /// row at its effective (bonus-aware) price.
    #[must_use]
    pub fn comparison_products(&self) -> Vec<GroupProduct> {
        self.products
            .iter()
            .map(|product| GroupProduct {
                id: product.id.clone(),
                price: product.effective_price(),
                unit: product.unit.clone(),
                name: Some(product.name.clone()),
            })
            .collect()
    }
}
