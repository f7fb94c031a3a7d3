//! Wire models for the remote catalog document.
//!
//! These types match the JSON structure served by the remote endpoint and
//! include conversion methods to the persisted catalog models.

use crate::catalog_store::CatalogItem;
use serde::de::{self, Deserializer};
use serde::Deserialize;

/// The catalog document envelope: a single `menu` array of items.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCatalogDocument {
    #[serde(rename = "menu")]
    pub items: Vec<RemoteCatalogItem>,
}

/// A single catalog item as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCatalogItem {
    pub id: i64,
    pub title: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
}

impl RemoteCatalogItem {
    /// Convert to the persisted catalog model (field-for-field copy).
    pub fn to_catalog_item(&self) -> CatalogItem {
        CatalogItem {
            id: self.id,
            title: self.title.clone(),
            price: self.price,
        }
    }
}

/// The published document quotes prices as strings (`"price": "10"`);
/// accept both that and plain JSON numbers, normalized to a finite
/// non-negative value.
fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    let price = match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(n) => n,
        RawPrice::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("price is not a number: {:?}", s)))?,
    };

    if !price.is_finite() || price < 0.0 {
        return Err(de::Error::custom(format!(
            "price must be a non-negative number, got {}",
            price
        )));
    }
    Ok(price)
}
