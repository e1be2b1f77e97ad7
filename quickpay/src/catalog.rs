//! Product catalog used to prefill a sale.
//!
//! Sellers can pick a product from an external catalog instead of typing the
//! amount and reference by hand. The transport lives in `quickpay-http`; this
//! module defines the [`Product`] record, the [`CatalogSource`] seam, price
//! normalization, and a fixed fallback list for when the catalog is
//! unavailable.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// Generic message used when the upstream catalog gives no explanation.
pub const GENERIC_CATALOG_FAILURE: &str = "Failed to fetch products";

/// A product that can be sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: String,
    /// Display name, used as the payment reference.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Price with only digits and `.`, see [`normalize_price`].
    pub price: String,
    /// Currency code as reported by the catalog.
    pub currency: String,
    /// Product image, may be empty.
    pub image_url: String,
}

/// Errors returned by a [`CatalogSource`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog answered with a non-success status.
    #[error("{message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// `error.message` from the response, or [`GENERIC_CATALOG_FAILURE`].
        message: String,
    },
    /// The request never got a usable response.
    #[error("Failed to fetch products: {0}")]
    Transport(String),
    /// The response body did not have the expected shape.
    #[error("Failed to fetch products: invalid response: {0}")]
    Decode(String),
}

/// A source of products.
pub trait CatalogSource {
    /// Fetches the first page of products.
    fn fetch_products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}

/// Strips everything except ASCII digits and `.` from a catalog price.
///
/// `"$1,999.00"` becomes `"1999.00"`.
#[must_use]
pub fn normalize_price(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Products offered when the catalog cannot be reached.
#[must_use]
pub fn fallback_products() -> Vec<Product> {
    [
        ("fallback-1", "Espresso", "Single shot, house blend", "2.50"),
        ("fallback-2", "Croissant", "Butter croissant, baked daily", "3.20"),
        ("fallback-3", "Notebook", "A5 dotted notebook, 120 pages", "8.00"),
        ("fallback-4", "Tote Bag", "Organic cotton tote", "15.00"),
    ]
    .into_iter()
    .map(|(id, name, description, price)| Product {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        price: price.to_owned(),
        currency: "USD".to_owned(),
        image_url: String::new(),
    })
    .collect()
}

/// Products to show, along with the catalog error if the fallback was used.
#[derive(Debug)]
pub struct CatalogListing {
    /// Products from the catalog, or the fallback list.
    pub products: Vec<Product>,
    /// Why the catalog could not be used, if it could not.
    pub error: Option<CatalogError>,
}

impl CatalogListing {
    /// Whether the listing comes from the fallback list.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Fetches products from `source`, falling back to [`fallback_products`] on failure.
pub async fn load_catalog<S: CatalogSource + Sync>(source: &S) -> CatalogListing {
    match source.fetch_products().await {
        Ok(products) => CatalogListing {
            products,
            error: None,
        },
        Err(error) => {
            #[cfg(feature = "telemetry")]
            tracing::warn!(error = %error, "Catalog unavailable, using fallback products");
            CatalogListing {
                products: fallback_products(),
                error: Some(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSource;

    impl CatalogSource for FailingSource {
        async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
            Err(CatalogError::Upstream {
                status: 401,
                message: "Invalid OAuth access token.".into(),
            })
        }
    }

    struct StaticSource(Vec<Product>);

    impl CatalogSource for StaticSource {
        async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_normalize_price() {
        assert_eq!(normalize_price("$1,999.00"), "1999.00");
        assert_eq!(normalize_price("12.50 USD"), "12.50");
        assert_eq!(normalize_price("\u{20ac}\u{a0}7"), "7");
        assert_eq!(normalize_price("free"), "");
    }

    #[test]
    fn test_fallback_products_are_fixed() {
        let products = fallback_products();
        assert_eq!(products.len(), 4);
        assert_eq!(products, fallback_products());
        for product in &products {
            assert_eq!(product.price, normalize_price(&product.price));
            assert!(!product.name.is_empty());
        }
    }

    #[tokio::test]
    async fn test_load_catalog_falls_back_on_error() {
        let listing = load_catalog(&FailingSource).await;
        assert!(listing.is_fallback());
        assert_eq!(listing.products, fallback_products());
        assert_eq!(
            listing.error.unwrap().to_string(),
            "Invalid OAuth access token."
        );
    }

    #[tokio::test]
    async fn test_load_catalog_uses_source_products() {
        let product = Product {
            id: "42".into(),
            name: "PS5 Console".into(),
            description: String::new(),
            price: "499.99".into(),
            currency: "USD".into(),
            image_url: String::new(),
        };
        let listing = load_catalog(&StaticSource(vec![product.clone()])).await;
        assert!(!listing.is_fallback());
        assert_eq!(listing.products, vec![product]);
    }
}
