//! A [`CatalogSource`] that reads products over HTTP.
//!
//! Requests go to `GET {base}/{catalog_id}/products` with the product fields
//! and the access token passed as query parameters. Only the first page of
//! results is read.
//!
//! Successful responses look like
//!
//! ```json
//! {"data":[{"id":"1","name":"PS5 Console","price":"$499.99","currency":"USD"}]}
//! ```
//!
//! and failures like `{"error":{"message":"Invalid OAuth access token."}}`.

use std::time::Duration;

use quickpay::catalog::{
    CatalogError, CatalogSource, GENERIC_CATALOG_FAILURE, Product, normalize_price,
};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

/// Default Graph API base URL.
pub const DEFAULT_CATALOG_URL: &str = "https://graph.facebook.com/v19.0";

/// Product fields requested from the catalog.
pub const PRODUCT_FIELDS: &str = "name,description,price,image_url,currency";

/// Configuration for [`HttpCatalogClient`].
#[derive(Clone)]
pub struct CatalogConfig {
    /// Catalog API base URL (trailing slash optional).
    pub base_url: String,
    /// Catalog identifier.
    pub catalog_id: String,
    /// Access token sent as the `access_token` query parameter.
    pub access_token: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Optional pre-configured reqwest client.
    pub http_client: Option<Client>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_owned(),
            catalog_id: String::new(),
            access_token: String::new(),
            timeout: Duration::from_secs(15),
            http_client: None,
        }
    }
}

impl CatalogConfig {
    /// Creates a config for the given catalog and token against the default base URL.
    #[must_use]
    pub fn new(catalog_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            catalog_id: catalog_id.into(),
            access_token: access_token.into(),
            ..Self::default()
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url)
            .field("catalog_id", &self.catalog_id)
            .field("access_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("has_http_client", &self.http_client.is_some())
            .finish()
    }
}

/// Errors raised while building an [`HttpCatalogClient`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogConfigError {
    /// The catalog identifier is empty.
    #[error("catalog id is empty")]
    MissingCatalogId,
    /// URL parse error.
    #[error("URL parse error: {context}: {source}")]
    UrlParse {
        /// Human-readable context.
        context: &'static str,
        /// The underlying parse error.
        #[source]
        source: url::ParseError,
    },
}

/// Client for a remote product catalog.
#[derive(Clone)]
pub struct HttpCatalogClient {
    /// Full products URL, including query parameters.
    products_url: Url,
    client: Client,
    timeout: Duration,
}

impl std::fmt::Debug for HttpCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut url = self.products_url.clone();
        url.set_query(None);
        f.debug_struct("HttpCatalogClient")
            .field("products_url", &url.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Success body.
#[derive(Debug, Deserialize)]
struct ProductPage {
    data: Vec<WireProduct>,
}

/// A product as returned by the catalog. Every field but `id` may be omitted.
#[derive(Debug, Deserialize)]
struct WireProduct {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    price: String,
    #[serde(default)]
    currency: String,
    #[serde(default)]
    image_url: String,
}

impl From<WireProduct> for Product {
    fn from(wire: WireProduct) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            description: wire.description,
            price: normalize_price(&wire.price),
            currency: wire.currency,
            image_url: wire.image_url,
        }
    }
}

/// Failure body.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl HttpCatalogClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogConfigError`] if the catalog id is empty or the URL
    /// cannot be built.
    pub fn try_new(config: CatalogConfig) -> Result<Self, CatalogConfigError> {
        let catalog_id = config.catalog_id.trim();
        if catalog_id.is_empty() {
            return Err(CatalogConfigError::MissingCatalogId);
        }
        let mut base = config.base_url.trim_end_matches('/').to_owned();
        base.push('/');
        let base = Url::parse(&base).map_err(|e| CatalogConfigError::UrlParse {
            context: "Failed to parse base url",
            source: e,
        })?;
        let mut products_url = base
            .join(&format!("{catalog_id}/products"))
            .map_err(|e| CatalogConfigError::UrlParse {
                context: "Failed to construct products URL",
                source: e,
            })?;
        products_url
            .query_pairs_mut()
            .append_pair("fields", PRODUCT_FIELDS)
            .append_pair("access_token", &config.access_token);

        Ok(Self {
            products_url,
            client: config.http_client.unwrap_or_default(),
            timeout: config.timeout,
        })
    }

    /// Path of the products endpoint, without query parameters.
    #[must_use]
    pub fn products_path(&self) -> &str {
        self.products_url.path()
    }

    /// Fetches the first page of products.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Upstream`] for a non-success status, carrying the
    ///   response's `error.message` or [`GENERIC_CATALOG_FAILURE`].
    /// - [`CatalogError::Transport`] if no response was received.
    /// - [`CatalogError::Decode`] if a success body has the wrong shape.
    #[cfg_attr(
        feature = "telemetry",
        tracing::instrument(name = "quickpay.catalog.fetch_products", skip_all, err)
    )]
    pub async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .client
            .get(self.products_url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| GENERIC_CATALOG_FAILURE.to_owned());
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let page: ProductPage = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.without_url().to_string()))?;

        #[cfg(feature = "telemetry")]
        tracing::info!(count = page.data.len(), "Fetched catalog products");

        Ok(page.data.into_iter().map(Product::from).collect())
    }
}

impl CatalogSource for HttpCatalogClient {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.fetch().await
    }
}

#[cfg(test)]
mod tests {
    use quickpay::catalog::{fallback_products, load_catalog};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> HttpCatalogClient {
        let config = CatalogConfig::new("cat123", "secret-token").with_base_url(server.uri());
        HttpCatalogClient::try_new(config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_normalizes_prices() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cat123/products"))
            .and(query_param("fields", PRODUCT_FIELDS))
            .and(query_param("access_token", "secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": "1", "name": "PS5 Console", "price": "$1,999.00", "currency": "USD"},
                    {"id": "2", "name": "Mug", "description": "Ceramic", "price": "12.50",
                     "currency": "EUR", "image_url": "https://img.example/mug.png"}
                ],
                "paging": {"cursors": {"after": "abc"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let products = client_for(&server).fetch_products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "PS5 Console");
        assert_eq!(products[0].price, "1999.00");
        assert_eq!(products[0].description, "");
        assert_eq!(products[1].price, "12.50");
        assert_eq!(products[1].image_url, "https://img.example/mug.png");
    }

    #[tokio::test]
    async fn test_upstream_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cat123/products"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Invalid OAuth access token.", "code": 190}
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_products().await.unwrap_err();
        match err {
            CatalogError::Upstream { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid OAuth access token.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unexplained_failure_uses_generic_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cat123/products"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_products().await.unwrap_err();
        assert!(matches!(
            &err,
            CatalogError::Upstream { status: 502, message } if message == GENERIC_CATALOG_FAILURE
        ));
    }

    #[tokio::test]
    async fn test_unexpected_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cat123/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_products().await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[tokio::test]
    async fn test_load_catalog_falls_back_on_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Invalid OAuth access token."}
            })))
            .mount(&server)
            .await;

        let listing = load_catalog(&client_for(&server)).await;
        assert!(listing.is_fallback());
        assert_eq!(listing.products, fallback_products());
    }

    #[test]
    fn test_try_new_builds_products_url() {
        let config = CatalogConfig::new("cat123", "t").with_base_url("https://graph.example/v19.0/");
        let client = HttpCatalogClient::try_new(config).unwrap();
        assert_eq!(client.products_path(), "/v19.0/cat123/products");
    }

    #[test]
    fn test_try_new_requires_catalog_id() {
        let config = CatalogConfig::new("  ", "t");
        assert!(matches!(
            HttpCatalogClient::try_new(config),
            Err(CatalogConfigError::MissingCatalogId)
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = CatalogConfig::new("cat123", "secret-token");
        assert!(!format!("{config:?}").contains("secret-token"));
        let client = HttpCatalogClient::try_new(config).unwrap();
        assert!(!format!("{client:?}").contains("secret-token"));
    }
}
