//! HTTP client for the product and order endpoints
//!
//! The storefront talks to exactly two endpoints: `GET /product/` for
//! the catalog and `POST /order/` for submission. Everything behind
//! `ShopApi` is opaque to the rest of the crate, which lets tests
//! substitute an in-process mock.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::types::{OrderConfirmation, OrderPayload, Product, ProductList};

/// The two network operations the storefront performs
///
/// No retries, no cancellation: a failed call surfaces as an error at
/// the call site and leaves all state untouched.
#[async_trait]
pub trait ShopApi: Send + Sync {
    /// Fetch the full product catalog
    async fn fetch_products(&self) -> Result<Vec<Product>>;

    /// Submit an order; resolves to a confirmation carrying the total
    async fn submit_order(&self, payload: &OrderPayload) -> Result<OrderConfirmation>;
}

/// `ShopApi` over reqwest against the configured API root
pub struct HttpShopApi {
    client: Client,
    api_base: String,
    cdn_base: String,
}

impl HttpShopApi {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_base: config.api.base_url.trim_end_matches('/').to_string(),
            cdn_base: config.cdn.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a product image path against the CDN base
    fn resolve_image(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.cdn_base, path.trim_start_matches('/'))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        }
        .into())
    }
}

#[async_trait]
impl ShopApi for HttpShopApi {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        let url = format!("{}/product/", self.api_base);
        debug!(%url, "fetching catalog");

        let response = self.client.get(&url).send().await.map_err(ApiError::Transport)?;
        let response = Self::check_status(response).await?;
        let list: ProductList = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(list
            .items
            .into_iter()
            .map(|mut product| {
                product.image = self.resolve_image(&product.image);
                product
            })
            .collect())
    }

    async fn submit_order(&self, payload: &OrderPayload) -> Result<OrderConfirmation> {
        let url = format!("{}/order/", self.api_base);
        debug!(%url, total = payload.total, items = payload.items.len(), "submitting order");

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, CdnConfig};

    fn api() -> HttpShopApi {
        HttpShopApi::new(&Config {
            api: ApiConfig {
                base_url: "http://localhost:3000/api/shop/".to_string(),
            },
            cdn: CdnConfig {
                base_url: "http://localhost:3000/content/".to_string(),
            },
        })
    }

    #[test]
    fn test_base_urls_are_normalized() {
        let api = api();
        assert_eq!(api.api_base, "http://localhost:3000/api/shop");
        assert_eq!(api.cdn_base, "http://localhost:3000/content");
    }

    #[test]
    fn test_resolve_image_joins_cdn_base() {
        let api = api();
        assert_eq!(
            api.resolve_image("/widget.svg"),
            "http://localhost:3000/content/widget.svg"
        );
        assert_eq!(
            api.resolve_image("widget.svg"),
            "http://localhost:3000/content/widget.svg"
        );
    }

    #[test]
    fn test_resolve_image_keeps_absolute_urls() {
        let api = api();
        assert_eq!(
            api.resolve_image("https://cdn.example/x.png"),
            "https://cdn.example/x.png"
        );
    }
}
