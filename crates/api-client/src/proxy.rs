use crate::error::ApiError;
use crate::responses::{
    AdviceRequest, AdviceResponse, Article, ErrorBody, MetalPrices, NewsResponse, ProductData,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// The dashboard's view of the data proxy.
#[async_trait]
pub trait DashboardFeed: Send + Sync {
    async fn news(&self) -> Result<Vec<Article>, ApiError>;

    async fn product_data(&self, product: &str) -> Result<ProductData, ApiError>;

    async fn metal_prices(&self) -> Result<MetalPrices, ApiError>;

    /// Asks for advice on the given articles and statistics.
    async fn advice(&self, request: &AdviceRequest) -> Result<String, ApiError>;
}

/// HTTP client for the bizpulse proxy server.
#[derive(Clone)]
pub struct ProxyClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decodes a proxy response. A failure status yields the server's `error` text
    /// unchanged.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str::<T>(&text).map_err(|e| ApiError::Deserialization(e.to_string()))
        } else {
            match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => Err(ApiError::Upstream(body.error)),
                Err(_) => Err(ApiError::Status(format!("Proxy returned {status}"))),
            }
        }
    }
}

#[async_trait]
impl DashboardFeed for ProxyClient {
    async fn news(&self) -> Result<Vec<Article>, ApiError> {
        let response = self.client.get(self.url("/api/news")).send().await?;
        let body: NewsResponse = Self::decode(response).await?;
        Ok(body.articles)
    }

    async fn product_data(&self, product: &str) -> Result<ProductData, ApiError> {
        let response = self
            .client
            .get(self.url("/api/data"))
            .query(&[("product", product)])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn metal_prices(&self) -> Result<MetalPrices, ApiError> {
        let response = self.client.get(self.url("/api/metal-prices")).send().await?;
        Self::decode(response).await
    }

    async fn advice(&self, request: &AdviceRequest) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.url("/api/advice"))
            .json(request)
            .send()
            .await?;
        let body: AdviceResponse = Self::decode(response).await?;
        Ok(body.advice)
    }
}
