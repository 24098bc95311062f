//! # bizpulse API Client
//!
//! Both sides of the data proxy's HTTP traffic:
//!
//! - [`MarketDataProvider`] / [`ProviderClient`]: the upstream services the proxy
//!   fronts (newsdata.io, Finnhub, data.gov.in, metals.dev, Gemini).
//! - [`DashboardFeed`] / [`ProxyClient`]: the dashboard's client for the proxy itself.

pub mod advice;
pub mod error;
pub mod product;
pub mod provider;
pub mod proxy;
pub mod responses;

// --- Public API ---
pub use advice::build_prompt;
pub use error::ApiError;
pub use product::{lookup_product, resolve_product};
pub use provider::{MarketDataProvider, ProviderClient};
pub use proxy::{DashboardFeed, ProxyClient};
pub use responses::{
    AdviceRequest, AdviceResponse, Article, ArticleSource, CompanyNews, ErrorBody, FeedKind,
    MandiRecord, MandiResponse, MetalPrices, NewsResponse, ProductData, Quote,
};
