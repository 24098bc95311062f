use analytics::SummaryStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Field names follow the JSON each party exchanges, so most structs rename to camelCase.

/// A news article in the shape the dashboard consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source: ArticleSource,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub name: String,
}

/// The body of `GET /api/news`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsResponse {
    pub articles: Vec<Article>,
}

/// One entry of the newsdata.io `results` array.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsDataArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub source_id: Option<String>,
    #[serde(rename = "pubDate")]
    pub pub_date: Option<String>,
}

impl From<NewsDataArticle> for Article {
    fn from(raw: NewsDataArticle) -> Self {
        Self {
            title: raw.title,
            description: raw.description,
            url: raw.link,
            source: ArticleSource {
                name: raw
                    .source_id
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| "Unknown Source".to_string()),
            },
            published_at: raw.pub_date,
        }
    }
}

/// A Finnhub real-time quote. Keys are kept as Finnhub sends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Current price.
    #[serde(rename = "c")]
    pub current: Option<f64>,
    #[serde(rename = "d")]
    pub change: Option<f64>,
    #[serde(rename = "dp")]
    pub percent_change: Option<f64>,
    #[serde(rename = "h")]
    pub high: Option<f64>,
    #[serde(rename = "l")]
    pub low: Option<f64>,
    #[serde(rename = "o")]
    pub open: Option<f64>,
    #[serde(rename = "pc")]
    pub previous_close: Option<f64>,
    #[serde(rename = "t", default)]
    pub timestamp: Option<i64>,
}

/// A Finnhub company news item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyNews {
    pub category: Option<String>,
    pub datetime: Option<i64>,
    pub headline: Option<String>,
    pub id: Option<i64>,
    pub image: Option<String>,
    pub related: Option<String>,
    pub source: Option<String>,
    pub summary: Option<String>,
    pub url: Option<String>,
}

/// The data.gov.in mandi (wholesale market) price response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MandiResponse {
    #[serde(default)]
    pub records: Vec<MandiRecord>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MandiRecord {
    pub state: Option<String>,
    pub district: Option<String>,
    pub market: Option<String>,
    pub commodity: Option<String>,
    pub variety: Option<String>,
    pub arrival_date: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub modal_price: Option<String>,
}

/// Which upstream a product name maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Finnhub,
    Mandi,
    None,
}

/// The body of `GET /api/data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductData {
    #[serde(rename = "type")]
    pub kind: FeedKind,
    pub quote: Option<Quote>,
    pub news: Option<Vec<CompanyNews>>,
    pub commodity: Option<MandiResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl ProductData {
    pub fn empty(kind: FeedKind) -> Self {
        Self {
            kind,
            quote: None,
            news: None,
            commodity: None,
            symbol: None,
        }
    }
}

/// The metals.dev `latest` response. Fields we do not read are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetalPrices {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub metals: BTreeMap<String, f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The body of `POST /api/advice`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    pub news_articles: Vec<Article>,
    pub business_data: SummaryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub advice: String,
}

/// The error body every proxy failure carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: None,
            error: error.into(),
        }
    }
}
