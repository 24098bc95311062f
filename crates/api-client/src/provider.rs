use crate::error::ApiError;
use crate::responses::{Article, CompanyNews, MandiResponse, MetalPrices, NewsDataArticle, Quote};
use async_trait::async_trait;
use chrono::NaiveDate;
use configuration::{ApiKeys, ProvidersConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The upstream data providers the proxy fronts.
///
/// This trait is the seam the web server is written against, so handlers can be
/// exercised with a mock in place of the live services.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest regional business news, adapted to the dashboard's article shape.
    async fn latest_news(&self) -> Result<Vec<Article>, ApiError>;

    /// A real-time stock quote.
    async fn quote(&self, symbol: &str) -> Result<Quote, ApiError>;

    /// Company news published between `from` and `to`, inclusive.
    async fn company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CompanyNews>, ApiError>;

    /// The latest wholesale market price for an agricultural commodity.
    async fn mandi_prices(&self, commodity: &str) -> Result<MandiResponse, ApiError>;

    async fn metal_prices(&self) -> Result<MetalPrices, ApiError>;

    /// Sends `prompt` to the language model and returns its text.
    async fn generate_advice(&self, prompt: &str) -> Result<String, ApiError>;
}

/// The live provider client: newsdata.io, Finnhub, data.gov.in, metals.dev and Gemini.
#[derive(Clone)]
pub struct ProviderClient {
    client: reqwest::Client,
    providers: ProvidersConfig,
    keys: ApiKeys,
}

impl ProviderClient {
    pub fn new(providers: ProvidersConfig, keys: ApiKeys) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bizpulse/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            providers,
            keys,
        })
    }

    fn key<'a>(key: &'a Option<String>, name: &'static str) -> Result<&'a str, ApiError> {
        key.as_deref().ok_or(ApiError::NotConfigured(name))
    }

    /// Sends a GET and decodes the body, mapping a non-success status to `failure`.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        failure: &str,
    ) -> Result<T, ApiError> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "Provider returned an error status.");
            return Err(ApiError::Status(failure.to_string()));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

#[derive(Deserialize)]
struct NewsDataEnvelope {
    #[serde(default)]
    results: Value,
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: [GeminiContent<'a>; 1],
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: [GeminiPart<'a>; 1],
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiTextPart>,
}

#[derive(Deserialize)]
struct GeminiTextPart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl MarketDataProvider for ProviderClient {
    async fn latest_news(&self) -> Result<Vec<Article>, ApiError> {
        let key = Self::key(&self.keys.newsdata, "NEWSDATA_API_KEY")?;
        let url = format!("{}/news", self.providers.newsdata_url);

        // Errors arrive as a body without a `results` array, whatever the status.
        let envelope = self
            .client
            .get(&url)
            .query(&[
                ("apikey", key),
                ("q", self.providers.news_query.as_str()),
                ("language", "en"),
                ("category", "business"),
            ])
            .send()
            .await?
            .json::<NewsDataEnvelope>()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;

        let Value::Array(results) = envelope.results else {
            tracing::error!("newsdata.io response had no results array.");
            return Err(ApiError::UnexpectedPayload("newsdata.io"));
        };
        let raw: Vec<NewsDataArticle> = serde_json::from_value(Value::Array(results))
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(raw.into_iter().map(Article::from).collect())
    }

    async fn quote(&self, symbol: &str) -> Result<Quote, ApiError> {
        let token = Self::key(&self.keys.finnhub, "FINNHUB_API_KEY")?;
        let url = format!("{}/quote", self.providers.finnhub_url);
        self.get_json(
            &url,
            &[("symbol", symbol), ("token", token)],
            "Failed to fetch Finnhub quote",
        )
        .await
    }

    async fn company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CompanyNews>, ApiError> {
        let token = Self::key(&self.keys.finnhub, "FINNHUB_API_KEY")?;
        let url = format!("{}/company-news", self.providers.finnhub_url);
        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();
        self.get_json(
            &url,
            &[
                ("symbol", symbol),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("token", token),
            ],
            "Failed to fetch Finnhub news",
        )
        .await
    }

    async fn mandi_prices(&self, commodity: &str) -> Result<MandiResponse, ApiError> {
        let key = Self::key(&self.keys.data_gov, "DATA_GOV_API_KEY")?;
        let url = format!(
            "{}/resource/{}",
            self.providers.data_gov_url, self.providers.mandi_resource_id
        );
        self.get_json(
            &url,
            &[
                ("api-key", key),
                ("format", "json"),
                ("filters[state]", self.providers.mandi_state.as_str()),
                ("filters[commodity]", commodity),
                ("limit", "1"),
            ],
            "Failed to fetch Mandi data",
        )
        .await
    }

    async fn metal_prices(&self) -> Result<MetalPrices, ApiError> {
        let key = Self::key(&self.keys.metals, "METALS_API_KEY")?;
        let url = format!("{}/latest", self.providers.metals_url);
        self.get_json(
            &url,
            &[
                ("api_key", key),
                ("currency", self.providers.metals_currency.as_str()),
            ],
            "Failed to fetch metal prices from metals.dev",
        )
        .await
    }

    async fn generate_advice(&self, prompt: &str) -> Result<String, ApiError> {
        let key = Self::key(&self.keys.gemini, "GEMINI_API_KEY")?;
        let url = format!(
            "{}/models/{}:generateContent",
            self.providers.gemini_url, self.providers.gemini_model
        );
        let body = GeminiRequest {
            contents: [GeminiContent {
                parts: [GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Gemini returned an error status.");
            return Err(ApiError::Status(format!("Gemini returned {status}")));
        }
        let parsed = response
            .json::<GeminiResponse>()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ApiError::UnexpectedPayload("Gemini"));
        }
        Ok(text)
    }
}
