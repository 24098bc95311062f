use crate::{AppState, error::AppError};
use api_client::{
    AdviceRequest, AdviceResponse, ApiError, MetalPrices, NewsResponse, ProductData,
    build_prompt, lookup_product,
};
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub product: String,
}

/// # GET /api/news
pub async fn get_news(State(state): State<Arc<AppState>>) -> Result<Json<NewsResponse>, AppError> {
    let articles = state.provider.latest_news().await.map_err(|e| {
        let message = match e {
            ApiError::NotConfigured(_) => "API key not configured. Check your .env file.",
            ApiError::UnexpectedPayload(_) => "Failed to fetch news. The API returned an error.",
            _ => "Failed to fetch news from source.",
        };
        AppError::upstream(message, e)
    })?;
    Ok(Json(NewsResponse { articles }))
}

/// # GET /api/data?product=
/// Maps the product to a stock or commodity feed and returns its market data.
pub async fn get_product_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductData>, AppError> {
    let today = chrono::Utc::now().date_naive();
    let data = lookup_product(&*state.provider, &query.product, today)
        .await
        .map_err(|e| AppError::upstream(e.to_string(), e))?;
    Ok(Json(data))
}

/// # GET /api/metal-prices
pub async fn get_metal_prices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MetalPrices>, AppError> {
    let prices = state.provider.metal_prices().await.map_err(|e| {
        let message = match e {
            ApiError::NotConfigured(_) => "Metals API key not configured".to_string(),
            ref other => other.to_string(),
        };
        AppError::MetalPrices { message, source: e }
    })?;
    Ok(Json(prices))
}

/// # POST /api/advice
pub async fn post_advice(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AdviceRequest>, JsonRejection>,
) -> Result<Json<AdviceResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "Advice payload rejected.");
        AppError::BadRequest("Missing news or business data.".to_string())
    })?;

    let prompt = build_prompt(&request.news_articles, &request.business_data);
    let advice = state
        .provider
        .generate_advice(&prompt)
        .await
        .map_err(|e| AppError::upstream("Failed to get AI advice.", e))?;
    Ok(Json(AdviceResponse { advice }))
}
