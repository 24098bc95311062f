use analytics::SummaryStats;
use api_client::{
    AdviceRequest, ApiError, DashboardFeed, MarketDataProvider, ProviderClient, ProxyClient,
};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use configuration::{ApiKeys, ProvidersConfig};
use serde_json::{Value, json};
use std::collections::HashMap;

/// Serves `router` on an ephemeral port and returns its base URL.
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn providers_at(base: &str) -> ProvidersConfig {
    ProvidersConfig {
        newsdata_url: base.to_string(),
        finnhub_url: base.to_string(),
        data_gov_url: base.to_string(),
        metals_url: base.to_string(),
        gemini_url: base.to_string(),
        ..ProvidersConfig::default()
    }
}

fn all_keys() -> ApiKeys {
    ApiKeys {
        newsdata: Some("news-key".into()),
        finnhub: Some("finnhub-key".into()),
        data_gov: Some("gov-key".into()),
        metals: Some("metals-key".into()),
        gemini: Some("gemini-key".into()),
    }
}

#[tokio::test]
async fn news_results_are_adapted_to_articles() {
    let router = Router::new().route(
        "/news",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            assert_eq!(q.get("apikey").map(String::as_str), Some("news-key"));
            assert_eq!(q.get("category").map(String::as_str), Some("business"));
            Json(json!({
                "status": "success",
                "results": [
                    {
                        "title": "State budget",
                        "description": "Tax changes",
                        "link": "https://news.example/1",
                        "source_id": "times",
                        "pubDate": "2024-03-01 10:00:00"
                    },
                    { "title": "No source", "link": "https://news.example/2" }
                ]
            }))
        }),
    );
    let base = spawn(router).await;
    let client = ProviderClient::new(providers_at(&base), all_keys()).unwrap();

    let articles = client.latest_news().await.unwrap();

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].url.as_deref(), Some("https://news.example/1"));
    assert_eq!(articles[0].source.name, "times");
    assert_eq!(articles[0].published_at.as_deref(), Some("2024-03-01 10:00:00"));
    assert_eq!(articles[1].source.name, "Unknown Source");
}

#[tokio::test]
async fn news_without_a_results_array_is_an_unexpected_payload() {
    let router = Router::new().route(
        "/news",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "status": "error", "results": { "message": "bad key" } })),
            )
        }),
    );
    let base = spawn(router).await;
    let client = ProviderClient::new(providers_at(&base), all_keys()).unwrap();

    let err = client.latest_news().await.unwrap_err();
    assert!(matches!(err, ApiError::UnexpectedPayload(_)));
}

#[tokio::test]
async fn missing_keys_fail_before_any_request() {
    let client = ProviderClient::new(providers_at("http://127.0.0.1:9"), ApiKeys::default()).unwrap();

    assert!(matches!(
        client.latest_news().await,
        Err(ApiError::NotConfigured("NEWSDATA_API_KEY"))
    ));
    assert!(matches!(
        client.metal_prices().await,
        Err(ApiError::NotConfigured("METALS_API_KEY"))
    ));
}

#[tokio::test]
async fn mandi_lookup_filters_by_state_and_commodity() {
    let router = Router::new().route(
        "/resource/:id",
        get(|Path(id): Path<String>, Query(q): Query<HashMap<String, String>>| async move {
            assert_eq!(id, "9ef84268-d588-465a-a308-a864a43d0070");
            assert_eq!(q.get("filters[state]").map(String::as_str), Some("Maharashtra"));
            assert_eq!(q.get("limit").map(String::as_str), Some("1"));
            let commodity = q.get("filters[commodity]").cloned().unwrap_or_default();
            Json(json!({
                "total": 1,
                "records": [{ "commodity": commodity, "market": "Pune", "modal_price": "2100" }]
            }))
        }),
    );
    let base = spawn(router).await;
    let client = ProviderClient::new(providers_at(&base), all_keys()).unwrap();

    let mandi = client.mandi_prices("Wheat").await.unwrap();

    assert_eq!(mandi.records.len(), 1);
    assert_eq!(mandi.records[0].commodity.as_deref(), Some("Wheat"));
    assert_eq!(mandi.records[0].modal_price.as_deref(), Some("2100"));
}

#[tokio::test]
async fn finnhub_error_status_names_the_failed_call() {
    let router = Router::new().route("/quote", get(|| async { StatusCode::FORBIDDEN }));
    let base = spawn(router).await;
    let client = ProviderClient::new(providers_at(&base), all_keys()).unwrap();

    let err = client.quote("TATASTEEL.NS").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch Finnhub quote");
}

#[tokio::test]
async fn gemini_text_parts_are_joined() {
    let router = Router::new().route(
        "/models/:call",
        post(|Path(call): Path<String>, Json(body): Json<Value>| async move {
            assert_eq!(call, "gemini-pro:generateContent");
            let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
            assert!(prompt.contains("LATEST NEWS"));
            Json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "- Cut " }, { "text": "costs" }] } }]
            }))
        }),
    );
    let base = spawn(router).await;
    let client = ProviderClient::new(providers_at(&base), all_keys()).unwrap();

    let advice = client
        .generate_advice("--- LATEST NEWS ---\n[]")
        .await
        .unwrap();
    assert_eq!(advice, "- Cut costs");
}

#[tokio::test]
async fn proxy_client_relays_the_servers_error_text() {
    let router = Router::new()
        .route(
            "/api/data",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch Mandi data" })),
                )
            }),
        )
        .route(
            "/api/advice",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Missing news or business data." })),
                )
            }),
        );
    let base = spawn(router).await;
    let client = ProxyClient::new(&format!("{base}/")).unwrap();

    match client.product_data("cotton").await {
        Err(ApiError::Upstream(message)) => assert_eq!(message, "Failed to fetch Mandi data"),
        other => panic!("expected an upstream error, got {other:?}"),
    }

    let request = AdviceRequest {
        news_articles: Vec::new(),
        business_data: SummaryStats::new(),
    };
    let err = client.advice(&request).await.unwrap_err();
    assert_eq!(err.to_string(), "Missing news or business data.");
}

#[tokio::test]
async fn proxy_client_decodes_news() {
    let router = Router::new().route(
        "/api/news",
        get(|| async {
            Json(json!({
                "articles": [{
                    "title": "A",
                    "description": null,
                    "url": "https://news.example/a",
                    "source": { "name": "wire" },
                    "publishedAt": "2024-03-01"
                }]
            }))
        }),
    );
    let base = spawn(router).await;
    let client = ProxyClient::new(&base).unwrap();

    let articles = client.news().await.unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].source.name, "wire");
}
