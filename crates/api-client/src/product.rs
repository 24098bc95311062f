use crate::error::ApiError;
use crate::provider::MarketDataProvider;
use crate::responses::{FeedKind, ProductData};
use chrono::{Days, NaiveDate};

/// Maps a free-text product name to the upstream feed and the symbol or
/// commodity to query there. Matching is a case-insensitive substring test,
/// checked in a fixed order.
pub fn resolve_product(product: &str) -> Option<(FeedKind, &'static str)> {
    const MAPPINGS: [(&str, FeedKind, &str); 6] = [
        ("steel", FeedKind::Finnhub, "TATASTEEL.NS"),
        ("reliance", FeedKind::Finnhub, "RELIANCE.NS"),
        ("cotton", FeedKind::Mandi, "Cotton"),
        ("wheat", FeedKind::Mandi, "Wheat"),
        ("rice", FeedKind::Mandi, "Paddy"),
        ("paddy", FeedKind::Mandi, "Paddy"),
    ];

    let needle = product.to_lowercase();
    MAPPINGS
        .iter()
        .find(|(keyword, _, _)| needle.contains(keyword))
        .map(|&(_, kind, query)| (kind, query))
}

/// Fetches market data for a product.
///
/// Stock-backed products fetch the quote and yesterday-to-today company news
/// concurrently; either failing fails the lookup. Unmapped products succeed with
/// an empty `none` payload.
pub async fn lookup_product(
    provider: &dyn MarketDataProvider,
    product: &str,
    today: NaiveDate,
) -> Result<ProductData, ApiError> {
    let Some((kind, query)) = resolve_product(product) else {
        return Ok(ProductData::empty(FeedKind::None));
    };
    tracing::debug!(product, ?kind, query, "Resolved product.");

    let mut data = ProductData::empty(kind);
    match kind {
        FeedKind::Finnhub => {
            let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
            let (quote, news) = tokio::join!(
                provider.quote(query),
                provider.company_news(query, yesterday, today)
            );
            data.quote = Some(quote?);
            data.news = Some(news?);
            data.symbol = Some(query.to_string());
        }
        FeedKind::Mandi => {
            data.commodity = Some(provider.mandi_prices(query).await?);
        }
        FeedKind::None => {}
    }
    Ok(data)
}
