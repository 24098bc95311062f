use api_client::{
    AdviceRequest, ApiError, Article, ArticleSource, DashboardFeed, FeedKind, MetalPrices,
    ProductData,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use configuration::DashboardConfig;
use core_types::{ChartType, EntryForm};
use dashboard::{ChartCanvas, Dashboard, DashboardError, FixedClock};
use database::{ClearConfirmation, RecordStore, UpsertOutcome};
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Keeps a log of what was mounted and how many charts are alive.
#[derive(Default)]
struct RecordingCanvas {
    mounted: Vec<(String, usize)>,
    live: usize,
    max_live: usize,
}

impl ChartCanvas for RecordingCanvas {
    type Handle = usize;

    fn mount(&mut self, config: &analytics::ChartConfig) -> usize {
        self.live += 1;
        self.max_live = self.max_live.max(self.live);
        let label = config.data.datasets.first().map(|d| d.label.clone()).unwrap_or_default();
        self.mounted.push((label, config.data.labels.len()));
        self.mounted.len()
    }

    fn release(&mut self, _handle: usize) {
        self.live -= 1;
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
}

async fn dashboard(window: i64) -> (TempDir, Dashboard<RecordingCanvas>) {
    let dir = tempfile::tempdir().unwrap();
    let store = RecordStore::open(&dir.path().join("dashboard.db"), "businessData")
        .await
        .unwrap();
    let config = DashboardConfig {
        default_window_days: window,
        ..DashboardConfig::default()
    };
    let board = Dashboard::new(
        store,
        RecordingCanvas::default(),
        Arc::new(FixedClock(today())),
        &config,
    );
    (dir, board)
}

fn entry(day: &str, revenue: &str, expenditure: &str) -> EntryForm {
    EntryForm {
        day: day.into(),
        month: "01".into(),
        year: "2024".into(),
        revenue: revenue.into(),
        expenditure: expenditure.into(),
    }
}

#[tokio::test]
async fn submit_saves_then_updates_the_same_day() {
    let (_dir, mut board) = dashboard(7).await;

    let first = board.submit(&entry("10", "1000", "400")).await.unwrap();
    assert_eq!(first.outcome, UpsertOutcome::Inserted);
    assert_eq!(first.message, "Data for 2024-01-10 has been saved!");
    assert_eq!(first.next_form, EntryForm::for_date(today()));
    assert_eq!(first.view.stats.total_revenue, dec!(1000));

    let second = board.submit(&entry("10", "1200", "500")).await.unwrap();
    assert_eq!(second.outcome, UpsertOutcome::Updated);
    assert_eq!(second.message, "Data for 2024-01-10 has been updated!");
    assert_eq!(second.view.stats.total_revenue, dec!(1200));
    assert_eq!(second.view.stats.net_profit, dec!(700));
}

#[tokio::test]
async fn invalid_entries_never_reach_the_store() {
    let (_dir, mut board) = dashboard(7).await;
    let mut form = entry("10", "1000", "400");
    form.year = "24".into();

    let err = board.submit(&form).await.unwrap_err();
    assert!(matches!(err, DashboardError::Input(_)));
    assert_eq!(err.to_string(), "Please enter a valid date in DD/MM/YYYY format.");

    let view = board.refresh().await;
    assert_eq!(view.stats.entry_count, 0);
}

#[tokio::test]
async fn window_covers_today_and_the_days_before() {
    let (_dir, mut board) = dashboard(7).await;
    board.submit(&entry("10", "1000", "400")).await.unwrap();
    board.submit(&entry("03", "50", "50")).await.unwrap();

    let view = board.refresh().await;
    let labels: Vec<_> = view.series.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Jan 4", "Jan 5", "Jan 6", "Jan 7", "Jan 8", "Jan 9", "Jan 10"]
    );
    assert_eq!(view.series[6].revenue, dec!(1000));
    assert_eq!(view.stats.total_revenue, dec!(1000));
    assert_eq!(view.stats.avg_revenue, dec!(1000));

    // Widening the window picks up the older entry.
    let wider = board.set_window(8).await;
    assert_eq!(wider.series.len(), 8);
    assert_eq!(wider.stats.total_revenue, dec!(1050));
    assert_eq!(wider.stats.entry_count, 2);
}

#[tokio::test]
async fn every_refresh_keeps_a_single_live_chart() {
    let (_dir, mut board) = dashboard(30).await;

    board.refresh().await;
    board.set_chart_type(ChartType::Combined).await;
    board.set_window(7).await;
    board.set_chart_type(ChartType::Line).await;

    let canvas = board.renderer().canvas();
    assert_eq!(canvas.max_live, 1);
    assert_eq!(canvas.live, 1);
    assert_eq!(canvas.mounted.len(), 4);
    assert_eq!(canvas.mounted[1], ("Revenue (Bar)".to_string(), 30));
    assert_eq!(canvas.mounted[2], ("Revenue (Bar)".to_string(), 7));
    assert_eq!(canvas.mounted[3], ("Revenue".to_string(), 7));
}

#[tokio::test]
async fn clearing_requires_confirmation() {
    let (_dir, mut board) = dashboard(7).await;
    board.submit(&entry("09", "300", "100")).await.unwrap();

    let kept = board.clear_all(ClearConfirmation::Declined).await.unwrap();
    assert_eq!(kept.stats.entry_count, 1);

    let cleared = board.clear_all(ClearConfirmation::Confirmed).await.unwrap();
    assert_eq!(cleared.stats.entry_count, 0);
    assert_eq!(cleared.stats.total_revenue, dec!(0));
    assert!(cleared.series.iter().all(|p| p.revenue == dec!(0)));
}

#[tokio::test]
async fn non_positive_window_renders_an_empty_dashboard() {
    let (_dir, mut board) = dashboard(7).await;
    board.submit(&entry("10", "1000", "400")).await.unwrap();

    let view = board.set_window(0).await;
    assert!(view.series.is_empty());
    assert_eq!(view.stats.total_revenue, dec!(0));
}

/// A proxy stand-in that serves a fixed news list and captures advice requests.
struct AdviceFeed {
    articles: usize,
    news_error: Option<String>,
    advice_error: Option<String>,
    captured: Mutex<Option<AdviceRequest>>,
}

impl AdviceFeed {
    fn with_articles(articles: usize) -> Self {
        Self {
            articles,
            news_error: None,
            advice_error: None,
            captured: Mutex::new(None),
        }
    }
}

#[async_trait]
impl DashboardFeed for AdviceFeed {
    async fn news(&self) -> Result<Vec<Article>, ApiError> {
        if let Some(message) = &self.news_error {
            return Err(ApiError::Upstream(message.clone()));
        }
        Ok((0..self.articles)
            .map(|i| Article {
                title: Some(format!("Article {i}")),
                description: None,
                url: None,
                source: ArticleSource {
                    name: "wire".into(),
                },
                published_at: None,
            })
            .collect())
    }

    async fn product_data(&self, _product: &str) -> Result<ProductData, ApiError> {
        Ok(ProductData::empty(FeedKind::None))
    }

    async fn metal_prices(&self) -> Result<MetalPrices, ApiError> {
        Ok(MetalPrices::default())
    }

    async fn advice(&self, request: &AdviceRequest) -> Result<String, ApiError> {
        *self.captured.lock().unwrap() = Some(request.clone());
        match &self.advice_error {
            Some(message) => Err(ApiError::Upstream(message.clone())),
            None => Ok("- Keep costs flat".into()),
        }
    }
}

#[tokio::test]
async fn advice_uses_the_first_five_articles_and_the_window_stats() {
    let (_dir, mut board) = dashboard(7).await;
    board.submit(&entry("10", "1000", "400")).await.unwrap();
    let feed = AdviceFeed::with_articles(8);

    let advice = board.request_advice(&feed).await.unwrap();
    assert_eq!(advice, "- Keep costs flat");

    let request = feed.captured.lock().unwrap().clone().unwrap();
    assert_eq!(request.news_articles.len(), 5);
    assert_eq!(request.news_articles[4].title.as_deref(), Some("Article 4"));
    assert_eq!(request.business_data.total_revenue, dec!(1000));
    assert_eq!(request.business_data.net_profit, dec!(600));
}

#[tokio::test]
async fn failed_news_still_asks_for_advice_without_articles() {
    let (_dir, mut board) = dashboard(7).await;
    board.submit(&entry("9", "500", "100")).await.unwrap();
    let feed = AdviceFeed {
        news_error: Some("API key not configured. Check your .env file.".into()),
        ..AdviceFeed::with_articles(3)
    };

    let advice = board.request_advice(&feed).await.unwrap();
    assert_eq!(advice, "- Keep costs flat");

    let request = feed.captured.lock().unwrap().clone().unwrap();
    assert!(request.news_articles.is_empty());
    assert_eq!(request.business_data.total_revenue, dec!(500));
}

#[tokio::test]
async fn advice_errors_are_reported_verbatim() {
    let (_dir, board) = dashboard(7).await;
    let feed = AdviceFeed {
        advice_error: Some("Failed to get AI advice.".into()),
        ..AdviceFeed::with_articles(2)
    };

    let err = board.request_advice(&feed).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to get AI advice.");
    assert_eq!(feed.captured.lock().unwrap().as_ref().unwrap().news_articles.len(), 2);
}
