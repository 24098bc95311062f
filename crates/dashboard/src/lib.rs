//! # bizpulse Dashboard
//!
//! Drives the dashboard the way its single user interacts with it: submitting
//! daily entries, changing the window or chart type, clearing data, asking for
//! advice and looking up product prices.
//!
//! Every mutation re-runs the same pipeline: load all records, reconcile the
//! window, aggregate the matched records and render the chart. Nothing is cached.

pub mod clock;
pub mod error;
pub mod lookup;
pub mod metals;
pub mod render;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::DashboardError;
pub use lookup::{LookupResult, LookupUpdate, ProductLookup};
pub use metals::{catalog_from_prices, fetch_metal_catalog};
pub use render::{ChartCanvas, ChartRenderer};

use analytics::{aggregate, build_chart_config, reconcile, ChartConfig, SeriesPoint, SummaryStats};
use api_client::{AdviceRequest, ApiError, DashboardFeed};
use configuration::DashboardConfig;
use core_types::{ChartType, EntryForm};
use database::{ClearConfirmation, RecordStore, UpsertOutcome};
use std::sync::Arc;

/// Everything the dashboard shows after a refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub today: chrono::NaiveDate,
    pub window_days: i64,
    pub chart_type: ChartType,
    pub series: Vec<SeriesPoint>,
    pub stats: SummaryStats,
    pub chart: ChartConfig,
}

/// The result of a successful form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub outcome: UpsertOutcome,
    pub message: String,
    /// The form reset for the next entry: today's date, empty amounts.
    pub next_form: EntryForm,
    pub view: DashboardView,
}

pub struct Dashboard<C: ChartCanvas> {
    store: RecordStore,
    renderer: ChartRenderer<C>,
    clock: Arc<dyn Clock>,
    window_days: i64,
    chart_type: ChartType,
    advice_article_limit: usize,
}

impl<C: ChartCanvas> Dashboard<C> {
    pub fn new(
        store: RecordStore,
        canvas: C,
        clock: Arc<dyn Clock>,
        config: &DashboardConfig,
    ) -> Self {
        Self {
            store,
            renderer: ChartRenderer::new(canvas),
            clock,
            window_days: config.default_window_days,
            chart_type: config.chart_type,
            advice_article_limit: config.advice_article_limit,
        }
    }

    pub fn window_days(&self) -> i64 {
        self.window_days
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    pub fn renderer(&self) -> &ChartRenderer<C> {
        &self.renderer
    }

    /// A blank form pre-filled with today's date.
    pub fn blank_form(&self) -> EntryForm {
        EntryForm::for_date(self.clock.today())
    }

    /// Validates and stores a daily entry, then refreshes.
    ///
    /// Invalid input is rejected before the store is touched.
    pub async fn submit(&mut self, form: &EntryForm) -> Result<Submission, DashboardError> {
        let record = form.into_record()?;
        let date = record.date;
        let outcome = self.store.upsert(record).await?;
        let message = match outcome {
            UpsertOutcome::Updated => format!("Data for {date} has been updated!"),
            UpsertOutcome::Inserted => format!("Data for {date} has been saved!"),
        };
        let view = self.refresh().await;
        Ok(Submission {
            outcome,
            message,
            next_form: self.blank_form(),
            view,
        })
    }

    /// Deletes every record when confirmed; a declined confirmation changes nothing.
    pub async fn clear_all(
        &mut self,
        confirmation: ClearConfirmation,
    ) -> Result<DashboardView, DashboardError> {
        if self.store.clear_all(confirmation).await? {
            tracing::info!("All business data cleared.");
        }
        Ok(self.refresh().await)
    }

    pub async fn set_window(&mut self, days: i64) -> DashboardView {
        self.window_days = days;
        self.refresh().await
    }

    pub async fn set_chart_type(&mut self, chart_type: ChartType) -> DashboardView {
        self.chart_type = chart_type;
        self.refresh().await
    }

    /// Loads, reconciles, aggregates and renders.
    pub async fn refresh(&mut self) -> DashboardView {
        let today = self.clock.today();
        let records = self.store.load_all().await;
        let reconciliation = reconcile(&records, self.window_days, today);
        let stats = aggregate(&reconciliation.matched);
        let chart = build_chart_config(&reconciliation.series, self.chart_type);
        self.renderer.render(&chart);

        tracing::debug!(
            window_days = self.window_days,
            matched = reconciliation.matched.len(),
            "Dashboard refreshed."
        );
        DashboardView {
            today,
            window_days: self.window_days,
            chart_type: self.chart_type,
            series: reconciliation.series,
            stats,
            chart,
        }
    }

    /// Fetches the latest news and asks for advice on it and the current window.
    ///
    /// Only the first few articles are sent. If the proxy reports a news failure the
    /// advice is asked for without articles. Advice errors come back with the proxy's
    /// message and leave the dashboard untouched.
    pub async fn request_advice(&self, feed: &dyn DashboardFeed) -> Result<String, DashboardError> {
        let mut articles = match feed.news().await {
            Ok(articles) => articles,
            Err(e @ (ApiError::Upstream(_) | ApiError::Status(_))) => {
                tracing::warn!(error = %e, "News unavailable; asking for advice without articles.");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        articles.truncate(self.advice_article_limit);

        let records = self.store.load_all().await;
        let reconciliation = reconcile(&records, self.window_days, self.clock.today());
        let request = AdviceRequest {
            news_articles: articles,
            business_data: aggregate(&reconciliation.matched),
        };
        Ok(feed.advice(&request).await?)
    }
}
