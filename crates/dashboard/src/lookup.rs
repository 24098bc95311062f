use api_client::{DashboardFeed, ProductData};
use configuration::DashboardConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// What the product panel should show after a lookup settles.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    /// Input too short; the panel is hidden.
    Hidden,
    Data(ProductData),
    /// The call failed; the message is shown inline.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupUpdate {
    pub sequence: u64,
    pub product: String,
    pub result: LookupResult,
}

/// Debounced, last-request-wins product lookup.
///
/// Every keystroke cancels the pending quiet-period timer. When a timer fires, the
/// request takes a fresh sequence number; in-flight requests are never cancelled,
/// but a response is only delivered while its sequence number is still the latest.
pub struct ProductLookup {
    feed: Arc<dyn DashboardFeed>,
    delay: Duration,
    min_chars: usize,
    pending: Option<JoinHandle<()>>,
    latest: Arc<AtomicU64>,
    updates: mpsc::UnboundedSender<LookupUpdate>,
}

impl ProductLookup {
    pub fn new(
        feed: Arc<dyn DashboardFeed>,
        delay: Duration,
        min_chars: usize,
    ) -> (Self, mpsc::UnboundedReceiver<LookupUpdate>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let lookup = Self {
            feed,
            delay,
            min_chars,
            pending: None,
            latest: Arc::new(AtomicU64::new(0)),
            updates,
        };
        (lookup, rx)
    }

    pub fn from_config(
        feed: Arc<dyn DashboardFeed>,
        config: &DashboardConfig,
    ) -> (Self, mpsc::UnboundedReceiver<LookupUpdate>) {
        Self::new(
            feed,
            Duration::from_millis(config.lookup_debounce_ms),
            config.min_lookup_chars,
        )
    }

    /// Handles the product field's new contents.
    pub fn input(&mut self, text: &str) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }

        let product = text.trim().to_string();
        if product.chars().count() < self.min_chars {
            // Anything still in flight is now stale.
            let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            let _ = self.updates.send(LookupUpdate {
                sequence,
                product,
                result: LookupResult::Hidden,
            });
            return;
        }

        let feed = Arc::clone(&self.feed);
        let latest = Arc::clone(&self.latest);
        let updates = self.updates.clone();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let sequence = latest.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::debug!(%product, sequence, "Starting product lookup.");

            // The request runs on its own task so a later keystroke cannot abort it.
            tokio::spawn(async move {
                let result = match feed.product_data(&product).await {
                    Ok(data) => LookupResult::Data(data),
                    Err(e) => {
                        tracing::warn!(%product, error = %e, "Product lookup failed.");
                        LookupResult::Failed(e.to_string())
                    }
                };
                if latest.load(Ordering::SeqCst) != sequence {
                    tracing::debug!(%product, sequence, "Discarding stale lookup response.");
                    return;
                }
                let _ = updates.send(LookupUpdate {
                    sequence,
                    product,
                    result,
                });
            });
        }));
    }
}

impl Drop for ProductLookup {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
    }
}
