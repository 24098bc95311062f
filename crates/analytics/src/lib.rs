//! # bizpulse Analytics
//!
//! Turns the sparse, date-keyed business records into what the dashboard shows.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O and no knowledge of storage; depends only on `core-types`.
//! - **Stateless calculation:** every function takes the full input and returns a fresh
//!   result, so callers simply re-run after each mutation.
//!
//! ## Public API
//!
//! - `reconcile`: the dense, zero-filled daily series for a trailing window, plus the
//!   records that fell inside it.
//! - `aggregate`: totals and averages over the matched records (`SummaryStats`).
//! - `build_chart_config`: maps a series and a chart type onto a `ChartConfig`.

// Declare the modules that constitute this crate.
pub mod chart;
pub mod engine;
pub mod reconciler;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use chart::{build_chart_config, ChartConfig, ChartKind, Dataset};
pub use engine::aggregate;
pub use reconciler::{day_label, reconcile, Reconciliation, SeriesPoint, Window};
pub use report::SummaryStats;
