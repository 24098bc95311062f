use crate::reconciler::SeriesPoint;
use core_types::ChartType;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

const REVENUE_FILL: &str = "rgba(75, 192, 192, 0.6)";
const REVENUE_BORDER: &str = "rgba(75, 192, 192, 1)";
const EXPENDITURE_FILL: &str = "rgba(255, 99, 132, 0.6)";
const EXPENDITURE_BORDER: &str = "rgba(255, 99, 132, 1)";

/// The drawing primitive for a chart or for a single dataset overriding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// A renderer-agnostic chart description. Field names follow the Chart.js
/// configuration object, so the JSON can be handed to it unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    /// Overrides the chart-level kind for this dataset only.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChartKind>,
    pub background_color: String,
    pub border_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    /// Lower orders are drawn on top.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub begin_at_zero: bool,
    /// Prefix for axis ticks and tooltips.
    pub value_prefix: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            begin_at_zero: true,
            value_prefix: "₹".to_string(),
        }
    }
}

impl ChartConfig {
    pub fn dataset(&self, label: &str) -> Option<&Dataset> {
        self.data.datasets.iter().find(|d| d.label == label)
    }
}

/// Maps the dense series onto a chart of the requested type.
pub fn build_chart_config(series: &[SeriesPoint], chart_type: ChartType) -> ChartConfig {
    let labels = series.iter().map(|p| p.label.clone()).collect();
    let revenue = to_points(series.iter().map(|p| p.revenue));
    let expenditure = to_points(series.iter().map(|p| p.expenditure));

    let (kind, datasets) = match chart_type {
        ChartType::Bar => (
            ChartKind::Bar,
            vec![
                bar("Revenue", revenue, REVENUE_FILL, REVENUE_BORDER),
                bar("Expenditure", expenditure, EXPENDITURE_FILL, EXPENDITURE_BORDER),
            ],
        ),
        ChartType::Line => (
            ChartKind::Line,
            vec![
                line("Revenue", revenue, REVENUE_FILL, REVENUE_BORDER),
                line("Expenditure", expenditure, EXPENDITURE_BORDER, EXPENDITURE_BORDER),
            ],
        ),
        ChartType::Combined => {
            let mut bars = bar("Revenue (Bar)", revenue, REVENUE_FILL, REVENUE_BORDER);
            bars.order = Some(2);
            let mut overlay = line("Expenditure (Line)", expenditure, EXPENDITURE_BORDER, EXPENDITURE_BORDER);
            overlay.kind = Some(ChartKind::Line);
            overlay.order = Some(1);
            (ChartKind::Bar, vec![bars, overlay])
        }
    };

    ChartConfig {
        kind,
        data: ChartData { labels, datasets },
        options: ChartOptions::default(),
    }
}

fn to_points(values: impl Iterator<Item = Decimal>) -> Vec<f64> {
    values.map(|v| v.to_f64().unwrap_or_default()).collect()
}

fn bar(label: &str, data: Vec<f64>, fill: &str, border: &str) -> Dataset {
    Dataset {
        label: label.to_string(),
        data,
        kind: None,
        background_color: fill.to_string(),
        border_color: border.to_string(),
        border_width: Some(1),
        tension: None,
        fill: None,
        order: None,
    }
}

fn line(label: &str, data: Vec<f64>, fill: &str, border: &str) -> Dataset {
    Dataset {
        label: label.to_string(),
        data,
        kind: None,
        background_color: fill.to_string(),
        border_color: border.to_string(),
        border_width: None,
        tension: Some(0.1),
        fill: Some(false),
        order: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::reconcile;
    use chrono::NaiveDate;
    use core_types::Record;
    use rust_decimal_macros::dec;

    fn series() -> Vec<SeriesPoint> {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        reconcile(&[Record::new(today, dec!(1000), dec!(400))], 3, today).series
    }

    #[test]
    fn bar_chart_pairs_both_datasets_with_labels() {
        let config = build_chart_config(&series(), ChartType::Bar);
        assert_eq!(config.kind, ChartKind::Bar);
        assert_eq!(config.data.labels, vec!["Jan 8", "Jan 9", "Jan 10"]);
        assert_eq!(config.dataset("Revenue").unwrap().data, vec![0.0, 0.0, 1000.0]);
        assert_eq!(config.dataset("Expenditure").unwrap().data, vec![0.0, 0.0, 400.0]);
    }

    #[test]
    fn combined_chart_overlays_expenditure_as_a_line() {
        let config = build_chart_config(&series(), ChartType::Combined);
        assert_eq!(config.kind, ChartKind::Bar);

        let bars = config.dataset("Revenue (Bar)").unwrap();
        let overlay = config.dataset("Expenditure (Line)").unwrap();
        assert_eq!(bars.kind, None);
        assert_eq!(overlay.kind, Some(ChartKind::Line));
        assert!(overlay.order < bars.order);
    }

    #[test]
    fn serializes_in_chart_js_shape() {
        let config = build_chart_config(&series(), ChartType::Line);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["type"], "line");
        assert_eq!(json["data"]["datasets"][0]["label"], "Revenue");
        assert_eq!(json["data"]["datasets"][0]["fill"], false);
        assert_eq!(json["options"]["maintainAspectRatio"], false);
        assert!(json["data"]["datasets"][0].get("type").is_none());
    }
}
