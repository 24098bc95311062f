use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Summary figures for the records inside a window.
///
/// Serialized in camelCase because this is also the `businessData` payload the
/// advice endpoint receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenditure: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_profit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_expenditure: Decimal,
    /// How many real records contributed. Zero-filled days are not counted.
    #[serde(default)]
    pub entry_count: usize,
}

impl SummaryStats {
    /// Creates a new, zeroed-out report.
    pub fn new() -> Self {
        Self {
            total_revenue: Decimal::ZERO,
            total_expenditure: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            avg_revenue: Decimal::ZERO,
            avg_expenditure: Decimal::ZERO,
            entry_count: 0,
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.net_profit >= Decimal::ZERO
    }
}

impl Default for SummaryStats {
    fn default() -> Self {
        Self::new()
    }
}
