use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One day's takings and spending.
///
/// Dates serialize as `YYYY-MM-DD` and the amounts as plain JSON numbers, which is
/// the layout of the persisted `businessData` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub expenditure: Decimal,
}

impl Record {
    pub fn new(date: NaiveDate, revenue: Decimal, expenditure: Decimal) -> Self {
        Self {
            date,
            revenue,
            expenditure,
        }
    }

    pub fn net(&self) -> Decimal {
        self.revenue - self.expenditure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn serializes_to_the_stored_layout() {
        let record = Record::new(
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            dec!(1000),
            dec!(400.5),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "date": "2024-01-10", "revenue": 1000.0, "expenditure": 400.5 })
        );
    }

    #[test]
    fn reads_integer_amounts() {
        let record: Record =
            serde_json::from_str(r#"{"date":"2024-02-01","revenue":250,"expenditure":0}"#).unwrap();
        assert_eq!(record.revenue, dec!(250));
        assert_eq!(record.expenditure, Decimal::ZERO);
        assert_eq!(record.net(), dec!(250));
    }
}
