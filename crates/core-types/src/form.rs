use crate::error::CoreError;
use crate::structs::Record;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

const INVALID_DATE: &str = "Please enter a valid date in DD/MM/YYYY format.";

/// The daily entry form exactly as typed: a three-part date plus the two amounts.
///
/// Nothing reaches the record store until [`EntryForm::into_record`] has accepted it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub day: String,
    pub month: String,
    pub year: String,
    pub revenue: String,
    pub expenditure: String,
}

impl EntryForm {
    /// A form whose date fields are pre-filled with `date`, the way the dashboard
    /// resets itself after every submission.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            day: format!("{:02}", date.day()),
            month: format!("{:02}", date.month()),
            year: date.year().to_string(),
            ..Self::default()
        }
    }

    pub fn with_amounts(mut self, revenue: impl Into<String>, expenditure: impl Into<String>) -> Self {
        self.revenue = revenue.into();
        self.expenditure = expenditure.into();
        self
    }

    /// Validates every field and builds the record to upsert.
    pub fn into_record(&self) -> Result<Record, CoreError> {
        let date = self.date()?;
        let revenue = parse_amount("revenue", &self.revenue)?;
        let expenditure = parse_amount("expenditure", &self.expenditure)?;
        Ok(Record::new(date, revenue, expenditure))
    }

    fn date(&self) -> Result<NaiveDate, CoreError> {
        let day = date_part(&self.day, 1..=2)?;
        let month = date_part(&self.month, 1..=2)?;
        let year = date_part(&self.year, 4..=4)?;

        NaiveDate::from_ymd_opt(year as i32, month, day)
            .ok_or_else(|| CoreError::InvalidDate(INVALID_DATE.to_string()))
    }
}

fn date_part(raw: &str, digits: std::ops::RangeInclusive<usize>) -> Result<u32, CoreError> {
    let raw = raw.trim();
    if !digits.contains(&raw.len()) || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::InvalidDate(INVALID_DATE.to_string()));
    }
    raw.parse::<u32>()
        .map_err(|_| CoreError::InvalidDate(INVALID_DATE.to_string()))
}

fn parse_amount(field: &str, raw: &str) -> Result<Decimal, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoreError::InvalidInput(field.to_string(), "a value is required".to_string()));
    }
    let amount = Decimal::from_str(raw)
        .map_err(|e| CoreError::InvalidInput(field.to_string(), e.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CoreError::InvalidInput(
            field.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn form(day: &str, month: &str, year: &str) -> EntryForm {
        EntryForm {
            day: day.to_string(),
            month: month.to_string(),
            year: year.to_string(),
            revenue: "1000".to_string(),
            expenditure: "400.50".to_string(),
        }
    }

    #[test]
    fn accepts_single_digit_day_and_month() {
        let record = form("5", "3", "2024").into_record().unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(record.revenue, dec!(1000));
        assert_eq!(record.expenditure, dec!(400.50));
    }

    #[test]
    fn rejects_incomplete_dates() {
        assert!(matches!(form("10", "01", "24").into_record(), Err(CoreError::InvalidDate(_))));
        assert!(matches!(form("", "01", "2024").into_record(), Err(CoreError::InvalidDate(_))));
        assert!(matches!(form("1a", "01", "2024").into_record(), Err(CoreError::InvalidDate(_))));
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        let err = form("30", "02", "2024").into_record().unwrap_err();
        assert_eq!(err.to_string(), INVALID_DATE);
    }

    #[test]
    fn rejects_negative_and_missing_amounts() {
        let negative = form("10", "01", "2024").with_amounts("-5", "0");
        assert!(matches!(negative.into_record(), Err(CoreError::InvalidInput(field, _)) if field == "revenue"));

        let missing = form("10", "01", "2024").with_amounts("10", " ");
        assert!(matches!(missing.into_record(), Err(CoreError::InvalidInput(field, _)) if field == "expenditure"));
    }

    #[test]
    fn prefilled_form_round_trips_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        let prefilled = EntryForm::for_date(date);
        assert_eq!(prefilled.day, "09");
        assert_eq!(prefilled.month, "01");
        let record = prefilled.with_amounts("1", "2").into_record().unwrap();
        assert_eq!(record.date, date);
    }
}
