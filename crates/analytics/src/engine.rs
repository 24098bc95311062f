use crate::report::SummaryStats;
use core_types::Record;
use rust_decimal::Decimal;

/// Reduces the records matched by a window to totals and per-record averages.
///
/// Averages divide by the number of records, not the number of days in the window,
/// so empty days never dilute them. An empty slice yields all zeros. Totals that
/// exceed the decimal range saturate at its bounds.
pub fn aggregate(matched: &[Record]) -> SummaryStats {
    let mut stats = SummaryStats::new();
    if matched.is_empty() {
        return stats;
    }

    for record in matched {
        stats.total_revenue = accumulate(stats.total_revenue, record.revenue, "revenue");
        stats.total_expenditure =
            accumulate(stats.total_expenditure, record.expenditure, "expenditure");
    }
    stats.net_profit = stats.total_revenue.saturating_sub(stats.total_expenditure);
    stats.entry_count = matched.len();

    let count = Decimal::from(matched.len());
    stats.avg_revenue = stats.total_revenue / count;
    stats.avg_expenditure = stats.total_expenditure / count;

    stats
}

fn accumulate(total: Decimal, amount: Decimal, field: &'static str) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        tracing::warn!(field, "Total exceeds the representable range; saturating.");
        total.saturating_add(amount)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(d: u32, revenue: Decimal, expenditure: Decimal) -> Record {
        Record::new(NaiveDate::from_ymd_opt(2024, 1, d).unwrap(), revenue, expenditure)
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(aggregate(&[]), SummaryStats::default());
    }

    #[test]
    fn single_record_scenario() {
        let stats = aggregate(&[record(10, dec!(1000), dec!(400))]);
        assert_eq!(stats.total_revenue, dec!(1000));
        assert_eq!(stats.total_expenditure, dec!(400));
        assert_eq!(stats.net_profit, dec!(600));
        assert_eq!(stats.avg_revenue, dec!(1000));
        assert_eq!(stats.avg_expenditure, dec!(400));
        assert_eq!(stats.entry_count, 1);
    }

    #[test]
    fn averages_times_count_recover_totals() {
        let records = vec![
            record(1, dec!(100), dec!(30)),
            record(2, dec!(50.5), dec!(70)),
            record(4, dec!(0.25), dec!(1)),
        ];
        let stats = aggregate(&records);
        let count = Decimal::from(records.len());
        let tolerance = dec!(0.000001);

        assert!((stats.avg_revenue * count - stats.total_revenue).abs() < tolerance);
        assert!((stats.avg_expenditure * count - stats.total_expenditure).abs() < tolerance);
        assert_eq!(stats.net_profit, dec!(49.75));
        assert!(stats.is_profitable());
    }

    #[test]
    fn overflowing_totals_saturate_instead_of_panicking() {
        let huge = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        let stats = aggregate(&[record(1, huge, dec!(1)), record(2, huge, dec!(2))]);
        assert_eq!(stats.total_revenue, Decimal::MAX);
        assert_eq!(stats.total_expenditure, dec!(3));
        assert_eq!(stats.net_profit, Decimal::MAX - dec!(3));
        assert_eq!(stats.avg_revenue, Decimal::MAX / dec!(2));
        assert_eq!(stats.entry_count, 2);
    }

    #[test]
    fn losses_show_as_negative_net_profit() {
        let stats = aggregate(&[record(3, dec!(10), dec!(25))]);
        assert_eq!(stats.net_profit, dec!(-15));
        assert!(!stats.is_profitable());
    }
}
