use crate::error::DashboardError;
use api_client::{DashboardFeed, MetalPrices};
use rust_decimal::Decimal;
use simulator::MetalCatalog;

/// Builds the selectable metals from a provider price table. Prices that do not
/// fit a decimal are skipped.
pub fn catalog_from_prices(prices: &MetalPrices) -> MetalCatalog {
    MetalCatalog::from_prices(prices.metals.iter().filter_map(|(name, price)| {
        Decimal::try_from(*price)
            .ok()
            .map(|price| (name.as_str(), price))
    }))
}

/// Fetches live prices through the proxy and builds the catalogue.
pub async fn fetch_metal_catalog(feed: &dyn DashboardFeed) -> Result<MetalCatalog, DashboardError> {
    let prices = feed.metal_prices().await?;
    Ok(catalog_from_prices(&prices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulator::MassUnit;

    #[test]
    fn builds_catalog_from_provider_table() {
        let mut prices = MetalPrices::default();
        prices.metals.insert("gold".into(), 6200.0);
        prices.metals.insert("aluminum".into(), 180.5);
        prices.metals.insert("lbma_gold_pm".into(), 6190.0);

        let catalog = catalog_from_prices(&prices);

        assert_eq!(catalog.quotes().len(), 2);
        assert_eq!(catalog.find("aluminum").unwrap().base_unit, MassUnit::Pound);
        assert_eq!(catalog.find("gold").unwrap().base_unit, MassUnit::TroyOunce);
    }
}
