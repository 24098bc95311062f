use crate::error::SimulatorError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const PRECIOUS_METALS: [&str; 4] = ["gold", "silver", "platinum", "palladium"];

/// A unit of mass a metal price can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MassUnit {
    #[serde(rename = "toz")]
    TroyOunce,
    #[serde(rename = "lb")]
    Pound,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
}

impl MassUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            MassUnit::TroyOunce => "toz",
            MassUnit::Pound => "lb",
            MassUnit::Gram => "g",
            MassUnit::Kilogram => "kg",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            MassUnit::TroyOunce => "troy ounce",
            MassUnit::Pound => "lb",
            MassUnit::Gram => "gram",
            MassUnit::Kilogram => "kilogram",
        }
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for MassUnit {
    type Err = SimulatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "toz" => Ok(MassUnit::TroyOunce),
            "lb" => Ok(MassUnit::Pound),
            "g" => Ok(MassUnit::Gram),
            "kg" => Ok(MassUnit::Kilogram),
            other => Err(SimulatorError::UnsupportedUnit {
                unit: other.to_string(),
                base: "any metal".to_string(),
            }),
        }
    }
}

/// A live metal price, quoted per `base_unit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetalQuote {
    /// The provider's key, e.g. `gold` or `aluminum`.
    pub key: String,
    /// Title-cased display name, e.g. `Lme Copper`.
    pub name: String,
    pub price: Decimal,
    pub base_unit: MassUnit,
}

impl MetalQuote {
    pub fn new(key: &str, price: Decimal) -> Self {
        let lowered = key.to_ascii_lowercase();
        let base_unit = if PRECIOUS_METALS.iter().any(|metal| lowered.contains(metal)) {
            MassUnit::TroyOunce
        } else {
            MassUnit::Pound
        };
        Self {
            key: key.to_string(),
            name: display_name(key),
            price,
            base_unit,
        }
    }

    /// The units a purchase quantity may be entered in, base unit first.
    pub fn offered_units(&self) -> &'static [MassUnit] {
        match self.base_unit {
            MassUnit::TroyOunce => &[MassUnit::TroyOunce, MassUnit::Gram, MassUnit::Kilogram],
            _ => &[MassUnit::Pound, MassUnit::Kilogram, MassUnit::Gram],
        }
    }

    /// Price of one `unit` of this metal.
    pub fn price_per(&self, unit: MassUnit) -> Result<Decimal, SimulatorError> {
        self.price
            .checked_div(units_per_base(self.base_unit, unit)?)
            .ok_or(SimulatorError::Overflow("unit price"))
    }

    /// Total cost of `quantity` units, rounded to a whole amount.
    ///
    /// A zero quantity yields `None`: there is nothing to apply to the raw material cost.
    pub fn cost_for(&self, quantity: Decimal, unit: MassUnit) -> Result<Option<Decimal>, SimulatorError> {
        if quantity.is_zero() {
            return Ok(None);
        }
        let total = self
            .price_per(unit)?
            .checked_mul(quantity)
            .ok_or(SimulatorError::Overflow("metal cost"))?;
        Ok(Some(total.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)))
    }
}

/// How many base units make up one `unit`, using the provider's conversion table.
fn units_per_base(base: MassUnit, unit: MassUnit) -> Result<Decimal, SimulatorError> {
    let factor = match (base, unit) {
        (MassUnit::TroyOunce, MassUnit::TroyOunce) => dec!(1),
        (MassUnit::TroyOunce, MassUnit::Gram) => dec!(31.1035),
        (MassUnit::TroyOunce, MassUnit::Kilogram) => dec!(0.0311035),
        (MassUnit::Pound, MassUnit::Pound) => dec!(1),
        (MassUnit::Pound, MassUnit::Gram) => dec!(453.592),
        (MassUnit::Pound, MassUnit::Kilogram) => dec!(0.453592),
        (base, unit) => {
            return Err(SimulatorError::UnsupportedUnit {
                unit: unit.symbol().to_string(),
                base: base.describe().to_string(),
            });
        }
    };
    Ok(factor)
}

/// The metals worth offering from a provider price table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetalCatalog {
    quotes: Vec<MetalQuote>,
}

impl MetalCatalog {
    /// Builds the catalogue, skipping currency codes and exchange-specific duplicates
    /// that share the provider's `metals` table.
    pub fn from_prices<'a, I>(prices: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Decimal)>,
    {
        let quotes = prices
            .into_iter()
            .filter(|(key, _)| is_metal(key))
            .map(|(key, price)| MetalQuote::new(key, price))
            .collect::<Vec<_>>();
        tracing::debug!(count = quotes.len(), "Built metal catalogue.");
        Self { quotes }
    }

    pub fn quotes(&self) -> &[MetalQuote] {
        &self.quotes
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Finds a metal by provider key or display name, ignoring case.
    pub fn find(&self, name: &str) -> Result<&MetalQuote, SimulatorError> {
        let wanted = name.trim().to_ascii_lowercase().replace(' ', "_");
        self.quotes
            .iter()
            .find(|q| q.key.to_ascii_lowercase() == wanted)
            .ok_or_else(|| SimulatorError::UnknownMetal(name.to_string()))
    }
}

fn is_metal(key: &str) -> bool {
    !(key.len() == 3 || key.len() == 6 || key.starts_with("lbma") || key.starts_with("mcx"))
}

fn display_name(key: &str) -> String {
    key.replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
