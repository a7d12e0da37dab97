//! Reference-data collaborators: irradiance, equipment prices, tariffs.
//!
//! The engine only sees the traits. The in-memory tables below are what the
//! binary, the API and scenario files use; other backends (cached remote
//! lookups, a supplier database) plug in by implementing the same traits.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::SizingError;
use crate::sizing::battery::{Chemistry, UnitCapacity};
use crate::tariff::{TariffBill, TariffSchedule};

/// Irradiance an engine falls back to for unknown locations when asked to
/// (kWh/m²/day).
pub const DEFAULT_GHI_KWH_M2_DAY: f64 = 5.2;

/// Tolerance for matching float-keyed price entries.
const PRICE_KEY_TOLERANCE: f64 = 1e-6;

/// Resolves a location key to global horizontal irradiance (kWh/m²/day).
pub trait IrradianceResolver {
    /// # Errors
    ///
    /// Returns `LocationNotFound` when the key is unknown.
    fn resolve(&self, location: &str) -> Result<f64, SizingError>;
}

/// Prices standard equipment sizes.
pub trait PriceTable {
    /// Unit price of one panel of `wattage_w`.
    fn panel_price(&self, wattage_w: u32) -> Result<f64, SizingError>;

    /// Price of one inverter of `rating_kw`.
    fn inverter_price(&self, rating_kw: f64) -> Result<f64, SizingError>;

    /// Price of one battery unit.
    fn battery_unit_price(
        &self,
        chemistry: Chemistry,
        capacity: UnitCapacity,
    ) -> Result<f64, SizingError>;
}

/// Resolves a tariff category to an effective rate (currency/kWh).
pub trait TariffResolver {
    /// # Errors
    ///
    /// Returns `InvalidInput` on field `tariff_category` when the category is unknown.
    fn resolve(&self, category: &str) -> Result<f64, SizingError>;

    /// Bills `monthly_kwh` at the tier that consumption falls in; `None`
    /// when the tariff has no consumption tiers.
    fn bill(&self, monthly_kwh: f64) -> Result<Option<TariffBill>, SizingError>;
}

impl<T: IrradianceResolver + ?Sized> IrradianceResolver for &T {
    fn resolve(&self, location: &str) -> Result<f64, SizingError> {
        (**self).resolve(location)
    }
}

impl<T: PriceTable + ?Sized> PriceTable for &T {
    fn panel_price(&self, wattage_w: u32) -> Result<f64, SizingError> {
        (**self).panel_price(wattage_w)
    }

    fn inverter_price(&self, rating_kw: f64) -> Result<f64, SizingError> {
        (**self).inverter_price(rating_kw)
    }

    fn battery_unit_price(
        &self,
        chemistry: Chemistry,
        capacity: UnitCapacity,
    ) -> Result<f64, SizingError> {
        (**self).battery_unit_price(chemistry, capacity)
    }
}

impl<T: TariffResolver + ?Sized> TariffResolver for &T {
    fn resolve(&self, category: &str) -> Result<f64, SizingError> {
        (**self).resolve(category)
    }

    fn bill(&self, monthly_kwh: f64) -> Result<Option<TariffBill>, SizingError> {
        (**self).bill(monthly_kwh)
    }
}

/// Location → GHI lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IrradianceTable {
    pub locations: IndexMap<String, f64>,
}

impl Default for IrradianceTable {
    fn default() -> Self {
        let mut locations = IndexMap::new();
        locations.insert("Nairobi".to_string(), DEFAULT_GHI_KWH_M2_DAY);
        Self { locations }
    }
}

impl IrradianceResolver for IrradianceTable {
    fn resolve(&self, location: &str) -> Result<f64, SizingError> {
        self.locations
            .get(location)
            .or_else(|| {
                self.locations
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(location))
                    .map(|(_, ghi)| ghi)
            })
            .copied()
            .ok_or_else(|| SizingError::LocationNotFound(location.to_string()))
    }
}

/// Price of one panel rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelPrice {
    pub wattage_w: u32,
    pub price: f64,
}

/// Price of one inverter rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InverterPrice {
    pub rating_kw: f64,
    pub price: f64,
}

/// Price of one battery unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryPrice {
    pub chemistry: Chemistry,
    pub capacity: UnitCapacity,
    pub price: f64,
}

/// Flat equipment price list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceCatalog {
    pub panels: Vec<PanelPrice>,
    pub inverters: Vec<InverterPrice>,
    pub batteries: Vec<BatteryPrice>,
}

impl Default for PriceCatalog {
    /// Baseline market prices: panels at 35/W, inverters at 25 000/kW,
    /// lead-acid and gel at 20 000/kWh, lithium at 50 000/kWh.
    fn default() -> Self {
        let panels = vec![PanelPrice {
            wattage_w: 450,
            price: 15_750.0,
        }];
        let inverters = [1.5, 3.0, 5.0, 8.0, 10.0]
            .into_iter()
            .map(|rating_kw| InverterPrice {
                rating_kw,
                price: rating_kw * 25_000.0,
            })
            .collect();

        let mut batteries = Vec::new();
        for chemistry in [Chemistry::LeadAcid, Chemistry::Gel] {
            for ah in [50, 80, 100, 120, 150, 200] {
                batteries.push(BatteryPrice {
                    chemistry,
                    capacity: UnitCapacity::AmpHours(ah),
                    price: f64::from(ah) * 240.0,
                });
            }
        }
        for ah in [50, 100, 150, 200, 300] {
            batteries.push(BatteryPrice {
                chemistry: Chemistry::LithiumAh,
                capacity: UnitCapacity::AmpHours(ah),
                price: f64::from(ah) * 600.0,
            });
        }
        for kwh in [2.56, 5.12, 7.68, 10.24, 15.36, 20.48] {
            batteries.push(BatteryPrice {
                chemistry: Chemistry::LithiumKwh,
                capacity: UnitCapacity::KilowattHours(kwh),
                price: kwh * 50_000.0,
            });
        }

        Self {
            panels,
            inverters,
            batteries,
        }
    }
}

fn same_capacity(a: UnitCapacity, b: UnitCapacity) -> bool {
    match (a, b) {
        (UnitCapacity::AmpHours(x), UnitCapacity::AmpHours(y)) => x == y,
        (UnitCapacity::KilowattHours(x), UnitCapacity::KilowattHours(y)) => {
            (x - y).abs() < PRICE_KEY_TOLERANCE
        }
        _ => false,
    }
}

impl PriceTable for PriceCatalog {
    fn panel_price(&self, wattage_w: u32) -> Result<f64, SizingError> {
        self.panels
            .iter()
            .find(|p| p.wattage_w == wattage_w)
            .map(|p| p.price)
            .ok_or_else(|| SizingError::PriceNotFound {
                item: format!("{wattage_w} W panel"),
            })
    }

    fn inverter_price(&self, rating_kw: f64) -> Result<f64, SizingError> {
        self.inverters
            .iter()
            .find(|i| (i.rating_kw - rating_kw).abs() < PRICE_KEY_TOLERANCE)
            .map(|i| i.price)
            .ok_or_else(|| SizingError::PriceNotFound {
                item: format!("{rating_kw} kW inverter"),
            })
    }

    fn battery_unit_price(
        &self,
        chemistry: Chemistry,
        capacity: UnitCapacity,
    ) -> Result<f64, SizingError> {
        self.batteries
            .iter()
            .find(|b| b.chemistry == chemistry && same_capacity(b.capacity, capacity))
            .map(|b| b.price)
            .ok_or_else(|| SizingError::PriceNotFound {
                item: format!("{capacity} {chemistry} battery"),
            })
    }
}

/// Reference tables carried by a scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReferenceData {
    pub prices: PriceCatalog,
    pub irradiance: IrradianceTable,
    pub tariff: TariffSchedule,
}

impl ReferenceData {
    /// Validates every table and returns a list of errors.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigError {
                field: field.to_string(),
                message,
            });
        };

        for p in &self.prices.panels {
            if !(p.price.is_finite() && p.price > 0.0) {
                push("references.prices.panels", format!("{} W price must be > 0", p.wattage_w));
            }
        }
        for i in &self.prices.inverters {
            if !(i.price.is_finite() && i.price > 0.0) {
                push(
                    "references.prices.inverters",
                    format!("{} kW price must be > 0", i.rating_kw),
                );
            }
        }
        for b in &self.prices.batteries {
            if !(b.price.is_finite() && b.price > 0.0) {
                push(
                    "references.prices.batteries",
                    format!("{} {} price must be > 0", b.capacity, b.chemistry),
                );
            }
        }
        for (name, ghi) in &self.irradiance.locations {
            if !(ghi.is_finite() && *ghi > 0.0) {
                push("references.irradiance.locations", format!("{name} must be > 0"));
            }
        }

        errors.extend(self.tariff.validate());
        errors
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn default_catalog_prices_reference_items() {
        let prices = PriceCatalog::default();
        assert_relative_eq!(prices.panel_price(450).unwrap(), 15_750.0);
        assert_relative_eq!(prices.inverter_price(1.5).unwrap(), 37_500.0);
        assert_relative_eq!(
            prices
                .battery_unit_price(Chemistry::LeadAcid, UnitCapacity::AmpHours(150))
                .unwrap(),
            36_000.0
        );
        assert_relative_eq!(
            prices
                .battery_unit_price(Chemistry::LithiumKwh, UnitCapacity::KilowattHours(5.12))
                .unwrap(),
            256_000.0
        );
    }

    #[test]
    fn missing_price_names_item() {
        let prices = PriceCatalog::default();
        let err = prices.inverter_price(6.0).unwrap_err();
        assert_eq!(
            err,
            SizingError::PriceNotFound {
                item: "6 kW inverter".to_string()
            }
        );
        assert!(
            prices
                .battery_unit_price(Chemistry::Gel, UnitCapacity::KilowattHours(5.12))
                .is_err()
        );
    }

    #[test]
    fn irradiance_lookup_ignores_case() {
        let table = IrradianceTable::default();
        assert_relative_eq!(table.resolve("nairobi").unwrap(), 5.2);
        assert_eq!(
            table.resolve("Atlantis"),
            Err(SizingError::LocationNotFound("Atlantis".to_string()))
        );
    }

    #[test]
    fn default_references_valid() {
        assert!(ReferenceData::default().validate().is_empty());
    }

    #[test]
    fn non_positive_price_is_reported() {
        let mut refs = ReferenceData::default();
        refs.prices.panels[0].price = 0.0;
        let errors = refs.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "references.prices.panels");
    }

    #[test]
    fn price_catalog_parses_from_toml() {
        let toml = r#"
[[panels]]
wattage_w = 450
price = 18000.0

[[batteries]]
chemistry = "lithium_kwh"
capacity = { kilowatt_hours = 5.12 }
price = 240000.0
"#;
        let prices: PriceCatalog = toml::from_str(toml).unwrap();
        assert_relative_eq!(prices.panel_price(450).unwrap(), 18_000.0);
        // omitted sections keep the baseline list
        assert_relative_eq!(prices.inverter_price(3.0).unwrap(), 75_000.0);
        assert_relative_eq!(
            prices
                .battery_unit_price(Chemistry::LithiumKwh, UnitCapacity::KilowattHours(5.12))
                .unwrap(),
            240_000.0
        );
    }
}
