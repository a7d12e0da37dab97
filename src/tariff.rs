//! Consumption-tiered electricity tariff.
//!
//! The household's tier is picked by monthly consumption and every unit is
//! billed at that tier's rate once its threshold is exceeded. Pass-through
//! charges are a flat per-kWh adder and VAT applies to the sum.

use serde::{Deserialize, Serialize};

use crate::catalog::TariffResolver;
use crate::config::ConfigError;
use crate::error::SizingError;

/// One consumption band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffTier {
    /// Category name callers resolve by (e.g. `"lifeline"`).
    pub name: String,
    /// Inclusive upper bound of monthly consumption (kWh); `None` is unbounded.
    #[serde(default)]
    pub up_to_kwh: Option<f64>,
    /// Energy charge before pass-through and VAT (currency/kWh).
    pub base_rate_per_kwh: f64,
}

/// Tiered tariff schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffSchedule {
    /// Tiers ordered by ascending `up_to_kwh`, unbounded tier last.
    pub tiers: Vec<TariffTier>,
    /// Fuel, forex and levy charges (currency/kWh).
    pub pass_through_per_kwh: f64,
    pub vat_rate: f64,
}

/// Monthly bill for one consumption figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TariffBill {
    pub category: String,
    pub effective_rate: f64,
    pub monthly_cost: f64,
}

impl TariffSchedule {
    fn all_in_rate(&self, tier: &TariffTier) -> f64 {
        (tier.base_rate_per_kwh + self.pass_through_per_kwh) * (1.0 + self.vat_rate)
    }

    /// Tier a household consuming `monthly_kwh` falls into.
    pub fn tier_for(&self, monthly_kwh: f64) -> Option<&TariffTier> {
        self.tiers
            .iter()
            .find(|t| t.up_to_kwh.is_none_or(|max| monthly_kwh <= max))
    }

    /// Bills `monthly_kwh` at its tier's all-in rate.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when consumption is not positive or no tier covers it.
    pub fn bill_for(&self, monthly_kwh: f64) -> Result<TariffBill, SizingError> {
        if !(monthly_kwh.is_finite() && monthly_kwh > 0.0) {
            return Err(SizingError::invalid(
                "monthly_kwh",
                format!("must be > 0, got {monthly_kwh}"),
            ));
        }
        let tier = self.tier_for(monthly_kwh).ok_or_else(|| {
            SizingError::invalid(
                "tariff_category",
                format!("no tariff tier covers {monthly_kwh} kWh/month"),
            )
        })?;
        let effective_rate = self.all_in_rate(tier);
        Ok(TariffBill {
            category: tier.name.clone(),
            effective_rate,
            monthly_cost: monthly_kwh * effective_rate,
        })
    }

    /// Lists every structural problem with the schedule.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigError {
                field: field.to_string(),
                message,
            });
        };

        if !(self.pass_through_per_kwh.is_finite() && self.pass_through_per_kwh >= 0.0) {
            push("references.tariff.pass_through_per_kwh", "must be >= 0".into());
        }
        if !(0.0..1.0).contains(&self.vat_rate) {
            push("references.tariff.vat_rate", "must be in [0.0, 1.0)".into());
        }

        let mut previous: Option<f64> = None;
        for (i, tier) in self.tiers.iter().enumerate() {
            if !(tier.base_rate_per_kwh.is_finite() && tier.base_rate_per_kwh > 0.0) {
                push("references.tariff.tiers", format!("{}: base rate must be > 0", tier.name));
            }
            match tier.up_to_kwh {
                Some(max) if previous.is_some_and(|p| max <= p) => push(
                    "references.tariff.tiers",
                    format!("{}: bounds must be strictly ascending", tier.name),
                ),
                None if i + 1 != self.tiers.len() => push(
                    "references.tariff.tiers",
                    format!("{}: only the last tier may be unbounded", tier.name),
                ),
                _ => {}
            }
            previous = tier.up_to_kwh;
        }
        errors
    }
}

impl TariffResolver for TariffSchedule {
    fn resolve(&self, category: &str) -> Result<f64, SizingError> {
        self.tiers
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(category))
            .map(|t| self.all_in_rate(t))
            .ok_or_else(|| {
                SizingError::invalid(
                    "tariff_category",
                    format!("unknown tariff category \"{category}\""),
                )
            })
    }

    fn bill(&self, monthly_kwh: f64) -> Result<Option<TariffBill>, SizingError> {
        if self.tiers.is_empty() {
            return Ok(None);
        }
        self.bill_for(monthly_kwh).map(Some)
    }
}
