//! Load estimator: monthly consumption, bill or appliance list → daily load.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LoadPolicy;
use crate::error::SizingError;

/// Which consumption figure the household supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionSource {
    Kwh,
    Bill,
    Appliances,
}

/// The one authoritative consumption figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Consumption {
    MonthlyKwh(f64),
    MonthlyBill(f64),
    /// Monthly kWh estimated from the appliance list.
    Appliances(f64),
}

impl Consumption {
    /// Picks the supplied figure out of optional request fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` unless exactly one figure is set.
    pub fn from_options(
        monthly_kwh: Option<f64>,
        monthly_bill: Option<f64>,
        appliance_kwh: Option<f64>,
    ) -> Result<Self, SizingError> {
        match (monthly_kwh, monthly_bill, appliance_kwh) {
            (Some(kwh), None, None) => Ok(Self::MonthlyKwh(kwh)),
            (None, Some(bill), None) => Ok(Self::MonthlyBill(bill)),
            (None, None, Some(kwh)) => Ok(Self::Appliances(kwh)),
            (None, None, None) => Err(SizingError::invalid(
                "monthly_kwh",
                "one of monthly_kwh, monthly_bill or appliances is required",
            )),
            (Some(_), Some(_), _) => Err(SizingError::invalid(
                "monthly_bill",
                "supply monthly_kwh or monthly_bill, not both",
            )),
            (_, _, Some(_)) => Err(SizingError::invalid(
                "appliances",
                "an appliance list cannot be combined with monthly_kwh or monthly_bill",
            )),
        }
    }

    /// Same source with the figure multiplied by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        match self {
            Self::MonthlyKwh(kwh) => Self::MonthlyKwh(kwh * factor),
            Self::MonthlyBill(bill) => Self::MonthlyBill(bill * factor),
            Self::Appliances(kwh) => Self::Appliances(kwh * factor),
        }
    }

    /// Monthly kWh when known before a rate is applied.
    pub fn monthly_kwh(self) -> Option<f64> {
        match self {
            Self::MonthlyKwh(kwh) | Self::Appliances(kwh) => Some(kwh),
            Self::MonthlyBill(_) => None,
        }
    }
}

/// Household consumption with both figures reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyProfile {
    pub monthly_kwh: f64,
    pub monthly_bill: f64,
    pub daily_consumption_kwh: f64,
    /// Rate used to convert between kWh and bill (currency/kWh).
    pub effective_rate: f64,
    /// Tariff tier the rate was taken from, if any.
    pub tariff_category: Option<String>,
    pub source: ConsumptionSource,
}

/// Converts the supplied figure into a full profile at `rate`.
///
/// # Errors
///
/// Returns `InvalidInput` if the consumption figure or rate is not positive.
pub fn estimate_load(
    consumption: Consumption,
    rate: f64,
    policy: &LoadPolicy,
) -> Result<EnergyProfile, SizingError> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(SizingError::invalid("rate", format!("must be > 0, got {rate}")));
    }

    let (monthly_kwh, monthly_bill, source) = match consumption {
        Consumption::MonthlyKwh(kwh) => {
            if !(kwh.is_finite() && kwh > 0.0) {
                return Err(SizingError::invalid("monthly_kwh", format!("must be > 0, got {kwh}")));
            }
            (kwh, kwh * rate, ConsumptionSource::Kwh)
        }
        Consumption::Appliances(kwh) => {
            if !(kwh.is_finite() && kwh > 0.0) {
                return Err(SizingError::invalid("appliances", format!("must draw > 0 kWh, got {kwh}")));
            }
            (kwh, kwh * rate, ConsumptionSource::Appliances)
        }
        Consumption::MonthlyBill(bill) => {
            if !(bill.is_finite() && bill > 0.0) {
                return Err(SizingError::invalid("monthly_bill", format!("must be > 0, got {bill}")));
            }
            (bill / rate, bill, ConsumptionSource::Bill)
        }
    };

    let daily_consumption_kwh = monthly_kwh / policy.days_per_month;
    debug!(monthly_kwh, monthly_bill, daily_consumption_kwh, rate, "load estimated");

    Ok(EnergyProfile {
        monthly_kwh,
        monthly_bill,
        daily_consumption_kwh,
        effective_rate: rate,
        tariff_category: None,
        source,
    })
}
