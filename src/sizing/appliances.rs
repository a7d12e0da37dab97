//! Appliance-based load estimate for households without a bill or meter reading.

use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SizingError;

/// Rated draw and typical daily use of one standard appliance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceSpec {
    pub power_w: f64,
    pub hours_per_day: f64,
}

/// One line of the household's appliance list.
///
/// Standard appliances take their power and hours from the catalog unless
/// overridden; custom appliances must give both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplianceUse {
    pub name: String,
    #[serde(default = "one")]
    pub count: u32,
    #[serde(default)]
    pub power_w: Option<f64>,
    #[serde(default)]
    pub hours_per_day: Option<f64>,
}

fn one() -> u32 {
    1
}

impl ApplianceUse {
    pub fn standard(name: &str, count: u32) -> Self {
        Self {
            name: name.to_string(),
            count,
            power_w: None,
            hours_per_day: None,
        }
    }
}

/// Parses `name`, `name:count` or `name:count:watts:hours`.
impl FromStr for ApplianceUse {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let number = |raw: &str| {
            raw.parse::<f64>()
                .map_err(|_| format!("\"{raw}\" is not a number in appliance \"{s}\""))
        };
        let count = |raw: &str| {
            raw.parse::<u32>()
                .map_err(|_| format!("\"{raw}\" is not a count in appliance \"{s}\""))
        };
        match parts.as_slice() {
            [name] if !name.is_empty() => Ok(Self::standard(name, 1)),
            [name, n] if !name.is_empty() => Ok(Self::standard(name, count(n)?)),
            [name, n, watts, hours] if !name.is_empty() => Ok(Self {
                name: name.to_string(),
                count: count(n)?,
                power_w: Some(number(watts)?),
                hours_per_day: Some(number(hours)?),
            }),
            _ => Err(format!(
                "invalid appliance \"{s}\", expected name, name:count or name:count:watts:hours"
            )),
        }
    }
}

/// Catalog key for an appliance name: lowercase, words joined by `_`.
pub fn catalog_key(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace([' ', '-'], "_")
}

/// Typical household appliances.
pub fn standard_catalog() -> IndexMap<String, ApplianceSpec> {
    [
        ("fridge", 150.0, 24.0),
        ("freezer", 150.0, 24.0),
        ("tv", 80.0, 4.0),
        ("led_lights", 10.0, 5.0),
        ("laptop", 60.0, 6.0),
        ("router", 10.0, 24.0),
        ("phone_chargers", 30.0, 3.0),
        ("water_pump", 500.0, 2.0),
        ("air_conditioner", 1_500.0, 8.0),
        ("iron", 1_000.0, 0.3),
        ("washing_machine", 500.0, 0.4),
        ("microwave", 800.0, 0.5),
        ("electric_stove", 2_000.0, 1.0),
        ("water_heater", 1_500.0, 0.5),
    ]
    .into_iter()
    .map(|(name, power_w, hours_per_day)| {
        (
            name.to_string(),
            ApplianceSpec {
                power_w,
                hours_per_day,
            },
        )
    })
    .collect()
}

fn resolve(
    appliance: &ApplianceUse,
    catalog: &IndexMap<String, ApplianceSpec>,
) -> Result<ApplianceSpec, SizingError> {
    let standard = catalog.get(&catalog_key(&appliance.name));
    let power_w = appliance.power_w.or(standard.map(|s| s.power_w));
    let hours_per_day = appliance.hours_per_day.or(standard.map(|s| s.hours_per_day));
    let (Some(power_w), Some(hours_per_day)) = (power_w, hours_per_day) else {
        return Err(SizingError::invalid(
            "appliances",
            format!(
                "unknown appliance \"{}\", give power_w and hours_per_day",
                appliance.name
            ),
        ));
    };
    if !(power_w.is_finite() && power_w > 0.0) {
        return Err(SizingError::invalid(
            "appliances",
            format!("{}: power must be > 0, got {power_w}", appliance.name),
        ));
    }
    if !(hours_per_day > 0.0 && hours_per_day <= 24.0) {
        return Err(SizingError::invalid(
            "appliances",
            format!("{}: hours per day must be in (0, 24], got {hours_per_day}", appliance.name),
        ));
    }
    Ok(ApplianceSpec {
        power_w,
        hours_per_day,
    })
}

/// Monthly consumption (kWh) of the appliance list.
///
/// # Errors
///
/// Returns `InvalidInput` on field `appliances` for unknown or malformed
/// entries, or when the list draws no energy at all.
pub fn estimate_appliance_load(
    appliances: &[ApplianceUse],
    catalog: &IndexMap<String, ApplianceSpec>,
    days_per_month: f64,
) -> Result<f64, SizingError> {
    let mut daily_kwh = 0.0;
    for appliance in appliances.iter().filter(|a| a.count > 0) {
        let spec = resolve(appliance, catalog)?;
        daily_kwh += spec.power_w * spec.hours_per_day * f64::from(appliance.count) / 1000.0;
    }
    if daily_kwh <= 0.0 {
        return Err(SizingError::invalid(
            "appliances",
            "appliance list draws no energy",
        ));
    }

    let monthly_kwh = daily_kwh * days_per_month;
    debug!(appliances = appliances.len(), daily_kwh, monthly_kwh, "appliance load estimated");
    Ok(monthly_kwh)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn standard_appliances_use_catalog_draw() {
        // fridge 3.6 kWh/day + 2 TVs 0.64 kWh/day
        let list = [ApplianceUse::standard("Fridge", 1), ApplianceUse::standard("TV", 2)];
        let monthly = estimate_appliance_load(&list, &standard_catalog(), 30.44).unwrap();
        assert_relative_eq!(monthly, 4.24 * 30.44, epsilon = 1e-9);
    }

    #[test]
    fn custom_appliance_and_hours_override() {
        let list = [
            "coffee_maker:1:800:0.5".parse::<ApplianceUse>().unwrap(),
            ApplianceUse {
                hours_per_day: Some(4.0),
                ..ApplianceUse::standard("Water Pump", 1)
            },
        ];
        let monthly = estimate_appliance_load(&list, &standard_catalog(), 30.0).unwrap();
        assert_relative_eq!(monthly, (0.4 + 2.0) * 30.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_count_lines_are_skipped() {
        let list = [ApplianceUse::standard("laptop", 1), ApplianceUse::standard("mystery", 0)];
        assert!(estimate_appliance_load(&list, &standard_catalog(), 30.44).is_ok());
    }

    #[test]
    fn unknown_appliance_needs_its_draw() {
        let err = estimate_appliance_load(
            &[ApplianceUse::standard("sauna", 1)],
            &standard_catalog(),
            30.44,
        )
        .unwrap_err();
        assert_eq!(err.field(), "appliances");
    }

    #[test]
    fn empty_draw_is_invalid() {
        let err = estimate_appliance_load(&[ApplianceUse::standard("tv", 0)], &standard_catalog(), 30.44)
            .unwrap_err();
        assert_eq!(err.field(), "appliances");
    }

    #[test]
    fn parses_cli_forms() {
        assert_eq!("router".parse::<ApplianceUse>(), Ok(ApplianceUse::standard("router", 1)));
        assert_eq!("led_lights:6".parse::<ApplianceUse>(), Ok(ApplianceUse::standard("led_lights", 6)));
        assert!("tv:two".parse::<ApplianceUse>().is_err());
        assert!("heater:1:2000".parse::<ApplianceUse>().is_err());
    }
}
