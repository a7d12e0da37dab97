//! Caller-facing sizing request and its enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sizing::appliances::ApplianceUse;

/// Electrical topology the household wants installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemTopology {
    /// Grid-tied array without storage.
    GridTied,
    /// Grid-tied array with a backup battery bank.
    #[default]
    Hybrid,
    /// Stand-alone system sized for multi-day autonomy.
    OffGrid,
}

impl SystemTopology {
    /// Whether this topology carries a battery bank.
    pub fn requires_battery(self) -> bool {
        match self {
            Self::GridTied => false,
            Self::Hybrid | Self::OffGrid => true,
        }
    }
}

impl fmt::Display for SystemTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GridTied => "Grid-tied",
            Self::Hybrid => "Hybrid",
            Self::OffGrid => "Off-grid",
        })
    }
}

impl FromStr for SystemTopology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "grid_tied" => Ok(Self::GridTied),
            "hybrid" => Ok(Self::Hybrid),
            "off_grid" => Ok(Self::OffGrid),
            other => Err(format!(
                "unknown topology \"{other}\", expected grid_tied, hybrid or off_grid"
            )),
        }
    }
}

/// Battery family the household asked for.
///
/// Lithium resolves to either Ah-rated units or integrated kWh modules once
/// the backup energy is known; see [`crate::sizing::battery::Chemistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryType {
    /// Flooded lead-acid.
    LeadAcid,
    /// Sealed gel.
    #[default]
    Gel,
    /// LiFePO4.
    Lithium,
}

impl fmt::Display for BatteryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LeadAcid => "Lead-Acid",
            Self::Gel => "Gel",
            Self::Lithium => "Lithium",
        })
    }
}

impl FromStr for BatteryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "lead_acid" => Ok(Self::LeadAcid),
            "gel" => Ok(Self::Gel),
            "lithium" => Ok(Self::Lithium),
            other => Err(format!(
                "unknown battery type \"{other}\", expected lead_acid, gel or lithium"
            )),
        }
    }
}

/// Supported backup durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BackupHours {
    H4,
    #[default]
    H8,
    H12,
    H24,
}

impl BackupHours {
    pub const ALL: [Self; 4] = [Self::H4, Self::H8, Self::H12, Self::H24];

    pub fn hours(self) -> u32 {
        match self {
            Self::H4 => 4,
            Self::H8 => 8,
            Self::H12 => 12,
            Self::H24 => 24,
        }
    }
}

impl TryFrom<u32> for BackupHours {
    type Error = String;

    fn try_from(hours: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|b| b.hours() == hours)
            .ok_or_else(|| format!("unsupported backup duration {hours}h, expected 4, 8, 12 or 24"))
    }
}

impl From<BackupHours> for u32 {
    fn from(b: BackupHours) -> Self {
        b.hours()
    }
}

impl FromStr for BackupHours {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hours = s
            .trim_end_matches('h')
            .parse::<u32>()
            .map_err(|_| format!("backup hours \"{s}\" is not a number"))?;
        Self::try_from(hours)
    }
}

/// One household's sizing request.
///
/// Exactly one of `monthly_kwh`, `monthly_bill` and `appliances` must be
/// given; the missing figures are derived through the effective rate.
/// Irradiance comes from `ghi_kwh_m2_day` when given, otherwise from
/// `location` through the irradiance resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingRequest {
    /// Reported monthly consumption (kWh).
    pub monthly_kwh: Option<f64>,
    /// Reported monthly electricity bill (currency).
    pub monthly_bill: Option<f64>,
    /// Appliance list to estimate consumption from.
    pub appliances: Vec<ApplianceUse>,
    /// Rate override (currency/kWh).
    pub rate: Option<f64>,
    /// Tariff category used to price a bill when no rate override is given.
    pub tariff_category: Option<String>,
    /// Location key for the irradiance resolver.
    pub location: Option<String>,
    /// Explicit irradiance (kWh/m²/day), bypasses the resolver.
    pub ghi_kwh_m2_day: Option<f64>,
    pub topology: SystemTopology,
    pub battery: BatteryType,
    pub backup_hours: BackupHours,
}

impl Default for SizingRequest {
    fn default() -> Self {
        Self {
            monthly_kwh: None,
            monthly_bill: None,
            appliances: Vec::new(),
            rate: None,
            tariff_category: None,
            location: None,
            ghi_kwh_m2_day: None,
            topology: SystemTopology::Hybrid,
            battery: BatteryType::Gel,
            backup_hours: BackupHours::H8,
        }
    }
}

impl SizingRequest {
    /// Reference household: 150 kWh/month at GHI 5.2, hybrid, lead-acid, 8h backup.
    pub fn baseline() -> Self {
        Self {
            monthly_kwh: Some(150.0),
            ghi_kwh_m2_day: Some(5.2),
            battery: BatteryType::LeadAcid,
            ..Self::default()
        }
    }
}
