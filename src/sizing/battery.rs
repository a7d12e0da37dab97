//! Battery bank configurator.
//!
//! Turns a backup-energy target into a bank built only from purchasable unit
//! sizes and wired to the inverter's bus voltage. Ah-rated units are laid out
//! as `series_count × parallel_strings`; integrated lithium modules carry
//! their own internal wiring and are only counted.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ceil_count;
use crate::config::BatteryPolicy;
use crate::error::SizingError;
use crate::request::{BackupHours, BatteryType, SystemTopology};

/// Resolved battery chemistry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chemistry {
    LeadAcid,
    Gel,
    /// Lithium sold as 12 V Ah-rated units.
    LithiumAh,
    /// Lithium sold as integrated kWh modules.
    LithiumKwh,
}

impl Chemistry {
    /// Resolves the requested battery family against the backup target.
    ///
    /// Lithium below `kwh_threshold` uses Ah-rated units, at or above it
    /// integrated modules.
    pub fn resolve(battery: BatteryType, backup_energy_kwh: f64, kwh_threshold: f64) -> Self {
        match battery {
            BatteryType::LeadAcid => Self::LeadAcid,
            BatteryType::Gel => Self::Gel,
            BatteryType::Lithium if backup_energy_kwh < kwh_threshold => Self::LithiumAh,
            BatteryType::Lithium => Self::LithiumKwh,
        }
    }

    /// Battery family this chemistry was resolved from.
    pub fn family(self) -> BatteryType {
        match self {
            Self::LeadAcid => BatteryType::LeadAcid,
            Self::Gel => BatteryType::Gel,
            Self::LithiumAh | Self::LithiumKwh => BatteryType::Lithium,
        }
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LeadAcid => "Lead-Acid",
            Self::Gel => "Gel",
            Self::LithiumAh => "Lithium (Ah)",
            Self::LithiumKwh => "Lithium (kWh module)",
        })
    }
}

/// Capacity of one physical unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCapacity {
    AmpHours(u32),
    KilowattHours(f64),
}

impl UnitCapacity {
    /// Stored energy of one unit (kWh).
    pub fn energy_kwh(self, unit_voltage: u32) -> f64 {
        match self {
            Self::AmpHours(ah) => f64::from(ah) * f64::from(unit_voltage) / 1000.0,
            Self::KilowattHours(kwh) => kwh,
        }
    }
}

impl fmt::Display for UnitCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmpHours(ah) => write!(f, "{ah}Ah"),
            Self::KilowattHours(kwh) => write!(f, "{kwh}kWh"),
        }
    }
}

/// DC bus voltage, fixed by the inverter rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusVoltage {
    V12,
    V24,
    V48,
}

impl BusVoltage {
    /// Bus voltage required by an inverter of `inverter_kw`.
    ///
    /// Below 1.5 kW runs at 12 V, 1.5 kW up to and including 5 kW at 24 V,
    /// anything larger at 48 V.
    pub fn for_inverter(inverter_kw: f64) -> Self {
        if inverter_kw < 1.5 {
            Self::V12
        } else if inverter_kw <= 5.0 {
            Self::V24
        } else {
            Self::V48
        }
    }

    pub fn volts(self) -> u32 {
        match self {
            Self::V12 => 12,
            Self::V24 => 24,
            Self::V48 => 48,
        }
    }

    /// 12 V units in series needed to reach this bus voltage.
    pub fn series_count(self) -> u32 {
        match self {
            Self::V12 => 1,
            Self::V24 => 2,
            Self::V48 => 4,
        }
    }
}

/// Electrical arrangement of the bank's units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BankLayout {
    /// Ah-rated units wired in series strings, strings in parallel.
    Strings {
        series_count: u32,
        parallel_strings: u32,
    },
    /// Integrated modules at the bus voltage.
    Modules { module_count: u32 },
}

impl BankLayout {
    pub fn total_units(self) -> u32 {
        match self {
            Self::Strings {
                series_count,
                parallel_strings,
            } => series_count * parallel_strings,
            Self::Modules { module_count } => module_count,
        }
    }
}

impl fmt::Display for BankLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strings {
                series_count,
                parallel_strings: 1,
            } => write!(f, "{series_count}S"),
            Self::Strings {
                series_count,
                parallel_strings,
            } => write!(f, "{parallel_strings}P{series_count}S"),
            Self::Modules { module_count } => write!(f, "{module_count} modules"),
        }
    }
}

/// A purchasable, wireable battery bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryBankConfig {
    pub chemistry: Chemistry,
    /// DC bus voltage (V).
    pub system_voltage: u32,
    pub layout: BankLayout,
    /// Capacity of each physical unit.
    pub unit_capacity: UnitCapacity,
    /// Physical units to buy.
    pub total_units: u32,
    /// Energy the bank was sized to hold (kWh).
    pub backup_energy_kwh: f64,
    /// Combined rated energy of every unit (kWh).
    pub nominal_capacity_kwh: f64,
    /// Nominal capacity after depth of discharge (kWh).
    pub usable_capacity_kwh: f64,
    pub depth_of_discharge: f64,
}

/// Setting the backup target was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupBasis {
    /// Request's `backup_hours` window.
    Hours,
    /// Policy's off-grid autonomy days.
    AutonomyDays,
}

impl BackupBasis {
    /// Field to blame when no bank can hold the target.
    pub fn field(self) -> &'static str {
        match self {
            Self::Hours => "backup_hours",
            Self::AutonomyDays => "battery.off_grid_autonomy_days",
        }
    }
}

/// Energy the bank must hold and what set it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackupTarget {
    pub energy_kwh: f64,
    pub basis: BackupBasis,
}

impl BackupTarget {
    pub fn hours(energy_kwh: f64) -> Self {
        Self {
            energy_kwh,
            basis: BackupBasis::Hours,
        }
    }

    pub fn autonomy(energy_kwh: f64) -> Self {
        Self {
            energy_kwh,
            basis: BackupBasis::AutonomyDays,
        }
    }
}

/// Energy the bank must hold for the requested topology.
///
/// Hybrid systems cover `backup_hours` of average load; off-grid systems
/// cover `policy.off_grid_autonomy_days` full days.
pub fn backup_target(
    daily_consumption_kwh: f64,
    topology: SystemTopology,
    backup_hours: BackupHours,
    policy: &BatteryPolicy,
) -> BackupTarget {
    match topology {
        SystemTopology::OffGrid => {
            BackupTarget::autonomy(daily_consumption_kwh * policy.off_grid_autonomy_days)
        }
        SystemTopology::GridTied | SystemTopology::Hybrid => {
            BackupTarget::hours(daily_consumption_kwh / 24.0 * f64::from(backup_hours.hours()))
        }
    }
}

/// Smallest ladder unit covering `required_ah`, or parallel strings of the
/// ceiling unit when no single unit does.
fn select_ah_unit(required_ah: f64, ladder: &[u32], ceiling: u32) -> (u32, u32) {
    if required_ah > f64::from(ceiling) {
        return (ceiling, ceil_count(required_ah / f64::from(ceiling)));
    }
    let unit = ladder
        .iter()
        .copied()
        .filter(|&ah| ah <= ceiling)
        .find(|&ah| f64::from(ah) >= required_ah)
        .unwrap_or(ceiling);
    (unit, 1)
}

/// Module size with the least surplus energy among layouts within
/// `max_modules`; ties go to fewer modules.
fn select_module(target_kwh: f64, ladder: &[f64], max_modules: u32) -> Result<(f64, u32), u32> {
    let mut best: Option<(f64, u32, f64)> = None;
    for &size in ladder {
        let count = ceil_count(target_kwh / size);
        if count > max_modules {
            continue;
        }
        let waste = f64::from(count) * size - target_kwh;
        let better = match best {
            None => true,
            Some((_, best_count, best_waste)) => {
                waste < best_waste - 1e-9 || ((waste - best_waste).abs() <= 1e-9 && count < best_count)
            }
        };
        if better {
            best = Some((size, count, waste));
        }
    }
    match best {
        Some((size, count, _)) => Ok((size, count)),
        None => {
            let largest = ladder.last().copied().unwrap_or(1.0);
            Err(ceil_count(target_kwh / largest))
        }
    }
}

/// Configures a bank holding `target` behind an `inverter_kw` inverter.
///
/// With `policy.size_for_depth_of_discharge` the target is grossed up by the
/// family's depth of discharge before the lithium unit type is chosen.
///
/// # Errors
///
/// * `InvalidInput` if the backup energy is not a positive number.
/// * `UnsupportedBackupTarget` if the layout needs more than
///   `policy.max_parallel_strings` strings or modules.
pub fn configure_bank(
    target: BackupTarget,
    battery: BatteryType,
    inverter_kw: f64,
    policy: &BatteryPolicy,
) -> Result<BatteryBankConfig, SizingError> {
    let backup_energy_kwh = target.energy_kwh;
    if !(backup_energy_kwh.is_finite() && backup_energy_kwh > 0.0) {
        return Err(SizingError::invalid(
            "backup_energy_kwh",
            format!("must be > 0, got {backup_energy_kwh}"),
        ));
    }

    let dod = *policy.depth_of_discharge.get(battery);
    let target_kwh = if policy.size_for_depth_of_discharge {
        backup_energy_kwh / dod
    } else {
        backup_energy_kwh
    };
    let chemistry = Chemistry::resolve(battery, target_kwh, policy.lithium_kwh_threshold);
    let bus = BusVoltage::for_inverter(inverter_kw);

    let unsupported = |needed: u32| SizingError::UnsupportedBackupTarget {
        field: target.basis.field(),
        backup_kwh: target_kwh,
        chemistry,
        needed,
        max_strings: policy.max_parallel_strings,
    };

    let (layout, unit_capacity) = match chemistry {
        Chemistry::LeadAcid | Chemistry::Gel | Chemistry::LithiumAh => {
            let (ladder, ceiling) = match chemistry {
                Chemistry::LithiumAh => (
                    policy.lithium_ah_ladder.as_slice(),
                    policy.lithium_ah_ladder.last().copied().unwrap_or(0),
                ),
                _ => (policy.lead_acid_ah_ladder.as_slice(), policy.lead_acid_max_ah),
            };
            let required_ah = target_kwh * 1000.0 / f64::from(policy.unit_voltage);
            let (unit_ah, parallel_strings) = select_ah_unit(required_ah, ladder, ceiling);
            if parallel_strings > policy.max_parallel_strings {
                return Err(unsupported(parallel_strings));
            }
            (
                BankLayout::Strings {
                    series_count: bus.series_count(),
                    parallel_strings,
                },
                UnitCapacity::AmpHours(unit_ah),
            )
        }
        Chemistry::LithiumKwh => {
            let (size, module_count) =
                select_module(target_kwh, &policy.lithium_kwh_ladder, policy.max_parallel_strings)
                    .map_err(unsupported)?;
            (
                BankLayout::Modules { module_count },
                UnitCapacity::KilowattHours(size),
            )
        }
    };

    let total_units = layout.total_units();
    let nominal_capacity_kwh = unit_capacity.energy_kwh(policy.unit_voltage) * f64::from(total_units);

    debug!(
        %chemistry,
        backup_energy_kwh,
        system_voltage = bus.volts(),
        %layout,
        %unit_capacity,
        total_units,
        "battery bank configured"
    );

    Ok(BatteryBankConfig {
        chemistry,
        system_voltage: bus.volts(),
        layout,
        unit_capacity,
        total_units,
        backup_energy_kwh,
        nominal_capacity_kwh,
        usable_capacity_kwh: nominal_capacity_kwh * dod,
        depth_of_discharge: dod,
    })
}
