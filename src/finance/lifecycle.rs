//! Battery lifecycle cost over the analysis horizon.

use std::fmt;

use serde::Serialize;

use crate::config::FinancePolicy;
use crate::request::BatteryType;
use crate::sizing::battery::BatteryBankConfig;

/// Ownership cost of the bank beyond its purchase price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryLifecycle {
    pub cycle_life: u32,
    pub warranty_years: u32,
    /// Full replacements needed within the horizon.
    pub replacements: u32,
    pub replacement_cost: f64,
    pub annual_maintenance: f64,
    pub maintenance_cost: f64,
    /// Purchase, replacements and maintenance combined.
    pub total_cost: f64,
    /// Total cost per usable kWh cycled over the horizon.
    pub levelized_cost_per_kwh: f64,
}

/// Projects ownership cost of `bank` bought at `initial_cost`.
///
/// Each replacement is priced `battery_replacement_decline` below the one
/// before it.
pub fn project_lifecycle(
    bank: &BatteryBankConfig,
    initial_cost: f64,
    policy: &FinancePolicy,
) -> BatteryLifecycle {
    let d = policy.battery_durability.get(bank.chemistry.family());
    let years = f64::from(policy.analysis_years);
    let total_cycles = policy.battery_daily_cycles * 365.0 * years;
    let replacements = (total_cycles / f64::from(d.cycle_life)).floor() as u32;

    let retained = 1.0 - policy.battery_replacement_decline;
    let replacement_cost: f64 = (1..=replacements)
        .map(|i| initial_cost * retained.powi(i as i32))
        .sum();
    let annual_maintenance = initial_cost * d.maintenance_rate;
    let maintenance_cost = annual_maintenance * years;
    let total_cost = initial_cost + replacement_cost + maintenance_cost;

    let kwh_cycled = bank.usable_capacity_kwh * total_cycles;
    let levelized_cost_per_kwh = if kwh_cycled > 0.0 {
        total_cost / kwh_cycled
    } else {
        0.0
    };

    BatteryLifecycle {
        cycle_life: d.cycle_life,
        warranty_years: d.warranty_years,
        replacements,
        replacement_cost,
        annual_maintenance,
        maintenance_cost,
        total_cost,
        levelized_cost_per_kwh,
    }
}

/// One candidate bank with its purchase price and ownership cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryOption {
    pub bank: BatteryBankConfig,
    pub initial_cost: f64,
    pub lifecycle: BatteryLifecycle,
}

/// Lithium and lead-acid banks for the same backup target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryComparison {
    pub lithium: BatteryOption,
    pub lead_acid: BatteryOption,
    /// Lead-acid lifecycle cost minus lithium's; negative when lead-acid is cheaper.
    pub savings_with_lithium: f64,
    /// Family with the lower lifecycle cost; lead-acid on a tie.
    pub better: BatteryType,
}

pub fn compare_lifecycles(lithium: BatteryOption, lead_acid: BatteryOption) -> BatteryComparison {
    let savings_with_lithium = lead_acid.lifecycle.total_cost - lithium.lifecycle.total_cost;
    let better = if lithium.lifecycle.total_cost < lead_acid.lifecycle.total_cost {
        BatteryType::Lithium
    } else {
        BatteryType::LeadAcid
    };
    BatteryComparison {
        lithium,
        lead_acid,
        savings_with_lithium,
        better,
    }
}

impl fmt::Display for BatteryComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<22} {:>12} {:>6} {:>12} {:>14}",
            "Bank", "Purchase", "Repl.", "Lifecycle", "Cost/kWh"
        )?;
        for option in [&self.lithium, &self.lead_acid] {
            let bank = &option.bank;
            writeln!(
                f,
                "{:<22} {:>12.2} {:>6} {:>12.2} {:>14.2}",
                format!("{} × {}", bank.total_units, bank.unit_capacity),
                option.initial_cost,
                option.lifecycle.replacements,
                option.lifecycle.total_cost,
                option.lifecycle.levelized_cost_per_kwh
            )?;
        }
        write!(
            f,
            "Savings with lithium:  {:.2} ({} is cheaper to own)",
            self.savings_with_lithium, self.better
        )
    }
}
