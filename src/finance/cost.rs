//! Cost aggregator: equipment prices and percentage rules into an itemized total.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::catalog::PriceTable;
use crate::config::CostPolicy;
use crate::error::SizingError;
use crate::sizing::SystemSizeSpec;
use crate::sizing::battery::BatteryBankConfig;

/// Line item of the installation quote, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostComponent {
    Panels,
    Inverter,
    Battery,
    Vat,
    Mounting,
    Bos,
    Labor,
    SafetyEarthing,
}

impl CostComponent {
    pub fn label(self) -> &'static str {
        match self {
            Self::Panels => "Panels",
            Self::Inverter => "Inverter",
            Self::Battery => "Battery",
            Self::Vat => "VAT",
            Self::Mounting => "Mounting",
            Self::Bos => "BOS/Accessories",
            Self::Labor => "Installation Labor",
            Self::SafetyEarthing => "Safety & Earthing",
        }
    }
}

impl fmt::Display for CostComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Itemized installation cost.
///
/// Only built by [`aggregate_costs`], so `total` is always the sum of the
/// listed lines in their listed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    lines: IndexMap<CostComponent, f64>,
    total: f64,
}

impl CostBreakdown {
    fn from_lines(lines: IndexMap<CostComponent, f64>) -> Self {
        let total = lines.values().sum();
        Self { lines, total }
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Lines in display order.
    pub fn lines(&self) -> impl Iterator<Item = (CostComponent, f64)> + '_ {
        self.lines.iter().map(|(c, v)| (*c, *v))
    }

    pub fn get(&self, component: CostComponent) -> Option<f64> {
        self.lines.get(&component).copied()
    }

    /// Fraction of the total taken by `component` (0 when absent).
    pub fn share(&self, component: CostComponent) -> f64 {
        match self.get(component) {
            Some(v) if self.total > 0.0 => v / self.total,
            _ => 0.0,
        }
    }

    /// Installed cost per watt of array capacity.
    pub fn cost_per_watt(&self, actual_kw: f64) -> f64 {
        self.total / (actual_kw * 1000.0)
    }
}

/// Prices the system and applies the installation cost rules.
///
/// The Battery line is present only when `battery` is `Some`.
///
/// # Errors
///
/// Returns `PriceNotFound` if any selected size is missing from `prices`.
pub fn aggregate_costs<P: PriceTable>(
    system: &SystemSizeSpec,
    battery: Option<&BatteryBankConfig>,
    prices: &P,
    policy: &CostPolicy,
) -> Result<CostBreakdown, SizingError> {
    let panels = f64::from(system.panel_count) * prices.panel_price(system.panel_wattage_w)?;
    let inverter = prices.inverter_price(system.inverter_kw)?;
    let battery_cost = battery
        .map(|bank| {
            prices
                .battery_unit_price(bank.chemistry, bank.unit_capacity)
                .map(|unit| f64::from(bank.total_units) * unit)
        })
        .transpose()?;

    let equipment = panels + inverter;

    let mut lines = IndexMap::new();
    lines.insert(CostComponent::Panels, panels);
    lines.insert(CostComponent::Inverter, inverter);
    if let Some(cost) = battery_cost {
        lines.insert(CostComponent::Battery, cost);
    }
    lines.insert(CostComponent::Vat, equipment * policy.vat_rate);
    lines.insert(
        CostComponent::Mounting,
        f64::from(system.panel_count) * policy.mounting_per_panel,
    );
    lines.insert(CostComponent::Bos, equipment * policy.bos_rate);
    lines.insert(
        CostComponent::Labor,
        policy.labor_base + policy.labor_per_kw * system.actual_kw,
    );
    lines.insert(CostComponent::SafetyEarthing, policy.safety_earthing);

    let breakdown = CostBreakdown::from_lines(lines);
    debug!(total = breakdown.total, lines = breakdown.lines.len(), "costs aggregated");
    Ok(breakdown)
}
