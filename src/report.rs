//! The single sizing result and the views projected from it.
//!
//! Every consumer (terminal output, CSV export, API, comparisons) reads a
//! [`SizingReport`]; views borrow from it rather than recomputing.

use std::fmt;

use serde::Serialize;

use crate::finance::cost::{CostBreakdown, CostComponent};
use crate::finance::environment::EnvironmentalImpact;
use crate::finance::lifecycle::BatteryLifecycle;
use crate::finance::roi::{CashFlow, RoiProjection};
use crate::request::{SizingRequest, SystemTopology};
use crate::sizing::SystemSizeSpec;
use crate::sizing::battery::BatteryBankConfig;
use crate::sizing::load::EnergyProfile;

/// Irradiance the run was sized against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedIrradiance {
    pub ghi_kwh_m2_day: f64,
    /// Location key it was resolved from; `None` when given directly.
    pub location: Option<String>,
    /// Whether the location was missing and the default value was used.
    pub fallback: bool,
}

/// Complete result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingReport {
    pub request: SizingRequest,
    pub profile: EnergyProfile,
    pub irradiance: ResolvedIrradiance,
    pub system: SystemSizeSpec,
    /// `None` for grid-tied systems.
    pub battery: Option<BatteryBankConfig>,
    pub costs: CostBreakdown,
    pub roi: RoiProjection,
    pub lifecycle: Option<BatteryLifecycle>,
    pub environment: EnvironmentalImpact,
}

/// Headline figures for a quick overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView<'a> {
    pub topology: SystemTopology,
    pub monthly_kwh: f64,
    pub panel_count: u32,
    pub panel_wattage_w: u32,
    pub actual_kw: f64,
    pub inverter_kw: f64,
    pub battery: Option<&'a BatteryBankConfig>,
    pub total_cost: f64,
    pub payback_years: f64,
}

/// Money-related figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialView<'a> {
    pub total_cost: f64,
    pub cost_per_watt: f64,
    pub annual_savings: f64,
    pub payback_years: f64,
    pub npv: f64,
    pub cash_flows: &'a [CashFlow],
    pub battery_lifecycle: Option<&'a BatteryLifecycle>,
}

/// One slice of the cost pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSlice {
    pub label: &'static str,
    pub amount: f64,
    pub share: f64,
}

impl SizingReport {
    pub fn summary(&self) -> SummaryView<'_> {
        SummaryView {
            topology: self.request.topology,
            monthly_kwh: self.profile.monthly_kwh,
            panel_count: self.system.panel_count,
            panel_wattage_w: self.system.panel_wattage_w,
            actual_kw: self.system.actual_kw,
            inverter_kw: self.system.inverter_kw,
            battery: self.battery.as_ref(),
            total_cost: self.costs.total(),
            payback_years: self.roi.payback_years,
        }
    }

    pub fn financial(&self) -> FinancialView<'_> {
        FinancialView {
            total_cost: self.costs.total(),
            cost_per_watt: self.roi.cost_per_watt,
            annual_savings: self.roi.annual_savings,
            payback_years: self.roi.payback_years,
            npv: self.roi.npv,
            cash_flows: &self.roi.cash_flows,
            battery_lifecycle: self.lifecycle.as_ref(),
        }
    }

    pub fn environmental(&self) -> &EnvironmentalImpact {
        &self.environment
    }

    /// Cost breakdown as pie slices in display order.
    pub fn cost_slices(&self) -> Vec<CostSlice> {
        self.costs
            .lines()
            .map(|(component, amount)| CostSlice {
                label: component.label(),
                amount,
                share: self.costs.share(component),
            })
            .collect()
    }

    /// Share of the quote spent on storage.
    pub fn battery_share(&self) -> f64 {
        self.costs.share(CostComponent::Battery)
    }
}

impl fmt::Display for SizingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.system;
        writeln!(f, "--- Sizing Report ({}) ---", self.request.topology)?;
        writeln!(
            f,
            "Consumption:           {:.1} kWh/month ({:.2} kWh/day) at {:.2}/kWh",
            self.profile.monthly_kwh, self.profile.daily_consumption_kwh, self.profile.effective_rate
        )?;
        if let Some(category) = &self.profile.tariff_category {
            writeln!(f, "Tariff:                {category}")?;
        }
        match &self.irradiance.location {
            Some(loc) if self.irradiance.fallback => writeln!(
                f,
                "Irradiance:            {:.2} kWh/m²/day ({loc}, default)",
                self.irradiance.ghi_kwh_m2_day
            )?,
            Some(loc) => writeln!(
                f,
                "Irradiance:            {:.2} kWh/m²/day ({loc})",
                self.irradiance.ghi_kwh_m2_day
            )?,
            None => writeln!(f, "Irradiance:            {:.2} kWh/m²/day", self.irradiance.ghi_kwh_m2_day)?,
        }
        writeln!(
            f,
            "Array:                 {} × {} W = {:.2} kW (needed {:.2} kW, {:.1} m²)",
            s.panel_count, s.panel_wattage_w, s.actual_kw, s.theoretical_kw, s.array_area_m2
        )?;
        writeln!(f, "Inverter:              {} kW", s.inverter_kw)?;
        match &self.battery {
            Some(b) => writeln!(
                f,
                "Battery:               {} × {} {} at {} V ({}), {:.2} kWh usable, {:.0}% of quote",
                b.total_units,
                b.unit_capacity,
                b.chemistry,
                b.system_voltage,
                b.layout,
                b.usable_capacity_kwh,
                self.battery_share() * 100.0
            )?,
            None => writeln!(f, "Battery:               none")?,
        }
        writeln!(f, "--- Costs ---")?;
        for (component, amount) in self.costs.lines() {
            writeln!(f, "{:<22} {:>12.2}", format!("{component}:"), amount)?;
        }
        writeln!(f, "{:<22} {:>12.2}", "Total:", self.costs.total())?;
        writeln!(f, "--- Returns ---")?;
        writeln!(
            f,
            "Generation:            {:.0} kWh/yr ({:.0}% of consumption)",
            self.roi.annual_generation_kwh,
            self.roi.coverage_ratio * 100.0
        )?;
        writeln!(f, "Annual savings:        {:.2}", self.roi.annual_savings)?;
        writeln!(f, "Payback:               {:.1} years", self.roi.payback_years)?;
        writeln!(f, "NPV:                   {:.2}", self.roi.npv)?;
        writeln!(f, "Cost per watt:         {:.2}", self.roi.cost_per_watt)?;
        write!(
            f,
            "CO₂ offset:            {:.2} t/yr ({:.0} trees)",
            self.environment.annual_co2_tonnes, self.environment.tree_equivalent
        )
    }
}
