//! ROI projector: generation, savings, payback and discounted cash flows.

use serde::Serialize;
use tracing::debug;

use crate::config::FinancePolicy;
use crate::finance::cost::{CostBreakdown, CostComponent};

/// One projection year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlow {
    pub year: u32,
    pub savings: f64,
    /// Equipment bought back this year (inverter replacement).
    pub replacement_cost: f64,
    /// `(savings - replacement_cost) / (1 + r)^year`.
    pub discounted: f64,
    /// Running NPV, starting from `-total` in year zero.
    pub cumulative: f64,
}

/// Financial projection of the installed system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiProjection {
    pub annual_generation_kwh: f64,
    pub annual_consumption_kwh: f64,
    /// Grid energy displaced, capped at consumption, priced at the effective rate.
    pub annual_savings: f64,
    /// Simple payback (years).
    pub payback_years: f64,
    pub npv: f64,
    pub coverage_ratio: f64,
    pub cost_per_watt: f64,
    pub cash_flows: Vec<CashFlow>,
}

/// Inputs the projection reads from earlier pipeline stages.
#[derive(Debug, Clone, Copy)]
pub struct RoiInputs {
    pub actual_kw: f64,
    pub ghi_kwh_m2_day: f64,
    pub performance_ratio: f64,
    pub monthly_kwh: f64,
    pub effective_rate: f64,
}

/// Projects the system over `policy.analysis_years`.
///
/// The inverter is bought again in `policy.inverter_replacement_year` at the
/// price on `costs`.
pub fn project_roi(inputs: RoiInputs, costs: &CostBreakdown, policy: &FinancePolicy) -> RoiProjection {
    let annual_generation_kwh =
        inputs.actual_kw * inputs.ghi_kwh_m2_day * inputs.performance_ratio * 365.0;
    let annual_consumption_kwh = inputs.monthly_kwh * 12.0;
    let annual_savings = annual_generation_kwh.min(annual_consumption_kwh) * inputs.effective_rate;

    let total = costs.total();
    let inverter_price = costs.get(CostComponent::Inverter).unwrap_or(0.0);
    let discount = 1.0 + policy.discount_rate;

    let mut cumulative = -total;
    let cash_flows: Vec<CashFlow> = (1..=policy.analysis_years)
        .map(|year| {
            let replacement_cost = if year == policy.inverter_replacement_year {
                inverter_price
            } else {
                0.0
            };
            let discounted = (annual_savings - replacement_cost) / discount.powf(f64::from(year));
            cumulative += discounted;
            CashFlow {
                year,
                savings: annual_savings,
                replacement_cost,
                discounted,
                cumulative,
            }
        })
        .collect();
    let npv = cumulative;

    let projection = RoiProjection {
        annual_generation_kwh,
        annual_consumption_kwh,
        annual_savings,
        payback_years: total / annual_savings,
        npv,
        coverage_ratio: annual_generation_kwh / annual_consumption_kwh,
        cost_per_watt: costs.cost_per_watt(inputs.actual_kw),
        cash_flows,
    };
    debug!(
        annual_generation_kwh,
        annual_savings,
        payback_years = projection.payback_years,
        npv,
        "roi projected"
    );
    projection
}
