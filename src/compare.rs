//! Side-by-side sizing: reduced, requested and increased consumption, or
//! lithium against lead-acid storage for the same household.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::catalog::{IrradianceResolver, PriceTable, TariffResolver};
use crate::engine::Engine;
use crate::error::SizingError;
use crate::finance::cost::CostComponent;
use crate::finance::lifecycle::{BatteryComparison, BatteryOption, compare_lifecycles};
use crate::report::SizingReport;
use crate::request::{BatteryType, SizingRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeOption {
    Conservative,
    Recommended,
    Aggressive,
}

impl SizeOption {
    pub const ALL: [Self; 3] = [Self::Conservative, Self::Recommended, Self::Aggressive];

    /// Consumption multiplier applied to the request.
    pub fn factor(self) -> f64 {
        match self {
            Self::Conservative => 0.7,
            Self::Recommended => 1.0,
            Self::Aggressive => 1.3,
        }
    }
}

impl fmt::Display for SizeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Conservative => "Conservative",
            Self::Recommended => "Recommended",
            Self::Aggressive => "Aggressive",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparedOption {
    pub option: SizeOption,
    pub report: SizingReport,
}

/// Three complete reports for the same household.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeComparison {
    pub options: Vec<ComparedOption>,
}

impl SizeComparison {
    pub fn get(&self, option: SizeOption) -> Option<&SizingReport> {
        self.options
            .iter()
            .find(|o| o.option == option)
            .map(|o| &o.report)
    }
}

impl<I, P, T> Engine<I, P, T>
where
    I: IrradianceResolver,
    P: PriceTable,
    T: TariffResolver,
{
    /// Sizes the request at every [`SizeOption`].
    ///
    /// # Errors
    ///
    /// Fails if any of the three runs fails; the aggressive option is the
    /// usual casualty when the array outgrows the inverter ladder.
    pub fn compare(&self, request: &SizingRequest) -> Result<SizeComparison, SizingError> {
        let options = SizeOption::ALL
            .into_iter()
            .map(|option| {
                self.run_scaled(request, option.factor())
                    .map(|report| ComparedOption { option, report })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SizeComparison { options })
    }

    /// Sizes the request on lithium and on lead-acid storage and compares
    /// what each bank costs to own over the analysis horizon.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on field `topology` for grid-tied requests, otherwise
    /// whatever either run fails with.
    pub fn compare_batteries(
        &self,
        request: &SizingRequest,
    ) -> Result<BatteryComparison, SizingError> {
        if !request.topology.requires_battery() {
            return Err(SizingError::invalid(
                "topology",
                format!("{} systems carry no battery to compare", request.topology),
            ));
        }
        let option = |battery: BatteryType| -> Result<BatteryOption, SizingError> {
            let report = self.run(&SizingRequest {
                battery,
                ..request.clone()
            })?;
            match (report.battery, report.costs.get(CostComponent::Battery), report.lifecycle) {
                (Some(bank), Some(initial_cost), Some(lifecycle)) => Ok(BatteryOption {
                    bank,
                    initial_cost,
                    lifecycle,
                }),
                _ => Err(SizingError::invalid(
                    "battery",
                    format!("{battery} run produced no battery bank"),
                )),
            }
        };
        let comparison = compare_lifecycles(option(BatteryType::Lithium)?, option(BatteryType::LeadAcid)?);
        info!(
            savings_with_lithium = comparison.savings_with_lithium,
            better = %comparison.better,
            "battery lifecycles compared"
        );
        Ok(comparison)
    }
}

impl fmt::Display for SizeComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<14} {:>8} {:>7} {:>9} {:>12} {:>9}",
            "Option", "kWh/mo", "Panels", "Inverter", "Total", "Payback"
        )?;
        for o in &self.options {
            let r = &o.report;
            writeln!(
                f,
                "{:<14} {:>8.1} {:>7} {:>7} kW {:>12.2} {:>7.1} y",
                o.option.to_string(),
                r.profile.monthly_kwh,
                r.system.panel_count,
                r.system.inverter_kw,
                r.costs.total(),
                r.roi.payback_years
            )?;
        }
        Ok(())
    }
}
