//! Sizing engine: resolves collaborator inputs, then runs the pipeline.

use tracing::{debug, info, warn};

use crate::catalog::{IrradianceResolver, IrradianceTable, PriceCatalog, PriceTable, TariffResolver};
use crate::config::{PolicyConfig, ScenarioConfig};
use crate::error::SizingError;
use crate::finance::cost::{CostComponent, aggregate_costs};
use crate::finance::environment::project_impact;
use crate::finance::lifecycle::project_lifecycle;
use crate::finance::roi::{RoiInputs, project_roi};
use crate::report::{ResolvedIrradiance, SizingReport};
use crate::request::SizingRequest;
use crate::sizing::appliances::estimate_appliance_load;
use crate::sizing::battery::{backup_target, configure_bank};
use crate::sizing::load::{Consumption, EnergyProfile, estimate_load};
use crate::sizing::size_system;
use crate::tariff::TariffSchedule;

/// Engine over the in-memory reference tables.
pub type TableEngine = Engine<IrradianceTable, PriceCatalog, TariffSchedule>;

/// Sizing engine owning the policy and its reference-data collaborators.
///
/// Generic over the resolvers for static dispatch. Holds no per-request
/// state: [`Engine::run`] takes `&self` and every call builds a fresh report.
#[derive(Debug, Clone)]
pub struct Engine<I, P, T> {
    policy: PolicyConfig,
    irradiance: I,
    prices: P,
    tariff: T,
    irradiance_fallback: Option<f64>,
}

impl TableEngine {
    /// Builds an engine from a scenario's policy and reference tables.
    pub fn from_scenario(scenario: &ScenarioConfig) -> Self {
        Self::new(
            scenario.policy.clone(),
            scenario.references.irradiance.clone(),
            scenario.references.prices.clone(),
            scenario.references.tariff.clone(),
        )
    }
}

impl<I, P, T> Engine<I, P, T>
where
    I: IrradianceResolver,
    P: PriceTable,
    T: TariffResolver,
{
    pub fn new(policy: PolicyConfig, irradiance: I, prices: P, tariff: T) -> Self {
        Self {
            policy,
            irradiance,
            prices,
            tariff,
            irradiance_fallback: None,
        }
    }

    /// Uses `ghi_kwh_m2_day` for locations the resolver does not know
    /// instead of failing with `LocationNotFound`.
    pub fn with_irradiance_fallback(mut self, ghi_kwh_m2_day: f64) -> Self {
        self.irradiance_fallback = Some(ghi_kwh_m2_day);
        self
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Rate override, then tariff category, then the consumption tier for a
    /// known kWh figure, then the policy default.
    ///
    /// Returns the rate and the tariff category it came from.
    fn resolve_rate(
        &self,
        request: &SizingRequest,
        consumption: Consumption,
    ) -> Result<(f64, Option<String>), SizingError> {
        if let Some(rate) = request.rate {
            return Ok((rate, None));
        }
        if let Some(category) = &request.tariff_category {
            let rate = self.tariff.resolve(category)?;
            debug!(category = category.as_str(), rate, "tariff resolved");
            return Ok((rate, Some(category.clone())));
        }
        let tier_bill = match consumption.monthly_kwh() {
            Some(monthly_kwh) => self.tariff.bill(monthly_kwh)?,
            None => None,
        };
        if let Some(bill) = tier_bill {
            debug!(
                category = bill.category.as_str(),
                rate = bill.effective_rate,
                monthly_cost = bill.monthly_cost,
                "tariff tier picked by consumption"
            );
            return Ok((bill.effective_rate, Some(bill.category)));
        }
        Ok((self.policy.load.default_rate, None))
    }

    fn resolve_irradiance(&self, request: &SizingRequest) -> Result<ResolvedIrradiance, SizingError> {
        if let Some(ghi) = request.ghi_kwh_m2_day {
            return Ok(ResolvedIrradiance {
                ghi_kwh_m2_day: ghi,
                location: request.location.clone(),
                fallback: false,
            });
        }
        let Some(location) = request.location.as_deref() else {
            return Err(SizingError::invalid(
                "location",
                "either location or ghi_kwh_m2_day is required",
            ));
        };
        match (self.irradiance.resolve(location), self.irradiance_fallback) {
            (Ok(ghi), _) => Ok(ResolvedIrradiance {
                ghi_kwh_m2_day: ghi,
                location: Some(location.to_string()),
                fallback: false,
            }),
            (Err(SizingError::LocationNotFound(_)), Some(ghi)) => {
                warn!(location, ghi, "no irradiance data for location, using default");
                Ok(ResolvedIrradiance {
                    ghi_kwh_m2_day: ghi,
                    location: Some(location.to_string()),
                    fallback: true,
                })
            }
            (Err(e), _) => Err(e),
        }
    }

    /// Runs the full pipeline for one request.
    ///
    /// # Errors
    ///
    /// Returns the first `SizingError` raised by any stage; no partial
    /// report is produced.
    pub fn run(&self, request: &SizingRequest) -> Result<SizingReport, SizingError> {
        self.run_scaled(request, 1.0)
    }

    /// Runs the pipeline with the request's consumption multiplied by `factor`.
    pub(crate) fn run_scaled(
        &self,
        request: &SizingRequest,
        factor: f64,
    ) -> Result<SizingReport, SizingError> {
        let load = &self.policy.load;
        let appliance_kwh = (!request.appliances.is_empty())
            .then(|| estimate_appliance_load(&request.appliances, &load.appliances, load.days_per_month))
            .transpose()?;
        let consumption =
            Consumption::from_options(request.monthly_kwh, request.monthly_bill, appliance_kwh)?
                .scaled(factor);
        let (rate, tariff_category) = self.resolve_rate(request, consumption)?;
        let profile = EnergyProfile {
            tariff_category,
            ..estimate_load(consumption, rate, load)?
        };
        let irradiance = self.resolve_irradiance(request)?;
        let report = self.size(request, profile, irradiance)?;

        info!(
            topology = %request.topology,
            panels = report.system.panel_count,
            actual_kw = report.system.actual_kw,
            inverter_kw = report.system.inverter_kw,
            total = report.costs.total(),
            payback_years = report.roi.payback_years,
            "sizing complete"
        );
        Ok(report)
    }

    /// Sizing and costing over already-resolved inputs.
    fn size(
        &self,
        request: &SizingRequest,
        profile: EnergyProfile,
        irradiance: ResolvedIrradiance,
    ) -> Result<SizingReport, SizingError> {
        let policy = &self.policy;
        let system = size_system(profile.daily_consumption_kwh, irradiance.ghi_kwh_m2_day, policy)?;

        let battery = if request.topology.requires_battery() {
            let target = backup_target(
                profile.daily_consumption_kwh,
                request.topology,
                request.backup_hours,
                &policy.battery,
            );
            Some(configure_bank(target, request.battery, system.inverter_kw, &policy.battery)?)
        } else {
            None
        };

        let costs = aggregate_costs(&system, battery.as_ref(), &self.prices, &policy.costs)?;
        let roi = project_roi(
            RoiInputs {
                actual_kw: system.actual_kw,
                ghi_kwh_m2_day: irradiance.ghi_kwh_m2_day,
                performance_ratio: policy.panels.performance_ratio,
                monthly_kwh: profile.monthly_kwh,
                effective_rate: profile.effective_rate,
            },
            &costs,
            &policy.finance,
        );
        let lifecycle = battery.as_ref().map(|bank| {
            let initial = costs.get(CostComponent::Battery).unwrap_or(0.0);
            project_lifecycle(bank, initial, &policy.finance)
        });
        let environment = project_impact(
            roi.annual_generation_kwh,
            policy.finance.analysis_years,
            &policy.environment,
        );

        Ok(SizingReport {
            request: request.clone(),
            profile,
            irradiance,
            system,
            battery,
            costs,
            roi,
            lifecycle,
            environment,
        })
    }
}
