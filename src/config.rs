//! TOML-based policy configuration, scenario files, and preset definitions.
//!
//! Standard-size ladders, percentage rules, and financial constants are local
//! market policy rather than engineering truths, so every one of them lives
//! here and can be overridden per scenario.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::ReferenceData;
use crate::request::{BatteryType, BackupHours, SizingRequest, SystemTopology};
use crate::sizing::appliances::{ApplianceSpec, catalog_key, standard_catalog};

/// Complete policy used by one pipeline run.
///
/// All sections default to the baseline market policy. Load from TOML with
/// [`PolicyConfig::from_toml_str`] or use [`PolicyConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub load: LoadPolicy,
    pub panels: PanelPolicy,
    pub inverter: InverterPolicy,
    pub battery: BatteryPolicy,
    pub costs: CostPolicy,
    pub finance: FinancePolicy,
    pub environment: EnvironmentPolicy,
    pub assessment: AssessmentPolicy,
}

/// Load estimation constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadPolicy {
    /// Average days per month used to derive daily load.
    pub days_per_month: f64,
    /// Reference electricity rate (currency/kWh) when the caller gives none.
    pub default_rate: f64,
    /// Standard appliances by catalog key (lowercase, `_`-joined).
    pub appliances: IndexMap<String, ApplianceSpec>,
}

impl Default for LoadPolicy {
    fn default() -> Self {
        Self {
            days_per_month: 30.44,
            default_rate: 20.0,
            appliances: standard_catalog(),
        }
    }
}

/// One value per battery family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerFamily<T> {
    pub lead_acid: T,
    pub gel: T,
    pub lithium: T,
}

impl<T> PerFamily<T> {
    pub fn get(&self, battery: BatteryType) -> &T {
        match battery {
            BatteryType::LeadAcid => &self.lead_acid,
            BatteryType::Gel => &self.gel,
            BatteryType::Lithium => &self.lithium,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (&'static str, &T)> {
        [
            ("lead_acid", &self.lead_acid),
            ("gel", &self.gel),
            ("lithium", &self.lithium),
        ]
        .into_iter()
    }
}

/// Panel sizing constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelPolicy {
    /// The single standard module rating (W).
    pub wattage_w: u32,
    /// Module conversion efficiency at standard test conditions (0..1).
    pub module_efficiency: f64,
    /// System performance ratio covering inverter, wiring and thermal losses (0..1).
    pub performance_ratio: f64,
}

impl Default for PanelPolicy {
    fn default() -> Self {
        Self {
            wattage_w: 450,
            module_efficiency: 0.18,
            performance_ratio: 0.75,
        }
    }
}

/// Standard inverter ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InverterPolicy {
    /// Ascending ladder of purchasable ratings (kW).
    pub ladder_kw: Vec<f64>,
}

impl Default for InverterPolicy {
    fn default() -> Self {
        Self {
            ladder_kw: vec![1.5, 3.0, 5.0, 8.0, 10.0],
        }
    }
}

/// Battery bank layout constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryPolicy {
    /// Nominal voltage of every Ah-rated physical unit (V).
    pub unit_voltage: u32,
    /// Lead-acid and gel unit sizes (Ah), ascending.
    pub lead_acid_ah_ladder: Vec<u32>,
    /// Largest lead-acid or gel unit ever proposed (Ah).
    pub lead_acid_max_ah: u32,
    /// Ah-rated lithium unit sizes, ascending.
    pub lithium_ah_ladder: Vec<u32>,
    /// Integrated lithium module sizes (kWh), ascending.
    pub lithium_kwh_ladder: Vec<f64>,
    /// Backup energy at or above which lithium switches to kWh modules.
    pub lithium_kwh_threshold: f64,
    /// Upper bound on parallel strings (or modules) in one bank.
    pub max_parallel_strings: u32,
    /// Days of autonomy an off-grid bank must cover.
    pub off_grid_autonomy_days: f64,
    /// Usable fraction of nominal capacity before voltage cutoff.
    pub depth_of_discharge: PerFamily<f64>,
    /// Divide the backup target by the family's depth of discharge.
    pub size_for_depth_of_discharge: bool,
}

impl Default for BatteryPolicy {
    fn default() -> Self {
        Self {
            unit_voltage: 12,
            lead_acid_ah_ladder: vec![50, 80, 100, 120, 150, 200],
            lead_acid_max_ah: 200,
            lithium_ah_ladder: vec![50, 100, 150, 200, 300],
            lithium_kwh_ladder: vec![2.56, 5.12, 7.68, 10.24, 15.36, 20.48],
            lithium_kwh_threshold: 2.5,
            max_parallel_strings: 20,
            off_grid_autonomy_days: 2.0,
            depth_of_discharge: PerFamily {
                lead_acid: 0.5,
                gel: 0.6,
                lithium: 0.9,
            },
            size_for_depth_of_discharge: false,
        }
    }
}

/// Installation cost rules. Every amount is in the local currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostPolicy {
    /// VAT applied to panels + inverter.
    pub vat_rate: f64,
    /// Balance-of-system share of panels + inverter.
    pub bos_rate: f64,
    /// Mounting hardware per panel.
    pub mounting_per_panel: f64,
    /// Fixed electrical installation charge.
    pub labor_base: f64,
    /// Electrical installation charge per installed kW.
    pub labor_per_kw: f64,
    /// Earthing kit, surge protection and lightning arrestor.
    pub safety_earthing: f64,
}

impl Default for CostPolicy {
    fn default() -> Self {
        Self {
            vat_rate: 0.16,
            bos_rate: 0.08,
            mounting_per_panel: 3_000.0,
            labor_base: 5_000.0,
            labor_per_kw: 2_000.0,
            safety_earthing: 3_500.0 + 6_000.0 + 4_500.0,
        }
    }
}

/// Discounting and lifecycle constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinancePolicy {
    pub discount_rate: f64,
    /// Projection horizon (years).
    pub analysis_years: u32,
    /// Year in which the inverter is replaced at its breakdown price.
    pub inverter_replacement_year: u32,
    /// Average full battery cycles per day.
    pub battery_daily_cycles: f64,
    /// Price decline of each successive battery replacement (0..1).
    pub battery_replacement_decline: f64,
    pub battery_durability: PerFamily<BatteryDurability>,
}

/// Wear and upkeep profile of a battery family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryDurability {
    /// Full cycles before the bank must be replaced.
    pub cycle_life: u32,
    pub warranty_years: u32,
    /// Yearly maintenance as a share of the purchase price.
    pub maintenance_rate: f64,
}

impl BatteryDurability {
    const LEAD_BASED: Self = Self {
        cycle_life: 1_500,
        warranty_years: 3,
        maintenance_rate: 0.02,
    };
}

impl Default for FinancePolicy {
    fn default() -> Self {
        Self {
            discount_rate: 0.08,
            analysis_years: 25,
            inverter_replacement_year: 10,
            battery_daily_cycles: 1.0,
            battery_replacement_decline: 0.10,
            battery_durability: PerFamily {
                lead_acid: BatteryDurability::LEAD_BASED,
                gel: BatteryDurability::LEAD_BASED,
                lithium: BatteryDurability {
                    cycle_life: 6_000,
                    warranty_years: 10,
                    maintenance_rate: 0.005,
                },
            },
        }
    }
}

/// Grid emission equivalences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentPolicy {
    /// Grid emission factor (kg CO₂ per kWh displaced).
    pub grid_emission_kg_per_kwh: f64,
    /// Trees whose yearly uptake equals one tonne of CO₂.
    pub trees_per_tonne: f64,
    /// Car kilometres emitting one tonne of CO₂.
    pub car_km_per_tonne: f64,
}

impl Default for EnvironmentPolicy {
    fn default() -> Self {
        Self {
            grid_emission_kg_per_kwh: 0.4087,
            trees_per_tonne: 50.0,
            car_km_per_tonne: 5_000.0,
        }
    }
}

/// Plausibility ranges for the report assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssessmentPolicy {
    /// Installed cost per watt outside of which a quote is implausible.
    pub cost_per_watt_valid: [f64; 2],
    /// Installed cost per watt of a typical market quote.
    pub cost_per_watt_typical: [f64; 2],
}

impl Default for AssessmentPolicy {
    fn default() -> Self {
        Self {
            cost_per_watt_valid: [55.0, 150.0],
            cost_per_watt_typical: [70.0, 110.0],
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field} - {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"panels.wattage_w"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn check_fraction(errors: &mut Vec<ConfigError>, field: &str, value: f64, allow_zero: bool) {
    let ok = if allow_zero {
        (0.0..1.0).contains(&value)
    } else {
        value > 0.0 && value <= 1.0
    };
    if !ok {
        let range = if allow_zero { "[0.0, 1.0)" } else { "(0.0, 1.0]" };
        errors.push(ConfigError::new(field, format!("must be in {range}")));
    }
}

fn check_positive(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(value.is_finite() && value > 0.0) {
        errors.push(ConfigError::new(field, "must be > 0"));
    }
}

fn check_ascending<T: PartialOrd + Copy>(errors: &mut Vec<ConfigError>, field: &str, ladder: &[T]) {
    if ladder.is_empty() {
        errors.push(ConfigError::new(field, "must not be empty"));
    } else if ladder.windows(2).any(|w| w[0] >= w[1]) {
        errors.push(ConfigError::new(field, "must be strictly ascending"));
    }
}

impl PolicyConfig {
    /// Parses a policy from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the policy is usable.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        check_positive(&mut errors, "load.days_per_month", self.load.days_per_month);
        check_positive(&mut errors, "load.default_rate", self.load.default_rate);
        for (key, spec) in &self.load.appliances {
            let field = format!("load.appliances.{key}");
            if catalog_key(key) != *key {
                errors.push(ConfigError::new(&field, "key must be lowercase with `_` between words"));
            }
            check_positive(&mut errors, &field, spec.power_w);
            if !(spec.hours_per_day > 0.0 && spec.hours_per_day <= 24.0) {
                errors.push(ConfigError::new(&field, "hours_per_day must be in (0, 24]"));
            }
        }

        let p = &self.panels;
        if p.wattage_w == 0 {
            errors.push(ConfigError::new("panels.wattage_w", "must be > 0"));
        }
        check_fraction(&mut errors, "panels.module_efficiency", p.module_efficiency, false);
        check_fraction(&mut errors, "panels.performance_ratio", p.performance_ratio, false);

        check_ascending(&mut errors, "inverter.ladder_kw", &self.inverter.ladder_kw);
        if self.inverter.ladder_kw.iter().any(|&kw| kw <= 0.0) {
            errors.push(ConfigError::new("inverter.ladder_kw", "ratings must be > 0"));
        }

        let b = &self.battery;
        if b.unit_voltage == 0 {
            errors.push(ConfigError::new("battery.unit_voltage", "must be > 0"));
        }
        check_ascending(&mut errors, "battery.lead_acid_ah_ladder", &b.lead_acid_ah_ladder);
        check_ascending(&mut errors, "battery.lithium_ah_ladder", &b.lithium_ah_ladder);
        check_ascending(&mut errors, "battery.lithium_kwh_ladder", &b.lithium_kwh_ladder);
        if !b.lead_acid_ah_ladder.contains(&b.lead_acid_max_ah) {
            errors.push(ConfigError::new(
                "battery.lead_acid_max_ah",
                "must be one of battery.lead_acid_ah_ladder",
            ));
        }
        check_positive(&mut errors, "battery.lithium_kwh_threshold", b.lithium_kwh_threshold);
        if b.max_parallel_strings == 0 {
            errors.push(ConfigError::new("battery.max_parallel_strings", "must be > 0"));
        }
        check_positive(&mut errors, "battery.off_grid_autonomy_days", b.off_grid_autonomy_days);
        for (family, &dod) in b.depth_of_discharge.iter() {
            check_fraction(&mut errors, &format!("battery.depth_of_discharge.{family}"), dod, false);
        }

        let c = &self.costs;
        check_fraction(&mut errors, "costs.vat_rate", c.vat_rate, true);
        check_fraction(&mut errors, "costs.bos_rate", c.bos_rate, true);
        for (field, value) in [
            ("costs.mounting_per_panel", c.mounting_per_panel),
            ("costs.labor_base", c.labor_base),
            ("costs.labor_per_kw", c.labor_per_kw),
            ("costs.safety_earthing", c.safety_earthing),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }

        let f = &self.finance;
        check_fraction(&mut errors, "finance.discount_rate", f.discount_rate, true);
        if f.analysis_years == 0 {
            errors.push(ConfigError::new("finance.analysis_years", "must be > 0"));
        }
        if f.inverter_replacement_year == 0 || f.inverter_replacement_year > f.analysis_years {
            errors.push(ConfigError::new(
                "finance.inverter_replacement_year",
                "must be within 1..=finance.analysis_years",
            ));
        }
        check_positive(&mut errors, "finance.battery_daily_cycles", f.battery_daily_cycles);
        check_fraction(
            &mut errors,
            "finance.battery_replacement_decline",
            f.battery_replacement_decline,
            true,
        );
        for (family, d) in f.battery_durability.iter() {
            let field = format!("finance.battery_durability.{family}");
            if d.cycle_life == 0 {
                errors.push(ConfigError::new(&field, "cycle_life must be > 0"));
            }
            check_fraction(&mut errors, &field, d.maintenance_rate, true);
        }

        check_positive(
            &mut errors,
            "environment.grid_emission_kg_per_kwh",
            self.environment.grid_emission_kg_per_kwh,
        );

        let a = &self.assessment;
        for (field, [lo, hi]) in [
            ("assessment.cost_per_watt_valid", a.cost_per_watt_valid),
            ("assessment.cost_per_watt_typical", a.cost_per_watt_typical),
        ] {
            if lo >= hi {
                errors.push(ConfigError::new(field, "lower bound must be < upper bound"));
            }
        }

        errors
    }
}

/// A complete scenario: one request plus the policy and reference data it is
/// sized against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    pub request: SizingRequest,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub references: ReferenceData,
}

impl ScenarioConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "off_grid_lithium", "grid_tied"];

    /// Returns the reference household with baseline policy and prices.
    pub fn baseline() -> Self {
        Self {
            request: SizingRequest::baseline(),
            policy: PolicyConfig::default(),
            references: ReferenceData::default(),
        }
    }

    /// Returns a larger off-grid household on lithium storage.
    pub fn off_grid_lithium() -> Self {
        Self {
            request: SizingRequest {
                monthly_kwh: Some(400.0),
                topology: SystemTopology::OffGrid,
                battery: BatteryType::Lithium,
                backup_hours: BackupHours::H24,
                ..SizingRequest::baseline()
            },
            ..Self::baseline()
        }
    }

    /// Returns the reference household without storage.
    pub fn grid_tied() -> Self {
        Self {
            request: SizingRequest {
                topology: SystemTopology::GridTied,
                ..SizingRequest::baseline()
            },
            ..Self::baseline()
        }
    }

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "off_grid_lithium" => Ok(Self::off_grid_lithium()),
            "grid_tied" => Ok(Self::grid_tied()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates policy and reference data.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.policy.validate();
        errors.extend(self.references.validate());
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_valid() {
        let errors = PolicyConfig::default().validate();
        assert!(errors.is_empty(), "default policy should be valid: {errors:?}");
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent").unwrap_err();
        assert!(err.message.contains("unknown preset"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[costs]
vat_rate = 0.14
"#;
        let cfg = PolicyConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.costs.vat_rate, 0.14);
        assert_eq!(cfg.costs.bos_rate, 0.08);
        assert_eq!(cfg.panels.wattage_w, 450);
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[panels]
wattage_w = 450
bogus_field = true
"#;
        assert!(PolicyConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_unsorted_ladder() {
        let mut cfg = PolicyConfig::default();
        cfg.inverter.ladder_kw = vec![3.0, 1.5, 5.0];
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "inverter.ladder_kw"));
    }

    #[test]
    fn validation_catches_ceiling_outside_ladder() {
        let mut cfg = PolicyConfig::default();
        cfg.battery.lead_acid_max_ah = 250;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.lead_acid_max_ah"));
    }

    #[test]
    fn validation_catches_bad_performance_ratio() {
        let mut cfg = PolicyConfig::default();
        cfg.panels.performance_ratio = 1.4;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "panels.performance_ratio"));
    }

    #[test]
    fn validation_catches_replacement_after_horizon() {
        let mut cfg = PolicyConfig::default();
        cfg.finance.inverter_replacement_year = 30;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "finance.inverter_replacement_year"));
    }

    #[test]
    fn scenario_toml_parses_request_and_overrides() {
        let toml = r#"
[request]
monthly_bill = 4000.0
location = "Nairobi"
topology = "off_grid"
battery = "lithium"
backup_hours = 12

[policy.finance]
discount_rate = 0.1

[references.irradiance.locations]
Nairobi = 5.2
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.request.monthly_bill, Some(4000.0));
        assert_eq!(cfg.request.topology, SystemTopology::OffGrid);
        assert_eq!(cfg.policy.finance.discount_rate, 0.1);
        assert_eq!(cfg.references.irradiance.locations.get("Nairobi"), Some(&5.2));
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn scenario_rejects_unknown_section() {
        let toml = r#"
[request]
monthly_kwh = 100.0

[roof]
pitch_deg = 25.0
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn battery_family_constants_override_from_toml() {
        let toml = r#"
[battery.depth_of_discharge]
lead_acid = 0.4
gel = 0.6
lithium = 0.95

[finance.battery_durability.lithium]
cycle_life = 4000
warranty_years = 8
maintenance_rate = 0.01
"#;
        let cfg = PolicyConfig::from_toml_str(toml).unwrap();
        assert_eq!(*cfg.battery.depth_of_discharge.get(BatteryType::LeadAcid), 0.4);
        assert_eq!(cfg.finance.battery_durability.get(BatteryType::Lithium).cycle_life, 4000);
        assert_eq!(cfg.finance.battery_durability.get(BatteryType::Gel).cycle_life, 1500);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validation_catches_bad_battery_family_constants() {
        let mut cfg = PolicyConfig::default();
        cfg.battery.depth_of_discharge.gel = 0.0;
        cfg.finance.battery_durability.lithium.cycle_life = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.depth_of_discharge.gel"));
        assert!(errors.iter().any(|e| e.field == "finance.battery_durability.lithium"));
    }

    #[test]
    fn validation_catches_unnormalized_appliance_key() {
        let mut cfg = PolicyConfig::default();
        cfg.load.appliances.insert(
            "Coffee Maker".into(),
            ApplianceSpec {
                power_w: 800.0,
                hours_per_day: 0.5,
            },
        );
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "load.appliances.Coffee Maker"));
    }
}
