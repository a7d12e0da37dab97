//! End-to-end pipeline runs over the baseline policy and price list.

mod common;

use std::path::Path;

use approx::assert_relative_eq;
use solar_sizer::assessment::{ConfidenceLevel, assess};
use solar_sizer::config::{PolicyConfig, ScenarioConfig};
use solar_sizer::engine::TableEngine;
use solar_sizer::error::SizingError;
use solar_sizer::finance::cost::CostComponent;
use solar_sizer::request::{BackupHours, BatteryType, SizingRequest, SystemTopology};
use solar_sizer::sizing::appliances::ApplianceUse;
use solar_sizer::sizing::battery::{BankLayout, Chemistry, UnitCapacity};

#[test]
fn reference_household_end_to_end() {
    let report = common::baseline_engine()
        .run(&common::reference_request())
        .unwrap();

    assert_relative_eq!(report.profile.daily_consumption_kwh, 4.9277, epsilon = 1e-4);
    assert_relative_eq!(report.system.theoretical_kw, 1.3, epsilon = 0.05);
    assert_eq!(report.system.panel_count, 3);
    assert_relative_eq!(report.system.actual_kw, 1.35);
    assert_relative_eq!(report.system.inverter_kw, 1.5);

    let bank = report.battery.as_ref().unwrap();
    assert_eq!(bank.chemistry, Chemistry::LeadAcid);
    assert_eq!(bank.system_voltage, 24);
    assert_eq!(
        bank.layout,
        BankLayout::Strings {
            series_count: 2,
            parallel_strings: 1
        }
    );
    assert_eq!(bank.unit_capacity, UnitCapacity::AmpHours(150));

    assert_relative_eq!(report.costs.total(), 207_790.0, epsilon = 1e-6);
    let sum: f64 = report.costs.lines().map(|(_, v)| v).sum();
    assert_eq!(report.costs.total(), sum);

    assert_relative_eq!(report.roi.annual_savings, 36_000.0, epsilon = 1e-9);
    assert_relative_eq!(report.roi.payback_years, 207_790.0 / 36_000.0, epsilon = 1e-9);
    assert!(report.roi.npv > 0.0);
}

#[test]
fn identical_requests_serialize_identically() {
    let engine = common::baseline_engine();
    let a = serde_json::to_vec(&engine.run(&common::reference_request()).unwrap()).unwrap();
    let b = serde_json::to_vec(&engine.run(&common::reference_request()).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn views_agree_with_report() {
    let report = common::baseline_engine()
        .run(&common::reference_request())
        .unwrap();

    let summary = report.summary();
    assert_eq!(summary.panel_count, report.system.panel_count);
    assert_eq!(summary.total_cost, report.costs.total());

    let financial = report.financial();
    assert_eq!(financial.npv, report.roi.npv);
    assert_eq!(financial.cash_flows.len(), 25);

    let slices = report.cost_slices();
    assert_eq!(slices.len(), 8);
    assert_eq!(slices[0].label, "Panels");
    assert_relative_eq!(slices.iter().map(|s| s.share).sum::<f64>(), 1.0, epsilon = 1e-12);

    assert_eq!(
        report.environmental().annual_co2_tonnes,
        report.roi.annual_generation_kwh * 0.4087 / 1000.0
    );
}

#[test]
fn grid_tied_omits_battery_line() {
    let report = common::baseline_engine()
        .run(&common::request_with(SystemTopology::GridTied, BatteryType::LeadAcid))
        .unwrap();
    assert!(report.battery.is_none());
    assert_eq!(report.costs.get(CostComponent::Battery), None);
    assert_relative_eq!(report.costs.total(), 207_790.0 - 72_000.0, epsilon = 1e-6);
}

#[test]
fn off_grid_lithium_uses_modules() {
    let scenario = ScenarioConfig::from_preset("off_grid_lithium").unwrap();
    let report = TableEngine::from_scenario(&scenario)
        .run(&scenario.request)
        .unwrap();
    let bank = report.battery.as_ref().unwrap();
    assert_eq!(bank.chemistry, Chemistry::LithiumKwh);
    assert!(matches!(bank.layout, BankLayout::Modules { .. }));
    // two days of autonomy
    assert_relative_eq!(
        bank.backup_energy_kwh,
        report.profile.daily_consumption_kwh * 2.0,
        epsilon = 1e-9
    );
    assert!(bank.nominal_capacity_kwh >= bank.backup_energy_kwh);
}

#[test]
fn bill_only_request_derives_consumption() {
    let request = SizingRequest {
        monthly_kwh: None,
        monthly_bill: Some(3_000.0),
        ..common::reference_request()
    };
    let report = common::baseline_engine().run(&request).unwrap();
    assert_relative_eq!(report.profile.monthly_kwh, 150.0);
    assert_relative_eq!(report.costs.total(), 207_790.0, epsilon = 1e-6);
}

#[test]
fn both_consumption_figures_are_rejected() {
    let request = SizingRequest {
        monthly_bill: Some(3_000.0),
        ..common::reference_request()
    };
    let err = common::baseline_engine().run(&request).unwrap_err();
    assert!(matches!(err, SizingError::InvalidInput { field: "monthly_bill", .. }));
}

#[test]
fn oversized_load_needs_multiple_inverters() {
    let err = common::baseline_engine()
        .run(&common::request_for(2_000.0, 5.2))
        .unwrap_err();
    assert!(matches!(err, SizingError::NoStandardInverter { .. }));
}

#[test]
fn tight_string_limit_rejects_large_backup() {
    let mut scenario = ScenarioConfig::baseline();
    scenario.policy.battery.max_parallel_strings = 2;
    let request = SizingRequest {
        monthly_kwh: Some(600.0),
        backup_hours: BackupHours::H24,
        ..common::reference_request()
    };
    let err = TableEngine::from_scenario(&scenario).run(&request).unwrap_err();
    assert_eq!(err.field(), "backup_hours");
}

#[test]
fn missing_price_fails_whole_run() {
    let mut scenario = ScenarioConfig::baseline();
    scenario.references.prices.panels.clear();
    let err = TableEngine::from_scenario(&scenario)
        .run(&common::reference_request())
        .unwrap_err();
    assert!(matches!(err, SizingError::PriceNotFound { .. }));
}

#[test]
fn policy_override_changes_quote() {
    let mut policy = PolicyConfig::default();
    policy.costs.vat_rate = 0.0;
    let scenario = ScenarioConfig {
        policy,
        ..ScenarioConfig::baseline()
    };
    let report = TableEngine::from_scenario(&scenario)
        .run(&common::reference_request())
        .unwrap();
    assert_relative_eq!(report.costs.total(), 207_790.0 - 13_560.0, epsilon = 1e-6);
}

#[test]
fn reference_household_is_assessed_plausible() {
    let engine = common::baseline_engine();
    let report = engine.run(&common::reference_request()).unwrap();
    let assessment = assess(&report, &engine.policy().assessment);
    assert_eq!(assessment.checks.len(), 4);
    assert!(assessment.confidence > 0.5);
    assert_ne!(assessment.level, ConfidenceLevel::Low);
}

#[test]
fn tiered_scenario_prices_kwh_by_consumption_tier() {
    let mut scenario = ScenarioConfig::from_toml_file(Path::new("scenarios/tiered_tariff.toml")).unwrap();
    scenario.request.monthly_bill = None;
    scenario.request.monthly_kwh = Some(150.0);
    scenario.request.tariff_category = None;

    let report = TableEngine::from_scenario(&scenario).run(&scenario.request).unwrap();
    assert_relative_eq!(report.profile.effective_rate, 28.5128, epsilon = 1e-9);
    assert_eq!(report.profile.tariff_category.as_deref(), Some("ordinary_2"));
    assert_relative_eq!(report.profile.monthly_bill, 150.0 * 28.5128, epsilon = 1e-6);
    assert!(report.to_string().contains("Tariff:                ordinary_2"));
}

#[test]
fn appliance_list_sizes_like_the_equivalent_kwh() {
    let engine = common::baseline_engine();
    let appliances = SizingRequest {
        monthly_kwh: None,
        appliances: vec![ApplianceUse::standard("fridge", 1), ApplianceUse::standard("tv", 2)],
        ..common::reference_request()
    };
    let from_appliances = engine.run(&appliances).unwrap();
    let from_kwh = engine
        .run(&common::request_for(4.24 * 30.44, 5.2))
        .unwrap();
    assert_eq!(from_appliances.system.panel_count, from_kwh.system.panel_count);
    assert_relative_eq!(from_appliances.system.inverter_kw, from_kwh.system.inverter_kw);
    let (a, k) = (from_appliances.battery.unwrap(), from_kwh.battery.unwrap());
    assert_eq!((a.unit_capacity, a.total_units), (k.unit_capacity, k.total_units));
    assert_relative_eq!(from_appliances.costs.total(), from_kwh.costs.total(), epsilon = 1e-6);
}

#[test]
fn lithium_pays_off_over_lead_acid_for_reference_household() {
    let cmp = common::baseline_engine()
        .compare_batteries(&common::reference_request())
        .unwrap();
    assert_eq!(cmp.lead_acid.lifecycle.replacements, 6);
    assert_eq!(cmp.lithium.lifecycle.replacements, 1);
    assert_eq!(cmp.better, BatteryType::Lithium);
    assert!(cmp.savings_with_lithium > 0.0);
}

