//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use solar_sizer::config::ScenarioConfig;
use solar_sizer::engine::TableEngine;
use solar_sizer::request::{BatteryType, SizingRequest, SystemTopology};

/// Engine over baseline policy and reference tables.
pub fn baseline_engine() -> TableEngine {
    TableEngine::from_scenario(&ScenarioConfig::baseline())
}

/// 150 kWh/month at GHI 5.2, hybrid, lead-acid, 8 h backup.
pub fn reference_request() -> SizingRequest {
    SizingRequest::baseline()
}

/// Request for `monthly_kwh` at `ghi`, otherwise the reference household.
pub fn request_for(monthly_kwh: f64, ghi: f64) -> SizingRequest {
    SizingRequest {
        monthly_kwh: Some(monthly_kwh),
        ghi_kwh_m2_day: Some(ghi),
        ..SizingRequest::baseline()
    }
}

/// Request with the given topology and battery family.
pub fn request_with(topology: SystemTopology, battery: BatteryType) -> SizingRequest {
    SizingRequest {
        topology,
        battery,
        ..SizingRequest::baseline()
    }
}
