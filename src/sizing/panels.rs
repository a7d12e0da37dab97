//! Panel sizer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ceil_count;
use crate::config::PanelPolicy;
use crate::error::SizingError;

/// Irradiance at standard test conditions (kW/m²).
const STC_IRRADIANCE_KW_M2: f64 = 1.0;

/// Array of standard panels covering the daily load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelArray {
    /// Rated capacity the load requires before rounding to whole panels (kW).
    pub theoretical_kw: f64,
    pub panel_count: u32,
    pub panel_wattage_w: u32,
    /// Installed capacity, `panel_count × panel_wattage_w` (kW).
    pub actual_kw: f64,
    /// Module area of the installed array (m²).
    pub array_area_m2: f64,
}

/// Sizes the array for `daily_kwh` at `ghi_kwh_m2_day`.
///
/// The required module area is `daily / (ghi × η × PR)`; its rated output at
/// standard test conditions gives the theoretical capacity, which is rounded
/// up to whole panels (at least one).
///
/// # Errors
///
/// Returns `InvalidInput` if the load or irradiance is not positive.
pub fn size_array(
    daily_kwh: f64,
    ghi_kwh_m2_day: f64,
    policy: &PanelPolicy,
) -> Result<PanelArray, SizingError> {
    if !(daily_kwh.is_finite() && daily_kwh > 0.0) {
        return Err(SizingError::invalid(
            "daily_consumption_kwh",
            format!("must be > 0, got {daily_kwh}"),
        ));
    }
    if !(ghi_kwh_m2_day.is_finite() && ghi_kwh_m2_day > 0.0) {
        return Err(SizingError::invalid(
            "ghi_kwh_m2_day",
            format!("must be > 0, got {ghi_kwh_m2_day}"),
        ));
    }

    let efficiency = policy.module_efficiency;
    let required_area_m2 = daily_kwh / (ghi_kwh_m2_day * efficiency * policy.performance_ratio);
    let theoretical_kw = required_area_m2 * efficiency * STC_IRRADIANCE_KW_M2;

    let panel_kw = f64::from(policy.wattage_w) / 1000.0;
    let panel_count = ceil_count(theoretical_kw / panel_kw);
    let actual_kw = f64::from(panel_count) * panel_kw;
    let array_area_m2 = actual_kw / (efficiency * STC_IRRADIANCE_KW_M2);

    debug!(theoretical_kw, panel_count, actual_kw, array_area_m2, "array sized");

    Ok(PanelArray {
        theoretical_kw,
        panel_count,
        panel_wattage_w: policy.wattage_w,
        actual_kw,
        array_area_m2,
    })
}
