//! Hardware sizing stages: load, panels, inverter, battery bank.

pub mod appliances;
pub mod battery;
pub mod inverter;
pub mod load;
pub mod panels;

use serde::{Deserialize, Serialize};

use crate::config::PolicyConfig;
use crate::error::SizingError;

/// Slack absorbed before rounding a unit count up, so exact multiples
/// that pick up float noise do not gain a spurious unit.
const COUNT_EPSILON: f64 = 1e-9;

/// `ceil(x)`, at least 1.
pub(crate) fn ceil_count(x: f64) -> u32 {
    (x - COUNT_EPSILON).ceil().max(1.0) as u32
}

/// Installed array plus the inverter it runs through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSizeSpec {
    pub theoretical_kw: f64,
    pub actual_kw: f64,
    pub panel_count: u32,
    pub panel_wattage_w: u32,
    pub inverter_kw: f64,
    pub array_area_m2: f64,
}

/// Sizes the array for `daily_kwh` and selects its inverter.
///
/// # Errors
///
/// Propagates `InvalidInput` from the panel sizer and `NoStandardInverter`
/// from the inverter selector.
pub fn size_system(
    daily_kwh: f64,
    ghi_kwh_m2_day: f64,
    policy: &PolicyConfig,
) -> Result<SystemSizeSpec, SizingError> {
    let array = panels::size_array(daily_kwh, ghi_kwh_m2_day, &policy.panels)?;
    let inverter_kw = inverter::select_inverter(array.actual_kw, &policy.inverter)?;
    Ok(SystemSizeSpec {
        theoretical_kw: array.theoretical_kw,
        actual_kw: array.actual_kw,
        panel_count: array.panel_count,
        panel_wattage_w: array.panel_wattage_w,
        inverter_kw,
        array_area_m2: array.array_area_m2,
    })
}
