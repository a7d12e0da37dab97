//! Inverter selector.

use tracing::debug;

use crate::config::InverterPolicy;
use crate::error::SizingError;

/// Smallest rating in the ladder that carries `actual_kw`.
///
/// # Errors
///
/// Returns `NoStandardInverter` when the array exceeds the largest rating.
pub fn select_inverter(actual_kw: f64, policy: &InverterPolicy) -> Result<f64, SizingError> {
    let rating = policy
        .ladder_kw
        .iter()
        .copied()
        .find(|&kw| kw >= actual_kw - 1e-9)
        .ok_or_else(|| SizingError::NoStandardInverter {
            required_kw: actual_kw,
            max_kw: policy.ladder_kw.last().copied().unwrap_or(0.0),
        })?;
    debug!(actual_kw, rating, "inverter selected");
    Ok(rating)
}
