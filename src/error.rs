//! Error taxonomy for the sizing pipeline.

use thiserror::Error;

use crate::sizing::battery::Chemistry;

/// Failure raised by any stage of the sizing pipeline.
///
/// Every variant is a local validation failure. The computation is
/// deterministic, so none of them are worth retrying with the same input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizingError {
    /// A consumption, rate, or irradiance input is missing or non-positive.
    #[error("invalid input `{field}`: {message}")]
    InvalidInput {
        /// Request field that failed validation.
        field: &'static str,
        /// Human-readable constraint description.
        message: String,
    },

    /// The irradiance table has no entry for the requested location.
    #[error("no irradiance data for location `{0}`")]
    LocationNotFound(String),

    /// The installed array exceeds the largest rating in the inverter ladder.
    #[error(
        "array of {required_kw:.2} kW exceeds the largest standard inverter ({max_kw} kW); \
         split the array across multiple inverters"
    )]
    NoStandardInverter {
        /// Installed array capacity (kW).
        required_kw: f64,
        /// Largest rating available in the ladder (kW).
        max_kw: f64,
    },

    /// No standard unit layout reaches the backup target within the string limit.
    #[error(
        "backup target of {backup_kwh:.2} kWh needs {needed} {chemistry} strings, \
         more than the supported {max_strings}"
    )]
    UnsupportedBackupTarget {
        /// Setting that produced the target: `backup_hours`, or the
        /// off-grid autonomy days policy.
        field: &'static str,
        /// Energy the bank was asked to hold (kWh).
        backup_kwh: f64,
        /// Chemistry the layout was attempted with.
        chemistry: Chemistry,
        /// Parallel strings (or modules) the layout would have needed.
        needed: u32,
        /// Configured upper bound on parallel strings.
        max_strings: u32,
    },

    /// A selected standard size has no entry in the equipment price table.
    #[error("no price entry for {item}")]
    PriceNotFound {
        /// Description of the item that could not be priced.
        item: String,
    },
}

impl SizingError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Name of the request field or pipeline stage the error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidInput { field, .. } => field,
            Self::LocationNotFound(_) => "location",
            Self::NoStandardInverter { .. } => "inverter_kw",
            Self::UnsupportedBackupTarget { field, .. } => field,
            Self::PriceNotFound { .. } => "prices",
        }
    }
}
