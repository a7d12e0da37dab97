//! API response types.

use serde::Serialize;

use crate::assessment::Assessment;
use crate::error::SizingError;
use crate::report::SizingReport;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Successful `POST /size` body.
#[derive(Debug, Serialize)]
pub struct SizeResponse {
    pub report: SizingReport,
    pub assessment: Assessment,
}

/// Error body for rejected requests.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable description.
    pub error: String,
    /// Request field or pipeline stage that failed.
    pub field: String,
}

impl From<&SizingError> for ErrorResponse {
    fn from(e: &SizingError) -> Self {
        Self {
            error: e.to_string(),
            field: e.field().to_string(),
        }
    }
}
