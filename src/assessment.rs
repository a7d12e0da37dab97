//! Plausibility checks over a finished report.
//!
//! Each check scores one headline figure against market experience; the
//! overall confidence is their mean.

use std::fmt;

use serde::Serialize;

use crate::config::AssessmentPolicy;
use crate::report::SizingReport;

const OVERSIZED_COVERAGE: f64 = 1.5;
const UNDERSIZED_COVERAGE: f64 = 0.7;
const OPTIMAL_COVERAGE: (f64, f64) = (0.9, 1.2);
const REALISTIC_PAYBACK: (f64, f64) = (3.0, 15.0);
const IDEAL_PAYBACK: (f64, f64) = (5.0, 10.0);
const MIN_VALID_GHI: f64 = 4.0;
const LOW_GHI: f64 = 4.5;
const EXCELLENT_GHI: f64 = 5.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Coverage,
    Payback,
    CostPerWatt,
    Irradiance,
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Check {
    pub kind: CheckKind,
    /// Figure that was checked.
    pub value: f64,
    pub valid: bool,
    /// 0..=1
    pub confidence: f64,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Good,
    Moderate,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            Self::High
        } else if score >= 0.7 {
            Self::Good
        } else if score >= 0.5 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "High",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub checks: Vec<Check>,
    pub confidence: f64,
    pub level: ConfidenceLevel,
}

impl Assessment {
    /// Confidence as a 0..=5 star rating.
    pub fn stars(&self) -> u8 {
        (self.confidence * 5.0).round().clamp(0.0, 5.0) as u8
    }

    pub fn all_valid(&self) -> bool {
        self.checks.iter().all(|c| c.valid)
    }

    /// Checks outside their valid range.
    pub fn flagged(&self) -> usize {
        self.checks.iter().filter(|c| !c.valid).count()
    }
}

fn within((lo, hi): (f64, f64), value: f64) -> bool {
    (lo..=hi).contains(&value)
}

fn check_coverage(ratio: f64) -> Check {
    let mut confidence: f64 = 1.0;
    let note = if ratio > OVERSIZED_COVERAGE {
        confidence -= 0.2;
        format!("system may be oversized ({:.0}% of consumption)", ratio * 100.0)
    } else if ratio < UNDERSIZED_COVERAGE {
        confidence -= 0.15;
        format!("system may be undersized ({:.0}% of consumption)", ratio * 100.0)
    } else if within(OPTIMAL_COVERAGE, ratio) {
        format!("optimal sizing ({:.0}% coverage)", ratio * 100.0)
    } else {
        format!("acceptable sizing ({:.0}% coverage)", ratio * 100.0)
    };
    Check {
        kind: CheckKind::Coverage,
        value: ratio,
        valid: within(OPTIMAL_COVERAGE, ratio),
        confidence,
        note,
    }
}

fn check_payback(years: f64) -> Check {
    let (confidence, note) = if years < REALISTIC_PAYBACK.0 {
        (0.4, "payback seems too optimistic")
    } else if years > REALISTIC_PAYBACK.1 {
        (0.5, "payback period is very long")
    } else if within(IDEAL_PAYBACK, years) {
        (1.0, "realistic payback period")
    } else {
        (0.8, "payback within realistic range")
    };
    Check {
        kind: CheckKind::Payback,
        value: years,
        valid: within(REALISTIC_PAYBACK, years),
        confidence,
        note: format!("{note} ({years:.1} years)"),
    }
}

fn check_cost_per_watt(cost_per_watt: f64, policy: &AssessmentPolicy) -> Check {
    let [valid_lo, valid_hi] = policy.cost_per_watt_valid;
    let [typical_lo, typical_hi] = policy.cost_per_watt_typical;
    let (confidence, note) = if cost_per_watt < valid_lo {
        (0.5, "cost seems too low, verify equipment quality")
    } else if cost_per_watt > valid_hi {
        (0.6, "cost is above market average")
    } else if within((typical_lo, typical_hi), cost_per_watt) {
        (1.0, "cost within typical market range")
    } else {
        (0.8, "cost within valid market range")
    };
    Check {
        kind: CheckKind::CostPerWatt,
        value: cost_per_watt,
        valid: within((valid_lo, valid_hi), cost_per_watt),
        confidence,
        note: format!("{note} ({cost_per_watt:.1}/W)"),
    }
}

fn check_irradiance(ghi: f64) -> Check {
    let (confidence, note) = if ghi < LOW_GHI {
        (0.7, "low solar potential")
    } else if ghi >= EXCELLENT_GHI {
        (1.0, "excellent solar potential")
    } else {
        (0.9, "good solar potential")
    };
    Check {
        kind: CheckKind::Irradiance,
        value: ghi,
        valid: ghi >= MIN_VALID_GHI,
        confidence,
        note: format!("{note} (GHI {ghi:.1})"),
    }
}

/// Scores `report` against market plausibility ranges.
pub fn assess(report: &SizingReport, policy: &AssessmentPolicy) -> Assessment {
    let checks = vec![
        check_coverage(report.roi.coverage_ratio),
        check_payback(report.roi.payback_years),
        check_cost_per_watt(report.roi.cost_per_watt, policy),
        check_irradiance(report.irradiance.ghi_kwh_m2_day),
    ];
    let confidence = checks.iter().map(|c| c.confidence).sum::<f64>() / checks.len() as f64;
    Assessment {
        level: ConfidenceLevel::from_score(confidence),
        checks,
        confidence,
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Assessment ---")?;
        for check in &self.checks {
            let mark = if check.valid { "ok  " } else { "warn" };
            writeln!(f, "[{mark}] {}", check.note)?;
        }
        if self.all_valid() {
            writeln!(f, "All checks passed")?;
        } else {
            writeln!(f, "{} of {} checks flagged", self.flagged(), self.checks.len())?;
        }
        write!(
            f,
            "Confidence:            {:.0}% ({}, {}/5)",
            self.confidence * 100.0,
            self.level,
            self.stars()
        )
    }
}
