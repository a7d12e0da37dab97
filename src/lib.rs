//! Deterministic solar-plus-storage sizing and costing engine.
//!
//! A [`request::SizingRequest`] goes through [`engine::Engine::run`] and comes
//! back as one [`report::SizingReport`]: load estimate, array and inverter,
//! battery bank, itemized costs, and the financial and environmental
//! projections derived from them.

#[cfg(feature = "api")]
pub mod api;
pub mod assessment;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
/// Cost, ROI, battery lifecycle and CO₂ projections.
pub mod finance;
pub mod io;
pub mod report;
pub mod request;
/// Load, panel, inverter and battery sizing stages.
pub mod sizing;
pub mod tariff;
