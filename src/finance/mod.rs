//! Costing and financial projections over a sized system.

pub mod cost;
pub mod environment;
pub mod lifecycle;
pub mod roi;
