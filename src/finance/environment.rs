//! CO₂ offset of displaced grid generation.

use serde::Serialize;

use crate::config::EnvironmentPolicy;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentalImpact {
    pub annual_co2_tonnes: f64,
    pub lifetime_co2_tonnes: f64,
    /// Trees whose yearly uptake matches the annual offset.
    pub tree_equivalent: f64,
    /// Car kilometres avoided per year.
    pub car_km_equivalent: f64,
    pub lifetime_years: u32,
}

pub fn project_impact(
    annual_generation_kwh: f64,
    lifetime_years: u32,
    policy: &EnvironmentPolicy,
) -> EnvironmentalImpact {
    let annual_co2_tonnes = annual_generation_kwh * policy.grid_emission_kg_per_kwh / 1000.0;
    EnvironmentalImpact {
        annual_co2_tonnes,
        lifetime_co2_tonnes: annual_co2_tonnes * f64::from(lifetime_years),
        tree_equivalent: annual_co2_tonnes * policy.trees_per_tonne,
        car_km_equivalent: annual_co2_tonnes * policy.car_km_per_tonne,
        lifetime_years,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn one_megawatt_hour_offsets_grid_factor() {
        let impact = project_impact(1_000.0, 25, &EnvironmentPolicy::default());
        assert_relative_eq!(impact.annual_co2_tonnes, 0.4087);
        assert_relative_eq!(impact.lifetime_co2_tonnes, 0.4087 * 25.0, epsilon = 1e-12);
        assert_relative_eq!(impact.tree_equivalent, 0.4087 * 50.0, epsilon = 1e-12);
        assert_relative_eq!(impact.car_km_equivalent, 0.4087 * 5_000.0, epsilon = 1e-9);
    }
}
