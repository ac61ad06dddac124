//! Combined surface + crown fire behavior for one cell under one scenario

use crate::core_types::fuel::FuelModel;
use crate::core_types::units::{
    BtuPerFootSecond, ChainsPerHour, Degrees, Feet, FeetPerMinute, KilowattsPerMeter, Meters,
    MetersPerMinute, MilesPerHour,
};
use crate::core_types::weather::EnvironmentalConditions;
use crate::physics::crown_fire::{self, Canopy, FireType};
use crate::physics::ellipse::SpreadVector;
use crate::physics::rothermel;
use serde::Serialize;

/// Fire behavior of one cell for one scenario. Produced fresh per
/// (cell, scenario) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FireBehaviorResult {
    pub rate_of_spread: FeetPerMinute,
    pub rate_of_spread_chains: ChainsPerHour,
    pub rate_of_spread_metric: MetersPerMinute,
    /// Reaction intensity (BTU/ft²/min)
    pub reaction_intensity: f32,
    pub fireline_intensity: BtuPerFootSecond,
    pub fireline_intensity_metric: KilowattsPerMeter,
    pub flame_length: Feet,
    pub flame_length_metric: Meters,
    /// Azimuth of maximum spread
    pub heading: Degrees,
    pub effective_wind: MilesPerHour,
    pub length_to_width: f32,
    pub fire_type: FireType,
    pub critical_surface_intensity: KilowattsPerMeter,
    pub critical_crown_spread_rate: MetersPerMinute,
    pub crown_rate_of_spread: MetersPerMinute,
    pub crown_fraction_burned: f32,
}

impl FireBehaviorResult {
    /// Result for a non-burnable cell
    pub fn no_spread() -> Self {
        Self {
            rate_of_spread: FeetPerMinute::ZERO,
            rate_of_spread_chains: ChainsPerHour::ZERO,
            rate_of_spread_metric: MetersPerMinute::ZERO,
            reaction_intensity: 0.0,
            fireline_intensity: BtuPerFootSecond::ZERO,
            fireline_intensity_metric: KilowattsPerMeter::ZERO,
            flame_length: Feet::ZERO,
            flame_length_metric: Meters::ZERO,
            heading: Degrees::ZERO,
            effective_wind: MilesPerHour::ZERO,
            length_to_width: 1.0,
            fire_type: FireType::NoSpread,
            critical_surface_intensity: KilowattsPerMeter::ZERO,
            critical_crown_spread_rate: MetersPerMinute::ZERO,
            crown_rate_of_spread: MetersPerMinute::ZERO,
            crown_fraction_burned: 0.0,
        }
    }

    /// Simulator input derived from this result
    pub fn spread_vector(&self) -> SpreadVector {
        if *self.rate_of_spread_metric <= 0.0 {
            return SpreadVector::NONE;
        }
        SpreadVector::new(self.rate_of_spread_metric, self.heading, self.length_to_width)
    }
}

/// Evaluate surface spread and the crown fire ladder for one cell.
///
/// `crown_rate` is the scenario's crown rate of spread; it depends only on
/// the weather, so callers compute it once per scenario.
pub fn evaluate_cell(
    fuel: &FuelModel,
    conditions: &EnvironmentalConditions,
    slope: Degrees,
    aspect: Degrees,
    canopy: &Canopy,
    crown_rate: MetersPerMinute,
) -> FireBehaviorResult {
    if !fuel.burnable {
        return FireBehaviorResult::no_spread();
    }

    let surface = rothermel::surface_fire_behavior(fuel, conditions, slope, aspect);
    let intensity_metric = surface.fireline_intensity.to_kilowatts_per_meter();
    let crown = crown_fire::assess_crown_fire(
        intensity_metric,
        canopy,
        conditions.foliar_moisture_or_default(),
        crown_rate,
    );

    let fire_type = if surface.spreads() {
        crown.fire_type
    } else {
        FireType::NoSpread
    };

    FireBehaviorResult {
        rate_of_spread: surface.rate_of_spread,
        rate_of_spread_chains: surface.rate_of_spread.to_chains_per_hour(),
        rate_of_spread_metric: surface.rate_of_spread.to_meters_per_minute(),
        reaction_intensity: surface.reaction_intensity,
        fireline_intensity: surface.fireline_intensity,
        fireline_intensity_metric: intensity_metric,
        flame_length: surface.flame_length,
        flame_length_metric: surface.flame_length.to_meters(),
        heading: surface.heading,
        effective_wind: surface.effective_wind,
        length_to_width: surface.length_to_width,
        fire_type,
        critical_surface_intensity: crown.critical_surface_intensity,
        critical_crown_spread_rate: crown.critical_crown_spread_rate,
        crown_rate_of_spread: crown.crown_rate_of_spread,
        crown_fraction_burned: crown.crown_fraction_burned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::fuel::FuelModelCatalog;
    use crate::core_types::units::Percent;

    #[test]
    fn test_non_burnable_is_no_spread() {
        let nb = FuelModelCatalog::standard().lookup("NB1").unwrap();
        let result = evaluate_cell(
            nb,
            &EnvironmentalConditions::extreme(),
            Degrees::new(40.0),
            Degrees::new(90.0),
            &Canopy::none(),
            MetersPerMinute::new(100.0),
        );
        assert_eq!(result, FireBehaviorResult::no_spread());
        assert!(!result.spread_vector().is_passable());
    }

    #[test]
    fn test_timber_with_low_canopy_crowns_under_extreme() {
        let catalog = FuelModelCatalog::standard();
        let conditions = EnvironmentalConditions::extreme();
        let crown_rate = crown_fire::crown_rate_of_spread(&conditions, catalog).unwrap();
        let canopy = Canopy {
            base_height: Meters::new(0.5),
            bulk_density: 0.2,
            cover: 0.7,
        };
        let result = evaluate_cell(
            catalog.lookup("SH5").unwrap(),
            &conditions,
            Degrees::new(10.0),
            Degrees::ZERO,
            &canopy,
            crown_rate,
        );
        assert!(result.fire_type.is_crown_fire());
        assert!(*result.flame_length > 0.0);
    }

    #[test]
    fn test_metric_fields_consistent() {
        let catalog = FuelModelCatalog::standard();
        let conditions =
            EnvironmentalConditions::red_flag().with_foliar_moisture(Percent::new(90.0));
        let result = evaluate_cell(
            catalog.lookup("GR2").unwrap(),
            &conditions,
            Degrees::ZERO,
            Degrees::ZERO,
            &Canopy::none(),
            MetersPerMinute::ZERO,
        );
        assert_eq!(result.fire_type, FireType::Surface);
        assert!((*result.rate_of_spread_metric * 3.28084 - *result.rate_of_spread).abs() < 1e-2);
        let v = result.spread_vector();
        assert_eq!(v.rate, result.rate_of_spread_metric);
    }
}
