//! Scenario summary statistics and multi-scenario comparison

use crate::core_types::units::{Feet, FeetPerMinute};
use crate::core_types::weather::EnvironmentalConditions;
use crate::error::FireBehaviorError;
use crate::grid::landscape::{cells_to_area, Landscape};
use crate::physics::crown_fire::FireType;
use crate::simulation::behavior_map::{FireBehaviorMap, LandscapeFireBehaviorMapper};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

/// Cell counts per fire type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FireTypeCounts {
    pub no_spread: usize,
    pub surface: usize,
    pub passive_crown: usize,
    pub active_crown: usize,
}

impl FireTypeCounts {
    fn record(&mut self, fire_type: FireType) {
        match fire_type {
            FireType::NoSpread => self.no_spread += 1,
            FireType::Surface => self.surface += 1,
            FireType::PassiveCrown => self.passive_crown += 1,
            FireType::ActiveCrown => self.active_crown += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.no_spread + self.surface + self.passive_crown + self.active_crown
    }
}

/// Summary of one scenario's fire behavior map.
///
/// Rate and flame statistics cover burnable cells only (rate of spread > 0).
/// With no burnable cells they are all zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioStatistics {
    pub scenario: String,
    pub defined_cells: usize,
    pub no_data_cells: usize,
    pub burnable_cells: usize,
    pub non_burnable_cells: usize,
    pub mean_rate_of_spread: FeetPerMinute,
    pub max_rate_of_spread: FeetPerMinute,
    pub min_rate_of_spread: FeetPerMinute,
    pub std_rate_of_spread: FeetPerMinute,
    pub mean_flame_length: Feet,
    pub max_flame_length: Feet,
    pub min_flame_length: Feet,
    pub std_flame_length: Feet,
    pub fire_types: FireTypeCounts,
    pub burnable_area_hectares: f32,
    pub burnable_area_acres: f32,
}

impl ScenarioStatistics {
    pub fn from_map(map: &FireBehaviorMap) -> Self {
        let mut fire_types = FireTypeCounts::default();
        let mut rates = Vec::new();
        let mut flames = Vec::new();
        let mut no_data_cells = 0;

        for result in map.results() {
            let Some(result) = result else {
                no_data_cells += 1;
                continue;
            };
            fire_types.record(result.fire_type);
            if *result.rate_of_spread > 0.0 {
                rates.push(f64::from(*result.rate_of_spread));
                flames.push(f64::from(*result.flame_length));
            }
        }

        let defined_cells = map.results().len() - no_data_cells;
        let burnable_cells = rates.len();
        let (mean_ros, std_ros) = mean_and_std(&rates);
        let (mean_flame, std_flame) = mean_and_std(&flames);
        let (hectares, acres) = cells_to_area(burnable_cells, map.cell_size());

        Self {
            scenario: map.scenario().to_string(),
            defined_cells,
            no_data_cells,
            burnable_cells,
            non_burnable_cells: defined_cells - burnable_cells,
            mean_rate_of_spread: FeetPerMinute::new(mean_ros as f32),
            max_rate_of_spread: FeetPerMinute::new(max_of(&rates) as f32),
            min_rate_of_spread: FeetPerMinute::new(min_of(&rates) as f32),
            std_rate_of_spread: FeetPerMinute::new(std_ros as f32),
            mean_flame_length: Feet::new(mean_flame as f32),
            max_flame_length: Feet::new(max_of(&flames) as f32),
            min_flame_length: Feet::new(min_of(&flames) as f32),
            std_flame_length: Feet::new(std_flame as f32),
            fire_types,
            burnable_area_hectares: hectares,
            burnable_area_acres: acres,
        }
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    /// Returns `ScenarioConfig` if serialization fails
    pub fn to_json(&self) -> Result<String, FireBehaviorError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FireBehaviorError::ScenarioConfig(format!("serialize statistics: {e}")))
    }
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

fn min_of(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}

/// Run several scenarios over one landscape.
///
/// All scenarios are validated before any computation starts. Maps are
/// computed in parallel and returned in input order.
///
/// # Errors
/// The first validation error in input order, or a mapping error
pub fn compare_scenarios(
    mapper: &LandscapeFireBehaviorMapper<'_>,
    landscape: &Landscape,
    scenarios: &[EnvironmentalConditions],
) -> Result<Vec<(FireBehaviorMap, ScenarioStatistics)>, FireBehaviorError> {
    for scenario in scenarios {
        scenario.validate()?;
    }

    let results = scenarios
        .par_iter()
        .map(|scenario| {
            let map = mapper.compute(landscape, scenario)?;
            let stats = map.statistics();
            Ok((map, stats))
        })
        .collect::<Result<Vec<_>, FireBehaviorError>>()?;

    for (_, stats) in &results {
        info!(
            scenario = %stats.scenario,
            mean_ros_ft_min = *stats.mean_rate_of_spread,
            max_ros_ft_min = *stats.max_rate_of_spread,
            mean_flame_ft = *stats.mean_flame_length,
            "Scenario summary"
        );
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::fuel::FuelCode;
    use crate::core_types::units::Degrees;
    use crate::grid::landscape::Cell;
    use crate::physics::crown_fire::Canopy;
    use approx::assert_relative_eq;

    fn cell(fuel: u16) -> Cell {
        Cell {
            fuel: FuelCode(fuel),
            slope: Degrees::ZERO,
            aspect: Degrees::ZERO,
            canopy: Canopy::none(),
            elevation: None,
        }
    }

    #[test]
    fn test_mean_and_std() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(mean, 5.0);
        assert_relative_eq!(std, 2.0);
        assert_eq!(mean_and_std(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_counts_split_by_category() {
        let mut landscape = Landscape::uniform(4, 4, 30.0, cell(102));
        landscape.set_cell(0, 0, None);
        landscape.set_cell(1, 0, Some(cell(91)));
        landscape.set_cell(2, 0, Some(cell(98)));

        let stats = LandscapeFireBehaviorMapper::new()
            .compute(&landscape, &EnvironmentalConditions::typical())
            .unwrap()
            .statistics();

        assert_eq!(stats.no_data_cells, 1);
        assert_eq!(stats.defined_cells, 15);
        assert_eq!(stats.burnable_cells, 13);
        assert_eq!(stats.non_burnable_cells, 2);
        assert_eq!(stats.fire_types.no_spread, 2);
        assert_eq!(stats.fire_types.total(), 15);
        assert_relative_eq!(stats.std_rate_of_spread.value(), 0.0, epsilon = 1e-4);
        assert_eq!(stats.min_rate_of_spread, stats.max_rate_of_spread);
        assert_eq!(stats.min_flame_length, stats.max_flame_length);
        assert_relative_eq!(stats.std_flame_length.value(), 0.0, epsilon = 1e-4);
        // 13 cells of 900 m² each
        assert_relative_eq!(stats.burnable_area_hectares, 1.17, epsilon = 1e-4);
    }

    #[test]
    fn test_all_non_burnable_is_zero_not_nan() {
        let landscape = Landscape::uniform(3, 3, 30.0, cell(98));
        let stats = LandscapeFireBehaviorMapper::new()
            .compute(&landscape, &EnvironmentalConditions::extreme())
            .unwrap()
            .statistics();
        assert_eq!(stats.burnable_cells, 0);
        assert_eq!(*stats.mean_rate_of_spread, 0.0);
        assert_eq!(*stats.max_flame_length, 0.0);
        assert_eq!(*stats.min_flame_length, 0.0);
        assert_eq!(*stats.std_flame_length, 0.0);
        assert!(stats.to_json().unwrap().contains("\"burnable_cells\": 0"));
    }

    #[test]
    fn test_flame_spread_across_mixed_fuels() {
        // Half short grass, half grass-shrub
        let mut landscape = Landscape::uniform(4, 2, 30.0, cell(101));
        for x in 0..4 {
            landscape.set_cell(x, 1, Some(cell(122)));
        }
        let stats = LandscapeFireBehaviorMapper::new()
            .compute(&landscape, &EnvironmentalConditions::typical())
            .unwrap()
            .statistics();

        assert_eq!(stats.burnable_cells, 8);
        let (min, mean, max) = (
            *stats.min_flame_length,
            *stats.mean_flame_length,
            *stats.max_flame_length,
        );
        assert!(min > 0.0 && min < max);
        assert_relative_eq!(mean, (min + max) / 2.0, epsilon = 1e-3);
        // Two equal groups: the deviation is half the gap
        assert_relative_eq!(*stats.std_flame_length, (max - min) / 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_compare_preserves_input_order() {
        let landscape = Landscape::uniform(5, 5, 30.0, cell(102));
        let scenarios = [
            EnvironmentalConditions::extreme(),
            EnvironmentalConditions::typical(),
            EnvironmentalConditions::red_flag(),
        ];
        let results =
            compare_scenarios(&LandscapeFireBehaviorMapper::new(), &landscape, &scenarios).unwrap();
        let names: Vec<&str> = results.iter().map(|(m, _)| m.scenario()).collect();
        assert_eq!(names, ["extreme", "typical", "red_flag"]);
    }

    #[test]
    fn test_compare_validates_all_first() {
        let landscape = Landscape::uniform(2, 2, 30.0, cell(102));
        let mut bad = EnvironmentalConditions::typical();
        bad.relative_humidity = crate::core_types::units::Percent::new(150.0);
        let err = compare_scenarios(
            &LandscapeFireBehaviorMapper::new(),
            &landscape,
            &[EnvironmentalConditions::red_flag(), bad],
        )
        .unwrap_err();
        assert!(matches!(err, FireBehaviorError::InvalidEnvironmentalConditions { .. }));
    }
}
