//! Landscape fire behavior mapping
//!
//! Applies the surface and crown fire models to every cell of a landscape for
//! one scenario. Cells are independent, so rows are evaluated in parallel;
//! output order always matches input order and reruns are bit-identical.

use crate::core_types::fuel::FuelModelCatalog;
use crate::core_types::units::MetersPerMinute;
use crate::core_types::weather::EnvironmentalConditions;
use crate::error::FireBehaviorError;
use crate::grid::fields::FieldData;
use crate::grid::landscape::{Cell, Landscape};
use crate::physics::behavior::{evaluate_cell, FireBehaviorResult};
use crate::physics::crown_fire;
use crate::physics::ellipse::SpreadVector;
use crate::simulation::statistics::ScenarioStatistics;
use crate::simulation::spread::SpreadGrid;
use std::time::Instant;
use tracing::info;

/// Per-cell fire behavior for one scenario. `None` marks `NoData` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct FireBehaviorMap {
    scenario: String,
    results: FieldData<Option<FireBehaviorResult>>,
    cell_size: f32,
}

impl FireBehaviorMap {
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn width(&self) -> usize {
        self.results.width()
    }

    pub fn height(&self) -> usize {
        self.results.height()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Result at (x, y); `None` for `NoData`
    pub fn get(&self, x: usize, y: usize) -> Option<&FireBehaviorResult> {
        self.results.get(x, y).as_ref()
    }

    pub fn results(&self) -> &FieldData<Option<FireBehaviorResult>> {
        &self.results
    }

    /// Row-major export of one numeric field; `NoData` cells become `NaN`
    pub fn field(&self, f: impl Fn(&FireBehaviorResult) -> f32) -> Vec<f32> {
        self.results
            .iter()
            .map(|r| r.as_ref().map_or(f32::NAN, &f))
            .collect()
    }

    /// Rate of spread (m/min)
    pub fn rate_of_spread_field(&self) -> Vec<f32> {
        self.field(|r| *r.rate_of_spread_metric)
    }

    /// Flame length (m)
    pub fn flame_length_field(&self) -> Vec<f32> {
        self.field(|r| *r.flame_length_metric)
    }

    /// Fireline intensity (kW/m)
    pub fn fireline_intensity_field(&self) -> Vec<f32> {
        self.field(|r| *r.fireline_intensity_metric)
    }

    /// Fire type codes (see [`crown_fire::FireType::code`]); `NoData` is 255
    pub fn fire_type_field(&self) -> Vec<u8> {
        self.results
            .iter()
            .map(|r| r.as_ref().map_or(u8::MAX, |r| r.fire_type.code()))
            .collect()
    }

    /// Aggregate statistics over the map
    pub fn statistics(&self) -> ScenarioStatistics {
        ScenarioStatistics::from_map(self)
    }

    /// Spread vectors for the simulator. `NoData` and non-spreading cells are impassable.
    pub fn spread_vectors(&self) -> SpreadGrid {
        let vectors = self
            .results
            .map(|r| r.as_ref().map_or(SpreadVector::NONE, FireBehaviorResult::spread_vector));
        SpreadGrid::new(vectors, self.cell_size)
    }
}

/// Applies the fire behavior models across a landscape
#[derive(Debug, Clone, Copy)]
pub struct LandscapeFireBehaviorMapper<'a> {
    catalog: &'a FuelModelCatalog,
}

impl Default for LandscapeFireBehaviorMapper<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl LandscapeFireBehaviorMapper<'static> {
    /// Mapper over the standard fuel catalog
    pub fn new() -> Self {
        Self {
            catalog: FuelModelCatalog::standard(),
        }
    }
}

impl<'a> LandscapeFireBehaviorMapper<'a> {
    pub fn with_catalog(catalog: &'a FuelModelCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a FuelModelCatalog {
        self.catalog
    }

    /// Compute fire behavior for every cell under one scenario.
    ///
    /// The scenario is validated before any cell is touched. `NoData` cells
    /// produce `None` and never fail the pass.
    ///
    /// # Errors
    /// - `InvalidEnvironmentalConditions` if the scenario fails validation
    /// - `UnknownFuelModel` if a cell's fuel code or the crown reference model
    ///   is missing from this mapper's catalog
    pub fn compute(
        &self,
        landscape: &Landscape,
        scenario: &EnvironmentalConditions,
    ) -> Result<FireBehaviorMap, FireBehaviorError> {
        scenario.validate()?;
        let start = Instant::now();

        let crown_rate = crown_fire::crown_rate_of_spread(scenario, self.catalog)?;
        let width = landscape.width();

        let results = landscape.cells().try_par_map_rows(|y, row| {
            row.iter()
                .enumerate()
                .map(|(x, cell)| {
                    cell.as_ref()
                        .map(|cell| self.evaluate(cell, scenario, crown_rate, x, y))
                        .transpose()
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        let map = FireBehaviorMap {
            scenario: scenario.name.clone(),
            results,
            cell_size: landscape.cell_size(),
        };

        let stats = map.statistics();
        info!(
            scenario = %scenario.name,
            cells = width * landscape.height(),
            mean_ros_ft_min = *stats.mean_rate_of_spread,
            max_flame_length_ft = *stats.max_flame_length,
            crown_cells = stats.fire_types.passive_crown + stats.fire_types.active_crown,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fire behavior mapped"
        );

        Ok(map)
    }

    fn evaluate(
        &self,
        cell: &Cell,
        scenario: &EnvironmentalConditions,
        crown_rate: MetersPerMinute,
        x: usize,
        y: usize,
    ) -> Result<FireBehaviorResult, FireBehaviorError> {
        let fuel = self
            .catalog
            .lookup_code(cell.fuel)
            .map_err(|_| FireBehaviorError::UnknownFuelModel {
                code: cell.fuel.to_string(),
                location: Some((x, y)),
            })?;
        Ok(evaluate_cell(
            fuel,
            scenario,
            cell.slope,
            cell.aspect,
            &cell.canopy,
            crown_rate,
        ))
    }
}
