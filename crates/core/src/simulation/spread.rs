//! Elliptical wavefront spread over a raster
//!
//! Each burning cell expands toward its eight neighbours at the rate its own
//! spread ellipse gives in that direction. Internally every reached cell keeps
//! its exact (sub-step) arrival time, and travel times are measured from it.
//! The public arrival grid carries the simulation clock at the end of the step
//! in which the cell was reached.
//!
//! # Time stepping
//! The effective step is `min(requested, cell_size / max_rate)`, so no front
//! can cross more than one cell per step. Steps in which nothing can be
//! reached are skipped by jumping to the lattice step that contains the
//! earliest pending arrival.

use crate::core_types::units::{Degrees, MetersPerMinute, Minutes};
use crate::error::FireBehaviorError;
use crate::grid::fields::FieldData;
use crate::grid::landscape::cells_to_area;
use crate::physics::ellipse::SpreadVector;
use crate::simulation::isochrones::interval_breaks;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Default radius (cells) searched for a burnable cell around a non-burnable ignition
pub const DEFAULT_IGNITION_SEARCH_RADIUS: usize = 100;

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Where the fire starts. Coordinates are (column, row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnitionGeometry {
    Point { x: usize, y: usize },
    Points(Vec<(usize, usize)>),
    /// Straight line between two cells, rasterized with Bresenham's algorithm
    Line {
        start: (usize, usize),
        end: (usize, usize),
    },
}

impl IgnitionGeometry {
    /// Cells covered by this geometry, before any relocation
    pub fn cells(&self) -> Vec<(usize, usize)> {
        match self {
            IgnitionGeometry::Point { x, y } => vec![(*x, *y)],
            IgnitionGeometry::Points(points) => points.clone(),
            IgnitionGeometry::Line { start, end } => line_cells(*start, *end),
        }
    }
}

fn line_cells(start: (usize, usize), end: (usize, usize)) -> Vec<(usize, usize)> {
    let (mut x, mut y) = (start.0 as i64, start.1 as i64);
    let (x1, y1) = (end.0 as i64, end.1 as i64);
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut cells = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    loop {
        cells.push((x as usize, y as usize));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}

/// Simulator settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    /// Radius (cells) searched for a burnable cell when an ignition lands on
    /// a non-burnable one
    pub ignition_search_radius: usize,
    /// Spacing of the default isochrone breaks
    pub isochrone_interval: Minutes,
    /// Upper bound on the step regardless of what the caller requests
    pub max_time_step: Option<Minutes>,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            ignition_search_radius: DEFAULT_IGNITION_SEARCH_RADIUS,
            isochrone_interval: Minutes::new(60.0),
            max_time_step: None,
        }
    }
}

/// Per-cell spread vectors plus cell size: the simulator's input
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadGrid {
    vectors: FieldData<SpreadVector>,
    cell_size: f32,
}

impl SpreadGrid {
    pub fn new(vectors: FieldData<SpreadVector>, cell_size: f32) -> Self {
        Self { vectors, cell_size }
    }

    /// Same vector in every cell
    pub fn uniform(width: usize, height: usize, cell_size: f32, vector: SpreadVector) -> Self {
        Self::new(FieldData::with_value(width, height, vector), cell_size)
    }

    pub fn width(&self) -> usize {
        self.vectors.width()
    }

    pub fn height(&self) -> usize {
        self.vectors.height()
    }

    /// Cell edge length (m)
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn vectors(&self) -> &FieldData<SpreadVector> {
        &self.vectors
    }

    pub fn vector(&self, x: usize, y: usize) -> &SpreadVector {
        self.vectors.get(x, y)
    }

    /// Replace one cell's vector
    pub fn set_vector(&mut self, x: usize, y: usize, vector: SpreadVector) {
        self.vectors.set(x, y, vector);
    }

    pub fn is_passable(&self, x: usize, y: usize) -> bool {
        self.vectors.get_checked(x, y).is_some_and(SpreadVector::is_passable)
    }

    /// Fastest head rate anywhere on the grid
    pub fn max_rate(&self) -> MetersPerMinute {
        self.vectors
            .iter()
            .map(|v| v.rate)
            .max()
            .unwrap_or(MetersPerMinute::ZERO)
    }

    /// Nearest passable cell within a Euclidean radius. Ties go to the first
    /// cell in row-major order.
    pub fn nearest_passable(&self, x: usize, y: usize, radius: usize) -> Option<(usize, usize)> {
        if self.vectors.is_empty() {
            return None;
        }
        let x_range = x.saturating_sub(radius)..=x.saturating_add(radius).min(self.width() - 1);
        let y_range = y.saturating_sub(radius)..=y.saturating_add(radius).min(self.height() - 1);
        let limit = radius.saturating_mul(radius);

        let mut best: Option<(usize, (usize, usize))> = None;
        for cy in y_range {
            for cx in x_range.clone() {
                let (dx, dy) = (cx.abs_diff(x), cy.abs_diff(y));
                let d2 = dx.saturating_pow(2).saturating_add(dy.saturating_pow(2));
                if d2 > limit || !self.is_passable(cx, cy) {
                    continue;
                }
                if best.is_none_or(|(d, _)| d2 < d) {
                    best = Some((d2, (cx, cy)));
                }
            }
        }
        best.map(|(_, cell)| cell)
    }

    fn neighbour(&self, index: usize, dx: isize, dy: isize) -> Option<usize> {
        let (x, y) = self.vectors.coords(index);
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.vectors.contains(nx, ny).then(|| self.vectors.index(nx, ny))
    }
}

/// Compass bearing from a cell to its (dx, dy) neighbour. Rows increase southward.
fn neighbour_bearing(dx: isize, dy: isize) -> Degrees {
    Degrees::new((dx as f32).atan2(-(dy as f32)).to_degrees()).normalized()
}

/// Arrival clock per cell. `None` means the fire did not reach the cell
/// within the simulated duration.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalTimeGrid {
    times: FieldData<Option<Minutes>>,
    cell_size: f32,
    duration: Minutes,
}

impl ArrivalTimeGrid {
    pub fn width(&self) -> usize {
        self.times.width()
    }

    pub fn height(&self) -> usize {
        self.times.height()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Simulated horizon
    pub fn duration(&self) -> Minutes {
        self.duration
    }

    pub fn times(&self) -> &FieldData<Option<Minutes>> {
        &self.times
    }

    /// Arrival at (x, y); `None` if unreached or off the grid
    pub fn get(&self, x: usize, y: usize) -> Option<Minutes> {
        self.times.get_checked(x, y).copied().flatten()
    }

    /// Cells reached at or before `time`
    pub fn burned_cells_at(&self, time: Minutes) -> usize {
        self.times.iter().filter(|t| t.is_some_and(|t| t <= time)).count()
    }

    /// Every cell reached during the run
    pub fn burned_cells(&self) -> usize {
        self.times.iter().filter(|t| t.is_some()).count()
    }

    /// Burned area at `time` as (hectares, acres)
    pub fn burned_area(&self, time: Minutes) -> (f32, f32) {
        cells_to_area(self.burned_cells_at(time), self.cell_size)
    }

    /// Latest arrival on the grid
    pub fn max_arrival(&self) -> Option<Minutes> {
        self.times.iter().flatten().copied().max()
    }

    /// Row-major minutes with `NaN` for unreached cells
    pub fn to_minutes_vec(&self) -> Vec<f32> {
        self.times
            .iter()
            .map(|t| t.map_or(f32::NAN, Minutes::value))
            .collect()
    }
}

/// Runs spread simulations with one configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct FireSpreadSimulator {
    config: SpreadConfig,
}

impl FireSpreadSimulator {
    pub fn new(config: SpreadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpreadConfig {
        &self.config
    }

    /// Isochrone breaks at the configured interval, up to `duration`
    pub fn default_breaks(&self, duration: Minutes) -> Vec<Minutes> {
        interval_breaks(duration, self.config.isochrone_interval)
    }

    /// Run to completion and return the arrival grid.
    ///
    /// # Errors
    /// See [`FireSpreadSimulator::start`]
    pub fn simulate(
        &self,
        grid: &SpreadGrid,
        ignition: &IgnitionGeometry,
        duration: Minutes,
        time_step: Minutes,
    ) -> Result<ArrivalTimeGrid, FireBehaviorError> {
        let mut state = self.start(grid, ignition, duration, time_step)?;
        while state.step() {}
        Ok(state.into_arrival_grid())
    }

    /// Validate inputs, place the ignition and return a state ready to step.
    ///
    /// # Errors
    /// - `InvalidSimulationParameters` for a non-positive or non-finite
    ///   duration, time step, maximum step or cell size, or an empty ignition
    /// - `IgnitionOutsideGrid` if any ignition cell lies off the grid
    /// - `NoBurnableIgnition` if a non-burnable ignition cell has no passable
    ///   cell within the search radius
    pub fn start<'a>(
        &self,
        grid: &'a SpreadGrid,
        ignition: &IgnitionGeometry,
        duration: Minutes,
        time_step: Minutes,
    ) -> Result<SpreadSimulationState<'a>, FireBehaviorError> {
        require_positive("duration", *duration)?;
        require_positive("time_step", *time_step)?;
        require_positive("cell_size", grid.cell_size())?;
        if let Some(max_step) = self.config.max_time_step {
            require_positive("max_time_step", *max_step)?;
        }

        let ignitions = self.resolve_ignitions(grid, ignition)?;

        let requested = self
            .config
            .max_time_step
            .map_or(*time_step, |max| max.min(time_step).value());
        let stability_limit = f64::from(grid.cell_size()) / f64::from(*grid.max_rate());
        let dt = f64::from(requested).min(stability_limit);
        if dt < f64::from(requested) {
            debug!(
                requested_min = requested,
                effective_min = dt,
                "Time step reduced to one cell per step at the fastest rate"
            );
        }

        info!(
            ignition_cells = ignitions.len(),
            duration_min = *duration,
            time_step_min = dt,
            width = grid.width(),
            height = grid.height(),
            "Spread simulation started"
        );

        Ok(SpreadSimulationState::new(grid, &ignitions, f64::from(*duration), dt))
    }

    fn resolve_ignitions(
        &self,
        grid: &SpreadGrid,
        ignition: &IgnitionGeometry,
    ) -> Result<Vec<usize>, FireBehaviorError> {
        let cells = ignition.cells();
        if cells.is_empty() {
            return Err(FireBehaviorError::InvalidSimulationParameters(
                "ignition geometry covers no cells".to_string(),
            ));
        }
        if let Some(&(x, y)) = cells.iter().find(|&&(x, y)| !grid.vectors.contains(x, y)) {
            return Err(FireBehaviorError::IgnitionOutsideGrid {
                x,
                y,
                width: grid.width(),
                height: grid.height(),
            });
        }

        let radius = self.config.ignition_search_radius;
        let mut resolved = Vec::with_capacity(cells.len());
        for (x, y) in cells {
            if grid.is_passable(x, y) {
                resolved.push(grid.vectors.index(x, y));
                continue;
            }
            let (nx, ny) = grid
                .nearest_passable(x, y, radius)
                .ok_or(FireBehaviorError::NoBurnableIgnition {
                    x,
                    y,
                    search_radius: radius,
                })?;
            warn!(
                from_x = x,
                from_y = y,
                to_x = nx,
                to_y = ny,
                "Ignition on non-burnable cell relocated"
            );
            resolved.push(grid.vectors.index(nx, ny));
        }
        resolved.sort_unstable();
        resolved.dedup();
        Ok(resolved)
    }
}

fn require_positive(name: &str, value: f32) -> Result<(), FireBehaviorError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FireBehaviorError::InvalidSimulationParameters(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

/// State of one simulation run, advanced a step at a time
#[derive(Debug)]
pub struct SpreadSimulationState<'a> {
    grid: &'a SpreadGrid,
    duration: f64,
    dt: f64,
    step_index: u64,
    clock: f64,
    /// Exact arrival time (min); infinite until reached
    exact: Vec<f64>,
    arrival: Vec<Option<Minutes>>,
    frontier: Vec<usize>,
    steps_taken: usize,
    finished: bool,
}

impl<'a> SpreadSimulationState<'a> {
    fn new(grid: &'a SpreadGrid, ignitions: &[usize], duration: f64, dt: f64) -> Self {
        let n = grid.vectors.len();
        let mut exact = vec![f64::INFINITY; n];
        let mut arrival = vec![None; n];
        for &idx in ignitions {
            exact[idx] = 0.0;
            arrival[idx] = Some(Minutes::ZERO);
        }
        let mut state = Self {
            grid,
            duration,
            dt,
            step_index: 0,
            clock: 0.0,
            exact,
            arrival,
            frontier: ignitions.to_vec(),
            steps_taken: 0,
            finished: false,
        };
        state.retire_enclosed();
        if state.frontier.is_empty() {
            state.finish();
        }
        state
    }

    /// Simulation clock at the end of the last step
    pub fn clock(&self) -> Minutes {
        Minutes::new(self.clock as f32)
    }

    /// Effective step size
    pub fn time_step(&self) -> Minutes {
        Minutes::new(self.dt as f32)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Steps executed so far (skipped idle steps excluded)
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Burning cells that can still spread
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn burned_cells(&self) -> usize {
        self.arrival.iter().filter(|t| t.is_some()).count()
    }

    /// Arrival clock at (x, y); `None` if unreached or off the grid
    pub fn arrival(&self, x: usize, y: usize) -> Option<Minutes> {
        if !self.grid.vectors.contains(x, y) {
            return None;
        }
        self.arrival[self.grid.vectors.index(x, y)]
    }

    /// Advance one step. Returns `false` once the run has finished and no
    /// work was done.
    pub fn step(&mut self) -> bool {
        if self.finished {
            return false;
        }

        let mut best: FxHashMap<usize, f64> = FxHashMap::default();
        for (target, time) in self.candidates() {
            best.entry(target)
                .and_modify(|t| {
                    if time < *t {
                        *t = time;
                    }
                })
                .or_insert(time);
        }

        let Some(earliest) = best.values().copied().reduce(f64::min) else {
            self.finish();
            return false;
        };
        if earliest > self.duration {
            self.finish();
            return false;
        }

        let mut window_end = self.window_end();
        if earliest > window_end {
            self.step_index = ((earliest / self.dt).ceil() as u64).saturating_sub(1);
            window_end = self.window_end();
            while window_end < earliest {
                self.step_index += 1;
                window_end = self.window_end();
            }
        }

        let mut accepted: Vec<(usize, f64)> = best
            .into_iter()
            .filter(|&(_, time)| time <= window_end)
            .collect();
        accepted.sort_unstable_by_key(|&(idx, _)| idx);

        let stamp = Minutes::new(window_end as f32);
        for &(idx, time) in &accepted {
            self.exact[idx] = time;
            self.arrival[idx] = Some(stamp);
        }
        self.frontier.extend(accepted.iter().map(|&(idx, _)| idx));
        self.retire_enclosed();

        self.clock = window_end;
        self.step_index += 1;
        self.steps_taken += 1;

        debug!(
            step = self.steps_taken,
            clock_min = self.clock,
            ignited = accepted.len(),
            frontier = self.frontier.len(),
            "Spread step"
        );

        if self.clock >= self.duration || self.frontier.is_empty() {
            self.finish();
        }
        true
    }

    /// Consume the state into its arrival grid
    pub fn into_arrival_grid(self) -> ArrivalTimeGrid {
        let (width, height) = self.grid.vectors.dimensions();
        let times = FieldData::from_vec(width, height, self.arrival)
            .unwrap_or_else(|| FieldData::with_value(width, height, None));
        ArrivalTimeGrid {
            times,
            cell_size: self.grid.cell_size,
            duration: Minutes::new(self.duration as f32),
        }
    }

    fn window_end(&self) -> f64 {
        ((self.step_index + 1) as f64 * self.dt).min(self.duration)
    }

    /// Arrival candidates for every unreached passable neighbour of the
    /// frontier, as (cell, exact time)
    fn candidates(&self) -> Vec<(usize, f64)> {
        let grid = self.grid;
        let exact = &self.exact;
        let cell_size = f64::from(grid.cell_size);

        self.frontier
            .par_iter()
            .flat_map_iter(|&source| {
                let vector = grid.vectors.as_slice()[source];
                let start = exact[source];
                NEIGHBOURS.iter().filter_map(move |&(dx, dy)| {
                    let target = grid.neighbour(source, dx, dy)?;
                    if exact[target].is_finite() || !grid.vectors.as_slice()[target].is_passable() {
                        return None;
                    }
                    let rate = f64::from(*vector.rate_toward(neighbour_bearing(dx, dy)));
                    if rate <= 0.0 {
                        return None;
                    }
                    let distance = cell_size * ((dx * dx + dy * dy) as f64).sqrt();
                    Some((target, start + distance / rate))
                })
            })
            .collect()
    }

    fn has_unreached_neighbour(&self, index: usize) -> bool {
        NEIGHBOURS.iter().any(|&(dx, dy)| {
            self.grid.neighbour(index, dx, dy).is_some_and(|n| {
                !self.exact[n].is_finite() && self.grid.vectors.as_slice()[n].is_passable()
            })
        })
    }

    fn retire_enclosed(&mut self) {
        let frontier = std::mem::take(&mut self.frontier);
        self.frontier = frontier
            .into_iter()
            .filter(|&idx| self.has_unreached_neighbour(idx))
            .collect();
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        info!(
            clock_min = self.clock,
            steps = self.steps_taken,
            burned_cells = self.burned_cells(),
            "Spread simulation finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn calm_grid(width: usize, height: usize, rate: f32) -> SpreadGrid {
        SpreadGrid::uniform(
            width,
            height,
            10.0,
            SpreadVector::new(MetersPerMinute::new(rate), Degrees::ZERO, 1.0),
        )
    }

    #[test]
    fn test_bresenham_line() {
        assert_eq!(line_cells((0, 0), (3, 0)), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(line_cells((2, 2), (0, 0)), vec![(2, 2), (1, 1), (0, 0)]);
        let cells = line_cells((0, 0), (5, 2));
        assert_eq!(cells.first(), Some(&(0, 0)));
        assert_eq!(cells.last(), Some(&(5, 2)));
        assert_eq!(cells.len(), 6);
    }

    #[test]
    fn test_neighbour_bearings() {
        assert_relative_eq!(*neighbour_bearing(0, -1), 0.0);
        assert_relative_eq!(*neighbour_bearing(1, 0), 90.0, epsilon = 1e-4);
        assert_relative_eq!(*neighbour_bearing(0, 1), 180.0, epsilon = 1e-4);
        assert_relative_eq!(*neighbour_bearing(-1, 0), 270.0, epsilon = 1e-4);
        assert_relative_eq!(*neighbour_bearing(1, 1), 135.0, epsilon = 1e-4);
    }

    #[test]
    fn test_calm_spread_reaches_orthogonal_neighbour_after_one_cell_time() {
        // 10 m cells at 1 m/min: 10 min per orthogonal cell
        let grid = calm_grid(5, 5, 1.0);
        let arrival = FireSpreadSimulator::default()
            .simulate(
                &grid,
                &IgnitionGeometry::Point { x: 2, y: 2 },
                Minutes::new(25.0),
                Minutes::new(5.0),
            )
            .unwrap();
        assert_eq!(arrival.get(2, 2), Some(Minutes::ZERO));
        assert_eq!(arrival.get(3, 2), Some(Minutes::new(10.0)));
        assert_eq!(arrival.get(2, 4), Some(Minutes::new(20.0)));
        // Diagonal: 14.14 min, stamped at the end of its step
        assert_eq!(arrival.get(3, 3), Some(Minutes::new(15.0)));
        assert_eq!(arrival.get(0, 0), None);
    }

    #[test]
    fn test_step_reduced_to_stability_limit() {
        let grid = calm_grid(4, 4, 5.0);
        let state = FireSpreadSimulator::default()
            .start(
                &grid,
                &IgnitionGeometry::Point { x: 0, y: 0 },
                Minutes::new(60.0),
                Minutes::new(30.0),
            )
            .unwrap();
        assert_relative_eq!(*state.time_step(), 2.0);
    }

    #[test]
    fn test_idle_steps_are_skipped() {
        // 1 m/min on 10 m cells with a 0.1 min step: 100 idle steps per cell
        let grid = calm_grid(3, 1, 1.0);
        let simulator = FireSpreadSimulator::new(SpreadConfig {
            max_time_step: Some(Minutes::new(0.1)),
            ..SpreadConfig::default()
        });
        let mut state = simulator
            .start(
                &grid,
                &IgnitionGeometry::Point { x: 0, y: 0 },
                Minutes::new(100.0),
                Minutes::new(1.0),
            )
            .unwrap();
        while state.step() {}
        assert!(state.steps_taken() <= 3);
        assert_eq!(state.burned_cells(), 3);
        let arrival = state.into_arrival_grid();
        assert_relative_eq!(*arrival.get(2, 0).unwrap(), 20.0, epsilon = 1e-3);
    }

    #[test]
    fn test_non_burnable_ignition_relocated() {
        let mut grid = calm_grid(5, 5, 1.0);
        grid.set_vector(2, 2, SpreadVector::NONE);
        let arrival = FireSpreadSimulator::default()
            .simulate(
                &grid,
                &IgnitionGeometry::Point { x: 2, y: 2 },
                Minutes::new(1.0),
                Minutes::new(1.0),
            )
            .unwrap();
        assert_eq!(arrival.get(2, 2), None);
        assert_eq!(arrival.burned_cells(), 1);
        // Nearest in row-major order among the four orthogonal cells
        assert_eq!(arrival.get(2, 1), Some(Minutes::ZERO));
    }

    #[test]
    fn test_no_burnable_within_radius() {
        let mut grid = calm_grid(5, 5, 1.0);
        for y in 0..5 {
            for x in 0..5 {
                if x < 4 {
                    grid.set_vector(x, y, SpreadVector::NONE);
                }
            }
        }
        let simulator = FireSpreadSimulator::new(SpreadConfig {
            ignition_search_radius: 2,
            ..SpreadConfig::default()
        });
        let err = simulator
            .simulate(
                &grid,
                &IgnitionGeometry::Point { x: 0, y: 0 },
                Minutes::new(10.0),
                Minutes::new(1.0),
            )
            .unwrap_err();
        assert_eq!(
            err,
            FireBehaviorError::NoBurnableIgnition {
                x: 0,
                y: 0,
                search_radius: 2
            }
        );
    }

    #[test]
    fn test_unbounded_search_radius_relocates() {
        let mut grid = calm_grid(5, 5, 1.0);
        for x in 0..4 {
            grid.set_vector(x, 0, SpreadVector::NONE);
        }
        let simulator = FireSpreadSimulator::new(SpreadConfig {
            ignition_search_radius: usize::MAX,
            ..SpreadConfig::default()
        });
        let arrival = simulator
            .simulate(
                &grid,
                &IgnitionGeometry::Point { x: 0, y: 0 },
                Minutes::new(1.0),
                Minutes::new(1.0),
            )
            .unwrap();
        assert_eq!(arrival.get(0, 0), None);
        assert_eq!(arrival.get(0, 1), Some(Minutes::ZERO));
    }

    #[test]
    fn test_state_arrival_off_grid_is_none() {
        let grid = calm_grid(5, 5, 1.0);
        let state = FireSpreadSimulator::default()
            .start(
                &grid,
                &IgnitionGeometry::Point { x: 0, y: 1 },
                Minutes::new(10.0),
                Minutes::new(1.0),
            )
            .unwrap();
        assert_eq!(state.arrival(0, 1), Some(Minutes::ZERO));
        // (5, 0) would alias (0, 1) in the flat buffer
        assert_eq!(state.arrival(5, 0), None);
        assert_eq!(state.arrival(0, 5), None);
        let arrival = state.into_arrival_grid();
        assert_eq!(arrival.get(5, 0), None);
    }

    #[test]
    fn test_default_breaks_follow_configured_interval() {
        let simulator = FireSpreadSimulator::new(SpreadConfig {
            isochrone_interval: Minutes::new(30.0),
            ..SpreadConfig::default()
        });
        assert_eq!(
            simulator.default_breaks(Minutes::new(120.0)),
            vec![Minutes::new(30.0), Minutes::new(60.0), Minutes::new(90.0), Minutes::new(120.0)]
        );
        let hourly = FireSpreadSimulator::default().default_breaks(Minutes::from_hours(3.0));
        assert_eq!(hourly.len(), 3);
    }

    #[test]
    fn test_invalid_parameters() {
        let grid = calm_grid(3, 3, 1.0);
        let sim = FireSpreadSimulator::default();
        let point = IgnitionGeometry::Point { x: 1, y: 1 };
        assert!(matches!(
            sim.simulate(&grid, &point, Minutes::ZERO, Minutes::new(1.0)),
            Err(FireBehaviorError::InvalidSimulationParameters(_))
        ));
        assert!(matches!(
            sim.simulate(&grid, &point, Minutes::new(10.0), Minutes::new(-1.0)),
            Err(FireBehaviorError::InvalidSimulationParameters(_))
        ));
        assert!(matches!(
            sim.simulate(
                &grid,
                &IgnitionGeometry::Point { x: 3, y: 0 },
                Minutes::new(10.0),
                Minutes::new(1.0),
            ),
            Err(FireBehaviorError::IgnitionOutsideGrid { x: 3, y: 0, .. })
        ));
        assert!(matches!(
            sim.simulate(
                &grid,
                &IgnitionGeometry::Points(Vec::new()),
                Minutes::new(10.0),
                Minutes::new(1.0),
            ),
            Err(FireBehaviorError::InvalidSimulationParameters(_))
        ));
    }

    #[test]
    fn test_line_ignition_burns_at_zero() {
        let grid = calm_grid(6, 6, 1.0);
        let arrival = FireSpreadSimulator::default()
            .simulate(
                &grid,
                &IgnitionGeometry::Line { start: (0, 3), end: (5, 3) },
                Minutes::new(5.0),
                Minutes::new(1.0),
            )
            .unwrap();
        assert_eq!(arrival.burned_cells_at(Minutes::ZERO), 6);
        assert!((0..6).all(|x| arrival.get(x, 3) == Some(Minutes::ZERO)));
    }

    #[test]
    fn test_wind_driven_spread_favours_heading() {
        // Head toward east at 2 m/min, L/W 3
        let grid = SpreadGrid::uniform(
            21,
            21,
            10.0,
            SpreadVector::new(MetersPerMinute::new(2.0), Degrees::new(90.0), 3.0),
        );
        let arrival = FireSpreadSimulator::default()
            .simulate(
                &grid,
                &IgnitionGeometry::Point { x: 10, y: 10 },
                Minutes::new(60.0),
                Minutes::new(5.0),
            )
            .unwrap();
        let east = (11..21).filter(|&x| arrival.get(x, 10).is_some()).count();
        let west = (0..10).filter(|&x| arrival.get(x, 10).is_some()).count();
        assert!(east > west, "east {east} west {west}");
    }
}
