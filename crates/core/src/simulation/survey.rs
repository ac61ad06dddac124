//! Ignition survey: how large does a fire get from each of many start points?

use crate::core_types::units::Minutes;
use crate::error::FireBehaviorError;
use crate::simulation::spread::{FireSpreadSimulator, IgnitionGeometry, SpreadGrid};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Burned-area class of one ignition point
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

impl RiskLevel {
    /// Low below 50 acres, Moderate below 200, High below 500, otherwise Extreme
    pub fn from_burned_acres(acres: f32) -> Self {
        if acres < 50.0 {
            RiskLevel::Low
        } else if acres < 200.0 {
            RiskLevel::Moderate
        } else if acres < 500.0 {
            RiskLevel::High
        } else {
            RiskLevel::Extreme
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Extreme => "extreme",
        };
        f.write_str(name)
    }
}

/// Outcome of one surveyed ignition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IgnitionSurveyPoint {
    pub x: usize,
    pub y: usize,
    pub burned_cells: usize,
    pub burned_hectares: f32,
    pub burned_acres: f32,
    pub risk: RiskLevel,
}

/// Grid of ignition points every `spacing` cells, offset half a spacing from the edges
pub fn regular_ignition_points(width: usize, height: usize, spacing: usize) -> Vec<(usize, usize)> {
    let spacing = spacing.max(1);
    let offset = spacing / 2;
    (offset..height)
        .step_by(spacing)
        .flat_map(|y| (offset..width).step_by(spacing).map(move |x| (x, y)))
        .collect()
}

/// Simulate a fire from each point and classify it by burned area.
///
/// Points whose neighbourhood holds nothing burnable are skipped; the output
/// keeps the input order of the remaining points.
///
/// # Errors
/// Any simulation error other than `NoBurnableIgnition` (invalid duration or
/// step, point outside the grid)
pub fn survey_ignitions(
    simulator: &FireSpreadSimulator,
    grid: &SpreadGrid,
    points: &[(usize, usize)],
    duration: Minutes,
    time_step: Minutes,
) -> Result<Vec<IgnitionSurveyPoint>, FireBehaviorError> {
    let outcomes = points
        .par_iter()
        .map(|&(x, y)| {
            match simulator.simulate(grid, &IgnitionGeometry::Point { x, y }, duration, time_step) {
                Ok(arrival) => {
                    let (burned_hectares, burned_acres) = arrival.burned_area(duration);
                    Ok(Some(IgnitionSurveyPoint {
                        x,
                        y,
                        burned_cells: arrival.burned_cells(),
                        burned_hectares,
                        burned_acres,
                        risk: RiskLevel::from_burned_acres(burned_acres),
                    }))
                }
                Err(FireBehaviorError::NoBurnableIgnition { .. }) => {
                    debug!(x, y, "Survey point skipped: nothing burnable nearby");
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let surveyed: Vec<IgnitionSurveyPoint> = outcomes.into_iter().flatten().collect();
    let extreme = surveyed.iter().filter(|p| p.risk == RiskLevel::Extreme).count();
    info!(
        requested = points.len(),
        surveyed = surveyed.len(),
        extreme,
        "Ignition survey complete"
    );
    Ok(surveyed)
}
