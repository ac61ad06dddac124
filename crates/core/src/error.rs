//! Error type shared by the catalog, landscape, mapper and simulator.
//!
//! Grid-level and scenario-level problems abort before any cell work starts.
//! Cell-level `NoData` is not an error: those cells produce an undefined
//! (`None`) result and the pass continues.

use std::fmt;

/// Errors raised by fire behavior computations
#[derive(Debug, Clone, PartialEq)]
pub enum FireBehaviorError {
    /// Fuel model code is not in the catalog. `location` is the raster
    /// cell (x, y) when the code came from a landscape layer.
    UnknownFuelModel {
        code: String,
        location: Option<(usize, usize)>,
    },
    /// Scenario parameter outside its physical range
    InvalidEnvironmentalConditions {
        scenario: String,
        parameter: &'static str,
        value: f32,
        expected: &'static str,
    },
    /// A landscape layer does not share the fuel layer's dimensions
    MisalignedLandscapeGrids {
        layer: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// A landscape cell violates a layer invariant (slope, aspect, canopy cover, ...)
    InvalidLandscapeValue {
        layer: &'static str,
        x: usize,
        y: usize,
        value: f32,
    },
    /// Non-positive duration or time step, or other malformed simulation input
    InvalidSimulationParameters(String),
    /// Ignition point lies outside the landscape grid
    IgnitionOutsideGrid {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// No burnable cell within the ignition search radius
    NoBurnableIgnition {
        x: usize,
        y: usize,
        search_radius: usize,
    },
    /// Scenario file could not be read or parsed
    ScenarioConfig(String),
}

impl fmt::Display for FireBehaviorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FireBehaviorError::UnknownFuelModel {
                code,
                location: Some((x, y)),
            } => write!(f, "Unknown fuel model '{code}' at cell ({x}, {y})"),
            FireBehaviorError::UnknownFuelModel {
                code,
                location: None,
            } => write!(f, "Unknown fuel model '{code}'"),
            FireBehaviorError::InvalidEnvironmentalConditions {
                scenario,
                parameter,
                value,
                expected,
            } => write!(
                f,
                "Scenario '{scenario}': {parameter} = {value} is invalid (expected {expected})"
            ),
            FireBehaviorError::MisalignedLandscapeGrids {
                layer,
                expected,
                found,
            } => write!(
                f,
                "Landscape layer '{layer}' is {}x{}, expected {}x{}",
                found.0, found.1, expected.0, expected.1
            ),
            FireBehaviorError::InvalidLandscapeValue { layer, x, y, value } => {
                write!(f, "Invalid {layer} value {value} at cell ({x}, {y})")
            }
            FireBehaviorError::InvalidSimulationParameters(msg) => {
                write!(f, "Invalid simulation parameters: {msg}")
            }
            FireBehaviorError::IgnitionOutsideGrid {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "Ignition ({x}, {y}) is outside the {width}x{height} grid"
            ),
            FireBehaviorError::NoBurnableIgnition { x, y, search_radius } => write!(
                f,
                "No burnable cell within {search_radius} cells of ignition ({x}, {y})"
            ),
            FireBehaviorError::ScenarioConfig(msg) => write!(f, "Failed to load scenarios: {msg}"),
        }
    }
}

impl std::error::Error for FireBehaviorError {}
