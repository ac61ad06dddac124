//! Fire Behavior Core Library
//!
//! Surface and crown fire behavior for raster landscapes, plus a wavefront
//! spread simulator that turns per-cell behavior into arrival times.
//!
//! ## Pipeline
//!
//! - Fuel models (Scott & Burgan standard set) and scenario weather
//! - Rothermel surface spread with wind and slope, Byram intensity, flame length
//! - Van Wagner crown fire initiation and spread classification
//! - Row-parallel landscape mapping with scenario statistics
//! - Elliptical wavefront spread, isochrones and ignition surveys
//!
//! ```
//! use fire_behavior_core::{
//!     EnvironmentalConditions, FireSpreadSimulator, IgnitionGeometry, Landscape,
//!     LandscapeFireBehaviorMapper, Minutes,
//! };
//!
//! let landscape = Landscape::synthetic(32, 32, 30.0, 7);
//! let map = LandscapeFireBehaviorMapper::new()
//!     .compute(&landscape, &EnvironmentalConditions::red_flag())
//!     .unwrap();
//! let arrival = FireSpreadSimulator::default()
//!     .simulate(
//!         &map.spread_vectors(),
//!         &IgnitionGeometry::Point { x: 16, y: 16 },
//!         Minutes::from_hours(2.0),
//!         Minutes::new(10.0),
//!     )
//!     .unwrap();
//! assert!(arrival.burned_cells() >= 1);
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Fire behavior models
pub mod physics;

// Rasters and landscape runs
pub mod grid;
pub mod simulation;

// Re-export core types
pub use core_types::{
    DeadFuelMoisture, EnvironmentalConditions, FuelCode, FuelModel, FuelModelCatalog,
    LiveFuelMoisture, ScenarioSet,
};
pub use core_types::{
    BtuPerFootSecond, ChainsPerHour, Degrees, Fahrenheit, Feet, FeetPerMinute, KilowattsPerMeter,
    Meters, MetersPerMinute, MilesPerHour, Minutes, Percent,
};
pub use error::FireBehaviorError;

// Re-export physics
pub use physics::{evaluate_cell, Canopy, FireBehaviorResult, FireType, SpreadVector};

// Re-export landscape and simulation types
pub use grid::{FieldData, Landscape, LandscapeLayers};
pub use simulation::{
    compare_scenarios, extract_isochrones, survey_ignitions, ArrivalTimeGrid, FireBehaviorMap,
    FireSpreadSimulator, IgnitionGeometry, LandscapeFireBehaviorMapper, ScenarioStatistics,
    SpreadConfig, SpreadGrid,
};
