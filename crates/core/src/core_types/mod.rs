//! Core types: units, fuel models and environmental conditions

pub mod fuel;
pub mod units;
pub mod weather;

pub use fuel::{FuelCode, FuelLoads, FuelModel, FuelModelCatalog, SurfaceAreaToVolume};
pub use units::*;
pub use weather::{
    DeadFuelMoisture, EnvironmentalConditions, LiveFuelMoisture, ScenarioSet,
    DEFAULT_FOLIAR_MOISTURE,
};
