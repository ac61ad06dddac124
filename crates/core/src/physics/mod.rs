//! Fire behavior physics: surface spread, crown fire, fire shape and fuel moisture

pub mod behavior;
pub mod crown_fire;
pub mod ellipse;
pub mod fuel_moisture;
pub mod rothermel;

pub use behavior::{evaluate_cell, FireBehaviorResult};
pub use crown_fire::{Canopy, CrownFireAssessment, FireType};
pub use ellipse::SpreadVector;
pub use rothermel::{surface_fire_behavior, SurfaceFireBehavior};
