//! C interface to the fire behavior engine
//!
//! Landscapes are opaque handles; every other value crosses the boundary as a
//! `#[repr(C)]` struct or a caller-owned buffer. Each call returns a
//! [`FireBehaviorErrorCode`] and records a message readable through
//! [`fire_behavior_get_last_error`] on the calling thread.

mod behavior;
mod error;
mod helpers;
mod landscape;
mod scenario;
mod spread;

pub use behavior::{fire_behavior_compute, BehaviorOutputs, BehaviorSummary};
pub use error::{
    fire_behavior_get_last_error, fire_behavior_get_last_error_code, FireBehaviorErrorCode,
};
pub use landscape::{
    fire_behavior_landscape_destroy, fire_behavior_landscape_dimensions,
    fire_behavior_landscape_new, FireBehaviorLandscape, LandscapeRasters,
};
pub use scenario::{fire_behavior_scenario_preset, ScenarioParameters, ScenarioPreset};
pub use spread::{fire_behavior_simulate, SpreadRequest, SpreadSummary};
