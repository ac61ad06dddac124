//! Landscape-scale runs: per-cell behavior mapping, scenario statistics,
//! wavefront spread, isochrones and ignition surveys

pub mod behavior_map;
pub mod isochrones;
pub mod spread;
pub mod statistics;
pub mod survey;

pub use behavior_map::{FireBehaviorMap, LandscapeFireBehaviorMapper};
pub use isochrones::{
    arrival_bands, extract_isochrones, hourly_breaks, interval_breaks, perimeter_segments,
    threat_breaks, Isochrone, IsochroneBand, PerimeterSegment, THREAT_BREAKS_HOURS,
};
pub use spread::{
    ArrivalTimeGrid, FireSpreadSimulator, IgnitionGeometry, SpreadConfig, SpreadGrid,
    SpreadSimulationState, DEFAULT_IGNITION_SEARCH_RADIUS,
};
pub use statistics::{compare_scenarios, FireTypeCounts, ScenarioStatistics};
pub use survey::{regular_ignition_points, survey_ignitions, IgnitionSurveyPoint, RiskLevel};
