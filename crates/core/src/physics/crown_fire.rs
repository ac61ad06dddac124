//! Van Wagner Crown Fire Initiation and Spread Model (1977, 1993)
//!
//! Classifies a surface fire into the ladder surface → passive crown →
//! active crown:
//! - Critical surface intensity for initiation from canopy base height and
//!   foliar moisture
//! - Critical crown spread rate for active (continuous) crowning from canopy
//!   bulk density
//! - Crown rate of spread from Rothermel (1991)
//!
//! # Scientific References
//! - Van Wagner, C.E. (1977). "Conditions for the start and spread of crown fire"
//!   Canadian Journal of Forest Research, 7(1), 23-34
//! - Van Wagner, C.E. (1993). "Prediction of crown fire behavior in two stands of jack pine"
//!   Canadian Journal of Forest Research, 23(3), 442-449
//! - Rothermel, R.C. (1991). "Predicting behavior and size of crown fires in the Northern
//!   Rocky Mountains." USDA Forest Service Research Paper INT-438.

use crate::core_types::fuel::FuelModelCatalog;
use crate::core_types::units::{Degrees, KilowattsPerMeter, Meters, MetersPerMinute, Percent};
use crate::core_types::weather::EnvironmentalConditions;
use crate::error::FireBehaviorError;
use crate::physics::rothermel;
use serde::{Deserialize, Serialize};

/// Reference fuel model for crown spread (Anderson 13, model 10)
pub const CROWN_REFERENCE_FUEL: &str = "FM10";
/// Rothermel (1991) ratio of crown to FM10 surface spread
const CROWN_SPREAD_MULTIPLIER: f32 = 3.34;
/// Critical mass flow rate for active crowning (kg/m²/min)
const CRITICAL_MASS_FLOW: f32 = 3.0;

/// Fire type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireType {
    /// Fuel does not carry fire
    NoSpread,
    /// Surface fire only
    Surface,
    /// Passive crown fire - intermittent torching of individual trees
    PassiveCrown,
    /// Active crown fire - continuous crown fire spread
    ActiveCrown,
}

impl FireType {
    /// Stable numeric code for raster export
    pub fn code(self) -> u8 {
        match self {
            FireType::NoSpread => 0,
            FireType::Surface => 1,
            FireType::PassiveCrown => 2,
            FireType::ActiveCrown => 3,
        }
    }

    pub fn is_crown_fire(self) -> bool {
        matches!(self, FireType::PassiveCrown | FireType::ActiveCrown)
    }
}

/// Canopy attributes of one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canopy {
    pub base_height: Meters,
    /// Canopy bulk density (kg/m³)
    pub bulk_density: f32,
    /// Canopy cover fraction [0, 1]
    pub cover: f32,
}

impl Canopy {
    pub fn none() -> Self {
        Self {
            base_height: Meters::ZERO,
            bulk_density: 0.0,
            cover: 0.0,
        }
    }

    /// A canopy that could carry crown fire
    pub fn is_present(&self) -> bool {
        self.cover > 0.0 && self.bulk_density > 0.0
    }
}

/// Crown fire assessment for one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrownFireAssessment {
    pub fire_type: FireType,
    /// Critical surface intensity for initiation
    pub critical_surface_intensity: KilowattsPerMeter,
    /// Critical crown spread rate for active crowning
    pub critical_crown_spread_rate: MetersPerMinute,
    /// Crown fire rate of spread (potential)
    pub crown_rate_of_spread: MetersPerMinute,
    /// Fraction of the canopy consumed [0, 1]
    pub crown_fraction_burned: f32,
}

/// Van Wagner (1977) critical surface intensity for crown initiation.
///
/// `I₀ = (0.010 · CBH · (460 + 25.9 · FMC))^1.5` kW/m, CBH in metres and
/// FMC in percent.
pub fn critical_surface_intensity(
    base_height: Meters,
    foliar_moisture: Percent,
) -> KilowattsPerMeter {
    let cbh = base_height.max(Meters::ZERO).value();
    let heat_of_ignition = 460.0 + 25.9 * *foliar_moisture;
    KilowattsPerMeter::new((0.010 * cbh * heat_of_ignition).powf(1.5))
}

/// Van Wagner (1977) critical crown spread rate `R'₀ = 3.0 / CBD` (m/min).
///
/// Infinite when there is no canopy fuel.
pub fn critical_crown_spread_rate(bulk_density: f32) -> MetersPerMinute {
    if bulk_density <= 0.0 {
        return MetersPerMinute::new(f32::INFINITY);
    }
    MetersPerMinute::new(CRITICAL_MASS_FLOW / bulk_density)
}

/// Crown fraction burned `1 - exp(-0.23·(R - R'₀))`, 0 below the threshold
pub fn crown_fraction_burned(crown_rate: MetersPerMinute, critical_rate: MetersPerMinute) -> f32 {
    let excess = *crown_rate - *critical_rate;
    if !excess.is_finite() || excess <= 0.0 {
        return 0.0;
    }
    (1.0 - (-0.23 * excess).exp()).clamp(0.0, 1.0)
}

/// Rothermel (1991) crown rate of spread: 3.34 × the FM10 surface rate on
/// flat ground under the same wind and moisture.
///
/// # Errors
/// `UnknownFuelModel` if the catalog lacks the FM10 reference model
pub fn crown_rate_of_spread(
    conditions: &EnvironmentalConditions,
    catalog: &FuelModelCatalog,
) -> Result<MetersPerMinute, FireBehaviorError> {
    let reference = catalog.lookup(CROWN_REFERENCE_FUEL)?;
    let surface =
        rothermel::surface_fire_behavior(reference, conditions, Degrees::ZERO, Degrees::ZERO);
    Ok(surface.rate_of_spread.to_meters_per_minute() * CROWN_SPREAD_MULTIPLIER)
}

/// Walk the surface → passive → active ladder for one cell.
///
/// # Arguments
/// * `surface_intensity` - Surface fireline intensity at the head
/// * `canopy` - Canopy attributes of the cell
/// * `foliar_moisture` - Foliar moisture content
/// * `crown_rate` - Crown rate of spread for the scenario
pub fn assess_crown_fire(
    surface_intensity: KilowattsPerMeter,
    canopy: &Canopy,
    foliar_moisture: Percent,
    crown_rate: MetersPerMinute,
) -> CrownFireAssessment {
    let critical_intensity = critical_surface_intensity(canopy.base_height, foliar_moisture);
    let critical_rate = critical_crown_spread_rate(canopy.bulk_density);

    let fire_type = if *surface_intensity <= 0.0 {
        FireType::NoSpread
    } else if !canopy.is_present() || surface_intensity < critical_intensity {
        FireType::Surface
    } else if crown_rate >= critical_rate {
        FireType::ActiveCrown
    } else {
        FireType::PassiveCrown
    };

    let crown_fraction_burned = if fire_type == FireType::ActiveCrown {
        crown_fraction_burned(crown_rate, critical_rate)
    } else {
        0.0
    };

    CrownFireAssessment {
        fire_type,
        critical_surface_intensity: critical_intensity,
        critical_crown_spread_rate: critical_rate,
        crown_rate_of_spread: crown_rate,
        crown_fraction_burned,
    }
}
