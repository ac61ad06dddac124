//! Fuel moisture derived from weather
//!
//! Dead fuel moisture is estimated from the equilibrium moisture content
//! (EMC) of fine fuels, with the heavier timelag classes lagging a little
//! wetter. Live herbaceous fuel cures into dead fuel as it dries.
//!
//! # Scientific References
//! - Simard, A.J. (1968). "The moisture content of forest fuels - I. A review of the
//!   basic concepts". Canadian Department of Forest and Rural Development, FF-X-14
//! - Nelson, R.M. (2000). "Prediction of diurnal change in 10-h fuel stick moisture content"
//!   Canadian Journal of Forest Research, 30(7), 1071-1087
//! - Scott, J.H., Burgan, R.E. (2005). RMRS-GTR-153 (dynamic fuel model curing)

use crate::core_types::units::{Fahrenheit, Percent};
use crate::core_types::weather::DeadFuelMoisture;

/// Herb moisture at or below which the herbaceous load is fully cured (%)
pub const HERB_FULLY_CURED: f32 = 30.0;
/// Herb moisture at or above which no herbaceous load is cured (%)
pub const HERB_UNCURED: f32 = 120.0;

/// Desorption equilibrium moisture content of fine dead fuel
///
/// Simard (1968) empirical equation for drying fuel:
/// EMC = b×H + c×T + d×H×T
///
/// # Arguments
/// * `temperature_c` - Air temperature (°C)
/// * `humidity` - Relative humidity (%)
///
/// # Returns
/// Equilibrium moisture content (fraction 0.01-0.40)
pub fn equilibrium_moisture(temperature_c: f32, humidity: f32) -> f32 {
    const B: f32 = 0.00282;
    const C: f32 = -0.000176;
    const D: f32 = -0.0000201;

    let emc = B * humidity + C * temperature_c + D * humidity * temperature_c;
    emc.clamp(0.01, 0.40)
}

/// Dead fuel moisture for the three timelag classes from afternoon weather.
///
/// Fine fuels sit at the desorption EMC; 10-hr and 100-hr fuels are taken
/// one and two percentage points wetter.
pub fn dead_moisture_from_weather(temperature: Fahrenheit, humidity: Percent) -> DeadFuelMoisture {
    let emc = equilibrium_moisture(temperature.to_celsius(), *humidity) * 100.0;
    let one_hour = emc.clamp(1.0, 60.0);
    DeadFuelMoisture::new(
        one_hour,
        (one_hour + 1.0).min(60.0),
        (one_hour + 2.0).min(60.0),
    )
}

/// Fraction of live herbaceous load transferred to the dead class.
///
/// Linear between fully cured (≤ 30 %) and uncured (≥ 120 %).
pub fn herb_curing_fraction(herb_moisture: Percent) -> f32 {
    ((HERB_UNCURED - *herb_moisture) / (HERB_UNCURED - HERB_FULLY_CURED)).clamp(0.0, 1.0)
}
