use fire_behavior_core::{
    Degrees, DeadFuelMoisture, EnvironmentalConditions, Fahrenheit, LiveFuelMoisture, MilesPerHour,
    Percent,
};

use crate::error::{DefaultFfiError, FireBehaviorErrorCode};
use crate::helpers::track_error;

/// Scenario weather and fuel moisture, in the units the fire models use.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioParameters {
    /// 20 ft wind speed in mph
    pub wind_speed: f32,
    /// Direction the wind blows from, degrees clockwise from north
    pub wind_direction: f32,
    /// Air temperature in °F
    pub temperature: f32,
    /// Relative humidity in percent
    pub relative_humidity: f32,
    pub dead_one_hour: f32,
    pub dead_ten_hour: f32,
    pub dead_hundred_hour: f32,
    pub live_herb: f32,
    pub live_woody: f32,
    /// Foliar moisture in percent; zero or negative selects the default (100%)
    pub foliar_moisture: f32,
}

impl ScenarioParameters {
    pub(crate) fn to_conditions(self) -> EnvironmentalConditions {
        let conditions = EnvironmentalConditions::new(
            "custom",
            MilesPerHour::new(self.wind_speed),
            Degrees::new(self.wind_direction),
            Fahrenheit::new(self.temperature),
            Percent::new(self.relative_humidity),
            DeadFuelMoisture::new(self.dead_one_hour, self.dead_ten_hour, self.dead_hundred_hour),
            LiveFuelMoisture::new(self.live_herb, self.live_woody),
        );
        if self.foliar_moisture > 0.0 {
            conditions.with_foliar_moisture(Percent::new(self.foliar_moisture))
        } else {
            conditions
        }
    }
}

impl From<&EnvironmentalConditions> for ScenarioParameters {
    fn from(conditions: &EnvironmentalConditions) -> Self {
        Self {
            wind_speed: *conditions.wind_speed,
            wind_direction: *conditions.wind_direction,
            temperature: *conditions.temperature,
            relative_humidity: *conditions.relative_humidity,
            dead_one_hour: *conditions.dead_moisture.one_hour,
            dead_ten_hour: *conditions.dead_moisture.ten_hour,
            dead_hundred_hour: *conditions.dead_moisture.hundred_hour,
            live_herb: *conditions.live_moisture.herb,
            live_woody: *conditions.live_moisture.woody,
            foliar_moisture: conditions.foliar_moisture.map_or(0.0, |p| *p),
        }
    }
}

/// Built-in weather scenarios.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioPreset {
    /// 8 mph wind, 35% RH
    Typical = 0,
    /// 25 mph wind, 15% RH
    RedFlag = 1,
    /// 40 mph wind, 8% RH
    Extreme = 2,
}

impl ScenarioPreset {
    fn conditions(self) -> EnvironmentalConditions {
        match self {
            ScenarioPreset::Typical => EnvironmentalConditions::typical(),
            ScenarioPreset::RedFlag => EnvironmentalConditions::red_flag(),
            ScenarioPreset::Extreme => EnvironmentalConditions::extreme(),
        }
    }
}

/// Fill `out_parameters` with a built-in scenario, as a starting point for
/// caller adjustments.
///
/// # Returns
/// - `Ok` with `*out_parameters` written
/// - `NullPointer` if `out_parameters` is null
///
/// # Safety
/// `out_parameters` must be writable.
#[no_mangle]
pub unsafe extern "C" fn fire_behavior_scenario_preset(
    preset: ScenarioPreset,
    out_parameters: *mut ScenarioParameters,
) -> FireBehaviorErrorCode {
    if out_parameters.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_parameters"));
    }

    unsafe {
        *out_parameters = ScenarioParameters::from(&preset.conditions());
    }
    FireBehaviorErrorCode::Ok
}
