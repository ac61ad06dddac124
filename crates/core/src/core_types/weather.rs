//! Environmental conditions (weather + fuel moisture) for one scenario
//!
//! A scenario is an immutable snapshot: once validated it is shared by every
//! cell of a landscape pass. Scenarios are named so several can be compared
//! side by side on the same landscape.

use crate::core_types::units::{Degrees, Fahrenheit, MilesPerHour, Percent};
use crate::error::FireBehaviorError;
use crate::physics::fuel_moisture;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Foliar moisture content assumed when a scenario does not supply one
pub const DEFAULT_FOLIAR_MOISTURE: Percent = Percent::new(100.0);

/// Dead fuel moisture by timelag class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeadFuelMoisture {
    pub one_hour: Percent,
    pub ten_hour: Percent,
    pub hundred_hour: Percent,
}

impl DeadFuelMoisture {
    pub fn new(one_hour: f32, ten_hour: f32, hundred_hour: f32) -> Self {
        Self {
            one_hour: Percent::new(one_hour),
            ten_hour: Percent::new(ten_hour),
            hundred_hour: Percent::new(hundred_hour),
        }
    }
}

/// Live fuel moisture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveFuelMoisture {
    pub herb: Percent,
    pub woody: Percent,
}

impl LiveFuelMoisture {
    pub fn new(herb: f32, woody: f32) -> Self {
        Self {
            herb: Percent::new(herb),
            woody: Percent::new(woody),
        }
    }
}

/// Weather and fuel moisture snapshot for one named scenario.
///
/// `wind_speed` is the midflame wind speed. `wind_direction` is the compass
/// bearing the wind blows *from* (meteorological convention), so a 0° wind
/// pushes the fire toward 180°.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalConditions {
    pub name: String,
    pub wind_speed: MilesPerHour,
    pub wind_direction: Degrees,
    pub temperature: Fahrenheit,
    pub relative_humidity: Percent,
    pub dead_moisture: DeadFuelMoisture,
    pub live_moisture: LiveFuelMoisture,
    #[serde(default)]
    pub foliar_moisture: Option<Percent>,
}

impl EnvironmentalConditions {
    /// Create a scenario from explicit fuel moistures
    pub fn new(
        name: impl Into<String>,
        wind_speed: MilesPerHour,
        wind_direction: Degrees,
        temperature: Fahrenheit,
        relative_humidity: Percent,
        dead_moisture: DeadFuelMoisture,
        live_moisture: LiveFuelMoisture,
    ) -> Self {
        Self {
            name: name.into(),
            wind_speed,
            wind_direction,
            temperature,
            relative_humidity,
            dead_moisture,
            live_moisture,
            foliar_moisture: None,
        }
    }

    /// Create a scenario deriving dead fuel moisture from temperature and
    /// relative humidity via the equilibrium moisture content.
    pub fn from_weather(
        name: impl Into<String>,
        wind_speed: MilesPerHour,
        wind_direction: Degrees,
        temperature: Fahrenheit,
        relative_humidity: Percent,
        live_moisture: LiveFuelMoisture,
    ) -> Self {
        let dead_moisture =
            fuel_moisture::dead_moisture_from_weather(temperature, relative_humidity);
        Self::new(
            name,
            wind_speed,
            wind_direction,
            temperature,
            relative_humidity,
            dead_moisture,
            live_moisture,
        )
    }

    /// Moderate summer afternoon: 8 mph, 35% RH
    pub fn typical() -> Self {
        Self::new(
            "typical",
            MilesPerHour::new(8.0),
            Degrees::new(0.0),
            Fahrenheit::new(80.0),
            Percent::new(35.0),
            DeadFuelMoisture::new(8.0, 9.0, 10.0),
            LiveFuelMoisture::new(90.0, 120.0),
        )
    }

    /// Red flag warning: 25 mph, 15% RH
    pub fn red_flag() -> Self {
        Self::new(
            "red_flag",
            MilesPerHour::new(25.0),
            Degrees::new(0.0),
            Fahrenheit::new(95.0),
            Percent::new(15.0),
            DeadFuelMoisture::new(4.0, 5.0, 6.0),
            LiveFuelMoisture::new(60.0, 90.0),
        )
    }

    /// Extreme wind event: 40 mph, 8% RH
    pub fn extreme() -> Self {
        Self::new(
            "extreme",
            MilesPerHour::new(40.0),
            Degrees::new(0.0),
            Fahrenheit::new(105.0),
            Percent::new(8.0),
            DeadFuelMoisture::new(3.0, 4.0, 5.0),
            LiveFuelMoisture::new(30.0, 70.0),
        )
    }

    pub fn with_wind(mut self, speed: MilesPerHour, direction: Degrees) -> Self {
        self.wind_speed = speed;
        self.wind_direction = direction;
        self
    }

    pub fn with_dead_moisture(mut self, dead_moisture: DeadFuelMoisture) -> Self {
        self.dead_moisture = dead_moisture;
        self
    }

    pub fn with_live_moisture(mut self, live_moisture: LiveFuelMoisture) -> Self {
        self.live_moisture = live_moisture;
        self
    }

    pub fn with_foliar_moisture(mut self, foliar_moisture: Percent) -> Self {
        self.foliar_moisture = Some(foliar_moisture);
        self
    }

    /// Foliar moisture, falling back to [`DEFAULT_FOLIAR_MOISTURE`]
    pub fn foliar_moisture_or_default(&self) -> Percent {
        self.foliar_moisture.unwrap_or(DEFAULT_FOLIAR_MOISTURE)
    }

    /// Check every parameter against its physical range.
    ///
    /// # Errors
    /// `InvalidEnvironmentalConditions` naming the first offending parameter
    pub fn validate(&self) -> Result<(), FireBehaviorError> {
        let checks: [(&'static str, f32, f32, f32, &'static str); 9] = [
            ("wind_speed", *self.wind_speed, 0.0, 150.0, "0-150 mph"),
            ("temperature", *self.temperature, -40.0, 130.0, "-40-130 °F"),
            ("relative_humidity", *self.relative_humidity, 0.0, 100.0, "0-100 %"),
            ("dead_moisture.one_hour", *self.dead_moisture.one_hour, 1.0, 60.0, "1-60 %"),
            ("dead_moisture.ten_hour", *self.dead_moisture.ten_hour, 1.0, 60.0, "1-60 %"),
            ("dead_moisture.hundred_hour", *self.dead_moisture.hundred_hour, 1.0, 60.0, "1-60 %"),
            ("live_moisture.herb", *self.live_moisture.herb, 30.0, 300.0, "30-300 %"),
            ("live_moisture.woody", *self.live_moisture.woody, 30.0, 300.0, "30-300 %"),
            (
                "foliar_moisture",
                *self.foliar_moisture_or_default(),
                50.0,
                300.0,
                "50-300 %",
            ),
        ];

        for (parameter, value, min, max, expected) in checks {
            // NaN is outside every range
            if !(min..=max).contains(&value) {
                return Err(self.invalid(parameter, value, expected));
            }
        }

        let direction = *self.wind_direction;
        if !(0.0..360.0).contains(&direction) {
            return Err(self.invalid("wind_direction", direction, "0-360 °"));
        }

        Ok(())
    }

    fn invalid(
        &self,
        parameter: &'static str,
        value: f32,
        expected: &'static str,
    ) -> FireBehaviorError {
        FireBehaviorError::InvalidEnvironmentalConditions {
            scenario: self.name.clone(),
            parameter,
            value,
            expected,
        }
    }
}

impl Default for EnvironmentalConditions {
    fn default() -> Self {
        Self::typical()
    }
}

/// A named set of scenarios, typically loaded from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub scenarios: Vec<EnvironmentalConditions>,
}

impl ScenarioSet {
    /// The three standard presets in increasing severity
    pub fn standard() -> Self {
        Self {
            scenarios: vec![
                EnvironmentalConditions::typical(),
                EnvironmentalConditions::red_flag(),
                EnvironmentalConditions::extreme(),
            ],
        }
    }

    /// Parse and validate a scenario set from JSON
    ///
    /// # Errors
    /// `ScenarioConfig` on malformed JSON, or the first validation error
    pub fn from_json_str(json: &str) -> Result<Self, FireBehaviorError> {
        let set: Self = serde_json::from_str(json)
            .map_err(|e| FireBehaviorError::ScenarioConfig(e.to_string()))?;
        set.validate()?;
        Ok(set)
    }

    /// Load and validate a scenario set from a JSON file
    ///
    /// # Errors
    /// `ScenarioConfig` if the file cannot be read or parsed, or the first
    /// validation error
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FireBehaviorError> {
        let contents =
            fs::read_to_string(path).map_err(|e| FireBehaviorError::ScenarioConfig(e.to_string()))?;
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// `ScenarioConfig` if serialization fails
    pub fn to_json(&self) -> Result<String, FireBehaviorError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FireBehaviorError::ScenarioConfig(e.to_string()))
    }

    /// Validate every scenario
    ///
    /// # Errors
    /// The first validation error encountered
    pub fn validate(&self) -> Result<(), FireBehaviorError> {
        self.scenarios.iter().try_for_each(EnvironmentalConditions::validate)
    }

    pub fn get(&self, name: &str) -> Option<&EnvironmentalConditions> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}
