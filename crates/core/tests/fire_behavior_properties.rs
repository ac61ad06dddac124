//! Property checks for single-cell fire behavior
//!
//! Sweeps wind, slope and fuel to confirm the surface and crown models respond
//! in the physically expected direction across the standard catalog.

mod common;

use fire_behavior_core::core_types::units::{
    BtuPerFootSecond, Degrees, Meters, MetersPerMinute, MilesPerHour, Percent,
};
use fire_behavior_core::core_types::weather::{DeadFuelMoisture, EnvironmentalConditions};
use fire_behavior_core::core_types::FuelModelCatalog;
use fire_behavior_core::physics::crown_fire::{self, Canopy, FireType};
use fire_behavior_core::physics::rothermel;
use fire_behavior_core::physics::{evaluate_cell, FireBehaviorResult};

fn evaluate(
    code: &str,
    conditions: &EnvironmentalConditions,
    slope: f32,
    aspect: f32,
) -> FireBehaviorResult {
    let catalog = FuelModelCatalog::standard();
    let crown_rate = crown_fire::crown_rate_of_spread(conditions, catalog).unwrap();
    evaluate_cell(
        catalog.lookup(code).unwrap(),
        conditions,
        Degrees::new(slope),
        Degrees::new(aspect),
        &Canopy::none(),
        crown_rate,
    )
}

fn burnable_codes() -> Vec<&'static str> {
    FuelModelCatalog::standard()
        .models()
        .filter(|m| m.burnable)
        .map(|m| m.code)
        .collect()
}

#[test]
fn non_burnable_models_never_spread() {
    let catalog = FuelModelCatalog::standard();
    let scenarios = [
        EnvironmentalConditions::typical(),
        EnvironmentalConditions::red_flag(),
        EnvironmentalConditions::extreme(),
    ];
    for model in catalog.models().filter(|m| !m.burnable) {
        for scenario in &scenarios {
            for slope in [0.0, 25.0, 60.0] {
                let result = evaluate(model.code, scenario, slope, 90.0);
                assert_eq!(*result.rate_of_spread, 0.0, "{} ROS", model.code);
                assert_eq!(*result.fireline_intensity, 0.0, "{} intensity", model.code);
                assert_eq!(*result.flame_length, 0.0, "{} flame", model.code);
                assert_eq!(result.fire_type, FireType::NoSpread);
            }
        }
    }
}

#[test]
fn rate_of_spread_non_decreasing_in_wind() {
    for code in burnable_codes() {
        let mut previous = 0.0;
        for wind in (0..=60).step_by(5) {
            let conditions = EnvironmentalConditions::typical()
                .with_wind(MilesPerHour::new(wind as f32), Degrees::new(0.0));
            let ros = *evaluate(code, &conditions, 10.0, 180.0).rate_of_spread;
            assert!(
                ros >= previous,
                "{code}: ROS fell from {previous} to {ros} at {wind} mph"
            );
            previous = ros;
        }
    }
}

#[test]
fn rate_of_spread_non_decreasing_in_slope() {
    // Wind pushes south, upslope faces south as well (aspect north)
    let conditions = EnvironmentalConditions::red_flag();
    for code in burnable_codes() {
        let mut previous = 0.0;
        for slope in (0..=80).step_by(5) {
            let ros = *evaluate(code, &conditions, slope as f32, 0.0).rate_of_spread;
            assert!(
                ros >= previous,
                "{code}: ROS fell from {previous} to {ros} at {slope}°"
            );
            previous = ros;
        }
    }
}

#[test]
fn flame_length_increases_with_intensity() {
    let mut previous = 0.0;
    for i in 1..200 {
        let flame = *rothermel::flame_length(BtuPerFootSecond::new(i as f32 * 50.0));
        assert!(flame > previous);
        previous = flame;
    }
}

#[test]
fn intensity_below_initiation_threshold_stays_surface() {
    let catalog = FuelModelCatalog::standard();
    let conditions = EnvironmentalConditions::typical();
    let crown_rate = crown_fire::crown_rate_of_spread(&conditions, catalog).unwrap();
    // 30 m canopy base: initiation needs roughly 27 MW/m
    let canopy = Canopy {
        base_height: Meters::new(30.0),
        bulk_density: 0.3,
        cover: 0.8,
    };
    for code in burnable_codes() {
        let result = evaluate_cell(
            catalog.lookup(code).unwrap(),
            &conditions,
            Degrees::new(5.0),
            Degrees::new(0.0),
            &canopy,
            crown_rate,
        );
        assert!(result.fireline_intensity_metric < result.critical_surface_intensity);
        assert_eq!(result.fire_type, FireType::Surface, "{code}");
    }
}

#[test]
fn low_canopy_under_extreme_weather_crowns() {
    let catalog = FuelModelCatalog::standard();
    let conditions = EnvironmentalConditions::extreme();
    let crown_rate = crown_fire::crown_rate_of_spread(&conditions, catalog).unwrap();
    let canopy = Canopy {
        base_height: Meters::new(1.0),
        bulk_density: 0.05,
        cover: 0.7,
    };
    let result = evaluate_cell(
        catalog.lookup("TU5").unwrap(),
        &conditions,
        Degrees::new(20.0),
        Degrees::new(0.0),
        &canopy,
        crown_rate,
    );
    assert!(result.crown_rate_of_spread > MetersPerMinute::ZERO);
    assert_eq!(result.fire_type, FireType::ActiveCrown);
    assert!(result.crown_fraction_burned > 0.0 && result.crown_fraction_burned <= 1.0);
}

#[test]
fn grass_wind_raises_rate_and_flame() {
    let base = EnvironmentalConditions::typical()
        .with_dead_moisture(DeadFuelMoisture::new(6.0, 7.0, 8.0));
    let calm = base.clone().with_wind(MilesPerHour::ZERO, Degrees::new(0.0));
    let windy = base.with_wind(MilesPerHour::new(15.0), Degrees::new(0.0));

    let calm = evaluate("GR2", &calm, 20.0, 180.0);
    let windy = evaluate("GR2", &windy, 20.0, 180.0);

    assert!(*calm.rate_of_spread > 0.0);
    assert!(*windy.rate_of_spread > *calm.rate_of_spread);
    assert!(*windy.flame_length > *calm.flame_length);
}

#[test]
fn wetter_fuel_spreads_slower() {
    let dry = EnvironmentalConditions::typical()
        .with_dead_moisture(DeadFuelMoisture::new(4.0, 5.0, 6.0));
    let damp = EnvironmentalConditions::typical()
        .with_dead_moisture(DeadFuelMoisture::new(10.0, 11.0, 12.0));
    for code in ["GR2", "SH5", "TL5", "TU1"] {
        let dry_ros = evaluate(code, &dry, 0.0, 0.0).rate_of_spread;
        let damp_ros = evaluate(code, &damp, 0.0, 0.0).rate_of_spread;
        assert!(dry_ros > damp_ros, "{code}: dry {dry_ros} damp {damp_ros}");
    }
}

#[test]
fn foliar_moisture_raises_initiation_threshold() {
    let low = crown_fire::critical_surface_intensity(Meters::new(4.0), Percent::new(80.0));
    let high = crown_fire::critical_surface_intensity(Meters::new(4.0), Percent::new(120.0));
    assert!(high > low);
}
