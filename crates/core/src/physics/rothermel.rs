//! Rothermel Surface Fire Spread Model (1972)
//!
//! Multi-class implementation of the Rothermel model with the Albini (1976)
//! live fuel moisture of extinction, evaluated in the US customary units the
//! equations were fitted in (lb, ft, BTU, min).
//!
//! # References
//! - Rothermel, R.C. (1972). "A mathematical model for predicting fire spread in wildland fuels."
//!   USDA Forest Service Research Paper INT-115.
//! - Albini, F.A. (1976). "Estimating wildfire behavior and effects."
//!   USDA Forest Service General Technical Report INT-30.
//! - Byram, G.M. (1959). "Combustion of forest fuels." In: Forest Fire: Control and Use.
//! - Andrews, P.L., Cruz, M.G., Rothermel, R.C. (2013). "Examination of the wind speed limit
//!   function in the Rothermel surface fire spread model." International Journal of Wildland
//!   Fire, 22(7), 959-969.

use crate::core_types::fuel::{FuelModel, HUNDRED_HOUR_SAV, TEN_HOUR_SAV};
use crate::core_types::units::{
    BtuPerFootSecond, Degrees, Feet, FeetPerMinute, MilesPerHour, Minutes, Percent,
};
use crate::core_types::weather::EnvironmentalConditions;
use crate::physics::{ellipse, fuel_moisture};
use nalgebra::Vector2;

/// Oven-dry particle density (lb/ft³)
const PARTICLE_DENSITY: f64 = 32.0;
/// Total mineral content (fraction)
const TOTAL_MINERAL_CONTENT: f64 = 0.0555;
/// Effective (silica-free) mineral content (fraction)
const EFFECTIVE_MINERAL_CONTENT: f64 = 0.010;
const TONS_PER_ACRE_TO_LB_PER_FT2: f64 = 0.0459137;
/// Steepest slope evaluated; tan² diverges at 90°
const MAX_SLOPE_DEGREES: f64 = 89.9;

/// Result of one surface fire evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceFireBehavior {
    /// Head fire rate of spread
    pub rate_of_spread: FeetPerMinute,
    /// Rate with no wind and no slope (R0)
    pub no_wind_no_slope_rate: FeetPerMinute,
    /// Reaction intensity (BTU/ft²/min)
    pub reaction_intensity: f32,
    /// Byram fireline intensity at the head
    pub fireline_intensity: BtuPerFootSecond,
    pub flame_length: Feet,
    /// Azimuth of maximum spread
    pub heading: Degrees,
    /// Wind speed that alone would produce the combined wind+slope effect
    pub effective_wind: MilesPerHour,
    /// Length-to-width ratio of the spread ellipse
    pub length_to_width: f32,
    /// Wind factor φw
    pub wind_factor: f32,
    /// Slope factor φs
    pub slope_factor: f32,
    /// Flaming residence time
    pub residence_time: Minutes,
}

impl SurfaceFireBehavior {
    /// All-zero result for non-burnable or fuel-free cells
    pub fn no_spread() -> Self {
        Self {
            rate_of_spread: FeetPerMinute::ZERO,
            no_wind_no_slope_rate: FeetPerMinute::ZERO,
            reaction_intensity: 0.0,
            fireline_intensity: BtuPerFootSecond::ZERO,
            flame_length: Feet::ZERO,
            heading: Degrees::ZERO,
            effective_wind: MilesPerHour::ZERO,
            length_to_width: 1.0,
            wind_factor: 0.0,
            slope_factor: 0.0,
            residence_time: Minutes::ZERO,
        }
    }

    pub fn spreads(&self) -> bool {
        *self.rate_of_spread > 0.0
    }
}

/// One fuel particle class in the bed (lb/ft², 1/ft, fraction, BTU/lb)
#[derive(Debug, Clone, Copy)]
struct Particle {
    load: f64,
    sav: f64,
    moisture: f64,
    heat: f64,
}

impl Particle {
    fn new(load_tons_per_acre: f32, sav: f32, moisture: Percent, heat: f32) -> Self {
        Self {
            load: f64::from(load_tons_per_acre) * TONS_PER_ACRE_TO_LB_PER_FT2,
            sav: f64::from(sav),
            moisture: f64::from(moisture.as_fraction()),
            heat: f64::from(heat),
        }
    }

    fn surface_area(&self) -> f64 {
        if self.load > 0.0 && self.sav > 0.0 {
            self.sav * self.load / PARTICLE_DENSITY
        } else {
            0.0
        }
    }
}

/// Surface-area weighted totals for the dead or live category
#[derive(Debug, Clone, Copy, Default)]
struct CategoryTotals {
    surface_area: f64,
    sav: f64,
    moisture: f64,
    heat: f64,
    net_load: f64,
    /// Σ f_ij · ε_ij · Q_ig,ij
    heat_sink: f64,
}

impl CategoryTotals {
    fn from_particles(particles: &[Particle]) -> Self {
        let surface_area: f64 = particles.iter().map(Particle::surface_area).sum();
        if surface_area <= 0.0 {
            return Self::default();
        }

        let mut totals = Self {
            surface_area,
            ..Self::default()
        };
        for p in particles {
            let weight = p.surface_area() / surface_area;
            if weight <= 0.0 {
                continue;
            }
            totals.sav += weight * p.sav;
            totals.moisture += weight * p.moisture;
            totals.heat += weight * p.heat;
            totals.net_load += weight * p.load * (1.0 - TOTAL_MINERAL_CONTENT);
            totals.heat_sink +=
                weight * effective_heating_number(p.sav) * heat_of_preignition(p.moisture);
        }
        totals
    }
}

/// The fuel bed after dynamic curing: dead classes (1h, 10h, 100h, cured herb)
/// and live classes (herb, woody).
struct FuelBed {
    dead: [Particle; 4],
    live: [Particle; 2],
}

impl FuelBed {
    fn new(fuel: &FuelModel, conditions: &EnvironmentalConditions) -> Self {
        let dead_m = conditions.dead_moisture;
        let live_m = conditions.live_moisture;

        let cured = if fuel.dynamic {
            fuel_moisture::herb_curing_fraction(live_m.herb)
        } else {
            0.0
        };
        let herb = fuel.loads.live_herb;
        let (dead_heat, live_heat) = (fuel.heat_content_dead, fuel.heat_content_live);

        Self {
            dead: [
                Particle::new(fuel.loads.one_hour, fuel.sav.one_hour, dead_m.one_hour, dead_heat),
                Particle::new(fuel.loads.ten_hour, TEN_HOUR_SAV, dead_m.ten_hour, dead_heat),
                Particle::new(
                    fuel.loads.hundred_hour,
                    HUNDRED_HOUR_SAV,
                    dead_m.hundred_hour,
                    dead_heat,
                ),
                // Cured herbaceous fuel takes on fine dead fuel moisture
                Particle::new(herb * cured, fuel.sav.live_herb, dead_m.one_hour, dead_heat),
            ],
            live: [
                Particle::new(herb * (1.0 - cured), fuel.sav.live_herb, live_m.herb, live_heat),
                Particle::new(fuel.loads.live_woody, fuel.sav.live_woody, live_m.woody, live_heat),
            ],
        }
    }

    fn total_load(&self) -> f64 {
        self.dead.iter().chain(self.live.iter()).map(|p| p.load).sum()
    }

    /// Albini (1976) live fuel moisture of extinction, never below the dead value
    fn live_moisture_of_extinction(&self, dead_extinction: f64) -> f64 {
        let fine_dead: f64 = self
            .dead
            .iter()
            .filter(|p| p.sav > 0.0)
            .map(|p| p.load * (-138.0 / p.sav).exp())
            .sum();
        let fine_live: f64 = self
            .live
            .iter()
            .filter(|p| p.sav > 0.0)
            .map(|p| p.load * (-500.0 / p.sav).exp())
            .sum();
        if fine_live <= 0.0 || fine_dead <= 0.0 {
            return dead_extinction;
        }

        let fine_dead_moisture: f64 = self
            .dead
            .iter()
            .filter(|p| p.sav > 0.0)
            .map(|p| p.load * (-138.0 / p.sav).exp() * p.moisture)
            .sum::<f64>()
            / fine_dead;

        let ratio = fine_dead / fine_live;
        let live_extinction = 2.9 * ratio * (1.0 - fine_dead_moisture / dead_extinction) - 0.226;
        live_extinction.max(dead_extinction)
    }
}

/// Evaluate the Rothermel model for one cell.
///
/// # Steps
/// 1. Moisture damping per category (complete at or above extinction)
/// 2. No-wind, no-slope rate R0 from reaction intensity, propagating flux and heat sink
/// 3. Wind factor `φw = C·U^B·(β/β_op)^-E`
/// 4. Slope factor `φs = 5.275·β^-0.3·tan²θ`
/// 5. Vector sum of wind and slope into one heading and magnitude
/// 6. Byram intensity and flame length
///
/// Non-burnable models return [`SurfaceFireBehavior::no_spread`] without any
/// of the above.
///
/// # Arguments
/// * `fuel` - Fuel model for the cell
/// * `conditions` - Scenario weather and moisture
/// * `slope` - Terrain slope (degrees)
/// * `aspect` - Compass bearing of the downhill direction (degrees)
pub fn surface_fire_behavior(
    fuel: &FuelModel,
    conditions: &EnvironmentalConditions,
    slope: Degrees,
    aspect: Degrees,
) -> SurfaceFireBehavior {
    if !fuel.burnable || fuel.loads.total() <= 0.0 || *fuel.depth <= 0.0 {
        return SurfaceFireBehavior::no_spread();
    }

    let bed = FuelBed::new(fuel, conditions);
    let dead = CategoryTotals::from_particles(&bed.dead);
    let live = CategoryTotals::from_particles(&bed.live);

    let total_area = dead.surface_area + live.surface_area;
    if total_area <= 0.0 {
        return SurfaceFireBehavior::no_spread();
    }
    let dead_weight = dead.surface_area / total_area;
    let live_weight = live.surface_area / total_area;

    // Characteristic SAV ratio and packing
    let sigma = dead_weight * dead.sav + live_weight * live.sav;
    let depth = f64::from(*fuel.depth);
    let bulk_density = bed.total_load() / depth;
    let packing_ratio = bulk_density / PARTICLE_DENSITY;
    let optimum_packing = 3.348 * sigma.powf(-0.8189);
    let relative_packing = packing_ratio / optimum_packing;

    // 1. Moisture damping
    let dead_extinction = f64::from(fuel.dead_moisture_of_extinction.as_fraction());
    let live_extinction = bed.live_moisture_of_extinction(dead_extinction);
    let dead_damping = moisture_damping(dead.moisture, dead_extinction);
    let live_damping = moisture_damping(live.moisture, live_extinction);

    // 2. Reaction intensity and R0
    let reaction_velocity = optimum_reaction_velocity(sigma, relative_packing);
    let reaction_intensity = reaction_velocity
        * (dead.net_load * dead.heat * dead_damping + live.net_load * live.heat * live_damping)
        * mineral_damping();
    let flux_ratio = propagating_flux_ratio(sigma, packing_ratio);
    let heat_sink = bulk_density * (dead_weight * dead.heat_sink + live_weight * live.heat_sink);
    let base_rate = if heat_sink > 0.0 {
        (reaction_intensity * flux_ratio / heat_sink).max(0.0)
    } else {
        0.0
    };

    // 3-4. Wind and slope factors
    let wind = WindCoefficients::new(sigma, relative_packing);
    let wind_ft_min = f64::from(*conditions.wind_speed.to_feet_per_minute());
    let wind_factor = wind.factor(wind_ft_min);
    let slope_factor = slope_factor(packing_ratio, f64::from(*slope));

    // 5. Combined direction and magnitude
    let wind_heading = conditions.wind_direction.opposite();
    let upslope = aspect.opposite();
    let (combined_factor, heading) =
        combine_wind_and_slope(wind_factor, wind_heading, slope_factor, upslope);

    let rate = base_rate * (1.0 + combined_factor);

    let effective_wind =
        FeetPerMinute::new(wind.effective_wind(combined_factor) as f32).to_miles_per_hour();
    let length_to_width = ellipse::length_to_width_ratio(effective_wind);

    // 6. Intensity
    let residence_time = 384.0 / sigma;
    let fireline_intensity = reaction_intensity * residence_time * rate / 60.0;
    let fireline_intensity = BtuPerFootSecond::new(fireline_intensity as f32);

    SurfaceFireBehavior {
        rate_of_spread: FeetPerMinute::new(rate as f32),
        no_wind_no_slope_rate: FeetPerMinute::new(base_rate as f32),
        reaction_intensity: reaction_intensity as f32,
        fireline_intensity,
        flame_length: flame_length(fireline_intensity),
        heading,
        effective_wind,
        length_to_width,
        wind_factor: wind_factor as f32,
        slope_factor: slope_factor as f32,
        residence_time: Minutes::new(residence_time as f32),
    }
}

/// Byram (1959) flame length `L = 0.45·I^0.46` (ft, I in BTU/ft/s)
pub fn flame_length(intensity: BtuPerFootSecond) -> Feet {
    if *intensity <= 0.0 {
        return Feet::ZERO;
    }
    Feet::new(0.45 * intensity.powf(0.46))
}

/// Moisture damping coefficient η_M (fraction of reaction retained).
///
/// `η_M = 1 - 2.59r + 5.11r² - 3.52r³` with `r = M/Mx`; zero at or above extinction.
fn moisture_damping(moisture: f64, extinction: f64) -> f64 {
    if extinction <= 0.0 || moisture >= extinction {
        return 0.0;
    }
    let r = moisture / extinction;
    (1.0 - 2.59 * r + 5.11 * r.powi(2) - 3.52 * r.powi(3)).clamp(0.0, 1.0)
}

/// Mineral damping coefficient η_s = 0.174·Se^-0.19 (≈ 0.42)
fn mineral_damping() -> f64 {
    (0.174 * EFFECTIVE_MINERAL_CONTENT.powf(-0.19)).min(1.0)
}

/// Optimum reaction velocity Γ' (1/min)
fn optimum_reaction_velocity(sigma: f64, relative_packing: f64) -> f64 {
    let sigma_15 = sigma.powf(1.5);
    let max_velocity = sigma_15 / (495.0 + 0.0594 * sigma_15);
    let a = 133.0 * sigma.powf(-0.7913);
    max_velocity * relative_packing.powf(a) * (a * (1.0 - relative_packing)).exp()
}

/// Propagating flux ratio ξ
fn propagating_flux_ratio(sigma: f64, packing_ratio: f64) -> f64 {
    ((0.792 + 0.681 * sigma.sqrt()) * (packing_ratio + 0.1)).exp() / (192.0 + 0.2595 * sigma)
}

/// Effective heating number ε = exp(-138/σ)
fn effective_heating_number(sav: f64) -> f64 {
    if sav > 0.0 {
        (-138.0 / sav).exp()
    } else {
        0.0
    }
}

/// Heat of pre-ignition Q_ig = 250 + 1116·M (BTU/lb)
fn heat_of_preignition(moisture: f64) -> f64 {
    250.0 + 1116.0 * moisture
}

/// Slope factor φs = 5.275·β^-0.3·tan²θ. Unbounded in θ.
fn slope_factor(packing_ratio: f64, slope_degrees: f64) -> f64 {
    if slope_degrees <= 0.0 || packing_ratio <= 0.0 {
        return 0.0;
    }
    let tan = slope_degrees.min(MAX_SLOPE_DEGREES).to_radians().tan();
    5.275 * packing_ratio.powf(-0.3) * tan * tan
}

/// Rothermel wind coefficients C, B, E and the relative packing they act on
struct WindCoefficients {
    c: f64,
    b: f64,
    e: f64,
    relative_packing: f64,
}

impl WindCoefficients {
    fn new(sigma: f64, relative_packing: f64) -> Self {
        Self {
            c: 7.47 * (-0.133 * sigma.powf(0.55)).exp(),
            b: 0.02526 * sigma.powf(0.54),
            e: 0.715 * (-3.59e-4 * sigma).exp(),
            relative_packing,
        }
    }

    /// φw for a midflame wind in ft/min
    fn factor(&self, wind_ft_min: f64) -> f64 {
        if wind_ft_min <= 0.0 {
            return 0.0;
        }
        self.c * wind_ft_min.powf(self.b) * self.relative_packing.powf(-self.e)
    }

    /// Invert φw: wind speed (ft/min) producing the given factor
    fn effective_wind(&self, factor: f64) -> f64 {
        if factor <= 0.0 || self.c <= 0.0 {
            return 0.0;
        }
        (factor * self.relative_packing.powf(self.e) / self.c).powf(1.0 / self.b)
    }
}

/// Unit vector (east, north) for a compass bearing
fn bearing_vector(bearing: Degrees) -> Vector2<f64> {
    let rad = f64::from(bearing.to_radians());
    Vector2::new(rad.sin(), rad.cos())
}

/// Vector sum of the wind and slope factors.
///
/// The magnitude is floored at the stronger single driver so opposing wind
/// and slope never spread slower than either alone; when the floor applies
/// the heading follows that driver.
fn combine_wind_and_slope(
    wind_factor: f64,
    wind_heading: Degrees,
    slope_factor: f64,
    upslope: Degrees,
) -> (f64, Degrees) {
    if wind_factor <= 0.0 && slope_factor <= 0.0 {
        return (0.0, wind_heading);
    }

    let combined =
        bearing_vector(wind_heading) * wind_factor + bearing_vector(upslope) * slope_factor;
    let magnitude = combined.norm();
    let dominant = if wind_factor >= slope_factor {
        (wind_factor, wind_heading)
    } else {
        (slope_factor, upslope)
    };

    if magnitude < dominant.0 {
        return dominant;
    }

    let heading = Degrees::new(combined.x.atan2(combined.y).to_degrees() as f32).normalized();
    (magnitude, heading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::fuel::FuelModelCatalog;
    use crate::core_types::weather::{DeadFuelMoisture, LiveFuelMoisture};
    use approx::assert_relative_eq;

    fn gr2() -> &'static FuelModel {
        FuelModelCatalog::standard().lookup("GR2").unwrap()
    }

    fn calm(dead: f32) -> EnvironmentalConditions {
        EnvironmentalConditions::typical()
            .with_wind(MilesPerHour::new(0.0), Degrees::new(0.0))
            .with_dead_moisture(DeadFuelMoisture::new(dead, dead + 1.0, dead + 2.0))
    }

    #[test]
    fn test_moisture_damping_endpoints() {
        assert_relative_eq!(moisture_damping(0.0, 0.15), 1.0);
        assert_relative_eq!(moisture_damping(0.15, 0.15), 0.0);
        assert_relative_eq!(moisture_damping(0.30, 0.15), 0.0);
        let mid = moisture_damping(0.075, 0.15);
        assert!(mid > 0.0 && mid < 1.0);
    }

    #[test]
    fn test_mineral_damping_value() {
        assert_relative_eq!(mineral_damping(), 0.4174, epsilon = 1e-3);
    }

    #[test]
    fn test_calm_flat_is_isotropic_baseline() {
        let result = surface_fire_behavior(gr2(), &calm(6.0), Degrees::ZERO, Degrees::ZERO);
        assert!(result.spreads());
        assert_relative_eq!(*result.rate_of_spread, *result.no_wind_no_slope_rate);
        assert_relative_eq!(result.length_to_width, 1.0);
        assert_eq!(*result.effective_wind, 0.0);
    }

    #[test]
    fn test_non_burnable_returns_zero() {
        let nb = FuelModelCatalog::standard().lookup("NB9").unwrap();
        let extreme = EnvironmentalConditions::extreme();
        let result = surface_fire_behavior(nb, &extreme, Degrees::new(30.0), Degrees::ZERO);
        assert_eq!(result, SurfaceFireBehavior::no_spread());
    }

    #[test]
    fn test_fuel_above_extinction_does_not_spread() {
        let wet = EnvironmentalConditions::typical()
            .with_dead_moisture(DeadFuelMoisture::new(40.0, 40.0, 40.0))
            .with_live_moisture(LiveFuelMoisture::new(250.0, 250.0));
        let result = surface_fire_behavior(gr2(), &wet, Degrees::new(20.0), Degrees::ZERO);
        assert_eq!(*result.rate_of_spread, 0.0);
        assert_eq!(*result.flame_length, 0.0);
    }

    #[test]
    fn test_wind_increases_spread() {
        let base = calm(6.0);
        let calm_result = surface_fire_behavior(gr2(), &base, Degrees::ZERO, Degrees::ZERO);
        let windy = base.with_wind(MilesPerHour::new(10.0), Degrees::new(270.0));
        let windy_result = surface_fire_behavior(gr2(), &windy, Degrees::ZERO, Degrees::ZERO);
        assert!(windy_result.rate_of_spread > calm_result.rate_of_spread);
        // West wind drives the head toward the east
        assert_relative_eq!(*windy_result.heading, 90.0, epsilon = 1e-3);
        assert!(windy_result.length_to_width > 1.0);
    }

    #[test]
    fn test_upslope_heading_from_aspect() {
        // South-facing slope: downhill is 180°, so fire runs upslope toward north
        let result =
            surface_fire_behavior(gr2(), &calm(6.0), Degrees::new(25.0), Degrees::new(180.0));
        assert!(result.slope_factor > 0.0);
        assert!(*result.heading < 1e-3 || *result.heading > 359.999);
    }

    #[test]
    fn test_opposing_wind_and_slope_floor() {
        let (magnitude, heading) =
            combine_wind_and_slope(2.0, Degrees::new(0.0), 1.5, Degrees::new(180.0));
        assert_relative_eq!(magnitude, 2.0);
        assert_eq!(heading, Degrees::new(0.0));

        let (magnitude, _) =
            combine_wind_and_slope(1.0, Degrees::new(90.0), 1.0, Degrees::new(0.0));
        assert_relative_eq!(magnitude, 2f64.sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn test_effective_wind_inverts_wind_factor() {
        let coeffs = WindCoefficients::new(1800.0, 0.5);
        let factor = coeffs.factor(880.0);
        assert_relative_eq!(coeffs.effective_wind(factor), 880.0, epsilon = 1e-6);
    }

    #[test]
    fn test_flame_length_byram() {
        assert_eq!(*flame_length(BtuPerFootSecond::ZERO), 0.0);
        assert_relative_eq!(*flame_length(BtuPerFootSecond::new(100.0)), 3.74, epsilon = 0.01);
    }

    #[test]
    fn test_dynamic_curing_transfers_herb_load() {
        let green = EnvironmentalConditions::typical()
            .with_live_moisture(LiveFuelMoisture::new(150.0, 150.0));
        let cured = EnvironmentalConditions::typical()
            .with_live_moisture(LiveFuelMoisture::new(30.0, 150.0));
        let ros = |c: &EnvironmentalConditions| {
            surface_fire_behavior(gr2(), c, Degrees::ZERO, Degrees::ZERO).rate_of_spread
        };
        let (green_ros, cured_ros) = (ros(&green), ros(&cured));
        assert!(cured_ros > green_ros);
    }
}
