//! Elliptical fire shape (Anderson 1983)
//!
//! A point ignition under steady wind and slope grows as an ellipse with the
//! ignition point at the rear focus. The length-to-width ratio comes from the
//! effective wind speed; the rate in any direction follows from the polar
//! equation of the ellipse about that focus.
//!
//! # References
//! - Anderson, H.E. (1983). "Predicting wind-driven wild land fire size and shape."
//!   USDA Forest Service Research Paper INT-305.
//! - Richards, G.D. (1990). "An elliptical growth model of forest fire fronts and its
//!   numerical solution." International Journal for Numerical Methods in Engineering, 30.

use crate::core_types::units::{Degrees, MetersPerMinute, MilesPerHour};
use serde::{Deserialize, Serialize};

/// Maximum length-to-width ratio observed in field studies
pub const MAX_LENGTH_TO_WIDTH: f32 = 8.0;

/// Anderson (1983) length-to-width ratio for an effective midflame wind.
///
/// `L/W = 0.936·e^(0.2566·U) + 0.461·e^(-0.1548·U) - 0.397`, U in mph,
/// clamped to [1, 8].
pub fn length_to_width_ratio(effective_wind: MilesPerHour) -> f32 {
    let u = effective_wind.max(MilesPerHour::ZERO).value();
    let lw = 0.936 * (0.2566 * u).exp() + 0.461 * (-0.1548 * u).exp() - 0.397;
    lw.clamp(1.0, MAX_LENGTH_TO_WIDTH)
}

/// Eccentricity `e = sqrt(L/W² - 1) / (L/W)`; 0 for a circle
pub fn eccentricity(length_to_width: f32) -> f32 {
    let lw = length_to_width.max(1.0);
    (lw * lw - 1.0).max(0.0).sqrt() / lw
}

/// Backing rate as a fraction of the head rate
pub fn backing_ratio(length_to_width: f32) -> f32 {
    let e = eccentricity(length_to_width);
    (1.0 - e) / (1.0 + e)
}

/// Rate toward a direction `theta` radians off the heading, measured from
/// the rear focus: `R(θ) = R_head·(1 - e) / (1 - e·cos θ)`
pub fn rate_at_angle(head_rate: f32, eccentricity: f32, theta: f32) -> f32 {
    let denom = 1.0 - eccentricity * theta.cos();
    if denom <= f32::EPSILON {
        return head_rate;
    }
    head_rate * (1.0 - eccentricity) / denom
}

/// Per-cell input to the spread simulator: head rate, heading and shape
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpreadVector {
    /// Head fire rate of spread
    pub rate: MetersPerMinute,
    /// Azimuth of maximum spread
    pub heading: Degrees,
    pub length_to_width: f32,
}

impl SpreadVector {
    /// Impassable cell
    pub const NONE: SpreadVector = SpreadVector {
        rate: MetersPerMinute::ZERO,
        heading: Degrees::ZERO,
        length_to_width: 1.0,
    };

    pub fn new(rate: MetersPerMinute, heading: Degrees, length_to_width: f32) -> Self {
        Self {
            rate,
            heading,
            length_to_width: length_to_width.max(1.0),
        }
    }

    /// Fire can enter and leave this cell
    pub fn is_passable(&self) -> bool {
        *self.rate > 0.0
    }

    pub fn eccentricity(&self) -> f32 {
        eccentricity(self.length_to_width)
    }

    /// Rate toward a compass bearing
    pub fn rate_toward(&self, bearing: Degrees) -> MetersPerMinute {
        if !self.is_passable() {
            return MetersPerMinute::ZERO;
        }
        let theta = (*bearing - *self.heading).to_radians();
        MetersPerMinute::new(rate_at_angle(*self.rate, self.eccentricity(), theta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_calm_is_circle() {
        let lw = length_to_width_ratio(MilesPerHour::ZERO);
        assert_relative_eq!(lw, 1.0);
        assert_relative_eq!(eccentricity(lw), 0.0);
        assert_relative_eq!(backing_ratio(lw), 1.0);
    }

    #[test]
    fn test_length_to_width_grows_and_caps() {
        let low = length_to_width_ratio(MilesPerHour::new(5.0));
        let high = length_to_width_ratio(MilesPerHour::new(15.0));
        assert!(high > low && low > 1.0);
        assert_relative_eq!(length_to_width_ratio(MilesPerHour::new(60.0)), MAX_LENGTH_TO_WIDTH);
    }

    #[test]
    fn test_head_flank_back_rates() {
        let v = SpreadVector::new(MetersPerMinute::new(10.0), Degrees::new(90.0), 3.0);
        let head = v.rate_toward(Degrees::new(90.0));
        let back = v.rate_toward(Degrees::new(270.0));
        let flank = v.rate_toward(Degrees::new(0.0));
        assert_relative_eq!(*head, 10.0, epsilon = 1e-4);
        assert_relative_eq!(*back, 10.0 * backing_ratio(3.0), epsilon = 1e-4);
        assert!(*flank < *head && *flank > *back);
    }

    #[test]
    fn test_impassable_has_no_rate() {
        assert!(!SpreadVector::NONE.is_passable());
        assert_eq!(*SpreadVector::NONE.rate_toward(Degrees::new(10.0)), 0.0);
    }
}
