//! Semantic unit types for fire behavior quantities
//!
//! Fire behavior literature mixes US customary units (Rothermel works in
//! feet, pounds and BTU) with metric units (Van Wagner works in metres and
//! kilowatts). These newtypes keep the two systems from being mixed by
//! accident and make every conversion explicit.
//!
//! # Design
//! - All quantities wrap `f32`; the physics routines promote to `f64`
//!   internally where the power laws need the extra precision
//! - Total ordering via `total_cmp`, so values can be used with `min`/`max`
//! - `Deref` to the raw value for arithmetic-heavy code
//! - Serde support (transparent) for scenario files and result export
//!
//! # Usage
//! ```
//! use fire_behavior_core::core_types::units::{ChainsPerHour, FeetPerMinute, MilesPerHour};
//!
//! let ros = ChainsPerHour::new(30.0).to_feet_per_minute();
//! assert!((*ros - 33.0).abs() < 1e-4);
//!
//! let wind = MilesPerHour::new(10.0);
//! assert!((*wind.to_feet_per_minute() - 880.0).abs() < 1e-3);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Sub};

const FEET_PER_METER: f32 = 3.280_84;
const FEET_PER_CHAIN: f32 = 66.0;
const FEET_PER_MINUTE_PER_MPH: f32 = 88.0;
const KW_PER_M_PER_BTU_PER_FT_S: f32 = 3.4613;

/// Declares a transparent `f32` quantity with total ordering, `Deref`,
/// arithmetic with itself and scaling by `f32`.
macro_rules! quantity {
    ($(#[$meta:meta])* $name:ident, $symbol:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        #[repr(transparent)]
        pub struct $name(f32);

        impl $name {
            /// Zero value
            pub const ZERO: $name = $name(0.0);

            #[inline]
            #[must_use]
            pub const fn new(value: f32) -> Self {
                $name(value)
            }

            /// Raw value
            #[inline]
            #[must_use]
            pub const fn value(self) -> f32 {
                self.0
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f32;
            #[inline]
            fn deref(&self) -> &f32 {
                &self.0
            }
        }

        impl From<f32> for $name {
            fn from(v: f32) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f32 {
            fn from(v: $name) -> f32 {
                v.0
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl Mul<f32> for $name {
            type Output = $name;
            fn mul(self, rhs: f32) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl Div<f32> for $name {
            type Output = $name;
            fn div(self, rhs: f32) -> $name {
                $name(self.0 / rhs)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match f.precision() {
                    Some(p) => write!(f, "{:.*}{}", p, self.0, $symbol),
                    None => write!(f, "{}{}", self.0, $symbol),
                }
            }
        }
    };
}

quantity!(
    /// Percentage (moisture content, relative humidity). 100% = 1.0 as a fraction.
    Percent,
    "%"
);

quantity!(
    /// Angle or compass bearing in degrees
    Degrees,
    "°"
);

quantity!(
    /// Wind speed in miles per hour
    MilesPerHour,
    " mph"
);

quantity!(
    /// Air temperature in degrees Fahrenheit
    Fahrenheit,
    "°F"
);

quantity!(
    /// Surface rate of spread in feet per minute
    FeetPerMinute,
    " ft/min"
);

quantity!(
    /// Rate of spread in chains per hour (1 chain = 66 ft)
    ChainsPerHour,
    " ch/h"
);

quantity!(
    /// Rate of spread in metres per minute
    MetersPerMinute,
    " m/min"
);

quantity!(
    /// Byram fireline intensity in BTU per foot per second
    BtuPerFootSecond,
    " BTU/ft/s"
);

quantity!(
    /// Byram fireline intensity in kilowatts per metre
    KilowattsPerMeter,
    " kW/m"
);

quantity!(
    /// Length in feet
    Feet,
    " ft"
);

quantity!(
    /// Length in metres
    Meters,
    " m"
);

quantity!(
    /// Duration in minutes
    Minutes,
    " min"
);

impl Percent {
    /// Convert to a fraction (50% → 0.5)
    #[inline]
    #[must_use]
    pub fn as_fraction(self) -> f32 {
        self.0 / 100.0
    }

    /// Build from a fraction (0.5 → 50%)
    #[inline]
    #[must_use]
    pub fn from_fraction(fraction: f32) -> Self {
        Percent(fraction * 100.0)
    }
}

impl Degrees {
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> f32 {
        self.0.to_radians()
    }

    /// Wrap a bearing into [0, 360)
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Self {
        let wrapped = self.0.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if wrapped >= 360.0 {
            Degrees(0.0)
        } else {
            Degrees(wrapped)
        }
    }

    /// Bearing pointing the other way
    #[inline]
    #[must_use]
    pub fn opposite(self) -> Self {
        Degrees(self.0 + 180.0).normalized()
    }
}

impl MilesPerHour {
    #[inline]
    #[must_use]
    pub fn to_feet_per_minute(self) -> FeetPerMinute {
        FeetPerMinute(self.0 * FEET_PER_MINUTE_PER_MPH)
    }
}

impl Fahrenheit {
    #[inline]
    #[must_use]
    pub fn to_celsius(self) -> f32 {
        (self.0 - 32.0) * 5.0 / 9.0
    }
}

impl FeetPerMinute {
    #[inline]
    #[must_use]
    pub fn to_chains_per_hour(self) -> ChainsPerHour {
        ChainsPerHour(self.0 * 60.0 / FEET_PER_CHAIN)
    }

    #[inline]
    #[must_use]
    pub fn to_meters_per_minute(self) -> MetersPerMinute {
        MetersPerMinute(self.0 / FEET_PER_METER)
    }

    /// Wind speed equivalent of a feet-per-minute velocity
    #[inline]
    #[must_use]
    pub fn to_miles_per_hour(self) -> MilesPerHour {
        MilesPerHour(self.0 / FEET_PER_MINUTE_PER_MPH)
    }
}

impl ChainsPerHour {
    #[inline]
    #[must_use]
    pub fn to_feet_per_minute(self) -> FeetPerMinute {
        FeetPerMinute(self.0 * FEET_PER_CHAIN / 60.0)
    }
}

impl MetersPerMinute {
    #[inline]
    #[must_use]
    pub fn to_feet_per_minute(self) -> FeetPerMinute {
        FeetPerMinute(self.0 * FEET_PER_METER)
    }
}

impl BtuPerFootSecond {
    #[inline]
    #[must_use]
    pub fn to_kilowatts_per_meter(self) -> KilowattsPerMeter {
        KilowattsPerMeter(self.0 * KW_PER_M_PER_BTU_PER_FT_S)
    }
}

impl KilowattsPerMeter {
    #[inline]
    #[must_use]
    pub fn to_btu_per_foot_second(self) -> BtuPerFootSecond {
        BtuPerFootSecond(self.0 / KW_PER_M_PER_BTU_PER_FT_S)
    }
}

impl Feet {
    #[inline]
    #[must_use]
    pub fn to_meters(self) -> Meters {
        Meters(self.0 / FEET_PER_METER)
    }
}

impl Meters {
    #[inline]
    #[must_use]
    pub fn to_feet(self) -> Feet {
        Feet(self.0 * FEET_PER_METER)
    }
}

impl Minutes {
    /// Build from hours
    #[inline]
    #[must_use]
    pub fn from_hours(hours: f32) -> Self {
        Minutes(hours * 60.0)
    }

    #[inline]
    #[must_use]
    pub fn to_hours(self) -> f32 {
        self.0 / 60.0
    }
}
