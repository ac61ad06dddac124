//! Surface fuel models and the fuel model catalog
//!
//! Fuel models follow Scott & Burgan (2005) "Standard Fire Behavior Fuel
//! Models: A Comprehensive Set for Use with Rothermel's Surface Fire Spread
//! Model", USDA Forest Service RMRS-GTR-153. Loads are in tons/acre, SAV
//! ratios in 1/ft, bed depth in feet and heat content in BTU/lb, the units
//! the Rothermel equations were fitted in.
//!
//! Raster fuel codes use the LANDFIRE FBFM40 numbering (101 = GR1,
//! 91 = NB1, ...). Codes whose own model is not seeded resolve through an
//! explicit surrogate table to the closest seeded model.

use crate::core_types::units::{Feet, Percent};
use crate::error::FireBehaviorError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// SAV ratio of 10-hr dead fuel (1/ft), fixed across the standard models
pub const TEN_HOUR_SAV: f32 = 109.0;
/// SAV ratio of 100-hr dead fuel (1/ft), fixed across the standard models
pub const HUNDRED_HOUR_SAV: f32 = 30.0;
/// Heat content of dead and live fuel in the standard models (BTU/lb)
pub const STANDARD_HEAT_CONTENT: f32 = 8000.0;

/// Numeric raster fuel code (FBFM40 numbering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuelCode(pub u16);

impl fmt::Display for FuelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fuel loads per size class (tons/acre)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FuelLoads {
    pub one_hour: f32,
    pub ten_hour: f32,
    pub hundred_hour: f32,
    pub live_herb: f32,
    pub live_woody: f32,
}

impl FuelLoads {
    /// Total of all classes
    pub fn total(&self) -> f32 {
        self.one_hour + self.ten_hour + self.hundred_hour + self.live_herb + self.live_woody
    }
}

/// Surface-area-to-volume ratios of the fine classes (1/ft).
/// 10-hr and 100-hr are fixed at [`TEN_HOUR_SAV`] and [`HUNDRED_HOUR_SAV`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurfaceAreaToVolume {
    pub one_hour: f32,
    pub live_herb: f32,
    pub live_woody: f32,
}

/// Immutable record of one surface fuel model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelModel {
    /// Short code ("GR2", "TL5", "NB1")
    pub code: &'static str,
    /// FBFM40 raster number
    pub number: FuelCode,
    pub name: &'static str,
    pub loads: FuelLoads,
    pub sav: SurfaceAreaToVolume,
    pub depth: Feet,
    /// Dead fuel moisture of extinction. Infinite for non-burnable models.
    pub dead_moisture_of_extinction: Percent,
    /// Heat content of dead fuel (BTU/lb)
    pub heat_content_dead: f32,
    /// Heat content of live fuel (BTU/lb)
    pub heat_content_live: f32,
    /// Live herbaceous load cures into dead fuel as herb moisture drops
    pub dynamic: bool,
    pub burnable: bool,
}

impl FuelModel {
    #[allow(clippy::too_many_arguments)]
    const fn standard(
        code: &'static str,
        number: u16,
        name: &'static str,
        loads: [f32; 5],
        sav: [f32; 3],
        depth: f32,
        extinction: f32,
        dynamic: bool,
    ) -> Self {
        Self {
            code,
            number: FuelCode(number),
            name,
            loads: FuelLoads {
                one_hour: loads[0],
                ten_hour: loads[1],
                hundred_hour: loads[2],
                live_herb: loads[3],
                live_woody: loads[4],
            },
            sav: SurfaceAreaToVolume {
                one_hour: sav[0],
                live_herb: sav[1],
                live_woody: sav[2],
            },
            depth: Feet::new(depth),
            dead_moisture_of_extinction: Percent::new(extinction),
            heat_content_dead: STANDARD_HEAT_CONTENT,
            heat_content_live: STANDARD_HEAT_CONTENT,
            dynamic,
            burnable: true,
        }
    }

    /// Non-burnable sentinel: zero load and infinite moisture of extinction,
    /// so any spread computation naturally yields zero.
    const fn non_burnable(code: &'static str, number: u16, name: &'static str) -> Self {
        Self {
            code,
            number: FuelCode(number),
            name,
            loads: FuelLoads {
                one_hour: 0.0,
                ten_hour: 0.0,
                hundred_hour: 0.0,
                live_herb: 0.0,
                live_woody: 0.0,
            },
            sav: SurfaceAreaToVolume {
                one_hour: 0.0,
                live_herb: 0.0,
                live_woody: 0.0,
            },
            depth: Feet::new(0.0),
            dead_moisture_of_extinction: Percent::new(f32::INFINITY),
            heat_content_dead: 0.0,
            heat_content_live: 0.0,
            dynamic: false,
            burnable: false,
        }
    }
}

/// Seeded fuel models. Loads: [1h, 10h, 100h, herb, woody] t/ac,
/// SAV: [1h, herb, woody] 1/ft.
#[rustfmt::skip]
const STANDARD_MODELS: [FuelModel; 18] = [
    FuelModel::standard("GR1", 101, "Short, sparse dry climate grass", [0.10, 0.0, 0.0, 0.30, 0.0], [2200.0, 2000.0, 1500.0], 0.4, 15.0, true),
    FuelModel::standard("GR2", 102, "Low load, dry climate grass", [0.10, 0.0, 0.0, 1.00, 0.0], [2000.0, 1800.0, 1500.0], 1.0, 15.0, true),
    FuelModel::standard("GR4", 104, "Moderate load, dry climate grass", [0.25, 0.0, 0.0, 1.90, 0.0], [2000.0, 1800.0, 1500.0], 2.0, 15.0, true),
    FuelModel::standard("GS2", 122, "Moderate load, dry climate grass-shrub", [0.50, 0.50, 0.0, 0.60, 1.00], [2000.0, 1800.0, 1800.0], 1.5, 15.0, true),
    FuelModel::standard("SH2", 142, "Moderate load dry climate shrub", [1.35, 2.40, 0.75, 0.0, 3.85], [2000.0, 1800.0, 1600.0], 1.0, 15.0, false),
    FuelModel::standard("SH5", 145, "High load, dry climate shrub", [3.60, 2.10, 0.0, 0.0, 2.90], [750.0, 1800.0, 1600.0], 6.0, 15.0, false),
    FuelModel::standard("SH7", 147, "Very high load, dry climate shrub", [3.50, 5.30, 2.20, 0.0, 3.40], [750.0, 1800.0, 1600.0], 6.0, 15.0, false),
    FuelModel::standard("TU1", 161, "Low load dry climate timber-grass-shrub", [0.20, 0.90, 1.50, 0.20, 0.90], [2000.0, 1800.0, 1600.0], 0.6, 20.0, true),
    FuelModel::standard("TU5", 165, "Very high load, dry climate timber-shrub", [4.00, 4.00, 3.00, 0.0, 3.00], [1500.0, 1800.0, 750.0], 1.0, 25.0, false),
    FuelModel::standard("TL3", 183, "Moderate load conifer litter", [0.50, 2.20, 2.80, 0.0, 0.0], [2000.0, 1800.0, 1500.0], 0.3, 20.0, false),
    FuelModel::standard("TL5", 185, "High load conifer litter", [1.15, 2.50, 4.40, 0.0, 0.0], [2000.0, 1800.0, 1500.0], 0.6, 25.0, false),
    FuelModel::standard("TL8", 188, "Long-needle litter", [5.80, 1.40, 1.10, 0.0, 0.0], [1800.0, 1800.0, 1500.0], 0.3, 35.0, false),
    FuelModel::standard("FM10", 10, "Timber (litter and understory)", [3.01, 2.00, 5.01, 0.0, 2.00], [2000.0, 1800.0, 1500.0], 1.0, 25.0, false),
    FuelModel::non_burnable("NB1", 91, "Urban/developed"),
    FuelModel::non_burnable("NB2", 92, "Snow/ice"),
    FuelModel::non_burnable("NB3", 93, "Agricultural"),
    FuelModel::non_burnable("NB8", 98, "Open water"),
    FuelModel::non_burnable("NB9", 99, "Bare ground"),
];

/// FBFM40 numbers without a seeded model, mapped to their seeded surrogate
const SURROGATES: [(u16, &str); 28] = [
    (103, "GR2"), // GR3
    (105, "GR4"), // GR5
    (106, "GR4"), // GR6
    (107, "GR4"), // GR7
    (108, "GR4"), // GR8
    (109, "GR4"), // GR9
    (121, "GS2"), // GS1
    (123, "GS2"), // GS3
    (124, "GS2"), // GS4
    (141, "SH2"), // SH1
    (143, "SH2"), // SH3
    (144, "SH2"), // SH4
    (146, "SH5"), // SH6
    (148, "SH7"), // SH8
    (149, "SH7"), // SH9
    (162, "TU1"), // TU2
    (163, "TU1"), // TU3
    (164, "TU5"), // TU4
    (181, "TL3"), // TL1
    (182, "TL3"), // TL2
    (184, "TL5"), // TL4
    (186, "TL5"), // TL6
    (187, "TL8"), // TL7
    (189, "TL8"), // TL9
    (201, "TL5"), // SB1
    (202, "TL5"), // SB2
    (203, "TL5"), // SB3
    (204, "TL5"), // SB4
];

static STANDARD_CATALOG: LazyLock<FuelModelCatalog> =
    LazyLock::new(|| FuelModelCatalog::from_models(STANDARD_MODELS.to_vec(), &SURROGATES));

/// Immutable code → fuel model mapping, built once and shared for reads
#[derive(Debug, Clone)]
pub struct FuelModelCatalog {
    models: Vec<FuelModel>,
    by_code: FxHashMap<&'static str, usize>,
    by_number: FxHashMap<FuelCode, usize>,
}

impl FuelModelCatalog {
    /// Process-wide catalog of the seeded standard models
    pub fn standard() -> &'static FuelModelCatalog {
        &STANDARD_CATALOG
    }

    /// Build a catalog from models plus surrogate number mappings.
    /// Surrogates naming an absent model are ignored.
    pub fn from_models(models: Vec<FuelModel>, surrogates: &[(u16, &str)]) -> Self {
        let mut by_code = FxHashMap::default();
        let mut by_number = FxHashMap::default();
        for (idx, model) in models.iter().enumerate() {
            by_code.insert(model.code, idx);
            by_number.insert(model.number, idx);
        }
        for &(number, code) in surrogates {
            if let Some(&idx) = by_code.get(code) {
                by_number.entry(FuelCode(number)).or_insert(idx);
            }
        }
        Self {
            models,
            by_code,
            by_number,
        }
    }

    /// Look up a model by its short code
    ///
    /// # Errors
    /// `UnknownFuelModel` if the code is not in the catalog
    pub fn lookup(&self, code: &str) -> Result<&FuelModel, FireBehaviorError> {
        self.by_code
            .get(code)
            .map(|&idx| &self.models[idx])
            .ok_or_else(|| FireBehaviorError::UnknownFuelModel {
                code: code.to_string(),
                location: None,
            })
    }

    /// Look up a model by raster number, following surrogate mappings
    ///
    /// # Errors
    /// `UnknownFuelModel` if neither the number nor a surrogate is known
    pub fn lookup_code(&self, number: FuelCode) -> Result<&FuelModel, FireBehaviorError> {
        self.by_number
            .get(&number)
            .map(|&idx| &self.models[idx])
            .ok_or_else(|| FireBehaviorError::UnknownFuelModel {
                code: number.to_string(),
                location: None,
            })
    }

    /// Unknown codes are reported as not burnable
    pub fn is_burnable(&self, code: &str) -> bool {
        self.lookup(code).is_ok_and(|m| m.burnable)
    }

    pub fn is_burnable_code(&self, number: FuelCode) -> bool {
        self.lookup_code(number).is_ok_and(|m| m.burnable)
    }

    pub fn models(&self) -> impl Iterator<Item = &FuelModel> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
