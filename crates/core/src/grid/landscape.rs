//! Raster landscape: aligned fuel, terrain and canopy layers
//!
//! Layers arrive as separate grids sharing dimensions and cell size. They are
//! validated once when the [`Landscape`] is assembled: misaligned grids,
//! unknown fuel codes and out-of-range cell values abort before any fire
//! behavior work. Cells carrying the `NoData` sentinel in any layer become
//! undefined (`None`) and are skipped downstream.

use crate::core_types::fuel::{FuelCode, FuelModelCatalog};
use crate::core_types::units::{Degrees, Meters};
use crate::error::FireBehaviorError;
use crate::grid::fields::FieldData;
use crate::physics::crown_fire::Canopy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// `NoData` sentinel for floating point layers
pub const NO_DATA: f32 = -9999.0;
/// `NoData` sentinel for the fuel code layer
pub const NO_DATA_FUEL: i32 = -9999;

const SQUARE_METERS_PER_HECTARE: f32 = 10_000.0;
const SQUARE_METERS_PER_ACRE: f32 = 4_046.856;

/// One landscape pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub fuel: FuelCode,
    /// Slope in degrees [0, 90]
    pub slope: Degrees,
    /// Compass bearing of the downhill direction [0, 360)
    pub aspect: Degrees,
    pub canopy: Canopy,
    /// Informational only
    pub elevation: Option<Meters>,
}

/// Raw input rasters. Canopy base height in metres, bulk density in kg/m³,
/// cover as a fraction.
#[derive(Debug, Clone)]
pub struct LandscapeLayers {
    pub fuel: FieldData<i32>,
    pub slope: FieldData<f32>,
    pub aspect: FieldData<f32>,
    pub canopy_base_height: FieldData<f32>,
    pub canopy_bulk_density: FieldData<f32>,
    pub canopy_cover: FieldData<f32>,
    pub elevation: Option<FieldData<f32>>,
    /// Cell edge length (m)
    pub cell_size: f32,
}

/// Validated landscape
#[derive(Debug, Clone)]
pub struct Landscape {
    cells: FieldData<Option<Cell>>,
    cell_size: f32,
}

fn is_no_data(value: f32) -> bool {
    value.is_nan() || value == NO_DATA
}

impl Landscape {
    /// Validate layers against the standard fuel catalog
    ///
    /// # Errors
    /// See [`Landscape::from_layers_with_catalog`]
    pub fn from_layers(layers: &LandscapeLayers) -> Result<Self, FireBehaviorError> {
        Self::from_layers_with_catalog(layers, FuelModelCatalog::standard())
    }

    /// Validate layers and assemble the landscape.
    ///
    /// # Errors
    /// - `MisalignedLandscapeGrids` if any layer's dimensions differ from the fuel layer
    /// - `InvalidLandscapeValue` for a non-positive cell size or a cell outside its
    ///   layer's range (slope [0, 90], aspect [0, 360], canopy cover [0, 1],
    ///   negative canopy base height or bulk density)
    /// - `UnknownFuelModel` for a fuel code the catalog cannot resolve
    pub fn from_layers_with_catalog(
        layers: &LandscapeLayers,
        catalog: &FuelModelCatalog,
    ) -> Result<Self, FireBehaviorError> {
        let expected = layers.fuel.dimensions();
        let mut float_layers: Vec<(&'static str, &FieldData<f32>)> = vec![
            ("slope", &layers.slope),
            ("aspect", &layers.aspect),
            ("canopy_base_height", &layers.canopy_base_height),
            ("canopy_bulk_density", &layers.canopy_bulk_density),
            ("canopy_cover", &layers.canopy_cover),
        ];
        if let Some(elevation) = &layers.elevation {
            float_layers.push(("elevation", elevation));
        }
        for &(layer, field) in &float_layers {
            if field.dimensions() != expected {
                return Err(FireBehaviorError::MisalignedLandscapeGrids {
                    layer,
                    expected,
                    found: field.dimensions(),
                });
            }
        }

        check_cell_size(layers.cell_size)?;

        let (width, height) = expected;
        let mut cells = Vec::with_capacity(width * height);
        let mut no_data = 0usize;
        for y in 0..height {
            for x in 0..width {
                let cell = Self::validate_cell(layers, catalog, x, y)?;
                no_data += usize::from(cell.is_none());
                cells.push(cell);
            }
        }

        debug!(
            width,
            height,
            cell_size = layers.cell_size,
            no_data,
            "Landscape assembled"
        );

        Ok(Self {
            cells: FieldData::from_fn(width, height, |x, y| cells[y * width + x]),
            cell_size: layers.cell_size,
        })
    }

    fn validate_cell(
        layers: &LandscapeLayers,
        catalog: &FuelModelCatalog,
        x: usize,
        y: usize,
    ) -> Result<Option<Cell>, FireBehaviorError> {
        let fuel = *layers.fuel.get(x, y);
        let slope = *layers.slope.get(x, y);
        let aspect = *layers.aspect.get(x, y);
        let cbh = *layers.canopy_base_height.get(x, y);
        let cbd = *layers.canopy_bulk_density.get(x, y);
        let cover = *layers.canopy_cover.get(x, y);

        if fuel == NO_DATA_FUEL || [slope, aspect, cbh, cbd, cover].into_iter().any(is_no_data) {
            return Ok(None);
        }

        let code = u16::try_from(fuel).map_err(|_| FireBehaviorError::UnknownFuelModel {
            code: fuel.to_string(),
            location: Some((x, y)),
        })?;
        let code = FuelCode(code);
        catalog
            .lookup_code(code)
            .map_err(|_| FireBehaviorError::UnknownFuelModel {
                code: code.to_string(),
                location: Some((x, y)),
            })?;

        let elevation = layers
            .elevation
            .as_ref()
            .map(|e| *e.get(x, y))
            .filter(|&v| !is_no_data(v))
            .map(Meters::new);

        let mut cell = Cell {
            fuel: code,
            slope: Degrees::new(slope),
            aspect: Degrees::new(aspect),
            canopy: Canopy {
                base_height: Meters::new(cbh),
                bulk_density: cbd,
                cover,
            },
            elevation,
        };
        check_cell_ranges(&cell, x, y)?;
        // 360° and 0° are both north
        cell.aspect = cell.aspect.normalized();
        Ok(Some(cell))
    }

    /// Landscape where every cell is the same.
    ///
    /// The cell and cell size are trusted as given; no range or fuel checks
    /// run. Use [`Landscape::from_cells`] for untrusted values.
    pub fn uniform(width: usize, height: usize, cell_size: f32, cell: Cell) -> Self {
        Self {
            cells: FieldData::with_value(width, height, Some(cell)),
            cell_size,
        }
    }

    /// Build from prepared cells, applying the same range and fuel checks
    /// as [`Landscape::from_layers`]. Aspects of 360° are stored as 0°.
    ///
    /// # Errors
    /// - `InvalidLandscapeValue` for a non-positive cell size or a cell value
    ///   outside its range
    /// - `UnknownFuelModel` for a fuel code missing from the standard catalog
    pub fn from_cells(
        mut cells: FieldData<Option<Cell>>,
        cell_size: f32,
    ) -> Result<Self, FireBehaviorError> {
        check_cell_size(cell_size)?;
        let catalog = FuelModelCatalog::standard();
        let width = cells.width();
        for (index, slot) in cells.as_mut_slice().iter_mut().enumerate() {
            let Some(cell) = slot.as_mut() else { continue };
            let (x, y) = (index % width, index / width);
            catalog
                .lookup_code(cell.fuel)
                .map_err(|_| FireBehaviorError::UnknownFuelModel {
                    code: cell.fuel.to_string(),
                    location: Some((x, y)),
                })?;
            check_cell_ranges(cell, x, y)?;
            cell.aspect = cell.aspect.normalized();
        }
        Ok(Self { cells, cell_size })
    }

    /// Synthetic ridge-and-valley landscape for demos and tests.
    ///
    /// Elevation is a sum of sinusoids plus seeded noise. Fuel follows
    /// elevation: grass in the valleys, shrub on the mid slopes, timber
    /// understory and litter on the ridges, with water in the lowest pockets.
    /// Timber carries a canopy with seeded cover, base height and bulk density.
    pub fn synthetic(width: usize, height: usize, cell_size: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let elevation = FieldData::from_fn(width, height, |x, y| {
            let fx = x as f32 / width.max(1) as f32;
            let fy = y as f32 / height.max(1) as f32;
            let base = 1000.0
                + 120.0 * (fx * std::f32::consts::TAU * 1.5).sin()
                + 80.0 * (fy * std::f32::consts::TAU).cos()
                + 40.0 * ((fx + fy) * std::f32::consts::TAU * 2.0).sin();
            base + rng.random_range(-3.0..3.0)
        });

        let (min_elev, max_elev) = elevation
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &e| (lo.min(e), hi.max(e)));
        let span = (max_elev - min_elev).max(1.0);

        let cells = FieldData::from_fn(width, height, |x, y| {
            let (slope, aspect) = terrain_at(&elevation, x, y, cell_size);
            let elev = *elevation.get(x, y);
            let relative = (elev - min_elev) / span;

            let (fuel, canopy) = if relative < 0.05 {
                (FuelCode(98), Canopy::none())
            } else if relative < 0.35 {
                (FuelCode(102), Canopy::none())
            } else if relative < 0.6 {
                (FuelCode(145), Canopy::none())
            } else {
                let fuel = if relative < 0.8 { FuelCode(161) } else { FuelCode(185) };
                let canopy = Canopy {
                    base_height: Meters::new(rng.random_range(1.5..6.0)),
                    bulk_density: rng.random_range(0.05..0.25),
                    cover: rng.random_range(0.4..0.85),
                };
                (fuel, canopy)
            };

            Some(Cell {
                fuel,
                slope,
                aspect,
                canopy,
                elevation: Some(Meters::new(elev)),
            })
        });

        Self { cells, cell_size }
    }

    pub fn width(&self) -> usize {
        self.cells.width()
    }

    pub fn height(&self) -> usize {
        self.cells.height()
    }

    /// Cell edge length (m)
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Area of one cell (m²)
    pub fn cell_area(&self) -> f32 {
        self.cell_size * self.cell_size
    }

    /// Cell at (x, y); `None` for `NoData`
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.cells.get(x, y).as_ref()
    }

    pub fn cells(&self) -> &FieldData<Option<Cell>> {
        &self.cells
    }

    /// Replace one cell. The new cell is trusted as given, like
    /// [`Landscape::uniform`].
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Option<Cell>) {
        self.cells.set(x, y, cell);
    }
}

fn check_cell_size(cell_size: f32) -> Result<(), FireBehaviorError> {
    if cell_size.is_finite() && cell_size > 0.0 {
        Ok(())
    } else {
        Err(FireBehaviorError::InvalidLandscapeValue {
            layer: "cell_size",
            x: 0,
            y: 0,
            value: cell_size,
        })
    }
}

/// Range checks shared by every validated constructor: slope [0, 90],
/// aspect [0, 360], canopy cover [0, 1], non-negative canopy base height and
/// bulk density.
fn check_cell_ranges(cell: &Cell, x: usize, y: usize) -> Result<(), FireBehaviorError> {
    let invalid = |layer: &'static str, value: f32| FireBehaviorError::InvalidLandscapeValue {
        layer,
        x,
        y,
        value,
    };
    let (slope, aspect) = (*cell.slope, *cell.aspect);
    let Canopy { base_height, bulk_density, cover } = cell.canopy;

    if !(0.0..=90.0).contains(&slope) {
        return Err(invalid("slope", slope));
    }
    if !(0.0..=360.0).contains(&aspect) {
        return Err(invalid("aspect", aspect));
    }
    if !(0.0..=1.0).contains(&cover) {
        return Err(invalid("canopy_cover", cover));
    }
    if !(*base_height >= 0.0 && base_height.is_finite()) {
        return Err(invalid("canopy_base_height", *base_height));
    }
    if !(bulk_density >= 0.0 && bulk_density.is_finite()) {
        return Err(invalid("canopy_bulk_density", bulk_density));
    }
    Ok(())
}

/// Slope and downhill aspect from central differences of an elevation grid.
/// Rows increase southward.
fn terrain_at(
    elevation: &FieldData<f32>,
    x: usize,
    y: usize,
    cell_size: f32,
) -> (Degrees, Degrees) {
    let (w, h) = elevation.dimensions();
    let xl = x.saturating_sub(1);
    let xr = (x + 1).min(w - 1);
    let yu = y.saturating_sub(1);
    let yd = (y + 1).min(h - 1);

    let dx = (xr - xl).max(1) as f32 * cell_size;
    let dy = (yd - yu).max(1) as f32 * cell_size;
    let dz_east = (elevation.get(xr, y) - elevation.get(xl, y)) / dx;
    let dz_north = (elevation.get(x, yu) - elevation.get(x, yd)) / dy;

    let gradient = dz_east.hypot(dz_north);
    let slope = Degrees::new(gradient.atan().to_degrees());
    if gradient <= f32::EPSILON {
        return (slope, Degrees::ZERO);
    }
    // Downhill points against the gradient
    let aspect = Degrees::new((-dz_east).atan2(-dz_north).to_degrees()).normalized();
    (slope, aspect)
}

/// Convert a cell count into (hectares, acres)
pub fn cells_to_area(cells: usize, cell_size: f32) -> (f32, f32) {
    let square_meters = cells as f32 * cell_size * cell_size;
    (
        square_meters / SQUARE_METERS_PER_HECTARE,
        square_meters / SQUARE_METERS_PER_ACRE,
    )
}
