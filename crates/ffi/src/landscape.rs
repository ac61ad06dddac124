use fire_behavior_core::{FieldData, Landscape, LandscapeLayers};
use std::ptr;

use crate::error::{DefaultFfiError, FireBehaviorErrorCode};
use crate::helpers::{input_slice, track_error, track_result};

/// Caller-owned raster layers describing a landscape.
///
/// Every array holds `width * height` values in row-major order (row 0 is the
/// northern edge). `-9999` marks `NoData` in any layer; such cells produce no
/// fire behavior. `elevation` may be null.
#[repr(C)]
pub struct LandscapeRasters {
    pub width: usize,
    pub height: usize,
    /// Cell edge length in meters
    pub cell_size: f32,
    /// Fuel model numbers (e.g. 102 for GR2, 91 for NB1)
    pub fuel: *const i32,
    /// Slope in degrees
    pub slope: *const f32,
    /// Downhill direction in degrees clockwise from north
    pub aspect: *const f32,
    /// Canopy base height in meters
    pub canopy_base_height: *const f32,
    /// Canopy bulk density in kg/m³
    pub canopy_bulk_density: *const f32,
    /// Canopy cover as a fraction (0-1)
    pub canopy_cover: *const f32,
    pub elevation: *const f32,
}

/// A validated landscape, created by `fire_behavior_landscape_new`.
///
/// Read-only after creation, so one handle may be shared by any number of
/// threads computing behavior or running simulations concurrently.
pub struct FireBehaviorLandscape {
    pub(crate) landscape: Landscape,
}

impl FireBehaviorLandscape {
    /// Copy the caller's rasters and validate them into a landscape.
    ///
    /// # Errors
    ///
    /// Returns `NullPointer` for a null required layer, `InvalidParameter` for
    /// zero dimensions, and the mapped core error for invalid landscape values
    /// or unknown fuel codes.
    ///
    /// # Safety
    /// Every non-null layer pointer must reference `width * height` values.
    pub(crate) unsafe fn new(rasters: &LandscapeRasters) -> Result<Box<Self>, DefaultFfiError> {
        let (width, height) = (rasters.width, rasters.height);
        let len = width
            .checked_mul(height)
            .filter(|&len| len > 0)
            .ok_or_else(|| {
                DefaultFfiError::invalid_parameter(format!(
                    "Landscape dimensions {width}x{height} are empty or too large"
                ))
            })?;

        let layer = |ptr: *const f32, name: &str| -> Result<FieldData<f32>, DefaultFfiError> {
            // SAFETY: forwarded from this function's contract
            let values = unsafe { input_slice(ptr, len, name) }?;
            FieldData::from_vec(width, height, values.to_vec())
                .ok_or_else(|| DefaultFfiError::buffer_length(name, len, values.len()))
        };

        // SAFETY: forwarded from this function's contract
        let fuel = unsafe { input_slice(rasters.fuel, len, "fuel") }?;
        let fuel = FieldData::from_vec(width, height, fuel.to_vec())
            .ok_or_else(|| DefaultFfiError::buffer_length("fuel", len, fuel.len()))?;

        let elevation = if rasters.elevation.is_null() {
            None
        } else {
            Some(layer(rasters.elevation, "elevation")?)
        };

        let layers = LandscapeLayers {
            fuel,
            slope: layer(rasters.slope, "slope")?,
            aspect: layer(rasters.aspect, "aspect")?,
            canopy_base_height: layer(rasters.canopy_base_height, "canopy_base_height")?,
            canopy_bulk_density: layer(rasters.canopy_bulk_density, "canopy_bulk_density")?,
            canopy_cover: layer(rasters.canopy_cover, "canopy_cover")?,
            elevation,
            cell_size: rasters.cell_size,
        };

        let landscape = Landscape::from_layers(&layers)?;
        Ok(Box::new(Self { landscape }))
    }
}

/// Build a landscape from raster layers.
///
/// # Returns
/// - `Ok` with `*out_landscape` set to a new handle
/// - `NullPointer` if `rasters`, `out_landscape` or a required layer is null
/// - `InvalidParameter` if the dimensions are zero
/// - `InvalidLandscape` for out-of-range values or a non-positive cell size
/// - `UnknownFuelModel` for a fuel number missing from the catalog
///
/// On error `*out_landscape` is set to null and `fire_behavior_get_last_error`
/// describes the failure, including the offending cell.
///
/// # Safety
/// - `rasters` must point to a valid `LandscapeRasters`.
/// - Every non-null layer must hold `width * height` values.
/// - `out_landscape` must be writable.
///
/// The layers are copied; the caller may free them once this returns.
#[no_mangle]
pub unsafe extern "C" fn fire_behavior_landscape_new(
    rasters: *const LandscapeRasters,
    out_landscape: *mut *mut FireBehaviorLandscape,
) -> FireBehaviorErrorCode {
    if out_landscape.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_landscape"));
    }
    if rasters.is_null() {
        unsafe {
            *out_landscape = ptr::null_mut();
        }
        return track_error(&DefaultFfiError::null_pointer("rasters"));
    }

    // SAFETY: non-null checked above; layer lengths are the caller's contract
    match track_result(unsafe { FireBehaviorLandscape::new(&*rasters) }) {
        Ok(landscape) => {
            unsafe {
                *out_landscape = Box::into_raw(landscape);
            }
            FireBehaviorErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_landscape = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroy a landscape created by `fire_behavior_landscape_new`.
///
/// Null is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `fire_behavior_landscape_new`.
/// - The pointer MUST NOT have been freed already, and no other call may be
///   using it concurrently.
#[no_mangle]
pub unsafe extern "C" fn fire_behavior_landscape_destroy(landscape: *mut FireBehaviorLandscape) {
    if landscape.is_null() {
        return;
    }

    // SAFETY: created by Box::into_raw in fire_behavior_landscape_new
    unsafe {
        drop(Box::from_raw(landscape));
    }
}

/// Read the grid dimensions and cell size of a landscape.
///
/// # Returns
/// - `Ok` with all outputs written
/// - `NullPointer` if any pointer is null
///
/// # Safety
/// `landscape` must be a live handle and every output pointer must be writable.
#[no_mangle]
pub unsafe extern "C" fn fire_behavior_landscape_dimensions(
    landscape: *const FireBehaviorLandscape,
    out_width: *mut usize,
    out_height: *mut usize,
    out_cell_size: *mut f32,
) -> FireBehaviorErrorCode {
    if landscape.is_null() {
        return track_error(&DefaultFfiError::null_pointer("landscape"));
    }
    if out_width.is_null() || out_height.is_null() || out_cell_size.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_width/out_height/out_cell_size"));
    }

    // SAFETY: pointers checked above; liveness is the caller's contract
    unsafe {
        let landscape = &(*landscape).landscape;
        *out_width = landscape.width();
        *out_height = landscape.height();
        *out_cell_size = landscape.cell_size();
    }
    FireBehaviorErrorCode::Ok
}
