use fire_behavior_core::{FireBehaviorMap, Landscape, LandscapeFireBehaviorMapper};

use crate::error::{DefaultFfiError, FireBehaviorErrorCode};
use crate::helpers::{into_code, output_slice, track_error};
use crate::landscape::FireBehaviorLandscape;
use crate::scenario::ScenarioParameters;

/// Caller-owned output buffers for `fire_behavior_compute`.
///
/// Each non-null buffer must hold `len` values, where `len` equals the
/// landscape's `width * height`. Null buffers are skipped. `NoData` cells are
/// written as `NaN` (fire type 255).
#[repr(C)]
pub struct BehaviorOutputs {
    pub len: usize,
    /// Head fire rate of spread in m/min
    pub rate_of_spread: *mut f32,
    /// Flame length in m
    pub flame_length: *mut f32,
    /// Fireline intensity in kW/m
    pub fireline_intensity: *mut f32,
    /// 0 no spread, 1 surface, 2 passive crown, 3 active crown
    pub fire_type: *mut u8,
    /// Direction of maximum spread, degrees clockwise from north
    pub heading: *mut f32,
}

/// Landscape-wide summary of one behavior computation.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BehaviorSummary {
    pub burnable_cells: usize,
    pub no_data_cells: usize,
    /// ft/min over burnable cells
    pub mean_rate_of_spread: f32,
    pub max_rate_of_spread: f32,
    /// ft over burnable cells
    pub mean_flame_length: f32,
    pub max_flame_length: f32,
    pub surface_cells: usize,
    pub passive_crown_cells: usize,
    pub active_crown_cells: usize,
    pub burnable_area_hectares: f32,
}

impl From<&FireBehaviorMap> for BehaviorSummary {
    fn from(map: &FireBehaviorMap) -> Self {
        let stats = map.statistics();
        Self {
            burnable_cells: stats.burnable_cells,
            no_data_cells: stats.no_data_cells,
            mean_rate_of_spread: *stats.mean_rate_of_spread,
            max_rate_of_spread: *stats.max_rate_of_spread,
            mean_flame_length: *stats.mean_flame_length,
            max_flame_length: *stats.max_flame_length,
            surface_cells: stats.fire_types.surface,
            passive_crown_cells: stats.fire_types.passive_crown,
            active_crown_cells: stats.fire_types.active_crown,
            burnable_area_hectares: stats.burnable_area_hectares,
        }
    }
}

fn copy_into<T: Copy>(target: Option<&mut [T]>, values: &[T]) {
    if let Some(target) = target {
        target.copy_from_slice(values);
    }
}

/// Evaluate surface and crown fire behavior for every cell of a landscape.
///
/// Runs row-parallel. The scenario is validated before any cell is computed.
///
/// # Returns
/// - `Ok` with every non-null buffer and `out_summary` written
/// - `NullPointer` if `landscape`, `scenario` or `outputs` is null
/// - `InvalidParameter` if `outputs.len` does not match the landscape
/// - `InvalidConditions` if a scenario value is outside its physical range
///
/// # Safety
/// - `landscape` must be a live handle from `fire_behavior_landscape_new`.
/// - `scenario` and `outputs` must point to valid structs.
/// - Every non-null buffer in `outputs` must hold `outputs.len` writable values.
/// - `out_summary` may be null; otherwise it must be writable.
#[no_mangle]
pub unsafe extern "C" fn fire_behavior_compute(
    landscape: *const FireBehaviorLandscape,
    scenario: *const ScenarioParameters,
    outputs: *const BehaviorOutputs,
    out_summary: *mut BehaviorSummary,
) -> FireBehaviorErrorCode {
    if landscape.is_null() {
        return track_error(&DefaultFfiError::null_pointer("landscape"));
    }
    if scenario.is_null() {
        return track_error(&DefaultFfiError::null_pointer("scenario"));
    }
    if outputs.is_null() {
        return track_error(&DefaultFfiError::null_pointer("outputs"));
    }

    // SAFETY: all three checked non-null; validity is the caller's contract
    into_code(unsafe { compute_into(&(*landscape).landscape, *scenario, &*outputs, out_summary) })
}

/// # Safety
/// Same buffer contract as `fire_behavior_compute`.
unsafe fn compute_into(
    landscape: &Landscape,
    scenario: ScenarioParameters,
    outputs: &BehaviorOutputs,
    out_summary: *mut BehaviorSummary,
) -> Result<(), DefaultFfiError> {
    let cells = landscape.width() * landscape.height();
    if outputs.len != cells {
        return Err(DefaultFfiError::buffer_length("outputs", cells, outputs.len));
    }

    let map = LandscapeFireBehaviorMapper::new().compute(landscape, &scenario.to_conditions())?;

    // SAFETY: each buffer holds outputs.len values per the caller's contract
    unsafe {
        copy_into(output_slice(outputs.rate_of_spread, cells), &map.rate_of_spread_field());
        copy_into(output_slice(outputs.flame_length, cells), &map.flame_length_field());
        copy_into(
            output_slice(outputs.fireline_intensity, cells),
            &map.fireline_intensity_field(),
        );
        copy_into(output_slice(outputs.fire_type, cells), &map.fire_type_field());
        copy_into(output_slice(outputs.heading, cells), &map.field(|r| *r.heading));
        if !out_summary.is_null() {
            *out_summary = BehaviorSummary::from(&map);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landscape::fire_behavior_landscape_destroy;
    use crate::landscape::tests::TestRasters;
    use fire_behavior_core::EnvironmentalConditions;
    use std::ptr;

    fn empty_outputs(len: usize) -> BehaviorOutputs {
        BehaviorOutputs {
            len,
            rate_of_spread: ptr::null_mut(),
            flame_length: ptr::null_mut(),
            fireline_intensity: ptr::null_mut(),
            fire_type: ptr::null_mut(),
            heading: ptr::null_mut(),
        }
    }

    #[test]
    fn test_compute_fills_buffers() {
        let rasters = TestRasters::grass(6, 4);
        let handle = rasters.build();
        let scenario = ScenarioParameters::from(&EnvironmentalConditions::red_flag());

        let mut ros = vec![-1.0_f32; 24];
        let mut fire_type = vec![200_u8; 24];
        let mut outputs = empty_outputs(24);
        outputs.rate_of_spread = ros.as_mut_ptr();
        outputs.fire_type = fire_type.as_mut_ptr();
        let mut summary = BehaviorSummary::default();

        let code = unsafe { fire_behavior_compute(handle, &scenario, &outputs, &mut summary) };
        assert_eq!(code, FireBehaviorErrorCode::Ok);

        // Column 3 is rock, everything else grass
        for (i, (&r, &t)) in ros.iter().zip(&fire_type).enumerate() {
            if i % 6 == 3 {
                assert!(r.abs() < f32::EPSILON);
                assert_eq!(t, 0);
            } else {
                assert!(r > 0.0);
                assert_eq!(t, 1);
            }
        }
        assert_eq!(summary.burnable_cells, 20);
        assert_eq!(summary.no_data_cells, 0);
        assert!(summary.max_rate_of_spread >= summary.mean_rate_of_spread);

        unsafe { fire_behavior_landscape_destroy(handle) };
    }

    #[test]
    fn test_wrong_buffer_length_rejected() {
        let rasters = TestRasters::grass(6, 4);
        let handle = rasters.build();
        let scenario = ScenarioParameters::from(&EnvironmentalConditions::typical());

        let outputs = empty_outputs(23);
        let code = unsafe { fire_behavior_compute(handle, &scenario, &outputs, ptr::null_mut()) };
        assert_eq!(code, FireBehaviorErrorCode::InvalidParameter);

        unsafe { fire_behavior_landscape_destroy(handle) };
    }

    #[test]
    fn test_invalid_scenario_rejected() {
        let rasters = TestRasters::grass(6, 4);
        let handle = rasters.build();
        let mut scenario = ScenarioParameters::from(&EnvironmentalConditions::typical());
        scenario.relative_humidity = 140.0;

        let outputs = empty_outputs(24);
        let code = unsafe { fire_behavior_compute(handle, &scenario, &outputs, ptr::null_mut()) };
        assert_eq!(code, FireBehaviorErrorCode::InvalidConditions);

        unsafe { fire_behavior_landscape_destroy(handle) };
    }
}
