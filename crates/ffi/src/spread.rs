use fire_behavior_core::{
    FireSpreadSimulator, IgnitionGeometry, Landscape, LandscapeFireBehaviorMapper, Minutes,
};

use crate::error::{DefaultFfiError, FireBehaviorErrorCode};
use crate::helpers::{into_code, output_slice, track_error};
use crate::landscape::FireBehaviorLandscape;
use crate::scenario::ScenarioParameters;

/// Request for one spread run from a point ignition.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadRequest {
    /// Ignition column
    pub ignition_x: usize,
    /// Ignition row (0 is the northern edge)
    pub ignition_y: usize,
    /// Simulated time in minutes
    pub duration: f32,
    /// Requested time step in minutes; shortened automatically for stability
    pub time_step: f32,
}

/// Outcome of a spread run.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpreadSummary {
    pub burned_cells: usize,
    pub burned_hectares: f32,
    pub burned_acres: f32,
    /// Latest arrival time in minutes
    pub max_arrival: f32,
}

/// Map fire behavior for `scenario`, then spread fire from a point ignition
/// and write arrival times.
///
/// `out_arrival` receives one value per cell in row-major order: the arrival
/// time in minutes, or `NaN` for cells the fire did not reach. An ignition on
/// non-burnable ground moves to the nearest burnable cell within 100 cells.
///
/// # Returns
/// - `Ok` with `out_arrival` and `out_summary` (if non-null) written
/// - `NullPointer` if `landscape`, `scenario`, `request` or `out_arrival` is null
/// - `InvalidParameter` if `len` does not match the landscape
/// - `InvalidConditions` if a scenario value is outside its physical range
/// - `InvalidSimulation` for a non-positive duration or step, or an ignition
///   outside the grid
/// - `NoBurnableIgnition` if nothing near the ignition can burn
///
/// # Safety
/// - `landscape` must be a live handle from `fire_behavior_landscape_new`.
/// - `scenario` and `request` must point to valid structs.
/// - `out_arrival` must hold `len` writable values.
/// - `out_summary` may be null; otherwise it must be writable.
#[no_mangle]
pub unsafe extern "C" fn fire_behavior_simulate(
    landscape: *const FireBehaviorLandscape,
    scenario: *const ScenarioParameters,
    request: *const SpreadRequest,
    out_arrival: *mut f32,
    len: usize,
    out_summary: *mut SpreadSummary,
) -> FireBehaviorErrorCode {
    if landscape.is_null() {
        return track_error(&DefaultFfiError::null_pointer("landscape"));
    }
    if scenario.is_null() {
        return track_error(&DefaultFfiError::null_pointer("scenario"));
    }
    if request.is_null() {
        return track_error(&DefaultFfiError::null_pointer("request"));
    }
    if out_arrival.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_arrival"));
    }

    // SAFETY: pointers checked non-null; validity is the caller's contract
    into_code(unsafe {
        simulate_into(
            &(*landscape).landscape,
            *scenario,
            *request,
            out_arrival,
            len,
            out_summary,
        )
    })
}

/// # Safety
/// Same buffer contract as `fire_behavior_simulate`.
unsafe fn simulate_into(
    landscape: &Landscape,
    scenario: ScenarioParameters,
    request: SpreadRequest,
    out_arrival: *mut f32,
    len: usize,
    out_summary: *mut SpreadSummary,
) -> Result<(), DefaultFfiError> {
    let cells = landscape.width() * landscape.height();
    if len != cells {
        return Err(DefaultFfiError::buffer_length("out_arrival", cells, len));
    }

    let map = LandscapeFireBehaviorMapper::new().compute(landscape, &scenario.to_conditions())?;
    let arrival = FireSpreadSimulator::default().simulate(
        &map.spread_vectors(),
        &IgnitionGeometry::Point {
            x: request.ignition_x,
            y: request.ignition_y,
        },
        Minutes::new(request.duration),
        Minutes::new(request.time_step),
    )?;

    // SAFETY: out_arrival is non-null and holds len values per the caller's contract
    unsafe {
        if let Some(target) = output_slice(out_arrival, len) {
            target.copy_from_slice(&arrival.to_minutes_vec());
        }
        if !out_summary.is_null() {
            let (burned_hectares, burned_acres) = arrival.burned_area(arrival.duration());
            *out_summary = SpreadSummary {
                burned_cells: arrival.burned_cells(),
                burned_hectares,
                burned_acres,
                max_arrival: arrival.max_arrival().map_or(0.0, |t| *t),
            };
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crate::landscape::fire_behavior_landscape_destroy;
    use crate::landscape::tests::TestRasters;
    use fire_behavior_core::EnvironmentalConditions;
    use std::ptr;

    fn request(x: usize, y: usize) -> SpreadRequest {
        SpreadRequest {
            ignition_x: x,
            ignition_y: y,
            duration: 240.0,
            time_step: 10.0,
        }
    }

    #[test]
    fn test_simulate_writes_arrival_times() {
        let rasters = TestRasters::grass(8, 6);
        let handle = rasters.build();
        let scenario = ScenarioParameters::from(&EnvironmentalConditions::typical());
        let mut arrival = vec![-1.0_f32; 48];
        let mut summary = SpreadSummary::default();

        let code = unsafe {
            fire_behavior_simulate(
                handle,
                &scenario,
                &request(1, 3),
                arrival.as_mut_ptr(),
                48,
                &mut summary,
            )
        };
        assert_eq!(code, FireBehaviorErrorCode::Ok);

        // Ignition burns at time zero; the rock column never burns
        assert_abs_diff_eq!(arrival[3 * 8 + 1], 0.0);
        assert!((0..6).all(|y| arrival[y * 8 + 3].is_nan()));
        assert!(summary.burned_cells >= 1);
        assert!(summary.max_arrival <= 240.0);
        assert_eq!(
            arrival.iter().filter(|t| !t.is_nan()).count(),
            summary.burned_cells
        );

        unsafe { fire_behavior_landscape_destroy(handle) };
    }

    #[test]
    fn test_ignition_outside_grid() {
        let rasters = TestRasters::grass(8, 6);
        let handle = rasters.build();
        let scenario = ScenarioParameters::from(&EnvironmentalConditions::typical());
        let mut arrival = vec![0.0_f32; 48];

        let code = unsafe {
            fire_behavior_simulate(
                handle,
                &scenario,
                &request(8, 0),
                arrival.as_mut_ptr(),
                48,
                ptr::null_mut(),
            )
        };
        assert_eq!(code, FireBehaviorErrorCode::InvalidSimulation);

        unsafe { fire_behavior_landscape_destroy(handle) };
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let rasters = TestRasters::grass(8, 6);
        let handle = rasters.build();
        let scenario = ScenarioParameters::from(&EnvironmentalConditions::typical());
        let mut arrival = vec![0.0_f32; 48];
        let mut bad = request(1, 1);
        bad.duration = 0.0;

        let code = unsafe {
            fire_behavior_simulate(
                handle,
                &scenario,
                &bad,
                arrival.as_mut_ptr(),
                48,
                ptr::null_mut(),
            )
        };
        assert_eq!(code, FireBehaviorErrorCode::InvalidSimulation);

        unsafe { fire_behavior_landscape_destroy(handle) };
    }
}
