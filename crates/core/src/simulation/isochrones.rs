//! Isochrones: burned extent and perimeter at chosen times
//!
//! Perimeters are traced with marching squares over a sign field built from
//! the arrival grid (negative = burned by the break time). The field is padded
//! by one unburned ring so every perimeter closes inside the grid. Segment
//! endpoints are in metres from the grid's top-left corner, with `y` growing
//! southward like the rows.

use crate::core_types::units::Minutes;
use crate::grid::fields::FieldData;
use crate::grid::landscape::cells_to_area;
use crate::simulation::spread::ArrivalTimeGrid;
use nalgebra::Point2;
use rayon::prelude::*;
use serde::Serialize;

/// Threat bands used in fire danger briefings (hours)
pub const THREAT_BREAKS_HOURS: [f32; 8] = [0.0, 1.0, 3.0, 6.0, 12.0, 24.0, 48.0, 72.0];

/// One straight piece of a perimeter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerimeterSegment {
    pub start: Point2<f32>,
    pub end: Point2<f32>,
}

/// Burned extent at one break time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Isochrone {
    pub time: Minutes,
    pub cell_count: usize,
    pub area_hectares: f32,
    pub area_acres: f32,
    pub boundary: Vec<PerimeterSegment>,
}

/// Cells first reached within `(lower, upper]`; the first band also holds
/// the ignition cells at time zero
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsochroneBand {
    pub lower: Minutes,
    pub upper: Minutes,
    pub cells: Vec<(usize, usize)>,
}

/// Multiples of `interval` up to and including `duration`
pub fn interval_breaks(duration: Minutes, interval: Minutes) -> Vec<Minutes> {
    if *interval <= 0.0 || !interval.is_finite() {
        return Vec::new();
    }
    (1..)
        .map(|i| interval * i as f32)
        .take_while(|t| *t <= duration)
        .collect()
}

/// Hourly breaks up to `duration`
pub fn hourly_breaks(duration: Minutes) -> Vec<Minutes> {
    interval_breaks(duration, Minutes::from_hours(1.0))
}

/// Threat-band breaks that fall within `duration`
pub fn threat_breaks(duration: Minutes) -> Vec<Minutes> {
    THREAT_BREAKS_HOURS
        .iter()
        .map(|&h| Minutes::from_hours(h))
        .filter(|t| *t <= duration)
        .collect()
}

fn sorted_breaks(breaks: &[Minutes]) -> Vec<Minutes> {
    let mut sorted: Vec<Minutes> = breaks.iter().copied().filter(|t| t.is_finite()).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted
}

/// Burned extent and perimeter at each break, sorted by time
pub fn extract_isochrones(grid: &ArrivalTimeGrid, breaks: &[Minutes]) -> Vec<Isochrone> {
    sorted_breaks(breaks)
        .into_par_iter()
        .map(|time| {
            let cell_count = grid.burned_cells_at(time);
            let (area_hectares, area_acres) = cells_to_area(cell_count, grid.cell_size());
            Isochrone {
                time,
                cell_count,
                area_hectares,
                area_acres,
                boundary: perimeter_segments(grid, time),
            }
        })
        .collect()
}

/// Group reached cells into bands between consecutive breaks. Cells reached
/// after the last break are left out.
pub fn arrival_bands(grid: &ArrivalTimeGrid, breaks: &[Minutes]) -> Vec<IsochroneBand> {
    let breaks = sorted_breaks(breaks);
    let mut bands: Vec<IsochroneBand> = breaks
        .iter()
        .scan(Minutes::ZERO, |lower, &upper| {
            let band = IsochroneBand {
                lower: *lower,
                upper,
                cells: Vec::new(),
            };
            *lower = upper;
            Some(band)
        })
        .collect();

    for (index, arrival) in grid.times().iter().enumerate() {
        let Some(t) = *arrival else { continue };
        if let Some(band) = bands.iter_mut().find(|b| t <= b.upper) {
            band.cells.push(grid.times().coords(index));
        }
    }
    bands
}

/// Perimeter of the area burned by `time`
pub fn perimeter_segments(grid: &ArrivalTimeGrid, time: Minutes) -> Vec<PerimeterSegment> {
    let (width, height) = (grid.width(), grid.height());
    // Pad with one unburned ring so contours close
    let field = FieldData::from_fn(width + 2, height + 2, |px, py| {
        if px == 0 || py == 0 || px > width || py > height {
            return 1.0;
        }
        match grid.get(px - 1, py - 1) {
            Some(t) if t <= time => -1.0,
            _ => 1.0,
        }
    });
    contour_segments(&field, grid.cell_size(), -0.5)
}

/// Marching squares over `field`, returning the zero contour. Corner
/// (px, py) of the field sits at `((px + offset) * cell_size, (py + offset) * cell_size)`.
pub fn contour_segments(
    field: &FieldData<f32>,
    cell_size: f32,
    offset: f32,
) -> Vec<PerimeterSegment> {
    let (width, height) = field.dimensions();
    if width < 2 || height < 2 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    for y in 0..height - 1 {
        for x in 0..width - 1 {
            let tl = *field.get(x, y);
            let tr = *field.get(x + 1, y);
            let br = *field.get(x + 1, y + 1);
            let bl = *field.get(x, y + 1);

            let case = u8::from(tl < 0.0)
                | (u8::from(tr < 0.0) << 1)
                | (u8::from(br < 0.0) << 2)
                | (u8::from(bl < 0.0) << 3);
            if case == 0 || case == 15 {
                continue;
            }

            let x0 = (x as f32 + offset) * cell_size;
            let y0 = (y as f32 + offset) * cell_size;
            let top = Point2::new(x0 + crossing(tl, tr) * cell_size, y0);
            let right = Point2::new(x0 + cell_size, y0 + crossing(tr, br) * cell_size);
            let bottom = Point2::new(x0 + crossing(bl, br) * cell_size, y0 + cell_size);
            let left = Point2::new(x0, y0 + crossing(tl, bl) * cell_size);

            let mut push = |start, end| segments.push(PerimeterSegment { start, end });
            match case {
                1 | 14 => push(top, left),
                2 | 13 => push(right, top),
                3 | 12 => push(right, left),
                4 | 11 => push(bottom, right),
                6 | 9 => push(bottom, top),
                7 | 8 => push(left, bottom),
                // Saddles: the two burned corners stay separate
                5 => {
                    push(top, left);
                    push(bottom, right);
                }
                10 => {
                    push(top, right);
                    push(left, bottom);
                }
                _ => {}
            }
        }
    }
    segments
}

/// Fraction along an edge from `a` to `b` where the field crosses zero
fn crossing(a: f32, b: f32) -> f32 {
    if (a < 0.0) == (b < 0.0) {
        0.5
    } else {
        a.abs() / (a.abs() + b.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::units::{Degrees, MetersPerMinute};
    use crate::physics::ellipse::SpreadVector;
    use crate::simulation::spread::{FireSpreadSimulator, IgnitionGeometry, SpreadGrid};
    use approx::assert_relative_eq;

    fn burn(width: usize, height: usize, duration: f32) -> ArrivalTimeGrid {
        let grid = SpreadGrid::uniform(
            width,
            height,
            10.0,
            SpreadVector::new(MetersPerMinute::new(1.0), Degrees::ZERO, 1.0),
        );
        FireSpreadSimulator::default()
            .simulate(
                &grid,
                &IgnitionGeometry::Point {
                    x: width / 2,
                    y: height / 2,
                },
                Minutes::new(duration),
                Minutes::new(5.0),
            )
            .unwrap()
    }

    #[test]
    fn test_break_lists() {
        assert_eq!(
            hourly_breaks(Minutes::new(150.0)),
            vec![Minutes::new(60.0), Minutes::new(120.0)]
        );
        assert_eq!(threat_breaks(Minutes::from_hours(6.0)).len(), 4);
        assert!(interval_breaks(Minutes::new(10.0), Minutes::ZERO).is_empty());
    }

    #[test]
    fn test_single_cell_perimeter_is_closed_diamond() {
        let arrival = burn(5, 5, 1.0);
        let segments = perimeter_segments(&arrival, Minutes::ZERO);
        assert_eq!(segments.len(), 4);
        // Every endpoint is shared by exactly two segments
        for seg in &segments {
            let shared = segments
                .iter()
                .filter(|s| s.start == seg.end || s.end == seg.end)
                .count();
            assert_eq!(shared, 2);
        }
        // Ignition cell centre is (25, 25); crossings sit half a cell away
        assert!(segments
            .iter()
            .any(|s| s.start == Point2::new(25.0, 20.0) || s.end == Point2::new(25.0, 20.0)));
    }

    #[test]
    fn test_isochrone_areas_grow() {
        let arrival = burn(11, 11, 40.0);
        let isochrones = extract_isochrones(
            &arrival,
            &[Minutes::new(40.0), Minutes::ZERO, Minutes::new(20.0), Minutes::new(20.0)],
        );
        assert_eq!(isochrones.len(), 3);
        assert!(isochrones.windows(2).all(|w| w[0].cell_count <= w[1].cell_count));
        assert_eq!(isochrones[0].cell_count, 1);
        assert_relative_eq!(isochrones[0].area_hectares, 0.01);
        assert!(isochrones[2].boundary.len() > isochrones[0].boundary.len());
    }

    #[test]
    fn test_bands_partition_reached_cells() {
        let arrival = burn(11, 11, 40.0);
        let bands = arrival_bands(&arrival, &[Minutes::new(10.0), Minutes::new(40.0)]);
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0].lower, Minutes::ZERO);
        let total: usize = bands.iter().map(|b| b.cells.len()).sum();
        assert_eq!(total, arrival.burned_cells());
        assert!(bands[0].cells.contains(&(5, 5)));
    }

    #[test]
    fn test_contour_saddle_has_two_segments() {
        let field = FieldData::from_vec(2, 2, vec![-1.0, 1.0, 1.0, -1.0]).unwrap();
        let segments = contour_segments(&field, 1.0, 0.0);
        assert_eq!(segments.len(), 2);
    }
}
