//! Contour level solving and iso-line geometry.
//!
//! Two stages: [`solve_levels`] turns a smoothed 2-D density grid into
//! density thresholds enclosing requested probability-mass fractions,
//! and [`iso_paths`] traces the closed iso-lines of one threshold across
//! the grid (marching squares over bin centers, with a zero pad ring so
//! every positive-threshold contour closes).

use log::warn;
use ndarray::prelude::*;

use crate::error::PlotError;

/// Cumulative masses of the 1-D Gaussian at 1, 2 and 3 sigma, the
/// default contour ladder.
const GAUSSIAN_1D_MASS: [f64; 3] = [0.682_689_492_137, 0.954_499_736_104, 0.997_300_203_937];

/// Target mass fractions for `n_levels` contour levels.
///
/// With `sigma_levels` the fractions are the 2-D Gaussian sigma masses
/// `1 − exp(−s²/2)` (≈ 39%/86%/99%) instead of the 1-D percentile ladder
/// (68%/95%/99.7%).
pub fn mass_fractions(n_levels: usize, sigma_levels: bool) -> Result<Vec<f64>, PlotError> {
    if !(1..=3).contains(&n_levels) {
        return Err(PlotError::InvalidContourLevels(n_levels));
    }
    if sigma_levels {
        Ok((1..=n_levels)
            .map(|s| 1.0 - (-0.5 * (s * s) as f64).exp())
            .collect())
    } else {
        Ok(GAUSSIAN_1D_MASS[..n_levels].to_vec())
    }
}

/// One solved contour level: the requested mass fraction and, when the
/// grid can support it, the density threshold enclosing that mass.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub fraction: f64,
    pub threshold: Option<f64>,
}

/// Solved thresholds, ordered by ascending mass fraction (so thresholds
/// are non-increasing). Empty when the grid was degenerate.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLevelSet {
    pub levels: Vec<Level>,
}

impl ContourLevelSet {
    pub fn empty() -> Self {
        Self { levels: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Computes, for each requested mass fraction, the density value `T`
/// such that the cells with value ≥ `T` hold at least that fraction of
/// the grid's total mass.
///
/// Cells are ranked descending under `f64::total_cmp`, so equal-density
/// ties resolve deterministically and identical grids always produce
/// identical thresholds. The threshold is the value of the first cell at
/// which the accumulated mass reaches the target (nearest-cell rule; no
/// interpolation between cell values), which guarantees the enclosed
/// mass meets or exceeds the request.
///
/// Fractions are resolved in ascending order regardless of input order.
/// A degenerate grid (no positive finite mass) yields an empty set;
/// fractions outside (0, 1) yield a level with no threshold.
pub fn solve_levels(grid: &Array2<f64>, fractions: &[f64]) -> ContourLevelSet {
    let mut cells: Vec<f64> = grid
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();
    let total: f64 = cells.iter().sum();
    if total <= 0.0 {
        warn!("density grid has no positive mass; no contours");
        return ContourLevelSet::empty();
    }
    cells.sort_unstable_by(|a, b| b.total_cmp(a));

    let mut order: Vec<f64> = fractions.to_vec();
    order.sort_unstable_by(f64::total_cmp);

    let mut levels = Vec::with_capacity(order.len());
    let mut cum = 0.0;
    let mut idx = 0;
    let mut last: Option<f64> = None;
    for fraction in order {
        if fraction <= 0.0 || fraction >= 1.0 {
            warn!("mass fraction {fraction} outside (0, 1); no contour for this level");
            levels.push(Level {
                fraction,
                threshold: None,
            });
            continue;
        }
        let target = fraction * total;
        while cum < target && idx < cells.len() {
            cum += cells[idx];
            last = Some(cells[idx]);
            idx += 1;
        }
        levels.push(Level {
            fraction,
            threshold: last,
        });
    }
    ContourLevelSet { levels }
}

/// Fraction of the grid's total mass held by cells with value ≥
/// `threshold`. Used to check solver output against its contract.
pub fn enclosed_mass(grid: &Array2<f64>, threshold: f64) -> f64 {
    let mut total = 0.0;
    let mut inside = 0.0;
    for &v in grid {
        if v.is_finite() && v > 0.0 {
            total += v;
            if v >= threshold {
                inside += v;
            }
        }
    }
    if total > 0.0 {
        inside / total
    } else {
        0.0
    }
}

/// A traced iso-line in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourPath {
    pub points: Vec<(f64, f64)>,
    pub closed: bool,
}

#[derive(Clone, Copy)]
struct Pt {
    x: f64,
    y: f64,
}

struct Segment {
    a: Pt,
    b: Pt,
}

/// Traces the iso-lines of `threshold` over a density grid whose node
/// coordinates are the bin centers (`counts[y][x]` against
/// `x_centers[x]`, `y_centers[y]`).
///
/// The grid is padded with one ring of zero cells before tracing, so any
/// positive threshold produces closed polygons suitable for filling.
pub fn iso_paths(
    counts: &Array2<f64>,
    x_centers: &Array1<f64>,
    y_centers: &Array1<f64>,
    threshold: f64,
) -> Vec<ContourPath> {
    let (ny, nx) = counts.dim();
    if nx < 1 || ny < 1 || x_centers.len() != nx || y_centers.len() != ny || threshold <= 0.0 {
        return Vec::new();
    }

    // Pad with zeros one cell beyond each edge; coordinates continue at
    // the outermost bin spacing (or unit spacing for a 1-wide grid).
    let dx = if nx > 1 {
        x_centers[1] - x_centers[0]
    } else {
        1.0
    };
    let dy = if ny > 1 {
        y_centers[1] - y_centers[0]
    } else {
        1.0
    };
    let mut grid = Array2::<f64>::zeros((ny + 2, nx + 2));
    grid.slice_mut(s![1..ny + 1, 1..nx + 1]).assign(counts);
    let xs: Vec<f64> = std::iter::once(x_centers[0] - dx)
        .chain(x_centers.iter().copied())
        .chain(std::iter::once(x_centers[nx - 1] + dx))
        .collect();
    let ys: Vec<f64> = std::iter::once(y_centers[0] - dy)
        .chain(y_centers.iter().copied())
        .chain(std::iter::once(y_centers[ny - 1] + dy))
        .collect();

    let segments = march_squares(&grid, &xs, &ys, threshold);
    let eps = 1e-9 * (dx.abs() + dy.abs());
    connect_segments(segments, eps)
}

/// Marching squares: per-cell crossing segments with linear edge
/// interpolation and center-averaged saddle disambiguation.
fn march_squares(grid: &Array2<f64>, xs: &[f64], ys: &[f64], level: f64) -> Vec<Segment> {
    let (ny, nx) = grid.dim();
    let mut segments = Vec::new();
    for iy in 0..ny - 1 {
        for ix in 0..nx - 1 {
            let v00 = grid[(iy, ix)];
            let v10 = grid[(iy, ix + 1)];
            let v01 = grid[(iy + 1, ix)];
            let v11 = grid[(iy + 1, ix + 1)];
            if !(v00.is_finite() && v10.is_finite() && v01.is_finite() && v11.is_finite()) {
                continue;
            }

            let mut case = 0u8;
            if v00 >= level {
                case |= 1;
            }
            if v10 >= level {
                case |= 2;
            }
            if v11 >= level {
                case |= 4;
            }
            if v01 >= level {
                case |= 8;
            }
            if case == 0 || case == 15 {
                continue;
            }

            let (x0, x1) = (xs[ix], xs[ix + 1]);
            let (y0, y1) = (ys[iy], ys[iy + 1]);
            let bottom = cross(x0, y0, x1, y0, v00, v10, level);
            let right = cross(x1, y0, x1, y1, v10, v11, level);
            let top = cross(x0, y1, x1, y1, v01, v11, level);
            let left = cross(x0, y0, x0, y1, v00, v01, level);

            match case {
                1 | 14 => segments.push(Segment { a: left, b: bottom }),
                2 | 13 => segments.push(Segment { a: bottom, b: right }),
                3 | 12 => segments.push(Segment { a: left, b: right }),
                4 | 11 => segments.push(Segment { a: right, b: top }),
                6 | 9 => segments.push(Segment { a: bottom, b: top }),
                7 | 8 => segments.push(Segment { a: left, b: top }),
                5 => {
                    // Saddle: the grid-center average decides whether the
                    // two high corners connect through the cell.
                    if 0.25 * (v00 + v10 + v01 + v11) >= level {
                        segments.push(Segment { a: bottom, b: right });
                        segments.push(Segment { a: left, b: top });
                    } else {
                        segments.push(Segment { a: left, b: bottom });
                        segments.push(Segment { a: right, b: top });
                    }
                }
                10 => {
                    if 0.25 * (v00 + v10 + v01 + v11) >= level {
                        segments.push(Segment { a: left, b: bottom });
                        segments.push(Segment { a: right, b: top });
                    } else {
                        segments.push(Segment { a: bottom, b: right });
                        segments.push(Segment { a: left, b: top });
                    }
                }
                _ => {}
            }
        }
    }
    segments
}

/// Point where the iso-line crosses the edge between two grid nodes.
fn cross(x1: f64, y1: f64, x2: f64, y2: f64, v1: f64, v2: f64, level: f64) -> Pt {
    if (v2 - v1).abs() < f64::EPSILON {
        return Pt {
            x: 0.5 * (x1 + x2),
            y: 0.5 * (y1 + y2),
        };
    }
    let t = ((level - v1) / (v2 - v1)).clamp(0.0, 1.0);
    Pt {
        x: x1 + t * (x2 - x1),
        y: y1 + t * (y2 - y1),
    }
}

fn close_enough(a: Pt, b: Pt, eps: f64) -> bool {
    (a.x - b.x).hypot(a.y - b.y) < eps
}

/// Chains unordered crossing segments into polylines by endpoint
/// proximity, marking a path closed when its ends meet.
fn connect_segments(segments: Vec<Segment>, eps: f64) -> Vec<ContourPath> {
    let mut paths = Vec::new();
    let mut used = vec![false; segments.len()];

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut points = vec![segments[start].a, segments[start].b];

        let mut extended = true;
        while extended {
            extended = false;
            let tail = *points.last().unwrap();
            for (i, seg) in segments.iter().enumerate() {
                if used[i] {
                    continue;
                }
                if close_enough(seg.a, tail, eps) {
                    points.push(seg.b);
                } else if close_enough(seg.b, tail, eps) {
                    points.push(seg.a);
                } else {
                    continue;
                }
                used[i] = true;
                extended = true;
                break;
            }
        }

        let closed = points.len() > 2 && close_enough(points[0], *points.last().unwrap(), eps);
        paths.push(ContourPath {
            points: points.into_iter().map(|p| (p.x, p.y)).collect(),
            closed,
        });
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1, Array2};

    fn peak_grid(n: usize) -> Array2<f64> {
        // Smooth radial peak centered on the grid.
        let c = (n as f64 - 1.0) / 2.0;
        Array2::from_shape_fn((n, n), |(i, j)| {
            let r2 = (i as f64 - c).powi(2) + (j as f64 - c).powi(2);
            (-r2 / 8.0).exp()
        })
    }

    #[test]
    fn test_mass_fractions_ladders() {
        let f = mass_fractions(3, false).unwrap();
        assert!((f[0] - 0.6827).abs() < 1e-3);
        assert!((f[1] - 0.9545).abs() < 1e-3);
        assert!((f[2] - 0.9973).abs() < 1e-3);

        let s = mass_fractions(2, true).unwrap();
        assert!((s[0] - 0.3935).abs() < 1e-3);
        assert!((s[1] - 0.8647).abs() < 1e-3);
    }

    #[test]
    fn test_mass_fractions_rejects_bad_count() {
        assert!(matches!(
            mass_fractions(0, false),
            Err(PlotError::InvalidContourLevels(0))
        ));
        assert!(matches!(
            mass_fractions(4, false),
            Err(PlotError::InvalidContourLevels(4))
        ));
    }

    #[test]
    fn test_solve_levels_monotonic_and_sufficient() {
        let grid = peak_grid(25);
        let fractions = [0.68, 0.95, 0.997];
        let set = solve_levels(&grid, &fractions);
        assert_eq!(set.levels.len(), 3);

        let thresholds: Vec<f64> = set
            .levels
            .iter()
            .map(|l| l.threshold.unwrap())
            .collect();
        assert!(thresholds[0] >= thresholds[1]);
        assert!(thresholds[1] >= thresholds[2]);

        for level in &set.levels {
            let mass = enclosed_mass(&grid, level.threshold.unwrap());
            assert!(
                mass >= level.fraction - 1e-12,
                "level {} encloses {} < requested",
                level.fraction,
                mass
            );
        }
    }

    #[test]
    fn test_solve_levels_orders_by_fraction() {
        let grid = peak_grid(15);
        let set = solve_levels(&grid, &[0.95, 0.68]);
        assert!(set.levels[0].fraction < set.levels[1].fraction);
        assert!(set.levels[0].threshold.unwrap() >= set.levels[1].threshold.unwrap());
    }

    #[test]
    fn test_solve_levels_deterministic_under_ties() {
        let grid = array![[1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]];
        let a = solve_levels(&grid, &[0.5]);
        let b = solve_levels(&grid, &[0.5]);
        assert_eq!(a, b);
        assert_eq!(a.levels[0].threshold, Some(1.0));
    }

    #[test]
    fn test_solve_levels_degenerate_grid() {
        let zeros = Array2::<f64>::zeros((4, 4));
        assert!(solve_levels(&zeros, &[0.68]).is_empty());

        let nans = Array2::<f64>::from_elem((4, 4), f64::NAN);
        assert!(solve_levels(&nans, &[0.68]).is_empty());
    }

    #[test]
    fn test_solve_levels_bad_fraction_is_local() {
        let grid = peak_grid(9);
        let set = solve_levels(&grid, &[0.68, 1.5]);
        assert_eq!(set.levels.len(), 2);
        assert!(set.levels[0].threshold.is_some());
        assert_eq!(set.levels[1].threshold, None);
    }

    #[test]
    fn test_iso_paths_close_around_peak() {
        let grid = peak_grid(21);
        let xs = Array1::linspace(-1.0, 1.0, 21);
        let ys = Array1::linspace(-1.0, 1.0, 21);
        let paths = iso_paths(&grid, &xs, &ys, 0.5);
        assert!(!paths.is_empty());
        for path in &paths {
            assert!(path.closed, "peak contour must close");
            assert!(path.points.len() > 4);
        }
    }

    #[test]
    fn test_iso_paths_boundary_mass_still_closes() {
        // All mass in a corner cell: the zero pad ring closes the loop.
        let mut grid = Array2::<f64>::zeros((5, 5));
        grid[(0, 0)] = 10.0;
        let xs = Array1::linspace(0.0, 4.0, 5);
        let ys = Array1::linspace(0.0, 4.0, 5);
        let paths = iso_paths(&grid, &xs, &ys, 5.0);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].closed);
    }

    #[test]
    fn test_iso_paths_flat_grid_empty() {
        let grid = Array2::<f64>::zeros((4, 4));
        let xs = Array1::linspace(0.0, 3.0, 4);
        let ys = Array1::linspace(0.0, 3.0, 4);
        assert!(iso_paths(&grid, &xs, &ys, 1.0).is_empty());
    }
}
