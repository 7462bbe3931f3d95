//! Histogram estimation: bins raw 1-D or 2-D samples into density grids
//! that the smoothing filter and contour solver consume downstream.

use log::warn;
use ndarray::prelude::*;

use crate::error::PlotError;

/// A binned 1-D density grid. `edges` has `counts.len() + 1` entries and
/// is strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct Hist1d {
    pub counts: Array1<f64>,
    pub edges: Array1<f64>,
}

impl Hist1d {
    /// Bin-center coordinates, one per count.
    pub fn centers(&self) -> Array1<f64> {
        centers_of(&self.edges)
    }
}

/// A binned 2-D density grid. `counts` is indexed `[y_bin][x_bin]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Hist2d {
    pub counts: Array2<f64>,
    pub x_edges: Array1<f64>,
    pub y_edges: Array1<f64>,
}

impl Hist2d {
    pub fn x_centers(&self) -> Array1<f64> {
        centers_of(&self.x_edges)
    }

    pub fn y_centers(&self) -> Array1<f64> {
        centers_of(&self.y_edges)
    }
}

fn centers_of(edges: &Array1<f64>) -> Array1<f64> {
    Array1::from_iter(
        edges
            .windows(2)
            .into_iter()
            .map(|w| 0.5 * (w[0] + w[1])),
    )
}

/// Expands a degenerate (zero-width) range so a single-valued column
/// still produces a usable one-spike grid instead of failing.
fn usable_range(range: (f64, f64)) -> (f64, f64) {
    let (lo, hi) = range;
    if lo < hi {
        (lo, hi)
    } else {
        warn!("degenerate histogram range [{lo}, {hi}]; expanding by ±0.5");
        (lo - 0.5, hi + 0.5)
    }
}

fn edges_for(range: (f64, f64), bins: usize) -> Array1<f64> {
    Array1::linspace(range.0, range.1, bins + 1)
}

/// Maps a value to its bin, counting the upper range bound into the last
/// bin (so no sample sitting exactly on the max edge is dropped). Values
/// outside the range, and NaN, return `None`.
fn bin_index(v: f64, lo: f64, hi: f64, bins: usize) -> Option<usize> {
    if !v.is_finite() || v < lo || v > hi {
        return None;
    }
    let frac = (v - lo) / (hi - lo);
    Some(((frac * bins as f64) as usize).min(bins - 1))
}

/// Bins one column of samples over `range` into `bins` equal-width bins.
/// Pure function of its inputs; the counts sum to the number of in-range
/// finite samples.
pub fn hist1d(
    values: ArrayView1<'_, f64>,
    bins: usize,
    range: (f64, f64),
) -> Result<Hist1d, PlotError> {
    if bins == 0 {
        return Err(PlotError::InvalidBins);
    }
    let (lo, hi) = usable_range(range);
    let mut counts = Array1::<f64>::zeros(bins);
    for &v in values {
        if let Some(b) = bin_index(v, lo, hi, bins) {
            counts[b] += 1.0;
        }
    }
    Ok(Hist1d {
        counts,
        edges: edges_for((lo, hi), bins),
    })
}

/// Bins a pair of columns over a regular `bins` × `bins` grid. A sample
/// counts only when both coordinates are finite and in range.
pub fn hist2d(
    x: ArrayView1<'_, f64>,
    y: ArrayView1<'_, f64>,
    bins: usize,
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> Result<Hist2d, PlotError> {
    if bins == 0 {
        return Err(PlotError::InvalidBins);
    }
    let (x_lo, x_hi) = usable_range(x_range);
    let (y_lo, y_hi) = usable_range(y_range);
    let mut counts = Array2::<f64>::zeros((bins, bins));
    for (&xv, &yv) in x.iter().zip(y.iter()) {
        let (Some(bx), Some(by)) = (
            bin_index(xv, x_lo, x_hi, bins),
            bin_index(yv, y_lo, y_hi, bins),
        ) else {
            continue;
        };
        counts[(by, bx)] += 1.0;
    }
    Ok(Hist2d {
        counts,
        x_edges: edges_for((x_lo, x_hi), bins),
        y_edges: edges_for((y_lo, y_hi), bins),
    })
}
