//! Per-panel trace construction: 1-D marginal curves with optional prior
//! overlays on the diagonal, nested mass-contour polygons (filled or
//! line) with optional density shading off the diagonal.
//!
//! Trace order within a panel is part of the observable contract:
//! density shading first, then sample sets in reverse order so set 0
//! lands on top.

use ndarray::prelude::*;
use ndarray_stats::QuantileExt;
use plotly::common::color::Rgb;
use plotly::common::{ColorScale, ColorScaleElement, Fill, Line, Mode};
use plotly::{HeatMap, Scatter, Trace};

use crate::config::PlotConfig;
use crate::contour::{self, ContourLevelSet};
use crate::error::PlotError;
use crate::hist;
use crate::layout::PanelGrid;
use crate::palette::ColorScheme;
use crate::samples::SampleSet;

/// Plotly axis reference for grid column `col` ("x", "x2", ...).
pub(crate) fn x_id(col: usize) -> String {
    if col == 0 {
        "x".to_string()
    } else {
        format!("x{}", col + 1)
    }
}

/// Plotly axis reference for grid row `row` ("y", "y2", ...).
pub(crate) fn y_id(row: usize) -> String {
    if row == 0 {
        "y".to_string()
    } else {
        format!("y{}", row + 1)
    }
}

#[cfg(feature = "smoothing")]
fn smooth1(counts: Array1<f64>, sigma: f64) -> Array1<f64> {
    if sigma > 0.0 {
        crate::smooth::gaussian_filter1d(&counts, sigma)
    } else {
        counts
    }
}

#[cfg(not(feature = "smoothing"))]
fn smooth1(counts: Array1<f64>, _sigma: f64) -> Array1<f64> {
    counts
}

#[cfg(feature = "smoothing")]
fn smooth2(counts: Array2<f64>, sigma: f64) -> Array2<f64> {
    if sigma > 0.0 {
        crate::smooth::gaussian_filter2d(&counts, sigma)
    } else {
        counts
    }
}

#[cfg(not(feature = "smoothing"))]
fn smooth2(counts: Array2<f64>, _sigma: f64) -> Array2<f64> {
    counts
}

/// Peak-normalizes a marginal curve and rescales it into the panel's
/// shared y range, leaving a little headroom. A flat (all-zero) curve
/// stays on the baseline.
pub(crate) fn rescale_marginal(counts: &Array1<f64>, y_lo: f64, y_hi: f64) -> Vec<f64> {
    let peak = counts.max().copied().unwrap_or(0.0);
    let span = 0.95 * (y_hi - y_lo);
    counts
        .iter()
        .map(|&v| {
            let t = if peak > 0.0 { v / peak } else { 0.0 };
            y_lo + t * span
        })
        .collect()
}

/// Closes a curve into a fillable polygon by walking back along the
/// baseline.
pub(crate) fn curve_polygon(
    centers: &[f64],
    values: &[f64],
    base: f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::with_capacity(centers.len() + 2);
    let mut ys = Vec::with_capacity(values.len() + 2);
    if let (Some(&first), Some(&last)) = (centers.first(), centers.last()) {
        xs.push(first);
        ys.push(base);
        xs.extend_from_slice(centers);
        ys.extend_from_slice(values);
        xs.push(last);
        ys.push(base);
    }
    (xs, ys)
}

/// Gaussian prior curve samples, peak-normalized, over `n` points of the
/// shared range.
pub(crate) fn prior_curve(mean: f64, width: f64, range: (f64, f64), n: usize) -> (Vec<f64>, Vec<f64>) {
    let xs: Vec<f64> = Array1::linspace(range.0, range.1, n).to_vec();
    let ys = xs
        .iter()
        .map(|&x| (-0.5 * ((x - mean) / width).powi(2)).exp())
        .collect();
    (xs, ys)
}

/// Traces for one diagonal (1-D marginal) panel: optional prior curve
/// first, then each set's smoothed marginal, set 0 drawn last.
pub(crate) fn diagonal_traces(
    sets: &[SampleSet],
    param: usize,
    grid: &PanelGrid,
    row: usize,
    col: usize,
    schemes: &[&'static ColorScheme],
    config: &PlotConfig,
) -> Result<Vec<Box<dyn Trace>>, PlotError> {
    let x_range = grid.ranges[grid.col_param(col)];
    let (y_lo, y_hi) = grid.ranges[grid.row_param(row)];
    let mut traces: Vec<Box<dyn Trace>> = Vec::new();

    if let Some((_, (mean, width))) = config
        .active_priors(grid.n_params)
        .into_iter()
        .find(|(p, _)| *p == param)
    {
        let (xs, ys) = prior_curve(mean, width, x_range, 128);
        let ys = rescale_marginal(&Array1::from_vec(ys), y_lo, y_hi);
        traces.push(
            Scatter::new(xs, ys)
                .mode(Mode::Lines)
                .line(Line::new().color(Rgb::new(160, 160, 160)).width(2.5))
                .x_axis(x_id(col).as_str())
                .y_axis(y_id(row).as_str())
                .show_legend(false),
        );
    }

    for (k, set) in sets.iter().enumerate().rev() {
        let h = hist::hist1d(set.column(param), config.n_bins, x_range)?;
        let counts = smooth1(h.counts.clone(), config.smoothing_kernel);
        let centers = h.centers().to_vec();
        let values = rescale_marginal(&counts, y_lo, y_hi);
        let line = Line::new().color(schemes[k].line()).width(1.5);

        let trace = if config.filled_plots {
            let (xs, ys) = curve_polygon(&centers, &values, y_lo);
            Scatter::new(xs, ys)
                .mode(Mode::Lines)
                .line(line)
                .fill(Fill::ToSelf)
                .fill_color(schemes[k].fill(1))
        } else {
            Scatter::new(centers, values).mode(Mode::Lines).line(line)
        };
        traces.push(
            trace
                .x_axis(x_id(col).as_str())
                .y_axis(y_id(row).as_str())
                .show_legend(false),
        );
    }
    Ok(traces)
}

/// Solved contour levels for one set on one parameter pair, exposed
/// separately from trace building so the solver output is testable
/// end-to-end against real histograms.
pub(crate) fn panel_levels(
    set: &SampleSet,
    x_param: usize,
    y_param: usize,
    grid: &PanelGrid,
    config: &PlotConfig,
    fractions: &[f64],
) -> Result<(hist::Hist2d, Array2<f64>, ContourLevelSet), PlotError> {
    let h = hist::hist2d(
        set.column(x_param),
        set.column(y_param),
        config.n_bins,
        grid.ranges[x_param],
        grid.ranges[y_param],
    )?;
    let smoothed = smooth2(h.counts.clone(), config.smoothing_kernel);
    let levels = contour::solve_levels(&smoothed, fractions);
    Ok((h, smoothed, levels))
}

/// Traces for one off-diagonal (2-D joint) panel: optional density
/// shading, then per-set nested contours, set 0 drawn last.
pub(crate) fn joint_traces(
    sets: &[SampleSet],
    x_param: usize,
    y_param: usize,
    grid: &PanelGrid,
    row: usize,
    col: usize,
    schemes: &[&'static ColorScheme],
    config: &PlotConfig,
    fractions: &[f64],
) -> Result<Vec<Box<dyn Trace>>, PlotError> {
    let mut traces: Vec<Box<dyn Trace>> = Vec::new();

    for (k, set) in sets.iter().enumerate().rev() {
        let (h, smoothed, levels) = panel_levels(set, x_param, y_param, grid, config, fractions)?;
        let x_centers = h.x_centers();
        let y_centers = h.y_centers();

        if config.plot_density {
            traces.push(density_trace(
                &smoothed, &x_centers, &y_centers, schemes[k], row, col,
            ));
        }

        // Outermost level first so inner bands paint over it.
        for (idx, level) in levels.levels.iter().enumerate().rev() {
            let Some(threshold) = level.threshold else {
                continue;
            };
            for path in contour::iso_paths(&smoothed, &x_centers, &y_centers, threshold) {
                let xs: Vec<f64> = path.points.iter().map(|p| p.0).collect();
                let ys: Vec<f64> = path.points.iter().map(|p| p.1).collect();
                let trace = if config.filled_plots && path.closed {
                    Scatter::new(xs, ys)
                        .mode(Mode::Lines)
                        .line(Line::new().color(schemes[k].fill(idx)).width(1.0))
                        .fill(Fill::ToSelf)
                        .fill_color(schemes[k].fill(idx))
                } else {
                    Scatter::new(xs, ys)
                        .mode(Mode::Lines)
                        .line(Line::new().color(schemes[k].fill(idx)).width(1.3))
                };
                traces.push(
                    trace
                        .x_axis(x_id(col).as_str())
                        .y_axis(y_id(row).as_str())
                        .show_legend(false),
                );
            }
        }
    }
    Ok(traces)
}

/// Raw density shading: a heatmap fading from transparent to the set's
/// line color.
fn density_trace(
    smoothed: &Array2<f64>,
    x_centers: &Array1<f64>,
    y_centers: &Array1<f64>,
    scheme: &ColorScheme,
    row: usize,
    col: usize,
) -> Box<dyn Trace> {
    let peak = smoothed.max().copied().unwrap_or(0.0);
    let z: Vec<Vec<f64>> = smoothed
        .rows()
        .into_iter()
        .map(|r| {
            r.iter()
                .map(|&v| if peak > 0.0 { v / peak } else { 0.0 })
                .collect()
        })
        .collect();
    let scale = ColorScale::Custom(vec![
        ColorScaleElement(0.0, "rgba(255,255,255,0)".to_string()),
        ColorScaleElement(1.0, scheme.line_css()),
    ]);
    HeatMap::new(x_centers.to_vec(), y_centers.to_vec(), z)
        .color_scale(scale)
        .show_scale(false)
        .x_axis(x_id(col).as_str())
        .y_axis(y_id(row).as_str())
}
