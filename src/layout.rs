//! Panel layout: grid structure, shared per-parameter display ranges,
//! and panel domains in figure-fraction coordinates.
//!
//! Layout is a pure function of the sample sets and configuration:
//! identical inputs produce bit-identical geometry, which is what makes
//! repeated renders reproducible.

use log::warn;

use crate::config::PlotConfig;
use crate::error::PlotError;
use crate::samples::{self, SampleSet};

/// What a panel slot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// 1-D marginal of one parameter.
    Diagonal(usize),
    /// 2-D joint density of `x` (column parameter) vs. `y` (row parameter).
    Joint { x: usize, y: usize },
}

/// One populated slot in the grid, `row` counted from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panel {
    pub row: usize,
    pub col: usize,
    pub kind: PanelKind,
}

/// The computed corner-plot geometry: populated lower-triangle panels in
/// row-major draw order, one shared display range per parameter, and the
/// per-row/column axis domains.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelGrid {
    pub n_params: usize,
    /// Rows (= columns) in the visible grid. `n_params` normally,
    /// `n_params - 1` without the diagonal, 1 in single-panel mode.
    pub grid_size: usize,
    pub has_diagonal: bool,
    pub panels: Vec<Panel>,
    /// Shared display range per parameter (union across sets, or the
    /// user override).
    pub ranges: Vec<(f64, f64)>,
    /// Horizontal domain of each grid column, in figure fractions.
    pub col_domains: Vec<(f64, f64)>,
    /// Vertical domain of each grid row (row 0 at the top; fractions
    /// measured from the figure bottom, as the renderer expects).
    pub row_domains: Vec<(f64, f64)>,
    pub width_px: usize,
    pub height_px: usize,
}

impl PanelGrid {
    /// Parameter shown on the y axis of a grid row.
    pub fn row_param(&self, row: usize) -> usize {
        if self.has_diagonal {
            row
        } else {
            row + 1
        }
    }

    /// Parameter shown on the x axis of a grid column.
    pub fn col_param(&self, col: usize) -> usize {
        col
    }

    /// Computes the full layout. Validates shapes and configuration
    /// first, so a layout in hand implies the inputs were plottable.
    pub fn compute(sets: &[SampleSet], config: &PlotConfig) -> Result<PanelGrid, PlotError> {
        let n_params = samples::validate_shapes(sets)?;
        config.validate(n_params, sets.len())?;

        let ranges: Vec<(f64, f64)> = (0..n_params)
            .map(|p| {
                let over = config.param_ranges.get(p).copied().flatten();
                shared_range(sets, p, over)
            })
            .collect();

        let (grid_size, has_diagonal, panels) = if config.do_only_1d_plot || n_params == 1 {
            (
                1,
                true,
                vec![Panel {
                    row: 0,
                    col: 0,
                    kind: PanelKind::Diagonal(0),
                }],
            )
        } else if config.do_1d_plots {
            let mut panels = Vec::new();
            for i in 0..n_params {
                for j in 0..=i {
                    panels.push(Panel {
                        row: i,
                        col: j,
                        kind: if i == j {
                            PanelKind::Diagonal(i)
                        } else {
                            PanelKind::Joint { x: j, y: i }
                        },
                    });
                }
            }
            (n_params, true, panels)
        } else {
            let mut panels = Vec::new();
            for i in 1..n_params {
                for j in 0..i {
                    panels.push(Panel {
                        row: i - 1,
                        col: j,
                        kind: PanelKind::Joint { x: j, y: i },
                    });
                }
            }
            (n_params - 1, false, panels)
        };

        let spacing = config.panel_spacing.fraction();
        let (col_domains, row_domains) = domains(grid_size, spacing);

        let width_in = config.figure_size.width_inches(grid_size);
        let width_px = (width_in * 100.0).round() as usize;

        Ok(PanelGrid {
            n_params,
            grid_size,
            has_diagonal,
            panels,
            ranges,
            col_domains,
            row_domains,
            width_px,
            height_px: width_px,
        })
    }
}

/// Shared display range for one parameter: the union of each set's
/// finite extent, unless overridden. Degenerate columns fall back to a
/// half-unit pad around the observed value so downstream panels stay
/// renderable.
fn shared_range(sets: &[SampleSet], param: usize, over: Option<(f64, f64)>) -> (f64, f64) {
    if let Some(range) = over {
        return range;
    }
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for set in sets {
        if let Some((set_lo, set_hi)) = set.column_extent(param) {
            lo = lo.min(set_lo);
            hi = hi.max(set_hi);
        }
    }
    if lo > hi {
        warn!("parameter {param} has no finite samples; using unit range");
        return (0.0, 1.0);
    }
    if lo == hi {
        warn!("parameter {param} has zero variance; padding its range");
        return (lo - 0.5, hi + 0.5);
    }
    (lo, hi)
}

/// Splits the unit plotting area into `n` equal slots per direction with
/// `spacing` between them. Rows are returned top-first.
fn domains(n: usize, spacing: f64) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let n_f = n as f64;
    let slot = (1.0 - spacing * (n_f - 1.0)) / n_f;
    let cols = (0..n)
        .map(|j| {
            let x0 = j as f64 * (slot + spacing);
            (x0, x0 + slot)
        })
        .collect();
    let rows = (0..n)
        .map(|i| {
            let y1 = 1.0 - i as f64 * (slot + spacing);
            (y1 - slot, y1)
        })
        .collect();
    (cols, rows)
}
