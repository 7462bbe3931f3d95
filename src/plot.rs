//! The corner-plot entry point: validates inputs, computes the layout,
//! runs the histogram, smoothing and contour stages per panel, and
//! assembles the plotly figure.

use plotly::common::{color::NamedColor, Font};
use plotly::layout::{Axis, Legend, Margin, TicksDirection};
use plotly::{Layout, Plot};

use crate::annotate;
use crate::config::PlotConfig;
use crate::contour;
use crate::error::PlotError;
use crate::layout::{PanelGrid, PanelKind};
use crate::palette;
use crate::render::{self, x_id, y_id};
use crate::samples::{self, SampleSet};

/// Builds a corner plot of one or more sample sets.
///
/// All configuration and shape validation happens before the first trace
/// is created, so a bad call never yields a half-drawn figure. The
/// returned [`Plot`] is ready for the caller to display or persist
/// (`write_html`, `to_json`, ...); this function performs no I/O.
///
/// # Examples
///
/// ```rust
/// use cornerplot::{corner_plot, PlotConfig, SampleSet};
/// use ndarray::Array2;
///
/// let data = Array2::from_shape_fn((500, 2), |(i, j)| {
///     ((i * 37 + j * 11) % 100) as f64 / 10.0 + j as f64
/// });
/// let chains = [SampleSet::from_array(data)];
/// let figure = corner_plot(&chains, &PlotConfig::default())?;
/// assert!(!figure.to_json().is_empty());
/// # Ok::<(), cornerplot::PlotError>(())
/// ```
pub fn corner_plot(chains: &[SampleSet], config: &PlotConfig) -> Result<Plot, PlotError> {
    let n_params = samples::validate_shapes(chains)?;
    config.validate(n_params, chains.len())?;
    let names = samples::resolve_names(chains, config.param_names.as_deref(), n_params)?;
    let grid = PanelGrid::compute(chains, config)?;
    let schemes = palette::resolve_schemes(config.colors_order.as_deref(), chains.len())?;
    let fractions = contour::mass_fractions(config.n_contour_levels, config.sigma_contour_levels)?;

    let mut plot = Plot::new();

    // Set geometry, panel by panel in row-major order.
    for panel in &grid.panels {
        let traces = match panel.kind {
            PanelKind::Diagonal(param) => render::diagonal_traces(
                chains, param, &grid, panel.row, panel.col, &schemes, config,
            )?,
            PanelKind::Joint { x, y } => render::joint_traces(
                chains, x, y, &grid, panel.row, panel.col, &schemes, config, &fractions,
            )?,
        };
        for trace in traces {
            plot.add_trace(trace);
        }
    }

    // Truth overlays go on top of every panel's set geometry.
    for panel in &grid.panels {
        for trace in
            annotate::truth_traces(&config.truths, panel.kind, &grid, panel.row, panel.col)
        {
            plot.add_trace(trace);
        }
    }

    let legend_entries = annotate::legend_traces(
        config.chain_labels.as_deref(),
        &schemes,
        &config.truths,
    );
    let has_legend = !legend_entries.is_empty();
    for trace in legend_entries {
        plot.add_trace(trace);
    }

    plot.set_layout(figure_layout(&grid, config, names.as_deref(), has_legend));
    Ok(plot)
}

fn figure_layout(
    grid: &PanelGrid,
    config: &PlotConfig,
    names: Option<&[String]>,
    has_legend: bool,
) -> Layout {
    let margin_left = 70 + (config.tick_shifts.1 * 100.0).round().max(0.0) as usize;
    let margin_bottom = 70 + (config.tick_shifts.0 * 100.0).round().max(0.0) as usize;

    let mut layout = Layout::new()
        .width(grid.width_px)
        .height(grid.height_px)
        .margin(
            Margin::new()
                .left(margin_left)
                .right(20)
                .top(20)
                .bottom(margin_bottom),
        )
        .show_legend(has_legend);

    if has_legend {
        layout = layout.legend(Legend::new().x(0.75).y(0.98));
    }

    if let Some(family) = math_font(config, names) {
        layout = layout.font(Font::new().family(family.as_str()));
    }

    for col in 0..grid.grid_size {
        let axis = column_axis(grid, config, names, col);
        layout = with_x_axis(layout, col, axis);
    }
    for row in 0..grid.grid_size {
        let axis = row_axis(grid, config, names, row);
        layout = with_y_axis(layout, row, axis);
    }
    layout
}

/// The figure font family only changes when math labels are present and
/// a math-text font was requested; plain-text figures keep the default.
fn math_font(config: &PlotConfig, names: Option<&[String]>) -> Option<String> {
    let family = config.math_text_font.as_ref()?;
    let any_math = names
        .map(|ns| ns.iter().any(|n| annotate::is_math_text(n)))
        .unwrap_or(false);
    any_math.then(|| family.clone())
}

fn base_axis() -> Axis {
    Axis::new()
        .show_grid(false)
        .zero_line(false)
        .show_line(true)
        .line_color(NamedColor::Black)
        .ticks(TicksDirection::Outside)
}

/// Shared x axis of one grid column, anchored below the bottom row.
fn column_axis(grid: &PanelGrid, config: &PlotConfig, names: Option<&[String]>, col: usize) -> Axis {
    let param = grid.col_param(col);
    let (lo, hi) = grid.ranges[param];
    let (d0, d1) = grid.col_domains[col];
    let mut axis = base_axis()
        .domain(&[d0, d1])
        .range(vec![lo, hi])
        .anchor(y_id(grid.grid_size - 1).as_str())
        .show_tick_labels(true);
    if config.label_rotation.0 {
        axis = axis.tick_angle(45.0);
    }
    if let Some(name) = names.and_then(|ns| ns.get(param)) {
        axis = axis.title(name.as_str());
    }
    axis
}

/// Shared y axis of one grid row, anchored left of the first column.
/// A row whose leftmost panel is the 1-D marginal hides its tick labels:
/// the marginal's vertical scale is normalized, not a parameter.
fn row_axis(grid: &PanelGrid, config: &PlotConfig, names: Option<&[String]>, row: usize) -> Axis {
    let param = grid.row_param(row);
    let (lo, hi) = grid.ranges[param];
    let (d0, d1) = grid.row_domains[row];
    let diagonal_row = grid.has_diagonal && row == 0;
    let mut axis = base_axis()
        .domain(&[d0, d1])
        .range(vec![lo, hi])
        .anchor(x_id(0).as_str())
        .show_tick_labels(!diagonal_row);
    if config.label_rotation.1 && !diagonal_row {
        axis = axis.tick_angle(-45.0);
    }
    if !diagonal_row {
        if let Some(name) = names.and_then(|ns| ns.get(param)) {
            axis = axis.title(name.as_str());
        }
    }
    axis
}

fn with_x_axis(layout: Layout, idx: usize, axis: Axis) -> Layout {
    match idx {
        0 => layout.x_axis(axis),
        1 => layout.x_axis2(axis),
        2 => layout.x_axis3(axis),
        3 => layout.x_axis4(axis),
        4 => layout.x_axis5(axis),
        5 => layout.x_axis6(axis),
        6 => layout.x_axis7(axis),
        7 => layout.x_axis8(axis),
        _ => layout,
    }
}

fn with_y_axis(layout: Layout, idx: usize, axis: Axis) -> Layout {
    match idx {
        0 => layout.y_axis(axis),
        1 => layout.y_axis2(axis),
        2 => layout.y_axis3(axis),
        3 => layout.y_axis4(axis),
        4 => layout.y_axis5(axis),
        5 => layout.y_axis6(axis),
        6 => layout.y_axis7(axis),
        7 => layout.y_axis8(axis),
        _ => layout,
    }
}
