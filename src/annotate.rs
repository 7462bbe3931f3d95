//! Overlays on top of the assembled grid: truth markers, legend entries,
//! and label handling (math markup vs. plain text).

use plotly::common::color::Rgb;
use plotly::common::{Line, Mode};
use plotly::{Scatter, Trace};

use crate::config::{LineStyle, TruthSpec};
use crate::layout::{PanelGrid, PanelKind};
use crate::palette::{self, ColorScheme};
use crate::render::{x_id, y_id};

/// Structural math-markup detection: a label wrapped in `$...$` renders
/// as math, anything else renders literally. Callers never pre-declare
/// which kind a label is.
pub fn is_math_text(label: &str) -> bool {
    label.len() > 1 && label.starts_with('$') && label.ends_with('$')
}

fn truth_color(truth: &TruthSpec, idx: usize) -> Rgb {
    truth
        .color
        .clone()
        .unwrap_or_else(|| palette::truth_color(idx))
}

fn truth_style(truth: &TruthSpec, idx: usize) -> LineStyle {
    truth.style.unwrap_or_else(|| palette::truth_style(idx))
}

fn truth_line(xs: Vec<f64>, ys: Vec<f64>, color: Rgb, style: LineStyle, col: usize, row: usize) -> Box<dyn Trace> {
    Scatter::new(xs, ys)
        .mode(Mode::Lines)
        .line(Line::new().color(color).width(1.3).dash(style.dash()))
        .x_axis(x_id(col).as_str())
        .y_axis(y_id(row).as_str())
        .show_legend(false)
}

/// Truth overlays for one panel: a vertical line on a 1-D panel, a
/// crosshair (whichever of the two coordinates is marked) on a 2-D
/// panel. Unmarked parameters are skipped without comment; ragged
/// truth rows are the expected shape.
pub(crate) fn truth_traces(
    truths: &[TruthSpec],
    kind: PanelKind,
    grid: &PanelGrid,
    row: usize,
    col: usize,
) -> Vec<Box<dyn Trace>> {
    let mut traces: Vec<Box<dyn Trace>> = Vec::new();
    for (idx, truth) in truths.iter().enumerate() {
        let color = truth_color(truth, idx);
        let style = truth_style(truth, idx);
        match kind {
            PanelKind::Diagonal(param) => {
                if let Some(v) = truth.value(param) {
                    let (y_lo, y_hi) = grid.ranges[grid.row_param(row)];
                    traces.push(truth_line(
                        vec![v, v],
                        vec![y_lo, y_hi],
                        color,
                        style,
                        col,
                        row,
                    ));
                }
            }
            PanelKind::Joint { x, y } => {
                let (x_lo, x_hi) = grid.ranges[x];
                let (y_lo, y_hi) = grid.ranges[y];
                if let Some(v) = truth.value(x) {
                    traces.push(truth_line(
                        vec![v, v],
                        vec![y_lo, y_hi],
                        color,
                        style,
                        col,
                        row,
                    ));
                }
                if let Some(v) = truth.value(y) {
                    traces.push(truth_line(
                        vec![x_lo, x_hi],
                        vec![v, v],
                        color,
                        style,
                        col,
                        row,
                    ));
                }
            }
        }
    }
    traces
}

/// Proxy traces that only exist to populate the legend: one per labeled
/// sample set (in set order), then one per labeled truth row. The single
/// NaN point never draws.
pub(crate) fn legend_traces(
    chain_labels: Option<&[String]>,
    schemes: &[&'static ColorScheme],
    truths: &[TruthSpec],
) -> Vec<Box<dyn Trace>> {
    let mut traces: Vec<Box<dyn Trace>> = Vec::new();
    if let Some(labels) = chain_labels {
        for (k, label) in labels.iter().enumerate() {
            traces.push(
                Scatter::new(vec![f64::NAN], vec![f64::NAN])
                    .mode(Mode::Lines)
                    .line(Line::new().color(schemes[k].line()).width(2.0))
                    .name(label)
                    .show_legend(true),
            );
        }
    }
    for (idx, truth) in truths.iter().enumerate() {
        if let Some(label) = &truth.label {
            traces.push(
                Scatter::new(vec![f64::NAN], vec![f64::NAN])
                    .mode(Mode::Lines)
                    .line(
                        Line::new()
                            .color(truth_color(truth, idx))
                            .width(1.3)
                            .dash(truth_style(truth, idx).dash()),
                    )
                    .name(label)
                    .show_legend(true),
            );
        }
    }
    traces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotConfig;
    use crate::samples::SampleSet;
    use ndarray::Array2;

    fn flat_set(n_params: usize) -> SampleSet {
        SampleSet::from_array(Array2::from_shape_fn((100, n_params), |(i, j)| {
            (i as f64) / 10.0 + j as f64
        }))
    }

    #[test]
    fn test_is_math_text() {
        assert!(is_math_text("$B_\\mathrm{\\lambda}$"));
        assert!(is_math_text("$\\lambda$"));
        assert!(!is_math_text("param name"));
        assert!(!is_math_text("$"));
        assert!(!is_math_text("cost in $"));
    }

    #[test]
    fn test_truth_crosshair_respects_ragged_rows() {
        // truths=[[4,.5,None,.1],[None,None,.3,1]]: set-1 marks 0,1,3;
        // set-2 marks 2,3.
        let truths = vec![
            TruthSpec::new(vec![Some(4.0), Some(0.5), None, Some(0.1)]),
            TruthSpec::new(vec![None, None, Some(0.3), Some(1.0)]),
        ];
        let grid =
            PanelGrid::compute(&[flat_set(4)], &PlotConfig::default()).unwrap();

        // Diagonal panel for parameter 2: only the second row marks it.
        let d2 = truth_traces(&truths, PanelKind::Diagonal(2), &grid, 2, 2);
        assert_eq!(d2.len(), 1);

        // Diagonal panel for parameter 0: only the first row marks it.
        let d0 = truth_traces(&truths, PanelKind::Diagonal(0), &grid, 0, 0);
        assert_eq!(d0.len(), 1);

        // Joint panel (x=2, y=3): row 1 contributes one line (y only),
        // row 2 contributes both.
        let j = truth_traces(&truths, PanelKind::Joint { x: 2, y: 3 }, &grid, 3, 2);
        assert_eq!(j.len(), 3);
    }

    #[test]
    fn test_legend_traces_counts() {
        let labels = vec!["data1".to_string(), "data 2".to_string()];
        let schemes = crate::palette::resolve_schemes(None, 2).unwrap();
        let truths = vec![
            TruthSpec::new(vec![Some(1.0)]).with_label("the truth"),
            TruthSpec::new(vec![Some(2.0)]),
        ];
        let traces = legend_traces(Some(labels.as_slice()), &schemes, &truths);
        // Two chain entries + one labeled truth row.
        assert_eq!(traces.len(), 3);

        let none = legend_traces(None, &schemes, &[]);
        assert!(none.is_empty());
    }
}
