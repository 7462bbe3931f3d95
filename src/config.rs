//! Plot configuration: every recognized option of the corner-plot entry
//! point. A `PlotConfig` is plain data scoped to one invocation; nothing
//! in it is ambient or mutated by rendering.

use log::warn;
use plotly::common::color::Rgb;
use plotly::common::DashType;

use crate::error::PlotError;

/// Line style for truth markers and prior curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    Solid,
    #[default]
    Dashed,
    Dotted,
    DashDot,
}

impl LineStyle {
    pub(crate) fn dash(self) -> DashType {
        match self {
            LineStyle::Solid => DashType::Solid,
            LineStyle::Dashed => DashType::Dash,
            LineStyle::Dotted => DashType::Dot,
            LineStyle::DashDot => DashType::DashDot,
        }
    }
}

/// One row of truth values: per-parameter optional scalars (ragged; a
/// row may mark any subset of parameters), with optional display label,
/// color and line style. Unset color/style fall back to the default
/// cycles in [`crate::palette`].
#[derive(Debug, Clone, Default)]
pub struct TruthSpec {
    pub values: Vec<Option<f64>>,
    pub label: Option<String>,
    pub color: Option<Rgb>,
    pub style: Option<LineStyle>,
}

impl TruthSpec {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self {
            values,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// The marked value for `param`, if any. Rows shorter than the
    /// parameter count simply leave the tail unmarked.
    pub fn value(&self, param: usize) -> Option<f64> {
        self.values.get(param).copied().flatten()
    }

    /// Indices of the parameters this row marks, restricted to the
    /// plot's parameter count.
    pub fn marked_params(&self, n_params: usize) -> Vec<usize> {
        (0..n_params).filter(|&p| self.value(p).is_some()).collect()
    }
}

/// Figure width selection: journal column/page presets (defined in
/// printer's points), explicit inches, or automatic per-panel sizing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FigureSize {
    #[default]
    Auto,
    ApjColumn,
    ApjPage,
    MnrasColumn,
    MnrasPage,
    Inches(f64),
}

impl FigureSize {
    /// Figure width in inches for an `n_panels`-wide grid.
    pub fn width_inches(self, n_panels: usize) -> f64 {
        const PT: f64 = 72.27;
        match self {
            FigureSize::Auto => 1.8 * n_panels.max(1) as f64 + 1.0,
            FigureSize::ApjColumn => 245.26653 / PT,
            FigureSize::ApjPage => 513.11743 / PT,
            FigureSize::MnrasColumn => 240.0 / PT,
            FigureSize::MnrasPage => 504.0 / PT,
            FigureSize::Inches(w) => w,
        }
    }
}

/// Spacing between panels as a fraction of the plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanelSpacing {
    #[default]
    Tight,
    Loose,
    Fraction(f64),
}

impl PanelSpacing {
    pub fn fraction(self) -> f64 {
        match self {
            PanelSpacing::Tight => 0.0,
            PanelSpacing::Loose => 0.04,
            PanelSpacing::Fraction(f) => f.max(0.0),
        }
    }
}

/// All options of the corner-plot entry point. Start from `default()`
/// and override fields.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    /// Display names per parameter; `$...$` entries render as math.
    pub param_names: Option<Vec<String>>,
    /// Legend labels per sample set.
    pub chain_labels: Option<Vec<String>>,
    /// Truth rows to overlay.
    pub truths: Vec<TruthSpec>,
    /// Per-parameter optional Gaussian prior `(mean, width)` to overlay
    /// on the 1-D marginal panels. Ragged: may be shorter than the
    /// parameter count.
    pub priors: Vec<Option<(f64, f64)>>,
    /// Number of contour levels, 1..=3.
    pub n_contour_levels: usize,
    /// Use 2-D Gaussian sigma masses (39%/86%/99%) instead of the 1-D
    /// percentile ladder (68%/95%/99.7%).
    pub sigma_contour_levels: bool,
    /// Histogram bins per axis.
    pub n_bins: usize,
    /// Gaussian smoothing bandwidth in bins; 0 disables smoothing.
    pub smoothing_kernel: f64,
    /// Filled contour bands (vs. line-only contours).
    pub filled_plots: bool,
    /// Shade the raw 2-D density under the contours.
    pub plot_density: bool,
    pub figure_size: FigureSize,
    pub panel_spacing: PanelSpacing,
    /// Color-scheme names per sample set, overriding the default order.
    pub colors_order: Option<Vec<String>>,
    /// Draw the 1-D marginal panels on the diagonal.
    pub do_1d_plots: bool,
    /// Render a single 1-D panel (requires exactly one parameter).
    pub do_only_1d_plot: bool,
    /// Rotate (x, y) tick labels by 45°.
    pub label_rotation: (bool, bool),
    /// Extra (x, y) tick-label offset from the axes, in inches.
    pub tick_shifts: (f64, f64),
    /// Figure font family used when labels contain math markup.
    pub math_text_font: Option<String>,
    /// Per-parameter display-range overrides. Ragged.
    pub param_ranges: Vec<Option<(f64, f64)>>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            param_names: None,
            chain_labels: None,
            truths: Vec::new(),
            priors: Vec::new(),
            n_contour_levels: 2,
            sigma_contour_levels: false,
            n_bins: 30,
            smoothing_kernel: 1.0,
            filled_plots: true,
            plot_density: false,
            figure_size: FigureSize::default(),
            panel_spacing: PanelSpacing::default(),
            colors_order: None,
            do_1d_plots: true,
            do_only_1d_plot: false,
            label_rotation: (true, true),
            tick_shifts: (0.1, 0.1),
            math_text_font: None,
            param_ranges: Vec::new(),
        }
    }
}

impl PlotConfig {
    /// Fail-fast validation against the resolved shapes. Runs before any
    /// histogramming or rendering so bad configuration never produces a
    /// partial figure.
    pub fn validate(&self, n_params: usize, n_sets: usize) -> Result<(), PlotError> {
        if n_params > 8 {
            return Err(PlotError::TooManyParams(n_params));
        }
        if self.do_only_1d_plot && n_params != 1 {
            return Err(PlotError::Only1dShape(n_params));
        }
        if self.n_bins == 0 {
            return Err(PlotError::InvalidBins);
        }
        if !(1..=3).contains(&self.n_contour_levels) {
            return Err(PlotError::InvalidContourLevels(self.n_contour_levels));
        }
        if let Some(labels) = &self.chain_labels {
            if labels.len() != n_sets {
                return Err(PlotError::ChainLabelCount {
                    expected: n_sets,
                    got: labels.len(),
                });
            }
        }
        for (param, prior) in self.priors.iter().enumerate() {
            if let Some((_, width)) = prior {
                if !(*width > 0.0) {
                    return Err(PlotError::InvalidPrior {
                        param,
                        width: *width,
                    });
                }
            }
        }
        for (param, range) in self.param_ranges.iter().enumerate() {
            if let Some((low, high)) = range {
                if !(low < high) {
                    return Err(PlotError::InvalidRange {
                        param,
                        low: *low,
                        high: *high,
                    });
                }
            }
        }
        if self.smoothing_kernel > 0.0 && !cfg!(feature = "smoothing") {
            return Err(PlotError::SmoothingUnavailable(self.smoothing_kernel));
        }
        if self.priors.len() > n_params {
            warn!(
                "{} priors given for {} parameters; extras ignored",
                self.priors.len(),
                n_params
            );
        }
        for (row, truth) in self.truths.iter().enumerate() {
            if truth.values.len() > n_params {
                warn!(
                    "truth row {row} has {} entries for {} parameters; extras ignored",
                    truth.values.len(),
                    n_params
                );
            }
        }
        Ok(())
    }

    /// The priors that actually apply: `(parameter index, (mean, width))`
    /// for every present entry within the parameter count.
    pub fn active_priors(&self, n_params: usize) -> Vec<(usize, (f64, f64))> {
        self.priors
            .iter()
            .take(n_params)
            .enumerate()
            .filter_map(|(i, p)| p.map(|pair| (i, pair)))
            .collect()
    }
}
