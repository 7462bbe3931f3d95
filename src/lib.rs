//! Corner (triangle) plots of multi-dimensional sampled data, typically
//! MCMC posterior samples: a lower-triangle grid of 1-D marginal panels
//! and 2-D probability-mass contour panels with shared axes, overlaid
//! truth markers, Gaussian priors and per-set color schemes.
//!
//! The entry point is [`corner_plot`]; see [`PlotConfig`] for the full
//! option surface.

pub mod annotate;
pub mod config;
pub mod contour;
pub mod error;
pub mod hist;
#[cfg(feature = "csv")]
pub mod io;
pub mod layout;
pub mod palette;
pub mod plot;
mod render;
pub mod samples;
#[cfg(feature = "smoothing")]
pub mod smooth;

pub use config::{FigureSize, LineStyle, PanelSpacing, PlotConfig, TruthSpec};
pub use error::PlotError;
pub use plot::corner_plot;
pub use samples::SampleSet;
