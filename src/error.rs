//! Shared error type for corner-plot construction.

/// Errors raised while validating inputs or assembling a corner plot.
///
/// Configuration and shape problems are reported before any panel is
/// rendered; per-panel degeneracies (empty histograms, unreachable
/// contour levels) are downgraded locally and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("no sample sets given")]
    NoChains,

    #[error("sample set {index}: expected {expected} parameters, got {got}")]
    ShapeMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("expected {expected} parameter names, got {got}")]
    NameCount { expected: usize, got: usize },

    #[error("expected {expected} chain labels, got {got}")]
    ChainLabelCount { expected: usize, got: usize },

    #[error("prior for parameter {param}: width must be positive, got {width}")]
    InvalidPrior { param: usize, width: f64 },

    #[error("nContourLevels must be between 1 and 3, got {0}")]
    InvalidContourLevels(usize),

    #[error("range override for parameter {param}: low {low} must be below high {high}")]
    InvalidRange { param: usize, low: f64, high: f64 },

    #[error("histogram bin count must be positive")]
    InvalidBins,

    #[error("at most 8 parameters supported per corner plot, got {0}")]
    TooManyParams(usize),

    #[error("unknown color scheme {0:?}")]
    UnknownColorScheme(String),

    #[error("single-panel mode requires exactly one parameter, got {0}")]
    Only1dShape(usize),

    #[error(
        "smoothing kernel {0} requested but this build lacks the `smoothing` feature; \
         enable the feature or set the kernel to 0"
    )]
    SmoothingUnavailable(f64),

    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "csv")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "csv")]
    #[error("CSV column {column:?}, row {row}: {reason}")]
    CsvValue {
        column: String,
        row: usize,
        reason: String,
    },
}
