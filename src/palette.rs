//! Color schemes for sample sets and default truth-line styling.
//!
//! Each scheme carries a line color plus three fill shades, darkest
//! innermost.

use plotly::common::color::Rgb;

use crate::config::LineStyle;
use crate::error::PlotError;

/// One named scheme: a line color for curves and contour outlines, and
/// three fill shades for the nested contour bands, innermost first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScheme {
    pub name: &'static str,
    line: (u8, u8, u8),
    fills: [(u8, u8, u8); 3],
}

impl ColorScheme {
    pub fn line(&self) -> Rgb {
        let (r, g, b) = self.line;
        Rgb::new(r, g, b)
    }

    /// Fill shade for contour level `idx` (0 = innermost/darkest). Extra
    /// levels reuse the lightest shade.
    pub fn fill(&self, idx: usize) -> Rgb {
        let (r, g, b) = self.fills[idx.min(self.fills.len() - 1)];
        Rgb::new(r, g, b)
    }

    /// The line color as a CSS `rgb(...)` string, for color-scale stops.
    pub fn line_css(&self) -> String {
        let (r, g, b) = self.line;
        format!("rgb({r},{g},{b})")
    }
}

pub static SCHEMES: [ColorScheme; 10] = [
    ColorScheme {
        name: "blues",
        line: (59, 91, 146),
        fills: [(76, 114, 176), (127, 165, 227), (178, 216, 255)],
    },
    ColorScheme {
        name: "oranges",
        line: (204, 102, 11),
        fills: [(255, 127, 14), (255, 160, 77), (255, 210, 161)],
    },
    ColorScheme {
        name: "greens",
        line: (62, 124, 78),
        fills: [(85, 168, 104), (131, 201, 149), (187, 228, 197)],
    },
    ColorScheme {
        name: "reds",
        line: (158, 62, 66),
        fills: [(196, 78, 82), (217, 131, 131), (239, 192, 193)],
    },
    ColorScheme {
        name: "purples",
        line: (101, 88, 148),
        fills: [(129, 114, 178), (169, 159, 206), (211, 205, 232)],
    },
    ColorScheme {
        name: "browns",
        line: (112, 77, 48),
        fills: [(140, 97, 60), (176, 139, 102), (217, 196, 174)],
    },
    ColorScheme {
        name: "pinks",
        line: (196, 94, 164),
        fills: [(227, 119, 194), (239, 168, 218), (249, 215, 239)],
    },
    ColorScheme {
        name: "grays",
        line: (60, 60, 60),
        fills: [(79, 79, 79), (143, 143, 143), (207, 207, 207)],
    },
    ColorScheme {
        name: "yellows",
        line: (148, 149, 27),
        fills: [(188, 189, 34), (214, 216, 96), (238, 240, 161)],
    },
    ColorScheme {
        name: "cyans",
        line: (18, 151, 164),
        fills: [(23, 190, 207), (111, 216, 227), (192, 240, 245)],
    },
];

/// Default scheme assignment order for successive sample sets.
pub const DEFAULT_ORDER: [&str; 10] = [
    "blues", "oranges", "greens", "reds", "purples", "browns", "pinks", "grays", "yellows",
    "cyans",
];

const TRUTH_COLORS: [(u8, u8, u8); 5] = [
    (196, 78, 82),
    (23, 190, 207),
    (85, 168, 104),
    (76, 114, 176),
    (227, 119, 194),
];

const TRUTH_STYLES: [LineStyle; 4] = [
    LineStyle::Dashed,
    LineStyle::Dotted,
    LineStyle::DashDot,
    LineStyle::Solid,
];

/// Default color for truth row `idx`, cycling.
pub fn truth_color(idx: usize) -> Rgb {
    let (r, g, b) = TRUTH_COLORS[idx % TRUTH_COLORS.len()];
    Rgb::new(r, g, b)
}

/// Default line style for truth row `idx`, cycling.
pub fn truth_style(idx: usize) -> LineStyle {
    TRUTH_STYLES[idx % TRUTH_STYLES.len()]
}

fn lookup(name: &str) -> Result<&'static ColorScheme, PlotError> {
    SCHEMES
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| PlotError::UnknownColorScheme(name.to_string()))
}

/// Resolves the scheme for each sample set: the user's `colors_order`
/// first (validated eagerly), then the default order, cycling when there
/// are more sets than schemes. Assignment is by set index, so overlay
/// colors are stable across calls.
pub fn resolve_schemes(
    order: Option<&[String]>,
    n_sets: usize,
) -> Result<Vec<&'static ColorScheme>, PlotError> {
    let named: Vec<&'static ColorScheme> = match order {
        Some(names) => names.iter().map(|n| lookup(n)).collect::<Result<_, _>>()?,
        None => DEFAULT_ORDER
            .iter()
            .map(|n| lookup(n).expect("default order names a known scheme"))
            .collect(),
    };
    if named.is_empty() {
        return Err(PlotError::UnknownColorScheme(String::new()));
    }
    Ok((0..n_sets).map(|i| named[i % named.len()]).collect())
}
