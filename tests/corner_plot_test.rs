//! End-to-end corner-plot tests: each scenario builds a figure through
//! the public API and inspects the layout/traces via the figure JSON.

use cornerplot::{corner_plot, PlotConfig, PlotError, SampleSet, TruthSpec};
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde_json::Value;

/// A mildly correlated Gaussian chain with per-column offsets.
fn make_chain(n_params: usize, n_samples: usize, offsets: &[f64], seed: u64) -> SampleSet {
    let normal = Normal::new(0.0, 1.0).unwrap();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut data = Array2::<f64>::zeros((n_samples, n_params));
    for i in 0..n_samples {
        let mut prev = 0.0;
        for j in 0..n_params {
            let z: f64 = normal.sample(&mut rng);
            let v = 0.3 * prev + z;
            data[(i, j)] = v + offsets.get(j).copied().unwrap_or(0.0);
            prev = v;
        }
    }
    SampleSet::from_array(data)
}

fn figure_json(chains: &[SampleSet], config: &PlotConfig) -> Value {
    let plot = corner_plot(chains, config).expect("corner_plot should succeed");
    serde_json::from_str(&plot.to_json()).expect("figure JSON should parse")
}

/// Data traces assigned to the panel at axis pair (`x_ref`, `y_ref`).
fn panel_traces<'a>(figure: &'a Value, x_ref: &str, y_ref: &str) -> Vec<&'a Value> {
    figure["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["xaxis"] == x_ref && t["yaxis"] == y_ref)
        .collect()
}

#[test]
fn scenario_a_large_offset_column_keeps_sensible_shared_range() {
    // Two 4-parameter, 10000-row sets with one column offset by 1e8.
    let a = make_chain(4, 10_000, &[0.0, 0.0, 0.0, 1e8], 1);
    let b = make_chain(4, 10_000, &[1.0, 1.0, 1.0, 1e8 + 1.0], 2);
    let figure = figure_json(&[a, b], &PlotConfig::default());

    let range = figure["layout"]["xaxis4"]["range"].as_array().unwrap();
    let lo = range[0].as_f64().unwrap();
    let hi = range[1].as_f64().unwrap();
    assert!(lo.is_finite() && hi.is_finite());
    assert!(lo < hi, "axis range must not be degenerate");
    assert!(lo > 0.9e8 && hi < 1.1e8, "shared range sits around 1e8");
}

#[test]
fn scenario_b_priors_overlay_only_marked_diagonals() {
    // priors=[[2,1],[.5,2],[],[0,.4]]: diagonal panels 0, 1 and 3 get a
    // prior curve, panel 2 does not.
    let chain = make_chain(4, 5_000, &[0.0; 4], 3);
    let config = PlotConfig {
        priors: vec![Some((2.0, 1.0)), Some((0.5, 2.0)), None, Some((0.0, 0.4))],
        ..Default::default()
    };
    let figure = figure_json(std::slice::from_ref(&chain), &config);

    // One marginal curve per panel, plus a prior where configured.
    assert_eq!(panel_traces(&figure, "x", "y").len(), 2);
    assert_eq!(panel_traces(&figure, "x2", "y2").len(), 2);
    assert_eq!(panel_traces(&figure, "x3", "y3").len(), 1);
    assert_eq!(panel_traces(&figure, "x4", "y4").len(), 2);
}

#[test]
fn scenario_c_ragged_truths_mark_their_own_subsets() {
    // truths=[[4,.5,None,.1],[None,None,.3,1]] over two sets: row 1
    // marks parameters 0,1,3; row 2 marks 2,3.
    let chains = [
        make_chain(4, 5_000, &[0.0; 4], 4),
        make_chain(4, 5_000, &[0.5; 4], 5),
    ];
    let config = PlotConfig {
        truths: vec![
            TruthSpec::new(vec![Some(4.0), Some(0.5), None, Some(0.1)]),
            TruthSpec::new(vec![None, None, Some(0.3), Some(1.0)]),
        ],
        ..Default::default()
    };
    let figure = figure_json(&chains, &config);

    // Each diagonal panel holds two marginal curves plus one vertical
    // truth line per row that marks its parameter.
    assert_eq!(panel_traces(&figure, "x", "y").len(), 2 + 1);
    assert_eq!(panel_traces(&figure, "x2", "y2").len(), 2 + 1);
    assert_eq!(panel_traces(&figure, "x3", "y3").len(), 2 + 1);
    assert_eq!(panel_traces(&figure, "x4", "y4").len(), 2 + 2);
}

#[test]
fn scenario_d_zero_kernel_is_bit_identical_passthrough() {
    let chain = make_chain(2, 4_000, &[0.0, 0.0], 6);
    let h = cornerplot::hist::hist1d(chain.column(0), 30, (-4.0, 4.0)).unwrap();
    let smoothed = cornerplot::smooth::gaussian_filter1d(&h.counts, 0.0);
    assert_eq!(smoothed, h.counts);

    let h2 = cornerplot::hist::hist2d(
        chain.column(0),
        chain.column(1),
        30,
        (-4.0, 4.0),
        (-4.0, 4.0),
    )
    .unwrap();
    assert_eq!(cornerplot::smooth::gaussian_filter2d(&h2.counts, 0.0), h2.counts);

    // And the full pipeline accepts a disabled kernel.
    let config = PlotConfig {
        smoothing_kernel: 0.0,
        ..Default::default()
    };
    assert!(corner_plot(std::slice::from_ref(&chain), &config).is_ok());
}

#[test]
fn scenario_e_three_levels_three_bands() {
    let chain = make_chain(2, 20_000, &[0.0, 0.0], 7);
    let config = PlotConfig {
        n_contour_levels: 3,
        n_bins: 20,
        smoothing_kernel: 2.0,
        ..Default::default()
    };

    // Exactly three thresholds are solved...
    let fractions = cornerplot::contour::mass_fractions(3, false).unwrap();
    let h = cornerplot::hist::hist2d(
        chain.column(0),
        chain.column(1),
        20,
        (-4.0, 4.0),
        (-4.0, 4.0),
    )
    .unwrap();
    let smoothed = cornerplot::smooth::gaussian_filter2d(&h.counts, 2.0);
    let levels = cornerplot::contour::solve_levels(&smoothed, &fractions);
    assert_eq!(levels.levels.len(), 3);
    assert!(levels.levels.iter().all(|l| l.threshold.is_some()));

    // ...and the single joint panel draws exactly three nested bands for
    // this heavily smoothed unimodal grid.
    let figure = figure_json(std::slice::from_ref(&chain), &config);
    assert_eq!(panel_traces(&figure, "x", "y2").len(), 3);
}

#[test]
fn single_parameter_renders_one_panel_not_a_grid() {
    let chain = make_chain(1, 3_000, &[0.0], 8);
    let config = PlotConfig {
        do_only_1d_plot: true,
        ..Default::default()
    };
    let figure = figure_json(std::slice::from_ref(&chain), &config);

    assert!(figure["layout"]["xaxis2"].is_null(), "no second column");
    assert!(figure["layout"]["yaxis2"].is_null(), "no second row");
    let domain = figure["layout"]["xaxis"]["domain"].as_array().unwrap();
    assert_eq!(domain[0].as_f64().unwrap(), 0.0);
    assert_eq!(domain[1].as_f64().unwrap(), 1.0);
    assert_eq!(panel_traces(&figure, "x", "y").len(), 1);
}

#[test]
fn labeled_table_names_are_inferred() {
    let data = Array2::from_shape_fn((1_000, 2), |(i, j)| (i % 97) as f64 * 0.1 + j as f64);
    let chain = SampleSet::labeled(vec!["alpha".to_string(), "beta".to_string()], data);
    let figure = figure_json(std::slice::from_ref(&chain), &PlotConfig::default());

    assert_eq!(figure["layout"]["xaxis"]["title"]["text"], "alpha");
    assert_eq!(figure["layout"]["xaxis2"]["title"]["text"], "beta");
    // The diagonal-only top row shows no y title; the second row does.
    assert_eq!(figure["layout"]["yaxis2"]["title"]["text"], "beta");
}

#[test]
fn legend_lists_chains_and_labeled_truths() {
    let chains = [
        make_chain(2, 2_000, &[0.0; 2], 9),
        make_chain(2, 2_000, &[1.0; 2], 10),
    ];
    let config = PlotConfig {
        chain_labels: Some(vec!["data1 $\\lambda$".to_string(), "data 2".to_string()]),
        truths: vec![
            TruthSpec::new(vec![Some(0.0), None]).with_label("the truth"),
            TruthSpec::new(vec![None, Some(1.0)]),
        ],
        ..Default::default()
    };
    let figure = figure_json(&chains, &config);

    let legend_entries = figure["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["showlegend"] == true)
        .count();
    // Two chain entries plus the one labeled truth row.
    assert_eq!(legend_entries, 3);
}

#[test]
fn figure_output_is_deterministic() {
    let chains = [make_chain(3, 4_000, &[0.0; 3], 11)];
    let config = PlotConfig::default();
    let a = corner_plot(&chains, &config).unwrap().to_json();
    let b = corner_plot(&chains, &config).unwrap().to_json();
    assert_eq!(a, b);
}

#[test]
fn config_errors_fail_before_rendering() {
    let chains = [make_chain(2, 500, &[0.0; 2], 12)];

    let bad_labels = PlotConfig {
        chain_labels: Some(vec!["only one".to_string(), "too many".to_string()]),
        ..Default::default()
    };
    assert!(matches!(
        corner_plot(&chains, &bad_labels),
        Err(PlotError::ChainLabelCount { .. })
    ));

    let bad_levels = PlotConfig {
        n_contour_levels: 4,
        ..Default::default()
    };
    assert!(matches!(
        corner_plot(&chains, &bad_levels),
        Err(PlotError::InvalidContourLevels(4))
    ));

    // An overlong truth row is tolerated; the extras are ignored.
    let long_truths = PlotConfig {
        truths: vec![TruthSpec::new(vec![Some(0.0), Some(1.0), Some(2.0)])],
        ..Default::default()
    };
    assert!(corner_plot(&chains, &long_truths).is_ok());
}
