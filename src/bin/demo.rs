//! A small corner-plot demo: two synthetic correlated Gaussian chains
//! with names, labels, truths and priors, written to an HTML figure.

use cornerplot::{corner_plot, PlotConfig, SampleSet, TruthSpec};
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::error::Error;

/// Draws a 4-parameter chain with mild cross-correlations.
fn correlated_chain(n_samples: usize, offset: f64, seed: u64) -> SampleSet {
    let normal = Normal::new(0.0, 1.0).unwrap();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut data = Array2::<f64>::zeros((n_samples, 4));
    for i in 0..n_samples {
        let z: Vec<f64> = (0..4).map(|_| normal.sample(&mut rng)).collect();
        data[(i, 0)] = z[0] + offset;
        data[(i, 1)] = 0.6 * z[0] + 0.8 * z[1] + offset;
        data[(i, 2)] = 2.0 * z[2] - 0.4 * z[0];
        data[(i, 3)] = 0.5 * z[3] + 0.3 * z[1];
    }
    SampleSet::from_array(data)
}

fn main() -> Result<(), Box<dyn Error>> {
    const N_SAMPLES: usize = 20_000;

    let chains = [
        correlated_chain(N_SAMPLES, 0.0, 42),
        correlated_chain(N_SAMPLES, 1.0, 43),
    ];

    let config = PlotConfig {
        param_names: Some(vec![
            "param name".to_string(),
            "$B_\\mathrm{\\lambda}$".to_string(),
            "$C$".to_string(),
            "$\\lambda$".to_string(),
        ]),
        chain_labels: Some(vec!["data1 $\\lambda$".to_string(), "data 2".to_string()]),
        truths: vec![
            TruthSpec::new(vec![Some(4.0), Some(0.5), None, Some(0.1)]).with_label("the truth"),
            TruthSpec::new(vec![None, None, Some(0.3), Some(1.0)])
                .with_label("alternative truth"),
        ],
        priors: vec![Some((2.0, 1.0)), Some((0.5, 2.0)), None, Some((0.0, 0.4))],
        ..Default::default()
    };

    let plot = corner_plot(&chains, &config)?;
    plot.write_html("corner.html");
    println!("Saved corner plot to corner.html");
    Ok(())
}
