//! Sample-set input model: raw matrices or labeled tables, resolved once
//! at plot construction into a uniform rows × parameters layout.

use log::warn;
use ndarray::prelude::*;
use num_traits::ToPrimitive;

use crate::error::PlotError;

/// One set of multivariate samples (rows = observations, columns =
/// parameters), with optional per-column names.
///
/// Column names come either from an explicit `labeled` construction
/// (e.g. the CSV reader behind the `csv` feature) or stay `None` for raw
/// matrices; [`resolve_names`] picks them up when the caller did not
/// supply `param_names`.
///
/// # Examples
///
/// ```rust
/// use cornerplot::samples::SampleSet;
/// use ndarray::arr2;
///
/// let set = SampleSet::from_array(arr2(&[[1.0, 2.0], [3.0, 4.0]]));
/// assert_eq!(set.n_params(), 2);
/// assert_eq!(set.n_samples(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    data: Array2<f64>,
    names: Option<Vec<String>>,
}

impl SampleSet {
    /// Builds a set from any numeric matrix, converting elements to `f64`
    /// once at the boundary. Non-convertible elements become NaN and are
    /// excluded from histograms later.
    pub fn from_array<T: ToPrimitive + Clone>(data: Array2<T>) -> Self {
        Self {
            data: data.mapv(|v| v.to_f64().unwrap_or(f64::NAN)),
            names: None,
        }
    }

    /// Builds a set from row slices. Rows are expected to match the
    /// first row's length; longer rows are truncated and shorter rows
    /// read as zero for the missing tail.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let n_params = rows.first().map_or(0, |r| r.len());
        let mut data = Array2::<f64>::zeros((rows.len(), n_params));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().take(n_params).enumerate() {
                data[(i, j)] = v;
            }
        }
        Self { data, names: None }
    }

    /// Builds a labeled set (a tabular structure with named columns).
    pub fn labeled(names: Vec<String>, data: Array2<f64>) -> Self {
        Self {
            data,
            names: Some(names),
        }
    }

    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_params(&self) -> usize {
        self.data.ncols()
    }

    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// View of one parameter column.
    pub fn column(&self, param: usize) -> ArrayView1<'_, f64> {
        self.data.column(param)
    }

    /// Finite minimum and maximum of a column, if the column has any
    /// finite entries at all.
    pub fn column_extent(&self, param: usize) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &v in self.column(param) {
            if v.is_finite() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        (lo <= hi).then_some((lo, hi))
    }
}

impl From<Array2<f64>> for SampleSet {
    fn from(data: Array2<f64>) -> Self {
        SampleSet::from_array(data)
    }
}

/// Checks that every set carries the same parameter count and that at
/// least one set was given. Runs before any histogramming so a bad call
/// never produces a half-drawn figure.
pub fn validate_shapes(sets: &[SampleSet]) -> Result<usize, PlotError> {
    let first = sets.first().ok_or(PlotError::NoChains)?;
    let n_params = first.n_params();
    for (index, set) in sets.iter().enumerate().skip(1) {
        if set.n_params() != n_params {
            return Err(PlotError::ShapeMismatch {
                index,
                expected: n_params,
                got: set.n_params(),
            });
        }
    }
    for (index, set) in sets.iter().enumerate() {
        if set.n_samples() == 0 {
            warn!("sample set {index} is empty; its panels will be blank");
        }
    }
    Ok(n_params)
}

/// Resolves display names: explicit `param_names` win, then the first
/// labeled set, then none (panels fall back to positional labels).
pub fn resolve_names(
    sets: &[SampleSet],
    explicit: Option<&[String]>,
    n_params: usize,
) -> Result<Option<Vec<String>>, PlotError> {
    if let Some(names) = explicit {
        if names.len() != n_params {
            return Err(PlotError::NameCount {
                expected: n_params,
                got: names.len(),
            });
        }
        return Ok(Some(names.to_vec()));
    }
    for set in sets {
        if let Some(names) = set.names() {
            if names.len() == n_params {
                return Ok(Some(names.to_vec()));
            }
            warn!(
                "labeled set has {} column names for {} parameters; ignoring them",
                names.len(),
                n_params
            );
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_from_array_converts_to_f64() {
        let set = SampleSet::from_array(arr2(&[[1i32, 2], [3, 4]]));
        assert_eq!(set.column(1).to_vec(), vec![2.0, 4.0]);
    }

    #[test]
    fn test_column_extent_skips_nan() {
        let set = SampleSet::from_array(arr2(&[[1.0, f64::NAN], [3.0, 2.0]]));
        assert_eq!(set.column_extent(0), Some((1.0, 3.0)));
        assert_eq!(set.column_extent(1), Some((2.0, 2.0)));
    }

    #[test]
    fn test_column_extent_empty() {
        let set = SampleSet::from_array(Array2::<f64>::zeros((0, 2)));
        assert_eq!(set.column_extent(0), None);
    }

    #[test]
    fn test_validate_shapes_mismatch() {
        let a = SampleSet::from_array(arr2(&[[1.0, 2.0]]));
        let b = SampleSet::from_array(arr2(&[[1.0, 2.0, 3.0]]));
        let err = validate_shapes(&[a, b]).unwrap_err();
        assert!(matches!(
            err,
            PlotError::ShapeMismatch {
                index: 1,
                expected: 2,
                got: 3
            }
        ));
    }

    #[test]
    fn test_validate_shapes_empty_list() {
        assert!(matches!(validate_shapes(&[]), Err(PlotError::NoChains)));
    }

    #[test]
    fn test_resolve_names_prefers_explicit() {
        let labeled = SampleSet::labeled(
            vec!["a".into(), "b".into()],
            arr2(&[[0.0, 1.0]]),
        );
        let explicit = vec!["x".to_string(), "y".to_string()];
        let names = resolve_names(&[labeled.clone()], Some(explicit.as_slice()), 2).unwrap();
        assert_eq!(names.unwrap(), explicit);

        let inferred = resolve_names(&[labeled], None, 2).unwrap();
        assert_eq!(inferred.unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_resolve_names_wrong_count() {
        let set = SampleSet::from_array(arr2(&[[0.0, 1.0]]));
        let explicit = vec!["x".to_string()];
        assert!(matches!(
            resolve_names(&[set], Some(explicit.as_slice()), 2),
            Err(PlotError::NameCount {
                expected: 2,
                got: 1
            })
        ));
    }
}
