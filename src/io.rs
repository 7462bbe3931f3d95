/*!
Loading labeled sample sets from CSV (feature `csv`).

The header row becomes the parameter names, so a set built here feeds
automatic name inference in [`crate::corner_plot`] when `param_names` is
not given.
*/

use ndarray::Array2;
use std::path::Path;

use crate::error::PlotError;
use crate::samples::SampleSet;

/// Reads a CSV file with a header row into a labeled [`SampleSet`].
///
/// Every record must carry one numeric field per header column; the
/// error for a malformed field names the column and row.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<SampleSet, PlotError> {
    let mut reader = csv::Reader::from_path(path)?;
    let names: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let n_params = names.len();

    let mut values = Vec::new();
    let mut n_rows = 0usize;
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != n_params {
            return Err(PlotError::CsvValue {
                column: String::new(),
                row,
                reason: format!("expected {n_params} fields, got {}", record.len()),
            });
        }
        for (col, field) in record.iter().enumerate() {
            let v: f64 = field.trim().parse().map_err(|e| PlotError::CsvValue {
                column: names[col].clone(),
                row,
                reason: format!("{e}"),
            })?;
            values.push(v);
        }
        n_rows += 1;
    }

    let data = Array2::from_shape_vec((n_rows, n_params), values).map_err(|e| {
        PlotError::CsvValue {
            column: String::new(),
            row: n_rows,
            reason: format!("{e}"),
        }
    })?;
    Ok(SampleSet::labeled(names, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_csv_infers_names() {
        let mut file = NamedTempFile::new().expect("Could not create temp file");
        writeln!(file, "alpha,beta").unwrap();
        writeln!(file, "1.0,2.0").unwrap();
        writeln!(file, "3.5,-0.5").unwrap();

        let set = read_csv(file.path()).unwrap();
        assert_eq!(
            set.names().unwrap(),
            &["alpha".to_string(), "beta".to_string()]
        );
        assert_eq!(set.n_samples(), 2);
        assert_eq!(set.column(0).to_vec(), vec![1.0, 3.5]);
    }

    #[test]
    fn test_read_csv_reports_bad_field() {
        let mut file = NamedTempFile::new().expect("Could not create temp file");
        writeln!(file, "a,b").unwrap();
        writeln!(file, "1.0,oops").unwrap();

        let err = read_csv(file.path()).unwrap_err();
        match err {
            PlotError::CsvValue { column, row, .. } => {
                assert_eq!(column, "b");
                assert_eq!(row, 0);
            }
            other => panic!("expected CsvValue error, got {other:?}"),
        }
    }
}
