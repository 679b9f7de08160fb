use std::path::Path;

use csv::ReaderBuilder;
use num_traits::{Float, FromPrimitive};
use serde::de::DeserializeOwned;

use super::Series;
use crate::error::Error;

/// Read every record of a headerless CSV file.
///
/// Fails with [`Error::EmptyFile`] when there is nothing to read; shape
/// validation is left to the caller.
pub(crate) fn read_records<T, P>(path: P) -> Result<Vec<T>, Error>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        records.push(result?);
    }

    if records.is_empty() {
        return Err(Error::EmptyFile);
    }
    Ok(records)
}

impl<F: Float + FromPrimitive> Series<F> {
    /// Read a series from a headerless CSV file.
    ///
    /// Each record is one timepoint, each column one series row, so a file
    /// with `n` records and `k` columns loads as a `k × n` series. Ragged
    /// records fail with [`Error::ShapeMismatch`], an empty file with
    /// [`Error::EmptyFile`].
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let timepoints: Vec<Vec<f64>> = read_records(path)?;

        let k = timepoints[0].len();
        for record in &timepoints[1..] {
            if record.len() != k {
                return Err(Error::ShapeMismatch {
                    expected: k,
                    found: record.len(),
                });
            }
        }

        // Transpose: records are time-major on disk, rows are time-major in memory.
        let mut rows = vec![Vec::with_capacity(timepoints.len()); k];
        for record in &timepoints {
            for (row, &x) in rows.iter_mut().zip(record) {
                row.push(F::from_f64(x).expect("f64 converts to the series float"));
            }
        }

        Series::from_rows(rows)
    }
}
