mod read;

pub(crate) use read::read_records;

use num_traits::Float;

use crate::error::Error;

/// A multivariate time series stored as a row-major `rows × len` matrix.
///
/// Rows are spatial locations, channels or subjects (any leading axes,
/// flattened); the last axis is always time. A plain 1-D series has a
/// single row.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<F> {
    data: Vec<F>,
    rows: usize,
    len: usize,
}

impl<F: Float> Series<F> {
    /// Create a single-row series from raw observations.
    pub fn new(data: Vec<F>) -> Self {
        let len = data.len();
        Self { data, rows: 1, len }
    }

    /// Build a series from per-row vectors sharing one time axis.
    pub fn from_rows(rows: Vec<Vec<F>>) -> Result<Self, Error> {
        assert!(!rows.is_empty(), "series must have at least one row");
        let len = rows[0].len();
        for row in &rows[1..] {
            if row.len() != len {
                return Err(Error::ShapeMismatch {
                    expected: len,
                    found: row.len(),
                });
            }
        }
        let n_rows = rows.len();
        let data = rows.into_iter().flatten().collect();
        Ok(Self { data, rows: n_rows, len })
    }

    /// Build a series from a flat row-major buffer and an explicit shape.
    ///
    /// The shape is `[len]` or `[rows, len]`; the time axis is last.
    /// Deeper shapes must be flattened by the caller before resampling.
    pub fn from_shape_vec(shape: &[usize], data: Vec<F>) -> Result<Self, Error> {
        let (rows, len) = match *shape {
            [len] => (1, len),
            [rows, len] => (rows, len),
            _ => return Err(Error::Dimension { ndim: shape.len() }),
        };
        if rows * len != data.len() {
            return Err(Error::ShapeMismatch {
                expected: rows * len,
                found: data.len(),
            });
        }
        Ok(Self { data, rows, len })
    }

    /// Number of rows (spatial locations).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of timepoints.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Observations of one row, in time order.
    pub fn row(&self, r: usize) -> &[F] {
        &self.data[r * self.len..(r + 1) * self.len]
    }

    /// Value at `(row, timepoint)`.
    #[inline]
    pub fn value(&self, r: usize, t: usize) -> F {
        self.data[r * self.len + t]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[F]> {
        self.data.chunks_exact(self.len.max(1))
    }

    /// Gather along the time axis: row `r` of the result holds
    /// `self[r, indexes[0]], self[r, indexes[1]], …`.
    ///
    /// Every index must lie in `[0, len)`.
    pub fn gather(&self, indexes: &[usize]) -> Series<F> {
        let mut data = Vec::with_capacity(self.rows * indexes.len());
        for r in 0..self.rows {
            let row = self.row(r);
            data.extend(indexes.iter().map(|&t| row[t]));
        }
        Series {
            data,
            rows: self.rows,
            len: indexes.len(),
        }
    }
}

/// A collection of series sharing one time axis.
///
/// Resampling applies the identical index row to every member, so any
/// coupling between members (subjects measured at the same timepoints)
/// survives the bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle<F> {
    members: Vec<Series<F>>,
    len: usize,
}

impl<F: Float> Bundle<F> {
    /// Collect members into a bundle, checking the shared time axis.
    ///
    /// # Panics
    /// Panics if `members` is empty.
    pub fn new(members: Vec<Series<F>>) -> Result<Self, Error> {
        assert!(!members.is_empty(), "bundle must have at least one member");
        let len = members[0].len();
        for member in &members[1..] {
            if member.len() != len {
                return Err(Error::ShapeMismatch {
                    expected: len,
                    found: member.len(),
                });
            }
        }
        Ok(Self { members, len })
    }

    /// Shared number of timepoints.
    pub fn series_len(&self) -> usize {
        self.len
    }

    pub fn members(&self) -> &[Series<F>] {
        &self.members
    }

    /// Gather every member along time with one index row.
    pub fn gather(&self, indexes: &[usize]) -> Vec<Series<F>> {
        self.members.iter().map(|m| m.gather(indexes)).collect()
    }
}

impl<F> AsRef<[Series<F>]> for Bundle<F> {
    fn as_ref(&self) -> &[Series<F>] {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_checks_lengths() {
        let ok = Series::from_rows(vec![vec![1.0_f64, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(ok.rows(), 2);
        assert_eq!(ok.len(), 2);

        let err = Series::from_rows(vec![vec![1.0_f64, 2.0], vec![3.0]]);
        assert!(matches!(err, Err(Error::ShapeMismatch { expected: 2, found: 1 })));
    }

    #[test]
    fn from_shape_vec_rejects_deep_shapes() {
        let err = Series::<f64>::from_shape_vec(&[2, 2, 2], vec![0.0; 8]);
        assert!(matches!(err, Err(Error::Dimension { ndim: 3 })));

        let err = Series::<f64>::from_shape_vec(&[], vec![0.0; 4]);
        assert!(matches!(err, Err(Error::Dimension { ndim: 0 })));

        let err = Series::<f64>::from_shape_vec(&[2, 3], vec![0.0; 4]);
        assert!(matches!(err, Err(Error::ShapeMismatch { expected: 6, found: 4 })));
    }

    #[test]
    fn gather_reorders_every_row() {
        let s = Series::from_rows(vec![vec![0.0_f64, 1.0, 2.0], vec![10.0, 11.0, 12.0]])
            .unwrap();
        let g = s.gather(&[2, 0, 2]);
        assert_eq!(g.row(0), &[2.0, 0.0, 2.0]);
        assert_eq!(g.row(1), &[12.0, 10.0, 12.0]);
    }

    #[test]
    fn bundle_rejects_ragged_members() {
        let a = Series::new(vec![1.0_f64, 2.0, 3.0]);
        let b = Series::new(vec![1.0_f64, 2.0]);
        let err = Bundle::new(vec![a, b]);
        assert!(matches!(err, Err(Error::ShapeMismatch { expected: 3, found: 2 })));
    }

    #[test]
    fn bundle_gather_applies_one_index_row() {
        let a = Series::new(vec![0.0_f64, 1.0, 2.0, 3.0]);
        let b = Series::new(vec![0.0_f64, 10.0, 20.0, 30.0]);
        let bundle = Bundle::new(vec![a, b]).unwrap();

        let gathered = bundle.gather(&[3, 3, 0, 1]);
        assert_eq!(gathered[0].row(0), &[3.0, 3.0, 0.0, 1.0]);
        assert_eq!(gathered[1].row(0), &[30.0, 30.0, 0.0, 10.0]);
    }
}
