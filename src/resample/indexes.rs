use std::path::Path;
use std::str::FromStr;

use csv::WriterBuilder;
use rand::Rng;

use crate::error::Error;
use crate::series::read_records;

/// Resampling scheme for time indices.
///
/// Only circular block resampling is defined; the string entry point exists
/// so configuration coming from the outside fails loudly on anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Fixed-length blocks that wrap past the end of the series.
    #[default]
    Circular,
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "circular" => Ok(Method::Circular),
            other => Err(Error::UnsupportedMethod(other.to_string())),
        }
    }
}

/// A matrix of resampled time indices: one row per bootstrap replicate,
/// `n` entries per row, every entry in `[0, n)`.
///
/// Rows are immutable once built. Persisting the matrix and reloading it
/// verbatim reproduces a resampling scheme exactly across analyses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMatrix {
    data: Vec<usize>,
    n_samples: usize,
    len: usize,
}

impl IndexMatrix {
    /// Number of replicate rows.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Length of the resampled time axis.
    pub fn series_len(&self) -> usize {
        self.len
    }

    /// Index row for replicate `i`.
    pub fn row(&self, i: usize) -> &[usize] {
        &self.data[i * self.len..(i + 1) * self.len]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.data.chunks_exact(self.len.max(1))
    }

    /// Write the matrix as headerless CSV, one record per replicate row.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut wtr = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        for row in self.rows() {
            wtr.write_record(row.iter().map(|i| i.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Reload a matrix previously written with [`IndexMatrix::write`].
    ///
    /// Ragged records fail with [`Error::ShapeMismatch`], an empty file with
    /// [`Error::EmptyFile`]; bounds against a concrete series length are
    /// checked where the matrix is used.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let records: Vec<Vec<usize>> = read_records(path)?;

        let len = records[0].len();
        for record in &records[1..] {
            if record.len() != len {
                return Err(Error::ShapeMismatch {
                    expected: len,
                    found: record.len(),
                });
            }
        }

        let n_samples = records.len();
        let data = records.into_iter().flatten().collect();
        Ok(Self { data, n_samples, len })
    }
}

/// Expand block start offsets into a full index row.
///
/// Each start contributes `l` consecutive indices `(s + i) mod n`, wrapping
/// circularly past the end of the series; blocks are laid out in draw order
/// and the row is truncated to `n` entries.
fn expand_starts(starts: &[usize], n: usize, l: usize) -> Vec<usize> {
    let mut row = Vec::with_capacity(starts.len() * l);
    for &s in starts {
        row.extend((0..l).map(|i| (s + i) % n));
    }
    row.truncate(n);
    row
}

/// Sample a circular-block index matrix: `n_samples` rows, each covering the
/// series with `ceil(n / l)` blocks of length `l` started uniformly at random.
///
/// # Panics
/// Panics if `n == 0` or `l == 0`.
pub fn circular_indexes<R: Rng>(
    n: usize,
    l: usize,
    n_samples: usize,
    rng: &mut R,
) -> IndexMatrix {
    assert!(n > 0, "series length must be positive");
    assert!(l > 0, "block length must be positive");

    let n_blocks = n.div_ceil(l);
    let mut data = Vec::with_capacity(n_samples * n);
    let mut starts = vec![0_usize; n_blocks];
    for _ in 0..n_samples {
        for s in &mut starts {
            *s = rng.gen_range(0..n);
        }
        data.extend(expand_starts(&starts, n, l));
    }

    IndexMatrix {
        data,
        n_samples,
        len: n,
    }
}

/// String-tagged sampling entry point.
///
/// Parses `method` and dispatches; unknown tags fail with
/// [`Error::UnsupportedMethod`] instead of silently resampling some other way.
pub fn ts_indexes<R: Rng>(
    n: usize,
    l: usize,
    n_samples: usize,
    method: &str,
    rng: &mut R,
) -> Result<IndexMatrix, Error> {
    match method.parse::<Method>()? {
        Method::Circular => Ok(circular_indexes(n, l, n_samples, rng)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn blocks_wrap_circularly() {
        // Start 10 with n = 12, l = 4 wraps to [10, 11, 0, 1].
        let row = expand_starts(&[10, 0, 5], 12, 4);
        assert_eq!(row.len(), 12);
        assert_eq!(&row[..4], &[10, 11, 0, 1]);
        assert_eq!(&row[4..8], &[0, 1, 2, 3]);
        assert_eq!(&row[8..], &[5, 6, 7, 8]);
    }

    #[test]
    fn rows_are_truncated_to_series_length() {
        // 3 blocks of 5 cover n = 12 with 3 spare entries dropped.
        let row = expand_starts(&[0, 0, 0], 12, 5);
        assert_eq!(row.len(), 12);
        assert_eq!(&row[10..], &[0, 1]);
    }

    #[test]
    fn every_entry_is_a_valid_index() {
        let mut rng = StdRng::seed_from_u64(7);
        for &(n, l) in &[(12_usize, 4_usize), (50, 1), (50, 50), (100, 7), (9, 20)] {
            let m = circular_indexes(n, l, 20, &mut rng);
            assert_eq!(m.n_samples(), 20);
            assert_eq!(m.series_len(), n);
            for row in m.rows() {
                assert!(row.iter().all(|&i| i < n), "entry out of range for n={}", n);
            }
        }
    }

    #[test]
    fn full_length_block_is_a_rotation() {
        let n = 16;
        let mut rng = StdRng::seed_from_u64(11);
        let m = circular_indexes(n, n, 10, &mut rng);
        for row in m.rows() {
            let sorted: Vec<usize> = row.iter().copied().sorted().collect();
            assert_eq!(sorted, (0..n).collect::<Vec<_>>());
            for t in 1..n {
                assert_eq!(row[t], (row[t - 1] + 1) % n);
            }
        }
    }

    #[test]
    fn unit_blocks_are_plain_iid_draws() {
        let n = 40;
        let mut rng = StdRng::seed_from_u64(3);
        let m = circular_indexes(n, 1, 200, &mut rng);
        // Valid range is covered (with 8000 draws every index appears).
        let seen: Vec<usize> = m.rows().flatten().copied().unique().sorted().collect();
        assert_eq!(seen, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn unknown_method_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = ts_indexes(10, 2, 5, "stationary", &mut rng);
        assert!(matches!(err, Err(Error::UnsupportedMethod(ref m)) if m == "stationary"));

        let ok = ts_indexes(10, 2, 5, "circular", &mut rng);
        assert!(ok.is_ok());
    }

    #[test]
    fn write_then_read_roundtrips_verbatim() {
        let mut rng = StdRng::seed_from_u64(21);
        let m = circular_indexes(30, 5, 8, &mut rng);

        let path = std::env::temp_dir().join("krug_indexes_roundtrip.csv");
        m.write(&path).unwrap();
        let reloaded = IndexMatrix::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(m, reloaded);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = circular_indexes(64, 8, 16, &mut StdRng::seed_from_u64(99));
        let b = circular_indexes(64, 8, 16, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
