use num_traits::Float;
use rand::Rng;

use crate::error::Error;
use crate::series::{Bundle, Series};
use crate::statistics::Statistic;

use super::indexes::{IndexMatrix, circular_indexes};

/// Check that an index matrix can gather a bundle with time axis `n`.
fn check_indexes(matrix: &IndexMatrix, n: usize) -> Result<(), Error> {
    if matrix.series_len() != n {
        return Err(Error::ShapeMismatch {
            expected: n,
            found: matrix.series_len(),
        });
    }
    // A persisted matrix may come from anywhere; reject rows that index
    // past the series instead of panicking mid-gather.
    for row in matrix.rows() {
        if let Some(&bad) = row.iter().find(|&&i| i >= n) {
            return Err(Error::ShapeMismatch {
                expected: n,
                found: bad + 1,
            });
        }
    }
    Ok(())
}

/// Evaluate `statistic` over block-bootstrap replicates of `bundle`.
///
/// With `indexes: None` a fresh circular [`IndexMatrix`] is drawn from `rng`
/// using block length `l`; with `Some` the supplied matrix is used verbatim
/// (and `l` and `rng` are ignored), which reproduces an earlier resampling
/// exactly. The identical index row is applied to every bundle member, so
/// cross-member pairing survives into each replicate.
///
/// Results come back in replicate draw order, one per index row; replicate
/// `i` depends only on row `i` and the unmodified input data.
pub fn run_bootstrap<F, S, T, R>(
    bundle: &Bundle<F>,
    statistic: &S,
    l: usize,
    n_samples: usize,
    indexes: Option<&IndexMatrix>,
    rng: &mut R,
) -> Result<Vec<T>, Error>
where
    F: Float,
    S: Statistic<[Series<F>], T> + ?Sized,
    R: Rng,
{
    let n = bundle.series_len();
    let generated;
    let matrix = match indexes {
        Some(m) => {
            check_indexes(m, n)?;
            m
        }
        None => {
            generated = circular_indexes(n, l, n_samples, rng);
            &generated
        }
    };

    let mut out = Vec::with_capacity(matrix.n_samples());
    for row in matrix.rows() {
        let gathered = bundle.gather(row);
        out.push(statistic.compute(&gathered));
    }
    Ok(out)
}

/// Replicate-parallel variant of [`run_bootstrap`] over a pre-drawn matrix.
///
/// Replicates share only the read-only bundle and matrix and each writes its
/// own output slot, so no locking is involved; the result is identical to the
/// sequential run over the same matrix.
#[cfg(feature = "rayon")]
pub fn par_run_bootstrap<F, S, T>(
    bundle: &Bundle<F>,
    statistic: &S,
    indexes: &IndexMatrix,
) -> Result<Vec<T>, Error>
where
    F: Float + Send + Sync,
    S: Statistic<[Series<F>], T> + Sync + ?Sized,
    T: Send,
{
    use rayon::prelude::*;

    check_indexes(indexes, bundle.series_len())?;
    Ok((0..indexes.n_samples())
        .into_par_iter()
        .map(|i| {
            let gathered = bundle.gather(indexes.row(i));
            statistic.compute(&gathered)
        })
        .collect())
}
