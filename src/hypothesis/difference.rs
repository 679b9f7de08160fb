use num_traits::{Float, FromPrimitive};
use rand::Rng;

use crate::error::Error;
use crate::resample::run_bootstrap;
use crate::series::{Bundle, Series};
use crate::statistics::Statistic;

/// Output of a two-group difference bootstrap.
///
/// Distributions are replicate-major and index-aligned with the rows of the
/// index matrices that produced them; replicate order carries no statistical
/// meaning but is preserved for reproducibility.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceResult<F> {
    /// Group-A statistic, one spatial vector per replicate.
    pub dist_a: Vec<Vec<F>>,
    /// Group-B statistic, one spatial vector per replicate.
    pub dist_b: Vec<Vec<F>>,
    /// Observed difference `S(A) - S(B)` on the unresampled data.
    pub observed: Vec<F>,
    /// Elementwise share of replicates with `distA - distB > 0`.
    pub p_gt: Vec<F>,
    /// Complementary share (`<= 0`); `p_gt + p_leq == 1` elementwise.
    pub p_leq: Vec<F>,
}

impl<F> DifferenceResult<F> {
    /// Number of spatial locations the statistic reduces to.
    pub fn locations(&self) -> usize {
        self.observed.len()
    }

    /// Number of bootstrap replicates per group.
    pub fn n_reps(&self) -> usize {
        self.dist_a.len()
    }
}

/// Bootstrap the difference of a group statistic between two bundles.
///
/// The statistic must reduce a bundle to a fixed spatial vector. Both groups
/// are resampled independently with `n_reps` circular-block replicates of
/// block length `l`; one-sided empirical p-values partition the replicate
/// axis by the strict sign of the per-replicate difference.
pub fn difference_bootstrap<F, S, R>(
    a: &Bundle<F>,
    b: &Bundle<F>,
    statistic: &S,
    l: usize,
    n_reps: usize,
    rng: &mut R,
) -> Result<DifferenceResult<F>, Error>
where
    F: Float + FromPrimitive,
    S: Statistic<[Series<F>], Vec<F>> + ?Sized,
    R: Rng,
{
    assert!(n_reps > 0, "n_reps must be positive");

    let observed_a = statistic.compute(a.as_ref());
    let observed_b = statistic.compute(b.as_ref());
    if observed_a.len() != observed_b.len() {
        return Err(Error::ShapeMismatch {
            expected: observed_a.len(),
            found: observed_b.len(),
        });
    }
    let locations = observed_a.len();

    let dist_a = run_bootstrap(a, statistic, l, n_reps, None, rng)?;
    let dist_b = run_bootstrap(b, statistic, l, n_reps, None, rng)?;
    for replicate in dist_a.iter().chain(&dist_b) {
        if replicate.len() != locations {
            return Err(Error::ShapeMismatch {
                expected: locations,
                found: replicate.len(),
            });
        }
    }

    let observed = observed_a
        .iter()
        .zip(&observed_b)
        .map(|(&x, &y)| x - y)
        .collect();

    let reps = F::from_usize(n_reps).expect("usize-to-float conversion failed");
    let mut p_gt = Vec::with_capacity(locations);
    let mut p_leq = Vec::with_capacity(locations);
    for v in 0..locations {
        let gt = dist_a
            .iter()
            .zip(&dist_b)
            .filter(|(ra, rb)| ra[v] - rb[v] > F::zero())
            .count();
        p_gt.push(F::from_usize(gt).expect("count fits in float") / reps);
        p_leq.push(F::from_usize(n_reps - gt).expect("count fits in float") / reps);
    }

    Ok(DifferenceResult {
        dist_a,
        dist_b,
        observed,
        p_gt,
        p_leq,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::SpatialMean;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn wave(n: usize, phase: f64) -> Vec<f64> {
        (0..n).map(|t| (t as f64 * 0.21 + phase).sin()).collect()
    }

    #[test]
    fn identical_groups_center_on_half() {
        let x = Series::new(wave(80, 0.0));
        let a = Bundle::new(vec![x.clone()]).unwrap();
        let b = Bundle::new(vec![x]).unwrap();

        let out = difference_bootstrap(&a, &b, &SpatialMean, 5, 2000, &mut StdRng::seed_from_u64(31))
            .unwrap();

        assert_eq!(out.locations(), 1);
        assert_eq!(out.n_reps(), 2000);
        assert_abs_diff_eq!(out.observed[0], 0.0, epsilon = 1e-12);
        assert!(
            out.p_gt[0] > 0.35 && out.p_gt[0] < 0.65,
            "identical groups should give p near 0.5, got {}",
            out.p_gt[0]
        );
    }

    #[test]
    fn p_values_partition_the_replicates() {
        let rows_a: Vec<Vec<f64>> = (0..3).map(|r| wave(60, r as f64)).collect();
        let rows_b: Vec<Vec<f64>> = (0..3).map(|r| wave(60, r as f64 + 0.4)).collect();
        let a = Bundle::new(vec![Series::from_rows(rows_a).unwrap()]).unwrap();
        let b = Bundle::new(vec![Series::from_rows(rows_b).unwrap()]).unwrap();

        let out = difference_bootstrap(&a, &b, &SpatialMean, 4, 333, &mut StdRng::seed_from_u64(8))
            .unwrap();

        assert_eq!(out.locations(), 3);
        for v in 0..3 {
            assert_abs_diff_eq!(out.p_gt[v] + out.p_leq[v], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn separated_groups_give_extreme_p() {
        let base = wave(100, 0.0);
        let shifted: Vec<f64> = base.iter().map(|x| x + 10.0).collect();
        let a = Bundle::new(vec![Series::new(shifted)]).unwrap();
        let b = Bundle::new(vec![Series::new(base)]).unwrap();

        let out = difference_bootstrap(&a, &b, &SpatialMean, 6, 500, &mut StdRng::seed_from_u64(2))
            .unwrap();

        assert_abs_diff_eq!(out.observed[0], 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.p_gt[0], 1.0);
        assert_abs_diff_eq!(out.p_leq[0], 0.0);
    }

    #[test]
    fn mismatched_spatial_shapes_are_rejected() {
        let a = Bundle::new(vec![
            Series::from_rows(vec![wave(40, 0.0), wave(40, 1.0)]).unwrap(),
        ])
        .unwrap();
        let b = Bundle::new(vec![Series::new(wave(40, 0.5))]).unwrap();

        let err = difference_bootstrap(&a, &b, &SpatialMean, 3, 10, &mut StdRng::seed_from_u64(0));
        assert!(matches!(err, Err(Error::ShapeMismatch { expected: 2, found: 1 })));
    }
}
