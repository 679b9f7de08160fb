use num_traits::{Float, FromPrimitive};

use crate::series::Series;

/// A statistic evaluated over data of type `D`.
///
/// The bootstrap runner treats implementations as opaque: it never inspects
/// the computation, it only records one output per replicate.
pub trait Statistic<D: ?Sized, T> {
    fn compute(&self, data: &D) -> T;
}

/// Adapter turning a plain closure into a [`Statistic`].
///
/// ```
/// use krug::{Series, StatFn, Statistic};
///
/// let stat = StatFn(|bundle: &[Series<f64>]| bundle.len());
/// let member = Series::new(vec![1.0, 2.0, 3.0]);
/// assert_eq!(stat.compute(&[member][..]), 1);
/// ```
pub struct StatFn<G>(pub G);

impl<D: ?Sized, T, G> Statistic<D, T> for StatFn<G>
where
    G: Fn(&D) -> T,
{
    #[inline]
    fn compute(&self, data: &D) -> T {
        (self.0)(data)
    }
}

/// Per-row mean over time, averaged across bundle members.
///
/// Reduces a bundle to a fixed spatial vector of length `rows`, which is the
/// shape contract the group-difference bootstrap expects. For a single-row,
/// single-member bundle this is the ordinary sample mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatialMean;

impl<F> Statistic<[Series<F>], Vec<F>> for SpatialMean
where
    F: Float + FromPrimitive,
{
    fn compute(&self, bundle: &[Series<F>]) -> Vec<F> {
        assert!(!bundle.is_empty(), "statistic needs at least one member");
        let rows = bundle[0].rows();

        let mut out = Vec::with_capacity(rows);
        for r in 0..rows {
            // Kahan summation over members and time so long series do not drift
            let mut sum = F::zero();
            let mut c = F::zero();
            let mut count = 0_usize;
            for member in bundle {
                assert_eq!(member.rows(), rows, "members disagree on spatial rows");
                for &x in member.row(r) {
                    let y = x - c;
                    let t = sum + y;
                    c = (t - sum) - y;
                    sum = t;
                }
                count += member.len();
            }
            let n = F::from_usize(count).expect("usize-to-float conversion failed");
            out.push(sum / n);
        }
        out
    }
}
