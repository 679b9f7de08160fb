use num_traits::{Float, FromPrimitive};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::series::Series;

/// Automatic circular-block length selection (Politis–White plug-in rule).
///
/// For each series row the rule scans the sample autocorrelation function for
/// the first run of `kn` consecutive insignificant lags, smooths the
/// autocovariances around that point with a flat-top kernel, and plugs the
/// result into the `n^(1/3)` optimal-length formula.
///
/// Every tunable has a data-driven default; overrides are for experiments
/// that need to pin the search window.
///
/// # Example
/// ```
/// use krug::{BlockLength, Series};
///
/// let noise: Vec<f64> = (0..500).map(|t| ((t * 2654435761_usize) % 1000) as f64).collect();
/// let l = BlockLength::default().select(&Series::new(noise));
/// assert!(l[0] >= 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BlockLength {
    /// Run length of insignificant lags ending the ACF scan.
    /// Default: `max(5, ceil(ln n))`.
    pub kn: Option<usize>,
    /// Largest lag examined. Default: `ceil(sqrt n) + kn`.
    pub mmax: Option<usize>,
    /// Upper clamp for the estimate. Default: `ceil(min(3 sqrt n, n/3))`.
    pub bmax: Option<f64>,
    /// Significance multiplier for `|rho_k|`. Default: `Phi^-1(0.975)`.
    pub c: Option<f64>,
    /// Round the estimate to the nearest integer.
    pub round: bool,
}

impl Default for BlockLength {
    fn default() -> Self {
        Self {
            kn: None,
            mmax: None,
            bmax: None,
            c: None,
            round: true,
        }
    }
}

impl BlockLength {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kn(mut self, kn: usize) -> Self {
        self.kn = Some(kn);
        self
    }

    #[must_use]
    pub fn mmax(mut self, mmax: usize) -> Self {
        self.mmax = Some(mmax);
        self
    }

    #[must_use]
    pub fn bmax(mut self, bmax: f64) -> Self {
        self.bmax = Some(bmax);
        self
    }

    #[must_use]
    pub fn c(mut self, c: f64) -> Self {
        self.c = Some(c);
        self
    }

    /// Keep the fractional estimate instead of rounding.
    #[must_use]
    pub fn fractional(mut self) -> Self {
        self.round = false;
        self
    }

    /// Estimate one block length per series row, clamped to `[1, bmax]`.
    ///
    /// Degenerate rows (constant, or too short for the lag window) fall back
    /// to a block length of 1.
    pub fn select<F>(&self, series: &Series<F>) -> Vec<F>
    where
        F: Float + FromPrimitive,
    {
        let n = series.len();
        let nf = n as f64;

        let kn = self
            .kn
            .unwrap_or_else(|| (nf.ln().ceil() as usize).max(5));
        let mmax = self.mmax.unwrap_or(nf.sqrt().ceil() as usize + kn);
        let bmax = self
            .bmax
            .unwrap_or_else(|| (3.0 * nf.sqrt()).min(nf / 3.0).ceil());
        let c = self.c.unwrap_or_else(|| {
            Normal::new(0.0, 1.0)
                .expect("valid N(0,1) distribution")
                .inverse_cdf(0.975)
        });

        series
            .iter_rows()
            .map(|row| self.select_row(row, kn, mmax, bmax, c))
            .collect()
    }

    fn select_row<F>(&self, row: &[F], kn: usize, mmax: usize, bmax: f64, c: f64) -> F
    where
        F: Float + FromPrimitive,
    {
        let n = row.len();
        let one = F::one();
        if n < 4 || kn > mmax || mmax + 1 >= n {
            return one;
        }
        let nf = F::from_usize(n).expect("usize-to-float conversion failed");

        // Biased sample autocovariances for lags 0..=mmax; mhat doubles as
        // the kernel bandwidth, so this already covers every lag we need.
        let r = autocovariance(row, mmax);
        let rho_crit = F::from_f64(c).expect("c fits in float")
            * (nf.log10() / nf).sqrt();

        // Lag k is insignificant when |rho_k| < rho_crit (lags 1..=mmax).
        let insig: Vec<bool> = r[1..]
            .iter()
            .map(|&rk| (rk / r[0]).abs() < rho_crit)
            .collect();

        let mhat = match (0..=mmax - kn)
            .find(|&j| insig[j..j + kn].iter().all(|&b| b))
        {
            Some(j) => j + 1,
            None => match insig.iter().rposition(|&b| !b) {
                Some(i) => i + 1,
                None => 1,
            },
        };

        let m = (2 * mhat).min(mmax);
        let mf = F::from_usize(m).expect("usize-to-float conversion failed");

        // G = sum w(k/M) |k| R_k and D = 4/3 (sum w(k/M) R_k)^2 over the
        // symmetric lag set [-M, M], folded using R_{-k} = R_k.
        let mut g = F::zero();
        let mut d_sum = r[0];
        for k in 1..=m {
            let kf = F::from_usize(k).expect("usize-to-float conversion failed");
            let w = flat_top(kf / mf);
            g = g + (one + one) * w * kf * r[k];
            d_sum = d_sum + (one + one) * w * r[k];
        }
        let four_thirds = F::from_f64(4.0 / 3.0).expect("constant fits in float");
        let d = four_thirds * d_sum * d_sum;

        let third = F::from_f64(1.0 / 3.0).expect("constant fits in float");
        let b = ((one + one) * g * g / d).powf(third) * nf.powf(third);

        let b = if b.is_finite() { b } else { one };
        let b = b
            .max(one)
            .min(F::from_f64(bmax).expect("bmax fits in float"));
        if self.round { b.round() } else { b }
    }
}

/// Flat-top lag window: 1 on `|s| < 0.5`, linear taper to 0 on
/// `0.5 <= |s| <= 1`, 0 outside.
fn flat_top<F: Float>(s: F) -> F {
    let s = s.abs();
    let half = F::from(0.5).expect("constant fits in float");
    if s < half {
        F::one()
    } else if s <= F::one() {
        (F::one() + F::one()) * (F::one() - s)
    } else {
        F::zero()
    }
}

/// Biased autocovariances `R_0..=R_max_lag` (normalized by `n`, not `n - k`).
fn autocovariance<F>(row: &[F], max_lag: usize) -> Vec<F>
where
    F: Float + FromPrimitive,
{
    let n = row.len();
    let nf = F::from_usize(n).expect("usize-to-float conversion failed");
    let mean = row.iter().fold(F::zero(), |acc, &x| acc + x) / nf;

    (0..=max_lag)
        .map(|k| {
            let mut acc = F::zero();
            for t in 0..n - k {
                acc = acc + (row[t] - mean) * (row[t + k] - mean);
            }
            acc / nf
        })
        .collect()
}
