//! Circular block bootstrap for dependent data.
//!
//! Resampling plain observations destroys the short-range dependence of a
//! time series; resampling contiguous blocks preserves it. This crate covers
//! the whole pipeline:
//!
//! 1. [`BlockLength`] — automatic block length selection from the series'
//!    autocorrelation structure (Politis–White plug-in rule).
//! 2. [`circular_indexes`] / [`IndexMatrix`] — circular block resampling of
//!    time indices, persistable for exactly reproducible analyses.
//! 3. [`run_bootstrap`] — apply an opaque [`Statistic`] to every replicate of
//!    a paired [`Bundle`] of series.
//! 4. [`difference_bootstrap`] — two-group difference distributions with
//!    one-sided empirical p-values.

mod display;
mod error;
mod hypothesis;
mod resample;
mod series;
mod statistics;

pub use crate::error::Error;
pub use crate::hypothesis::*;
pub use crate::resample::*;
pub use crate::series::{Bundle, Series};
pub use crate::statistics::{SpatialMean, StatFn, Statistic};
pub use rand;
