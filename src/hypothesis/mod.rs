mod difference;

pub use difference::{DifferenceResult, difference_bootstrap};
