mod block_length;
mod indexes;
mod runner;

pub use block_length::BlockLength;
pub use indexes::{IndexMatrix, Method, circular_indexes, ts_indexes};
#[cfg(feature = "rayon")]
pub use runner::par_run_bootstrap;
pub use runner::run_bootstrap;
