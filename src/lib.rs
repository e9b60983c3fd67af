//! Types and functions for measuring the speedup of a parallel program over its sequential
//! baseline, across a matrix of problem sizes and thread counts.
//!
//! The benchmarked program is run once per measurement, strictly one at a time, and must print
//! exactly one number, its elapsed time in seconds, before exiting successfully. Each measurement
//! is repeated and averaged.
//!
//! ```
//! use std::num::NonZeroU32;
//!
//! use speedup::{BenchmarkConfig, Invocation, Result};
//!
//! let config = BenchmarkConfig::new(
//!     vec!["small".into(), "large".into()],
//!     vec![NonZeroU32::new(2).unwrap(), NonZeroU32::new(4).unwrap()],
//!     2,
//! )
//! .unwrap();
//!
//! // A stand-in for the real program which scales perfectly.
//! let mut runner = |invocation: &Invocation| -> Result<f64> {
//!     Ok(10.0 / invocation.threads.map_or(1.0, |n| f64::from(n.get())))
//! };
//!
//! let table = speedup::run(&config, &mut runner).unwrap();
//! assert_eq!(table.series()[0].speedups(), vec![2.0, 4.0]);
//! ```
//!

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    trivial_casts,
    unused_lifetimes,
    unused_qualifications,
    missing_copy_implementations,
    missing_debug_implementations,
    clippy::cognitive_complexity,
    clippy::missing_const_for_fn,
    clippy::needless_borrow
)]

mod baseline;
mod config;
mod error;
mod measure;
#[cfg(feature = "cli")]
pub mod report;
mod speedup;

pub use crate::baseline::Baseline;
pub use crate::config::{
    BenchmarkConfig, Setting, DEFAULT_REPETITIONS, DEFAULT_SETTINGS, DEFAULT_THREAD_COUNTS,
};
pub use crate::error::{Error, ParseFailure, Result};
pub use crate::measure::{
    mean_duration, parse_duration, parse_output, Invocation, Mode, ProcessRunner, Runner,
};
pub use crate::speedup::{Cell, SpeedupSeries, SpeedupTable};

/// Measure the sequential baseline for every setting, then the speedup of the parallel variant
/// for every setting and thread count.
pub fn run<R: Runner + ?Sized>(config: &BenchmarkConfig, runner: &mut R) -> Result<SpeedupTable> {
    let baseline = Baseline::measure(config, runner)?;
    SpeedupTable::measure(config, &baseline, runner)
}
