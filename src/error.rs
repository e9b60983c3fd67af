use std::io;
use std::num::{NonZeroU32, ParseFloatError};
use std::process::ExitStatus;

use thiserror::Error;

use crate::config::Setting;
use crate::measure::{Invocation, Mode};

/// Errors which abort a benchmark run.
///
/// None of these are recovered from: a speedup chart needs a complete matrix, so the first failed
/// invocation ends the run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The benchmarked program could not be started at all.
    #[error("failed to start {invocation}: {source}")]
    Spawn {
        /// The invocation which failed.
        invocation: Invocation,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The benchmarked program exited unsuccessfully.
    #[error("{invocation} exited with {status}: {stderr}")]
    Exit {
        /// The invocation which failed.
        invocation: Invocation,
        /// The exit status of the program.
        status: ExitStatus,
        /// Everything the program wrote to stderr.
        stderr: String,
    },

    /// The benchmarked program did not print exactly one duration.
    #[error("{invocation} printed {output:?}, which is not a duration: {reason}")]
    Parse {
        /// The invocation which failed.
        invocation: Invocation,
        /// Everything the program wrote to stdout.
        output: String,
        /// Everything the program wrote to stderr.
        stderr: String,
        /// What was wrong with the output.
        #[source]
        reason: ParseFailure,
    },

    /// The mean duration of a measurement was zero or negative, so no speedup can be derived.
    #[error("mean {mode} time for {setting}{} was {mean}s", threads_suffix(.threads))]
    Degenerate {
        /// The mode which was measured.
        mode: Mode,
        /// The setting which was measured.
        setting: Setting,
        /// The thread count which was measured, if any.
        threads: Option<NonZeroU32>,
        /// The offending mean, in seconds.
        mean: f64,
    },

    /// A speedup was requested for a setting with no baseline measurement.
    #[error("no baseline was measured for {setting}")]
    MissingBaseline {
        /// The setting without a baseline.
        setting: Setting,
    },

    /// The benchmark configuration is unusable.
    #[error("invalid benchmark configuration: {0}")]
    Config(String),
}

/// The ways a program's output can fail to be a duration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseFailure {
    /// Nothing was printed.
    #[error("output was empty")]
    Empty,

    /// More than one value was printed.
    #[error("expected one value, found {0}")]
    MultipleValues(usize),

    /// The value was not a number.
    #[error(transparent)]
    NotANumber(#[from] ParseFloatError),

    /// The value was infinite or NaN.
    #[error("duration is not finite")]
    NotFinite,

    /// The value was less than zero.
    #[error("duration is negative")]
    Negative,
}

fn threads_suffix(threads: &Option<NonZeroU32>) -> String {
    threads.map(|n| format!(" with {n} threads")).unwrap_or_default()
}

/// A specialized `Result` type for benchmark operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_names_the_measurement() {
        let err = Error::Degenerate {
            mode: Mode::Parallel,
            setting: Setting::from("small"),
            threads: NonZeroU32::new(4),
            mean: 0.0,
        };
        assert_eq!(err.to_string(), "mean parallel time for small with 4 threads was 0s");

        let err = Error::Degenerate {
            mode: Mode::Sequential,
            setting: Setting::from("large"),
            threads: None,
            mean: -1.5,
        };
        assert_eq!(err.to_string(), "mean sequential time for large was -1.5s");
    }

    #[test]
    fn parse_names_the_invocation() {
        let err = Error::Parse {
            invocation: Invocation::parallel(Setting::from("small"), NonZeroU32::new(2).unwrap(), 3),
            output: "abc".to_string(),
            stderr: String::new(),
            reason: ParseFailure::Empty,
        };
        assert_eq!(
            err.to_string(),
            "parallel run of small with 2 threads (repetition 3) printed \"abc\", which is not a \
             duration: output was empty"
        );
    }
}
