use std::collections::HashSet;
use std::fmt;
use std::num::{NonZeroU32, NonZeroUsize};

use crate::error::{Error, Result};

/// The number of times each measurement is repeated in the reference run.
pub const DEFAULT_REPETITIONS: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(n) => n,
    None => panic!("repetitions must be positive"),
};

/// The problem sizes measured in the reference run, smallest first.
pub const DEFAULT_SETTINGS: [&str; 5] = ["xsmall", "small", "medium", "large", "xlarge"];

/// The worker thread counts measured in the reference run.
pub const DEFAULT_THREAD_COUNTS: [u32; 5] = [2, 4, 6, 8, 12];

/// A named problem size, passed verbatim to the benchmarked program.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Setting(String);

impl Setting {
    /// The setting's label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Setting {
    fn from(label: &str) -> Self {
        Setting(label.to_string())
    }
}

impl From<String> for Setting {
    fn from(label: String) -> Self {
        Setting(label)
    }
}

impl AsRef<str> for Setting {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The fixed parameters of a benchmark run: which problem sizes to measure, with which thread
/// counts, and how many times to repeat each measurement.
///
/// Settings and thread counts keep the order they were given in, which is the order they are
/// measured, tabulated, and charted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    settings: Vec<Setting>,
    thread_counts: Vec<NonZeroU32>,
    repetitions: NonZeroUsize,
}

impl BenchmarkConfig {
    /// Create a configuration, rejecting empty or duplicated settings and thread counts and a
    /// repetition count of zero.
    pub fn new(
        settings: Vec<Setting>,
        thread_counts: Vec<NonZeroU32>,
        repetitions: usize,
    ) -> Result<BenchmarkConfig> {
        if settings.is_empty() {
            return Err(Error::Config("at least one setting is required".to_string()));
        }
        if let Some(s) = settings.iter().find(|s| s.as_str().trim().is_empty()) {
            return Err(Error::Config(format!("setting {:?} is blank", s.as_str())));
        }
        if let Some(s) = first_duplicate(&settings) {
            return Err(Error::Config(format!("setting {s} is listed more than once")));
        }

        if thread_counts.is_empty() {
            return Err(Error::Config("at least one thread count is required".to_string()));
        }
        if let Some(n) = first_duplicate(&thread_counts) {
            return Err(Error::Config(format!("thread count {n} is listed more than once")));
        }

        let repetitions = NonZeroUsize::new(repetitions)
            .ok_or_else(|| Error::Config("repetitions must be at least 1".to_string()))?;

        Ok(BenchmarkConfig { settings, thread_counts, repetitions })
    }

    /// The problem sizes to measure.
    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    /// The thread counts to measure the parallel variant with.
    pub fn thread_counts(&self) -> &[NonZeroU32] {
        &self.thread_counts
    }

    /// How many times each measurement is repeated before averaging.
    pub const fn repetitions(&self) -> NonZeroUsize {
        self.repetitions
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            settings: DEFAULT_SETTINGS.iter().map(|&s| Setting::from(s)).collect(),
            thread_counts: DEFAULT_THREAD_COUNTS
                .iter()
                .copied()
                .filter_map(NonZeroU32::new)
                .collect(),
            repetitions: DEFAULT_REPETITIONS,
        }
    }
}

fn first_duplicate<T: Eq + std::hash::Hash>(items: &[T]) -> Option<&T> {
    let mut seen = HashSet::new();
    items.iter().find(|&item| !seen.insert(item))
}
