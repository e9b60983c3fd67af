use tracing::info;

use crate::config::{BenchmarkConfig, Setting};
use crate::error::Result;
use crate::measure::{mean_duration, Runner};

/// The mean sequential running time of each setting, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    times: Vec<(Setting, f64)>,
}

impl Baseline {
    /// Measure the sequential variant for every configured setting, in order.
    ///
    /// Each setting is run `config.repetitions()` times and the durations averaged. Any failed
    /// run aborts the whole measurement, since no speedup can be derived without a baseline.
    pub fn measure<R: Runner + ?Sized>(config: &BenchmarkConfig, runner: &mut R) -> Result<Baseline> {
        let mut times = Vec::with_capacity(config.settings().len());
        for setting in config.settings() {
            info!(%setting, "measuring sequential baseline");
            let mean = mean_duration(runner, setting, None, config.repetitions())?;
            info!(%setting, seconds = mean, "baseline measured");
            times.push((setting.clone(), mean));
        }
        Ok(Baseline { times })
    }

    /// The mean sequential time for `setting`, if it was measured.
    pub fn get(&self, setting: &Setting) -> Option<f64> {
        self.times.iter().find(|(s, _)| s == setting).map(|&(_, t)| t)
    }

    /// Every setting and its baseline, in measurement order.
    pub fn iter(&self) -> impl Iterator<Item = (&Setting, f64)> + '_ {
        self.times.iter().map(|(s, t)| (s, *t))
    }

    /// The number of settings measured.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether no settings were measured.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
