use std::num::NonZeroU32;

use tracing::info;

use crate::baseline::Baseline;
use crate::config::{BenchmarkConfig, Setting};
use crate::error::{Error, Result};
use crate::measure::{mean_duration, Runner};

/// One measured point: the parallel variant of a setting with a given number of threads.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cell {
    /// The number of worker threads.
    pub threads: NonZeroU32,
    /// The mean parallel running time, in seconds.
    pub mean: f64,
    /// The baseline time divided by the mean parallel time.
    pub speedup: f64,
}

/// The speedups of a single setting, one per configured thread count, in thread count order.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedupSeries {
    setting: Setting,
    baseline: f64,
    cells: Vec<Cell>,
}

impl SpeedupSeries {
    /// The setting measured.
    pub const fn setting(&self) -> &Setting {
        &self.setting
    }

    /// The setting's mean sequential time, in seconds.
    pub const fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Every measured point, in thread count order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The speedup at each thread count, in thread count order.
    pub fn speedups(&self) -> Vec<f64> {
        self.cells.iter().map(|c| c.speedup).collect()
    }

    /// The speedup with exactly `threads` workers, if it was measured.
    pub fn speedup_at(&self, threads: NonZeroU32) -> Option<f64> {
        self.cells.iter().find(|c| c.threads == threads).map(|c| c.speedup)
    }
}

/// A dense table of speedups for every configured setting and thread count.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedupTable {
    thread_counts: Vec<NonZeroU32>,
    series: Vec<SpeedupSeries>,
}

impl SpeedupTable {
    /// Measure the parallel variant for every setting and thread count, settings outermost, and
    /// divide each setting's baseline by the mean parallel time.
    ///
    /// Every setting must already have a baseline. Any failed run aborts the whole measurement.
    pub fn measure<R: Runner + ?Sized>(
        config: &BenchmarkConfig,
        baseline: &Baseline,
        runner: &mut R,
    ) -> Result<SpeedupTable> {
        let mut series = Vec::with_capacity(config.settings().len());
        for setting in config.settings() {
            let base = baseline
                .get(setting)
                .ok_or_else(|| Error::MissingBaseline { setting: setting.clone() })?;

            let mut cells = Vec::with_capacity(config.thread_counts().len());
            for &threads in config.thread_counts() {
                info!(%setting, threads = threads.get(), "measuring parallel variant");
                let mean = mean_duration(runner, setting, Some(threads), config.repetitions())?;
                let speedup = base / mean;
                info!(
                    %setting,
                    threads = threads.get(),
                    seconds = mean,
                    speedup,
                    "parallel variant measured"
                );
                cells.push(Cell { threads, mean, speedup });
            }

            series.push(SpeedupSeries { setting: setting.clone(), baseline: base, cells });
        }

        Ok(SpeedupTable { thread_counts: config.thread_counts().to_vec(), series })
    }

    /// The thread counts measured, which are also the x-axis of the chart.
    pub fn thread_counts(&self) -> &[NonZeroU32] {
        &self.thread_counts
    }

    /// One series per setting, in configured order.
    pub fn series(&self) -> &[SpeedupSeries] {
        &self.series
    }

    /// The series for `setting`, if it was measured.
    pub fn get(&self, setting: &Setting) -> Option<&SpeedupSeries> {
        self.series.iter().find(|s| s.setting() == setting)
    }

    /// The largest speedup in the table.
    pub fn max_speedup(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.cells.iter().map(|c| c.speedup))
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::measure::{parse_output, Invocation, Mode};

    fn threads(ns: &[u32]) -> Vec<NonZeroU32> {
        ns.iter().map(|&n| NonZeroU32::new(n).unwrap()).collect()
    }

    fn config(settings: &[&str], thread_counts: &[u32], repetitions: usize) -> BenchmarkConfig {
        BenchmarkConfig::new(
            settings.iter().map(|&s| Setting::from(s)).collect(),
            threads(thread_counts),
            repetitions,
        )
        .unwrap()
    }

    /// Sequential runs take 10s for "small" and 40s for "large"; parallel runs take the baseline
    /// divided by the thread count, except "small" with 4 threads, which takes 2s.
    fn program(invocation: &Invocation) -> Result<f64> {
        let base = match invocation.setting.as_str() {
            "small" => 10.0,
            "large" => 40.0,
            _ => unreachable!(),
        };
        Ok(match invocation.threads.map(NonZeroU32::get) {
            None => base,
            Some(4) if invocation.setting.as_str() == "small" => 2.0,
            Some(n) => base / f64::from(n),
        })
    }

    #[test]
    fn builds_dense_table() {
        let config = config(&["small", "large"], &[2, 4], 2);
        let mut runner = program;
        let baseline = Baseline::measure(&config, &mut runner).unwrap();
        let table = SpeedupTable::measure(&config, &baseline, &mut runner).unwrap();

        assert_eq!(table.thread_counts(), threads(&[2, 4]).as_slice());
        assert_eq!(table.series().len(), 2);

        let small = table.get(&"small".into()).unwrap();
        assert_relative_eq!(small.baseline(), 10.0);
        assert_eq!(small.speedups(), vec![2.0, 5.0]);
        assert_relative_eq!(small.cells()[0].mean, 5.0);
        assert_relative_eq!(small.cells()[1].mean, 2.0);

        let large = table.get(&"large".into()).unwrap();
        assert_relative_eq!(large.speedup_at(NonZeroU32::new(2).unwrap()).unwrap(), 2.0);
        assert_relative_eq!(large.speedup_at(NonZeroU32::new(4).unwrap()).unwrap(), 4.0);
        assert_eq!(large.speedup_at(NonZeroU32::new(8).unwrap()), None);

        assert_relative_eq!(table.max_speedup(), 5.0);
    }

    #[test]
    fn speedup_is_baseline_over_mean() {
        let config = config(&["small"], &[3], 3);
        let mut parallel = vec![0.5, 1.0, 3.0].into_iter();
        let mut runner = |invocation: &Invocation| -> Result<f64> {
            Ok(match invocation.mode() {
                Mode::Sequential => 7.5,
                Mode::Parallel => parallel.next().unwrap(),
            })
        };
        let baseline = Baseline::measure(&config, &mut runner).unwrap();
        let table = SpeedupTable::measure(&config, &baseline, &mut runner).unwrap();

        assert_relative_eq!(table.series()[0].speedups()[0], 7.5 / 1.5);
    }

    #[test]
    fn series_follow_thread_count_order() {
        let config = config(&["large", "small"], &[12, 2, 8, 4], 1);
        let mut runner = program;
        let baseline = Baseline::measure(&config, &mut runner).unwrap();
        let table = SpeedupTable::measure(&config, &baseline, &mut runner).unwrap();

        let settings: Vec<&str> = table.series().iter().map(|s| s.setting().as_str()).collect();
        assert_eq!(settings, vec!["large", "small"]);
        for series in table.series() {
            let order: Vec<u32> = series.cells().iter().map(|c| c.threads.get()).collect();
            assert_eq!(order, vec![12, 2, 8, 4]);
        }
    }

    #[test]
    fn deterministic_runs_are_identical() {
        let config = config(&["small", "large"], &[2, 4], 5);
        let first = crate::run(&config, &mut program).unwrap();
        let second = crate::run(&config, &mut program).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unparseable_output_aborts() {
        let config = config(&["small", "large"], &[2, 4], 2);
        let mut runner = |invocation: &Invocation| -> Result<f64> {
            if invocation.threads.map(NonZeroU32::get) == Some(4) && invocation.repetition == 2 {
                parse_output(invocation, "abc", "")
            } else {
                program(invocation)
            }
        };
        let baseline = Baseline::measure(&config, &mut runner).unwrap();
        let err = SpeedupTable::measure(&config, &baseline, &mut runner).unwrap_err();

        match err {
            Error::Parse { invocation, output, .. } => {
                assert_eq!(
                    invocation,
                    Invocation::parallel("small".into(), NonZeroU32::new(4).unwrap(), 2)
                );
                assert_eq!(output, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_parallel_mean_is_degenerate() {
        let config = config(&["small"], &[2, 4], 2);
        let mut runner = |invocation: &Invocation| -> Result<f64> {
            Ok(match invocation.mode() {
                Mode::Sequential => 10.0,
                Mode::Parallel => 0.0,
            })
        };
        let baseline = Baseline::measure(&config, &mut runner).unwrap();
        let err = SpeedupTable::measure(&config, &baseline, &mut runner).unwrap_err();

        assert!(matches!(
            err,
            Error::Degenerate { mode: Mode::Parallel, threads: Some(t), .. } if t.get() == 2
        ));
    }

    #[test]
    fn missing_baseline() {
        let measured = config(&["small"], &[2], 1);
        let wanted = config(&["small", "large"], &[2], 1);
        let mut runner = program;
        let baseline = Baseline::measure(&measured, &mut runner).unwrap();
        let err = SpeedupTable::measure(&wanted, &baseline, &mut runner).unwrap_err();

        assert!(matches!(err, Error::MissingBaseline { setting } if setting.as_str() == "large"));
    }
}
