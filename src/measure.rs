use std::ffi::OsString;
use std::fmt;
use std::num::{NonZeroU32, NonZeroUsize};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::config::Setting;
use crate::error::{Error, ParseFailure, Result};

/// Which variant of the benchmarked program to run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The single-threaded baseline.
    Sequential,
    /// The multi-threaded variant under test.
    Parallel,
}

impl Mode {
    /// The positional argument which selects this mode in the benchmarked program.
    pub const fn arg(self) -> &'static str {
        match self {
            Mode::Sequential => "s",
            Mode::Parallel => "p",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Sequential => "sequential",
            Mode::Parallel => "parallel",
        })
    }
}

/// A single run of the benchmarked program.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Invocation {
    /// The problem size to run with.
    pub setting: Setting,
    /// The number of worker threads, or `None` for the sequential variant.
    pub threads: Option<NonZeroU32>,
    /// Which repetition of the measurement this is, starting at 1.
    pub repetition: usize,
}

impl Invocation {
    /// A run of the sequential variant.
    pub const fn sequential(setting: Setting, repetition: usize) -> Invocation {
        Invocation { setting, threads: None, repetition }
    }

    /// A run of the parallel variant with `threads` workers.
    pub const fn parallel(setting: Setting, threads: NonZeroU32, repetition: usize) -> Invocation {
        Invocation { setting, threads: Some(threads), repetition }
    }

    /// The variant this invocation runs.
    pub const fn mode(&self) -> Mode {
        match self.threads {
            Some(_) => Mode::Parallel,
            None => Mode::Sequential,
        }
    }

    /// The positional arguments passed to the benchmarked program: mode, setting, and (for the
    /// parallel variant) the thread count.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.mode().arg().to_string(), self.setting.to_string()];
        if let Some(threads) = self.threads {
            args.push(threads.to_string());
        }
        args
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} run of {}", self.mode(), self.setting)?;
        if let Some(threads) = self.threads {
            write!(f, " with {threads} threads")?;
        }
        write!(f, " (repetition {})", self.repetition)
    }
}

/// Something which can run the benchmarked program and report how long it took, in seconds.
///
/// Closures of the form `FnMut(&Invocation) -> Result<f64>` are runners, which is mostly useful
/// for tests.
pub trait Runner {
    /// Run the program once and return the elapsed time it reported.
    fn run(&mut self, invocation: &Invocation) -> Result<f64>;
}

impl<F> Runner for F
where
    F: FnMut(&Invocation) -> Result<f64>,
{
    fn run(&mut self, invocation: &Invocation) -> Result<f64> {
        self(invocation)
    }
}

/// Runs the benchmarked program as a child process, one invocation at a time.
///
/// The child's stdout and stderr are fully captured and the child is always waited on, whether it
/// succeeds, fails, or never starts. There is no timeout.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: OsString,
    args: Vec<OsString>,
}

impl ProcessRunner {
    /// The command the reference benchmark program is run with.
    pub const DEFAULT_COMMAND: [&'static str; 3] = ["go", "run", "benchmark.go"];

    /// Create a runner for the given command line. The invocation's own arguments are appended
    /// after it.
    pub fn new<I, S>(command: I) -> Result<ProcessRunner>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut command = command.into_iter().map(Into::into);
        let program = command
            .next()
            .ok_or_else(|| Error::Config("the benchmarked program must be named".to_string()))?;
        Ok(ProcessRunner { program, args: command.collect() })
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        let [program, args @ ..] = ProcessRunner::DEFAULT_COMMAND;
        ProcessRunner { program: program.into(), args: args.iter().map(Into::into).collect() }
    }
}

impl Runner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<f64> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).args(invocation.args()).stdin(Stdio::null());
        debug!(?command, "spawning");

        let output = command
            .output()
            .map_err(|source| Error::Spawn { invocation: invocation.clone(), source })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(Error::Exit {
                invocation: invocation.clone(),
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }

        parse_output(invocation, &String::from_utf8_lossy(&output.stdout), &stderr)
    }
}

/// Parse a program's stdout as a single, non-negative number of seconds.
pub fn parse_duration(output: &str) -> std::result::Result<f64, ParseFailure> {
    let mut values = output.split_whitespace();
    let value = values.next().ok_or(ParseFailure::Empty)?;
    let extra = values.count();
    if extra > 0 {
        return Err(ParseFailure::MultipleValues(extra + 1));
    }

    let seconds: f64 = value.parse()?;
    if !seconds.is_finite() {
        return Err(ParseFailure::NotFinite);
    }
    if seconds < 0.0 {
        return Err(ParseFailure::Negative);
    }
    Ok(seconds)
}

/// Parse the output of `invocation`, attaching its captured streams to any failure.
pub fn parse_output(invocation: &Invocation, stdout: &str, stderr: &str) -> Result<f64> {
    parse_duration(stdout).map_err(|reason| Error::Parse {
        invocation: invocation.clone(),
        output: stdout.to_string(),
        stderr: stderr.trim().to_string(),
        reason,
    })
}

/// Run the program `repetitions` times for `setting` (and `threads`, for the parallel variant)
/// and return the arithmetic mean of the reported durations.
///
/// The first failed repetition aborts the measurement. A mean which is not strictly positive is
/// an [`Error::Degenerate`] measurement.
pub fn mean_duration<R: Runner + ?Sized>(
    runner: &mut R,
    setting: &Setting,
    threads: Option<NonZeroU32>,
    repetitions: NonZeroUsize,
) -> Result<f64> {
    let mut sum = 0.0;
    for repetition in 1..=repetitions.get() {
        let invocation = Invocation { setting: setting.clone(), threads, repetition };
        let seconds = runner.run(&invocation)?;
        debug!(%invocation, seconds, "measured");
        sum += seconds;
    }

    let mean = sum / repetitions.get() as f64;
    if mean <= 0.0 || !mean.is_finite() {
        let mode = if threads.is_some() { Mode::Parallel } else { Mode::Sequential };
        return Err(Error::Degenerate { mode, setting: setting.clone(), threads, mean });
    }
    Ok(mean)
}
