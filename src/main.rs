use std::fs::File;
use std::num::NonZeroU32;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use speedup::{report, BenchmarkConfig, ProcessRunner, Setting, DEFAULT_REPETITIONS};

#[derive(Debug, Parser)]
#[command(about = "measure the speedup of a parallel program over its sequential baseline")]
struct Opts {
    /// Problem sizes to measure, smallest first [default: xsmall,small,medium,large,xlarge]
    #[arg(short, long, value_delimiter = ',')]
    settings: Vec<String>,

    /// Thread counts to measure the parallel variant with [default: 2,4,6,8,12]
    #[arg(short, long, value_delimiter = ',')]
    threads: Vec<NonZeroU32>,

    /// Number of times to repeat each measurement
    #[arg(short, long, default_value_t = DEFAULT_REPETITIONS.get())]
    repetitions: usize,

    /// Path to write the speedup chart to, as a PNG
    #[arg(short, long, default_value = "speedup.png")]
    output: PathBuf,

    /// Path to write the speedup table to, as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Show a plot of the speedups in the terminal
    #[arg(long)]
    plot: bool,

    /// The benchmarked program and its leading arguments [default: go run benchmark.go]
    #[arg(last = true)]
    program: Vec<String>,
}

impl Opts {
    fn config(&self) -> speedup::Result<BenchmarkConfig> {
        let defaults = BenchmarkConfig::default();
        let settings = if self.settings.is_empty() {
            defaults.settings().to_vec()
        } else {
            self.settings.iter().map(|s| Setting::from(s.as_str())).collect()
        };
        let threads = if self.threads.is_empty() {
            defaults.thread_counts().to_vec()
        } else {
            self.threads.clone()
        };
        BenchmarkConfig::new(settings, threads, self.repetitions)
    }

    fn runner(&self) -> speedup::Result<ProcessRunner> {
        if self.program.is_empty() {
            Ok(ProcessRunner::default())
        } else {
            ProcessRunner::new(&self.program)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let config = opts.config()?;
    let mut runner = opts.runner()?;

    let table = speedup::run(&config, &mut runner)?;

    print!("{:<12}", "setting");
    for threads in table.thread_counts() {
        print!("{:>10}", threads);
    }
    println!();
    for series in table.series() {
        print!("{:<12}", series.setting());
        for x in series.speedups() {
            print!("{:>10.3}", x);
        }
        println!();
    }

    report::render_chart(&table, &opts.output)?;
    info!(path = %opts.output.display(), "wrote chart");

    if let Some(path) = &opts.csv {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        report::write_csv(&table, file)?;
        info!(path = %path.display(), "wrote table");
    }

    if opts.plot {
        println!("{}", report::preview(&table, 100, 30)?);
    }

    Ok(())
}
