use anyhow::Result;
use clap::{Parser, Subcommand};
use xshell::{cmd, Shell};

#[derive(Debug, Parser)]
struct Opts {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Format, lint, test, and build everything.
    Ci,

    /// Format the code.
    Format,

    /// Run clippy over every target and feature.
    Clippy,

    /// Run the tests.
    Test,

    /// Run the benchmarks.
    Bench,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let sh = Shell::new()?;

    match opts.cmd.unwrap_or(Command::Ci) {
        Command::Ci => {
            cmd!(sh, "cargo fmt --all --check").run()?;
            clippy(&sh)?;
            test(&sh)?;
            cmd!(sh, "cargo build --all-targets --all-features").run()?;
        }
        Command::Format => cmd!(sh, "cargo fmt --all").run()?,
        Command::Clippy => clippy(&sh)?,
        Command::Test => test(&sh)?,
        Command::Bench => cmd!(sh, "cargo bench").run()?,
    }

    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo clippy --all-targets --all-features -- -D warnings").run()?;
    Ok(())
}

fn test(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo test --all-features").run()?;
    Ok(())
}
