use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mempool::{MemPool, Settings, log::setup_logging};
use tracing::info;

/// Keeps the highest-fee transactions from a file and writes them out in
/// descending fee order.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Transactions to read [default: transactions.txt, env: MEMPOOL_INPUT]
    #[arg(long)]
    input: Option<PathBuf>,

    /// Where to write the result [default: prioritized-transactions.txt, env: MEMPOOL_OUTPUT]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Maximum number of transactions kept [default: 5000, env: MEMPOOL_CAPACITY]
    #[arg(long)]
    capacity: Option<usize>,
}

/// Overrides settings with whichever flags were given.
fn apply(args: Args, mut settings: Settings) -> Settings {
    if let Some(input) = args.input {
        settings.input = input;
    }
    if let Some(output) = args.output {
        settings.output = output;
    }
    if let Some(capacity) = args.capacity {
        settings.capacity = capacity;
    }
    settings
}

fn main() -> Result<()> {
    setup_logging();
    let args = Args::parse();

    let settings = apply(args, Settings::new().context("failed to load settings")?);
    info!(?settings, "starting");

    let input = File::open(&settings.input)
        .with_context(|| format!("failed to open {}", settings.input.display()))?;

    let mut pool = MemPool::with_capacity(settings.capacity);
    pool.read_transactions(BufReader::new(input))
        .with_context(|| format!("failed to read {}", settings.input.display()))?;

    // Created only after a clean read so bad input leaves no output file
    let output = File::create(&settings.output)
        .with_context(|| format!("failed to create {}", settings.output.display()))?;
    pool.write_transactions(BufWriter::new(output))
        .with_context(|| format!("failed to write {}", settings.output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Settings {
        Settings {
            capacity: 5000,
            input: "transactions.txt".into(),
            output: "prioritized-transactions.txt".into(),
        }
    }

    fn parse(flags: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("mempool").chain(flags.iter().copied())).unwrap()
    }

    #[test]
    fn no_flags_keep_settings() {
        assert_eq!(apply(parse(&[]), base()), base());
    }

    #[test]
    fn flags_override_settings() {
        let settings = apply(
            parse(&["--input", "in.txt", "--output", "out.txt", "--capacity", "7"]),
            base(),
        );

        assert_eq!(
            settings,
            Settings {
                capacity: 7,
                input: "in.txt".into(),
                output: "out.txt".into(),
            }
        );
    }

    #[test]
    fn single_flag_leaves_the_rest() {
        let settings = apply(parse(&["--capacity", "0"]), base());

        assert_eq!(settings.capacity, 0);
        assert_eq!(settings.input, PathBuf::from("transactions.txt"));
        assert_eq!(settings.output, PathBuf::from("prioritized-transactions.txt"));
    }

    #[test]
    fn negative_capacity_flag_is_rejected() {
        let flags = ["mempool", "--capacity", "-5"];
        assert!(Args::try_parse_from(flags).is_err());
    }
}
