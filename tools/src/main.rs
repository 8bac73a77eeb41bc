mod convert;
mod stats;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "convert_corpus", about = "Convert and inspect libthai corpus files")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert between .tsv/.txt, .json and .bin corpus files
    Convert {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,

        /// Treat the fourth TSV column as a raw word frequency
        #[arg(long)]
        from_frequency: bool,
    },
    /// Print entry counts per category
    Stats {
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Convert {
            input,
            output,
            from_frequency,
        } => {
            let n = convert::run(&input, &output, from_frequency)?;
            println!("Wrote {} rows to {}", n, output.display());
        }
        Command::Stats { input } => {
            let report = stats::run(&input)?;
            print!("{}", report);
        }
    }
    Ok(())
}
