//! design-tokens: Resolve design token files into stylesheets and modules
//!
//! Usage:
//!   # Find tokens.config.json under the working directory
//!   design-tokens transform
//!
//!   # Use an explicit config
//!   design-tokens transform design/tokens.config.json --verbose

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "design-tokens")]
#[command(about = "Resolve design tokens and render them for the web", long_about = None)]
struct Args {
    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log resolution details
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every transform in a tokens config
    Transform {
        /// Config file (searches for tokens.config.json if omitted)
        #[arg(value_name = "CONFIG")]
        config: Option<PathBuf>,
    },
}

fn init_logging(args: &Args) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    match &args.command {
        Command::Transform { config } => {
            let written = design_tokens::transform(config.as_deref())?;
            log::info!("Wrote {} files", written.len());
        }
    }

    Ok(())
}
