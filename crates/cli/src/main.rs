//! asyncq - demo harness for the bounded producer/consumer pipeline

mod count;
mod logging;
mod output;

use anyhow::{Context, Result};
use asyncq_core::application::{Controller, ControllerConfig};
use clap::{Args, Parser, Subcommand};
use output::OutputFormat;
use std::time::{Duration, Instant};
use tracing::info;

const DEFAULT_SEED: u64 = 444;

#[derive(Parser)]
#[command(name = "asyncq")]
#[command(about = "Bounded async producer/consumer demo", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run producers and consumers against one bounded queue until it drains
    Run(RunArgs),

    /// Print "One", sleep, print "Two" from several concurrent tasks
    Count {
        /// Number of concurrent tasks
        #[arg(long, default_value = "3")]
        tasks: usize,

        /// Sleep between the two prints, in milliseconds
        #[arg(long, default_value = "1000")]
        delay_ms: u64,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Number of producers
    #[arg(short = 'p', long, env = "ASYNCQ_PRODUCERS", default_value = "5")]
    n_producers: usize,

    /// Number of consumers
    #[arg(short = 'c', long, env = "ASYNCQ_CONSUMERS", default_value = "10")]
    n_consumers: usize,

    /// Queue capacity (0 = unbounded)
    #[arg(long, env = "ASYNCQ_CAPACITY", default_value = "10")]
    capacity: usize,

    /// Maximum items per producer (each producer picks 1..=N)
    #[arg(long, env = "ASYNCQ_MAX_ITEMS", default_value = "5")]
    max_items: usize,

    /// Maximum random delay before each put/get, in milliseconds
    #[arg(long, env = "ASYNCQ_MAX_DELAY_MS", default_value = "10000")]
    max_delay_ms: u64,

    /// Random seed for reproducible runs
    #[arg(long, env = "ASYNCQ_SEED", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Fail if the queue has not drained this long after producers finish
    #[arg(long, env = "ASYNCQ_DRAIN_TIMEOUT_MS")]
    drain_timeout_ms: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    output: OutputFormat,
}

impl From<&RunArgs> for ControllerConfig {
    fn from(args: &RunArgs) -> Self {
        ControllerConfig {
            producers: args.n_producers,
            consumers: args.n_consumers,
            capacity: args.capacity,
            max_items_per_producer: args.max_items,
            max_delay: Duration::from_millis(args.max_delay_ms),
            seed: Some(args.seed),
            drain_timeout: args.drain_timeout_ms.map(Duration::from_millis),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::LogFormat::from_env())?;

    let start = Instant::now();

    match cli.command {
        Commands::Run(args) => {
            info!("asyncq v{} starting pipeline", asyncq_core::VERSION);
            let config = ControllerConfig::from(&args);
            let report = Controller::new(config)
                .run()
                .await
                .context("Pipeline run failed")?;
            println!("{}", output::render(&report, args.output)?);
        }

        Commands::Count { tasks, delay_ms } => {
            count::run(tasks, Duration::from_millis(delay_ms)).await?;
        }
    }

    println!(
        "Program completed in {:.5} seconds.",
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
