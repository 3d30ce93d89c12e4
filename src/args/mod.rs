//! Command-line interface.

use clap::Parser;

use crate::run::Backend;

#[derive(Debug, Parser)]
#[command(
    name = "reqbench",
    version,
    about = "Benchmark HTTP request strategies across client backends."
)]
pub struct CliArgs {
    /// Path to a reqbench.toml / reqbench.json configuration file.
    #[arg(short, long, env = "REQBENCH_CONFIG")]
    pub config: Option<String>,

    /// Endpoint every request in the experiment hits.
    #[arg(short, long)]
    pub url: Option<String>,

    /// Number of requests per batched invocation.
    #[arg(short, long)]
    pub requests: Option<usize>,

    /// Seconds to pause between timed invocations.
    #[arg(long)]
    pub cooldown: Option<u64>,

    /// Restrict the experiment to the given backends (repeatable).
    #[arg(long = "backend", value_enum)]
    pub backends: Vec<Backend>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}
