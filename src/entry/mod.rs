//! Process entry: argument parsing, logging, and plan execution.
mod plan;

use clap::Parser;

use crate::args::CliArgs;
use crate::config;
use crate::error::AppResult;
use crate::logger;
use plan::{build_plan, execute_plan};

/// Runs the experiment matrix selected by CLI arguments and configuration.
///
/// # Errors
///
/// Returns an error when the configuration cannot be loaded, the target
/// URL is invalid, or a runtime cannot be built. Failures of individual
/// matrix entries are logged and do not abort the remaining entries.
pub fn run() -> AppResult<()> {
    let args = CliArgs::parse();
    logger::init_logging(args.verbose);

    let config = config::load_config(args.config.as_deref())?;
    let plan = build_plan(&args, config.as_ref())?;
    execute_plan(&plan)
}
