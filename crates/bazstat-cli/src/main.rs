use bazstat_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Log to the state dir; fall back to stderr if it is unwritable.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {:#}", err);
    }

    if let Err(err) = CliCommand::run_from_args().await {
        tracing::error!("{:#}", err);
        eprintln!("bazstat error: {:#}", err);
        std::process::exit(1);
    }
}
