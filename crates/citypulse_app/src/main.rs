use std::process::ExitCode;

use citypulse_app::cli::Cli;
use citypulse_app::commands;
use citypulse_app::config::Environment;
use citypulse_app::interrupt::{self, Interrupt, FORCED_EXIT_CODE};
use citypulse_logging::pulse_error;
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    citypulse_logging::initialize(cli.log_destination(), cli.log_level());

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if interrupt::watch(tokio::signal::ctrl_c, on_interrupt).await == Interrupt::ForceQuit {
            std::process::exit(FORCED_EXIT_CODE);
        }
    });

    match commands::run(cli, &Environment::from_process(), cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            pulse_error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
