mod cli;
mod gate;
mod server;
mod telegram;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Parse CLI and dispatch; logging is initialized per command.
    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("linkscrub error: {:#}", err);
        std::process::exit(1);
    }
}
