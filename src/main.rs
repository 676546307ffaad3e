use clap::Parser;

use rsvp_relay::cli::{self, Cli, Commands};
use rsvp_relay::logger::init_logger;
use rsvp_relay::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = cli::load_and_merge_config(&cli)?;
    init_logger(&settings.logger)?;

    cli::execute_command(&cli, settings.clone()).await?;

    // execute_command covers everything except the actual server start,
    // which lives here so command handlers stay testable without
    // binding sockets.
    let start_server = match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => !dry_run,
        Some(Commands::Migrate { .. }) => false,
        None => true,
    };
    if start_server {
        Server::new(settings).run().await?;
    }

    Ok(())
}
