use clap::Parser;
use hybrid_authz_server::cli::{Cli, Command};
use hybrid_authz_server::{AppConfig, logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;
    logging::init(&cfg.logging)?;

    match cli.action() {
        Command::Run => server::run(cfg).await,
        Command::SetupFga { store_name } => server::setup_fga(cfg.openfga, &store_name).await,
        Command::CheckConfig => server::check_config(&cfg),
    }
}
