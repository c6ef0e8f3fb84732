use clap::Parser;
use coinbridge::adapter::inbound::cli::command::Cli;
use coinbridge::adapter::inbound::cli::dispatch::execute;
use coinbridge::adapter::inbound::cli::output::{self, OutputConfig};
use coinbridge::adapter::outbound::binance::BinanceExchange;
use coinbridge::infrastructure::config::settings::Config;
use tracing::{debug, error};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    if let Err(e) = run(&cli).await {
        error!(error = %e, "command failed");
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load_or_default(&cli.config)?;
    config.init_logging();
    debug!(path = %cli.config.display(), "configuration loaded");

    let exchange = BinanceExchange::from_config(&config.binance)?;
    execute(cli, &exchange).await?;
    Ok(())
}
