use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sidekick::app::AppContext;
use sidekick::cli::{commands, Cli, Commands};
use sidekick::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.global.config.as_deref())?.merge(cli.global.to_config());

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run { simulate } => {
            let ctx = AppContext::new(&config)?;
            commands::run(&ctx, simulate).await?;
        }
        Commands::Daemon {
            interval,
            no_initial_run,
            simulate,
        } => {
            let ctx = AppContext::new(&config)?;
            commands::daemon(ctx, &config, interval.as_deref(), !no_initial_run, simulate).await?;
        }
        Commands::Check => {
            commands::check(&config).await?;
        }
    }

    Ok(())
}
