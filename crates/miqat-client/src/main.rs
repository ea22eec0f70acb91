//! miqat CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use miqat_client::cli::{Cli, Command, ConfigAction};
use miqat_client::commands;
use miqat_client::config::ClientConfig;
use miqat_client::error::{ClientError, ClientResult};
use miqat_client::session;
use miqat_core::{TracingConfig, TracingOutputFormat, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    };

    let debug = cli.debug || config.as_ref().is_ok_and(|c| c.debug);
    let tracing = if debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
            .with_level(Level::WARN)
            .with_format(TracingOutputFormat::Compact)
    };
    if let Err(e) = init_tracing(tracing) {
        eprintln!("warning: {}", e);
    }

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(ClientError::Config(e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: ClientConfig) -> ClientResult<()> {
    let format = cli.output_format(&config);
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);

    let out = match cli.command.clone().unwrap_or(Command::Today) {
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path)?,
            ConfigAction::Validate => commands::config::validate(&config)?,
            ConfigAction::Path => commands::config::path(&config_path)?,
        },
        Command::Today => {
            let dashboard = session::open_default(&cli, &config).await?;
            commands::show::today(&dashboard, format).await?
        }
        Command::Next => {
            let dashboard = session::open_default(&cli, &config).await?;
            commands::show::next(&dashboard, format).await?
        }
        Command::Fast => {
            let dashboard = session::open_default(&cli, &config).await?;
            commands::show::fast(&dashboard, format).await?
        }
        Command::Watch => {
            let dashboard = session::open_default(&cli, &config).await?;
            let mut stdout = std::io::stdout();
            return commands::watch::run(
                dashboard,
                config.scheduler_config(),
                format,
                &mut stdout,
                async {
                    let _ = tokio::signal::ctrl_c().await;
                },
            )
            .await;
        }
    };

    println!("{}", out);
    Ok(())
}
