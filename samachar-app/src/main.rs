use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Cmd};
use samachar_classifier::{Coordinator, PredictClient};
use samachar_common::observability::init_logging;
use samachar_config::{SamacharConfig, SamacharConfigLoader};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

mod cli;
mod oneshot;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Cmd::Tui);

    // 1) Load config (env wins over files, --url wins over both)
    let mut cfg = load_config(&cli)?;
    if let Some(url) = &cli.url {
        cfg.service.base_url = url.clone();
    }

    // 2) Logging; the TUI owns the terminal so nothing goes to stderr there
    let mut log = cfg.logging.to_log_config("samachar");
    if command == Cmd::Tui {
        log.emit_stderr = false;
    }
    let log_path = init_logging(log)?;
    tracing::info!(
        log = %log_path.display(),
        base_url = %cfg.service.base_url,
        ?command,
        "samachar starting"
    );

    let client = PredictClient::from_config(&cfg.service)
        .context("failed to set up the classification client")?;

    let (mut out, mut err) = (io::stdout(), io::stderr());
    let code = match command {
        Cmd::Tui => {
            let coordinator = Coordinator::new(Arc::new(client));
            samachar_tui::run(coordinator, cfg.ui.tick()).await?;
            oneshot::EXIT_OK
        }
        Cmd::Classify { text, file } => {
            let text = oneshot::read_input(text, file.as_deref())?;
            oneshot::classify(Arc::new(client), &text, cli.json, &mut out, &mut err).await?
        }
        Cmd::Health => oneshot::health(&client, cli.json, &mut out, &mut err).await?,
        Cmd::Status => oneshot::status(&client, cli.json, &mut out, &mut err).await?,
        Cmd::ReloadModels => oneshot::reload_models(&client, cli.json, &mut out, &mut err).await?,
    };

    Ok(ExitCode::from(code))
}

fn load_config(cli: &Cli) -> Result<SamacharConfig> {
    let loader = match &cli.config {
        Some(path) => SamacharConfigLoader::new().with_file(path),
        None => SamacharConfigLoader::new().with_default_files(),
    };
    loader.load().context("failed to load configuration")
}
