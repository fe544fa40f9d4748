// devflags command-line entry point.

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use devflags::cache::FileStore;
use devflags::service::HttpService;
use devflags::settings::{Cli, Command, Settings, TogglesAction};
use devflags::{DevFlagsError, DeveloperSettings, DeveloperToggles, FeatureConfig, Result, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(cli.settings.log_level) {
        eprintln!("{err}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = cli.settings.file_store()?;

    match cli.command {
        Command::Toggles { action } => {
            run_toggles(DeveloperToggles::new(store), action);
            Ok(())
        }
        Command::Show => show(&developer_settings(store, &cli.settings)?),
        Command::Refresh => {
            let settings = developer_settings(store, &cli.settings)?;
            settings.refresh_config().await?;
            print_json(&loaded(&settings)?)
        }
        Command::Get { path } => get(&developer_settings(store, &cli.settings)?, &path).await,
    }
}

fn developer_settings(
    store: FileStore,
    settings: &Settings,
) -> Result<DeveloperSettings<FileStore, HttpService>> {
    let service = HttpService::new(settings.timeout())?;
    Ok(DeveloperSettings::new(store, settings.endpoint.clone()).with_service(service))
}

fn show(settings: &DeveloperSettings<FileStore, HttpService>) -> Result<()> {
    match settings.load_config() {
        Some(config) => print_json(&config),
        None => {
            println!("no fresh feature config cached; run `devflags refresh`");
            Ok(())
        }
    }
}

async fn get(settings: &DeveloperSettings<FileStore, HttpService>, path: &str) -> Result<()> {
    let config = match settings.load_config() {
        Some(config) => config,
        None => {
            settings.refresh_config().await?;
            loaded(settings)?
        }
    };

    match config.get(path) {
        Some(value) => print_json(value),
        None => Err(DevFlagsError::Other(format!("no value at {path}"))),
    }
}

fn run_toggles(toggles: DeveloperToggles<FileStore>, action: TogglesAction) {
    match action {
        TogglesAction::List => {
            for (toggle, value) in toggles.all() {
                println!("{toggle}: {value}");
            }
        }
        TogglesAction::Set { toggle, value } => {
            toggles.set(toggle, value);
            println!("{toggle}: {}", toggles.get(toggle));
        }
    }
}

fn loaded(settings: &DeveloperSettings<FileStore, HttpService>) -> Result<FeatureConfig> {
    settings
        .load_config()
        .ok_or_else(|| DevFlagsError::Other("feature config missing after refresh".to_string()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
