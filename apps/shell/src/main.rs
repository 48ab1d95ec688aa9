mod args;
mod handlers;

use crate::args::{Cli, Command};
use anyhow::{Context, Result};
use cdmi_domain::config::{CdmiConfig, LoggingConfig};
use cdmi_kernel::config::load_config;
use cdmi_logger::{LevelFilter, Logger};
use cdmi_storage::ObjectStore;
use clap::Parser;
use std::io::Write;
use std::str::FromStr;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config: CdmiConfig = load_config(cli.config.as_deref())?;
    if let Some(base) = cli.base {
        config.storage.base_directory = base;
    }

    let _logger = init_logger(&config.logging)?;

    let store = ObjectStore::from_config(&config.storage).await?;

    let output = match cli.command {
        Command::Put { path, mime, id, metadata, input } => {
            handlers::put(&store, &path, mime, id, metadata, input).await?
        },
        Command::PutRaw { path, content_type, input } => {
            handlers::put_raw(&store, &path, &content_type, input).await?
        },
        Command::Get { path } => handlers::get(&store, &path).await?,
        Command::Capabilities => handlers::capabilities(&store),
    };

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output)?;
    writeln!(stdout)?;

    Ok(())
}

fn init_logger(config: &LoggingConfig) -> Result<Logger> {
    let level = LevelFilter::from_str(&config.level)
        .with_context(|| format!("Invalid log level '{}'", config.level))?;

    let mut builder =
        Logger::builder().name(env!("CARGO_PKG_NAME")).level(level).console(config.console);
    if let Some(filter) = &config.filter {
        builder = builder.env_filter(filter.clone());
    }
    if let Some(directory) = &config.directory {
        builder = builder.directory(directory).json(config.json);
    }

    Ok(builder.init()?)
}
