use anyhow::Result;
use form_builder::app::App;
use form_builder::cli::{self, Cli};
use form_builder::config::Config;
use form_builder::error::AppError;
use form_builder::logger::{self, Logger};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build().get_matches();
    let cli = Cli::from_matches(&matches)?;

    let mut config = Config::new();
    config.load(cli.config_dir.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = Some(PathBuf::from(data_dir));
    }

    let level = logger::verbosity(config.log_level_filter()?, cli.verbosity);
    Logger::new(level)
        .init()
        .map_err(|e| AppError::Logger(e.to_string()))?;

    App::start(config, cli.command).await?;
    Ok(())
}
