//! fastimg - asset server with on-demand image transcoding.

mod app;
mod cli;
mod config;
mod core;
mod hooks;
mod host;
mod logger;
mod media;
mod rewrite;
mod route;
mod settings;
mod sizes;
mod transcode;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use app::App;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{AppConfig, init_config};
use media::{AssetResolver, MediaLibrary};
use settings::LiveSettings;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = init_config(AppConfig::load(cli)?);

    match &cli.command {
        Commands::Serve { .. } => cli::serve::serve(&config, load_library(&config)?),
        Commands::Sizes => {
            cli::sizes::list_sizes(&config);
            Ok(())
        }
        Commands::Url { id, size } => {
            let app = App::new(
                &config,
                load_library(&config)?,
                Arc::new(LiveSettings),
                &config.base_url(),
            );
            cli::url::print_urls(app.host(), *id, size.as_deref())
        }
    }
}

/// Load the media library named by `[media]`.
fn load_library(config: &AppConfig) -> Result<Arc<dyn AssetResolver>> {
    let library = MediaLibrary::load(&config.media.root, &config.media.manifest_path())?;
    debug!("media"; "{} assets under {}", library.len(), library.root().display());
    Ok(Arc::new(library))
}
