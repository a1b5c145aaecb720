//! Stride application binary - composition root.
//!
//! 1. Parse CLI args, install tracing, load configuration from TOML
//! 2. Load the product catalog (a failure is kept and shown on every page)
//! 3. Check for the chat API credential and build the assistant
//! 4. Start the axum storefront server

mod cli;

use std::path::PathBuf;

use clap::Parser;
use stride_assistant::Assistant;
use stride_catalog::load_catalog;
use stride_core::config::StrideConfig;
use stride_web::{start_server, AppState, CatalogState};
use tracing_subscriber::EnvFilter;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let env = |key: &str| std::env::var(key).ok();

    // Tracing. Installed before the config file is read; RUST_LOG wins over
    // both --log-level and the configured level.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            env_filter.unwrap_or_else(|| EnvFilter::new(args.initial_log_level())),
        )
        .with_filter_reloading();
    let filter_handle = builder.reload_handle();
    builder.init();

    tracing::info!("Starting Stride v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = args.resolve_config_path(env);
    let mut config = StrideConfig::load_or_default(&config_file);
    args.apply_overrides(&mut config, env);

    if !from_env && config.general.log_level != args.initial_log_level() {
        if let Err(e) = filter_handle.reload(EnvFilter::new(&config.general.log_level)) {
            tracing::warn!(error = %e, "Could not apply configured log level");
        }
    }

    // Catalog.
    let catalog_path = PathBuf::from(&config.catalog.path);
    let loaded = load_catalog(&catalog_path);
    if let Err(ref e) = loaded {
        tracing::error!(
            path = %catalog_path.display(),
            error = %e,
            "Catalog failed to load, storefront will show the error page"
        );
    }
    let catalog = CatalogState::from_result(catalog_path.display().to_string(), loaded);

    // Assistant.
    let assistant = Assistant::from_config(&config.assistant);

    let state = AppState::new(config.clone(), catalog, assistant)?;
    start_server(&config, state).await?;

    Ok(())
}
