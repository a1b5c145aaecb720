//! CLI argument definitions for the Stride storefront.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;
use stride_core::config::StrideConfig;

/// Stride: a demo storefront with an optional AI shopping assistant.
#[derive(Parser, Debug, Default)]
#[command(name = "stride", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// HTTP server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Address to bind the HTTP server to.
    #[arg(short = 'b', long = "bind")]
    pub bind: Option<String>,

    /// Product catalog CSV.
    #[arg(long = "catalog")]
    pub catalog: Option<PathBuf>,

    /// Chat model used by the assistant.
    #[arg(long = "model")]
    pub model: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > STRIDE_CONFIG env var > ./stride.toml.
    pub fn resolve_config_path(&self, env: impl Fn(&str) -> Option<String>) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = env("STRIDE_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("stride.toml")
    }

    /// Log level for the subscriber installed before the config file is read.
    pub fn initial_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    /// Apply CLI and environment overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut StrideConfig, env: impl Fn(&str) -> Option<String>) {
        if let Some(port) = self
            .port
            .or_else(|| env("STRIDE_PORT").and_then(|v| v.parse::<u16>().ok()))
        {
            config.general.port = port;
        }
        if let Some(ref bind) = self.bind {
            config.general.bind_address = bind.clone();
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }

        if let Some(path) = self
            .catalog
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env("STRIDE_CATALOG"))
        {
            config.catalog.path = path;
        }

        if let Some(model) = self.model.clone().or_else(|| env("OPENAI_MODEL")) {
            config.assistant.model = model;
        }
        if let Some(base_url) = env("OPENAI_BASE_URL") {
            config.assistant.base_url = base_url;
        }
    }
}
