//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use esbox_core::config::ClientConfig;
use esbox_core::error::AppError;
use esbox_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Check that the configuration is usable
    Validate,
    /// Write the default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config/generated.toml")]
        output: String,
    },
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config: &ClientConfig,
    config_path: &str,
    format: OutputFormat,
) -> AppResult<()> {
    match &args.command {
        ConfigCommand::Show => output::print_item(config, format),
        ConfigCommand::Validate => {
            esbox_client::HttpApiClient::new(&config.api, esbox_client::TokenStore::in_memory())
                .inspect_err(|e| {
                    output::print_error(&format!("Configuration invalid: {}", e.message))
                })?;
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("API", &config.api.root());
            output::print_kv("Token file", &config.session.token_file);
            output::print_kv(
                "Cache",
                &format!(
                    "{} listings, {}s TTL",
                    config.cache.max_capacity, config.cache.time_to_live_seconds
                ),
            );
            output::print_kv(
                "Logging",
                &format!("{} ({})", config.logging.level, config.logging.format),
            );
        }
        ConfigCommand::Generate { output: out_path } => {
            let default_config = include_str!("../../../../config/default.toml");

            if let Some(parent) = std::path::Path::new(out_path).parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AppError::internal(format!("Failed to create dir: {e}")))?;
            }

            tokio::fs::write(out_path, default_config)
                .await
                .map_err(|e| AppError::internal(format!("Failed to write config: {e}")))?;

            output::print_success(&format!("Default config written to '{out_path}'"));
        }
    }

    Ok(())
}
