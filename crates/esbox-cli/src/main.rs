//! ESBox CLI entry point.

use clap::Parser;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match commands::load_config(&cli.config, cli.profile.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&e.message);
            std::process::exit(2);
        }
    };
    esbox_core::logging::init(&config.logging);

    if let Err(e) = cli.execute(config).await {
        output::print_error(&e.message);
        std::process::exit(1);
    }
}
