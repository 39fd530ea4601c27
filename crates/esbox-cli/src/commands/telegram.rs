//! Telegram linking CLI commands.

use clap::{Args, Subcommand};

use esbox_core::error::AppError;
use esbox_core::result::AppResult;
use esbox_service::AppContext;

use crate::output::{self, OutputFormat};

/// Arguments for telegram commands
#[derive(Debug, Args)]
pub struct TelegramArgs {
    /// Telegram subcommand
    #[command(subcommand)]
    pub command: TelegramCommand,
}

/// Telegram subcommands
#[derive(Debug, Subcommand)]
pub enum TelegramCommand {
    /// Send a login code to a phone number
    SendCode {
        /// Phone number in international format
        phone: String,
    },
    /// Confirm the code received in Telegram
    Verify {
        /// Login code
        code: String,
    },
}

/// Execute telegram commands
pub async fn execute(
    args: &TelegramArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> AppResult<()> {
    super::require_login(ctx).await?;

    let response = match &args.command {
        TelegramCommand::SendCode { phone } => ctx.telegram.send_code(phone).await?,
        TelegramCommand::Verify { code } => ctx.telegram.verify_code(code).await?,
    };

    let toasts = ctx.notifications.drain();
    if !response.success {
        let message = toasts
            .last()
            .map(|t| t.message.clone())
            .unwrap_or(response.message);
        return Err(AppError::backend(message));
    }

    match format {
        OutputFormat::Json => output::print_item(&response, format),
        OutputFormat::Table => output::print_toasts(&toasts),
    }
    Ok(())
}
