//! Listing command.

use clap::Args;

use esbox_core::result::AppResult;
use esbox_service::AppContext;

use crate::output::{self, EntryRow, OutputFormat};

/// Arguments for the ls command
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Page to list: `/storage`, `/storage/<folder-id>`, `/starred` or `/trash`
    #[arg(default_value = "/storage")]
    pub route: String,

    /// Bypass the cache and fetch a fresh listing
    #[arg(short, long)]
    pub refresh: bool,
}

/// Execute the ls command
pub async fn execute(args: &LsArgs, ctx: &AppContext, format: OutputFormat) -> AppResult<()> {
    super::require_login(ctx).await?;
    let view = super::view_for(&args.route)?;

    let listing = if args.refresh {
        ctx.cache.revalidate(&view).await?
    } else {
        ctx.cache.read(&view).await?
    };

    output::print_list(&EntryRow::from_listing(&listing), format);
    Ok(())
}
