//! Trash CLI commands.

use clap::{Args, Subcommand, ValueEnum};

use esbox_cache::CacheKey;
use esbox_core::result::AppResult;
use esbox_core::types::{FileId, FolderId};
use esbox_entity::TrashItem;
use esbox_service::{AppContext, Command};

use crate::output::{self, EntryRow, OutputFormat};

/// Arguments for trash commands
#[derive(Debug, Args)]
pub struct TrashArgs {
    /// Trash subcommand
    #[command(subcommand)]
    pub command: TrashCommand,
}

/// What a trashed ID refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntryType {
    /// A file
    File,
    /// A folder
    Folder,
}

impl EntryType {
    fn item(self, id: i64) -> TrashItem {
        match self {
            Self::File => TrashItem::file(FileId(id)),
            Self::Folder => TrashItem::folder(FolderId(id)),
        }
    }
}

/// Trash subcommands
#[derive(Debug, Subcommand)]
pub enum TrashCommand {
    /// List trashed items
    List,
    /// Restore an item to where it was
    Restore {
        /// Item ID
        id: i64,
        /// Item type
        #[arg(short = 't', long = "type", value_enum, default_value = "file")]
        kind: EntryType,
    },
    /// Delete an item permanently
    Purge {
        /// Item ID
        id: i64,
        /// Item type
        #[arg(short = 't', long = "type", value_enum, default_value = "file")]
        kind: EntryType,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete everything in the trash permanently
    Empty {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Execute trash commands
pub async fn execute(args: &TrashArgs, ctx: &AppContext, format: OutputFormat) -> AppResult<()> {
    super::require_login(ctx).await?;

    match &args.command {
        TrashCommand::List => {
            let listing = ctx.cache.read(&CacheKey::Trash).await?;
            output::print_list(&EntryRow::from_listing(&listing), format);
            Ok(())
        }
        TrashCommand::Restore { id, kind } => {
            let command = Command::Restore {
                item: kind.item(*id),
            };
            super::submit(ctx, CacheKey::Trash, command, format).await
        }
        TrashCommand::Purge { id, kind, yes } => {
            if !yes && !output::confirm("This cannot be undone. Delete permanently?")? {
                println!("Cancelled.");
                return Ok(());
            }
            let command = Command::Purge {
                item: kind.item(*id),
            };
            super::submit(ctx, CacheKey::Trash, command, format).await
        }
        TrashCommand::Empty { yes } => {
            if !yes && !output::confirm("Permanently delete everything in the trash?")? {
                println!("Cancelled.");
                return Ok(());
            }
            let count = ctx.trash.empty().await?;
            ctx.notifications.drain();
            output::print_success(&format!("{count} item(s) permanently deleted"));
            Ok(())
        }
    }
}
