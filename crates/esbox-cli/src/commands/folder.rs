//! Folder management CLI commands.

use clap::{Args, Subcommand};

use esbox_cache::CacheKey;
use esbox_core::result::AppResult;
use esbox_core::types::FolderId;
use esbox_service::{AppContext, Command};

use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a new folder
    Create {
        /// Folder name
        name: String,
        /// Parent folder ID (omit for the top level)
        #[arg(short, long)]
        parent_id: Option<i64>,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: i64,
        /// New name
        name: String,
        /// Page the folder is shown on
        #[arg(long = "in", default_value = "/storage")]
        view: String,
    },
    /// Move a folder to the trash
    Delete {
        /// Folder ID
        id: i64,
        /// Page the folder is shown on
        #[arg(long = "in", default_value = "/storage")]
        view: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Star or unstar a folder
    Star {
        /// Folder ID
        id: i64,
        /// Page the folder is shown on
        #[arg(long = "in", default_value = "/storage")]
        view: String,
    },
}

/// Execute folder commands
pub async fn execute(args: &FolderArgs, ctx: &AppContext, format: OutputFormat) -> AppResult<()> {
    super::require_login(ctx).await?;

    match &args.command {
        FolderCommand::Create { name, parent_id } => {
            let parent_id = parent_id.map(FolderId);
            let view = CacheKey::for_parent(parent_id);
            let command = Command::CreateFolder {
                parent_id,
                name: name.clone(),
            };
            super::submit(ctx, view, command, format).await
        }
        FolderCommand::Rename { id, name, view } => {
            let view = super::view_for(view)?;
            let folder = super::find_folder(ctx, &view, *id).await?;
            let command = Command::RenameFolder {
                folder,
                name: name.clone(),
            };
            super::submit(ctx, view, command, format).await
        }
        FolderCommand::Delete { id, view, yes } => {
            let view = super::view_for(view)?;
            let folder = super::find_folder(ctx, &view, *id).await?;
            if !yes && !output::confirm(&format!("Move folder '{}' to trash?", folder.name))? {
                println!("Cancelled.");
                return Ok(());
            }
            super::submit(ctx, view, Command::DeleteFolder { folder }, format).await
        }
        FolderCommand::Star { id, view } => {
            let view = super::view_for(view)?;
            let folder = super::find_folder(ctx, &view, *id).await?;
            super::submit(ctx, view, Command::ToggleStarFolder { folder }, format).await
        }
    }
}
