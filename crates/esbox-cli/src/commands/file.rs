//! File management CLI commands.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use tokio::task::JoinHandle;

use esbox_cache::CacheKey;
use esbox_core::result::AppResult;
use esbox_core::types::{FileId, FolderId};
use esbox_service::coordinator::UploadPhase;
use esbox_service::preview::loader;
use esbox_service::{AppContext, Command};

use crate::output::{self, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Upload a local file
    Upload {
        /// Path to the file to upload
        path: PathBuf,
        /// Destination folder ID (omit for the top level)
        #[arg(short, long)]
        parent_id: Option<i64>,
        /// Override file name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Rename a file
    Rename {
        /// File ID
        id: i64,
        /// New name
        name: String,
        /// Page the file is shown on
        #[arg(long = "in", default_value = "/storage")]
        view: String,
    },
    /// Move a file to the trash
    Delete {
        /// File ID
        id: i64,
        /// Page the file is shown on
        #[arg(long = "in", default_value = "/storage")]
        view: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Star or unstar a file
    Star {
        /// File ID
        id: i64,
        /// Page the file is shown on
        #[arg(long = "in", default_value = "/storage")]
        view: String,
    },
    /// Move a file into another folder
    Move {
        /// File ID
        id: i64,
        /// Destination folder ID (omit for the top level)
        #[arg(short, long)]
        to: Option<i64>,
        /// Page the file is shown on
        #[arg(long = "in", default_value = "/storage")]
        view: String,
    },
    /// Save a file's contents locally
    Download {
        /// File ID
        id: i64,
        /// Destination path (defaults to the file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Page the file is shown on
        #[arg(long = "in", default_value = "/storage")]
        view: String,
    },
    /// Print the URL a viewer streams the file from
    Url {
        /// File ID
        id: i64,
    },
}

/// Execute file commands
pub async fn execute(args: &FileArgs, ctx: &AppContext, format: OutputFormat) -> AppResult<()> {
    super::require_login(ctx).await?;

    match &args.command {
        FileCommand::Upload {
            path,
            parent_id,
            name,
        } => {
            let parent_id = parent_id.map(FolderId);
            let command = Command::UploadFile {
                path: path.clone(),
                parent_id,
                name: name.clone(),
            };
            let reporter = (format == OutputFormat::Table).then(|| report_progress(ctx));
            let result = super::submit(ctx, CacheKey::for_parent(parent_id), command, format).await;
            if let Some(handle) = reporter {
                handle.abort();
            }
            ctx.uploads.reset();
            result
        }
        FileCommand::Rename { id, name, view } => {
            let view = super::view_for(view)?;
            let file = super::find_file(ctx, &view, *id).await?;
            let command = Command::RenameFile {
                file,
                name: name.clone(),
            };
            super::submit(ctx, view, command, format).await
        }
        FileCommand::Delete { id, view, yes } => {
            let view = super::view_for(view)?;
            let file = super::find_file(ctx, &view, *id).await?;
            if !yes && !output::confirm(&format!("Move '{}' to trash?", file.filename))? {
                println!("Cancelled.");
                return Ok(());
            }
            super::submit(ctx, view, Command::DeleteFile { file }, format).await
        }
        FileCommand::Star { id, view } => {
            let view = super::view_for(view)?;
            let file = super::find_file(ctx, &view, *id).await?;
            super::submit(ctx, view, Command::ToggleStarFile { file }, format).await
        }
        FileCommand::Move { id, to, view } => {
            let view = super::view_for(view)?;
            let file = super::find_file(ctx, &view, *id).await?;
            let command = Command::MoveFile {
                file,
                parent_id: to.map(FolderId),
            };
            super::submit(ctx, view, command, format).await
        }
        FileCommand::Download { id, output, view } => {
            let view = super::view_for(view)?;
            let file = super::find_file(ctx, &view, *id).await?;
            let dest = output
                .clone()
                .unwrap_or_else(|| PathBuf::from(&file.filename));
            let written = loader::download(&*ctx.api, file.id, &dest).await?;
            output::print_success(&format!(
                "Saved '{}' ({}) to {}",
                file.filename,
                output::format_size(written as i64),
                dest.display()
            ));
            Ok(())
        }
        FileCommand::Url { id } => {
            println!("{}", ctx.stream_url(FileId(*id)));
            Ok(())
        }
    }
}

/// Print upload progress on one line until the upload leaves the uploading phase.
pub(crate) fn report_progress(ctx: &AppContext) -> JoinHandle<()> {
    let mut rx = ctx.uploads.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let progress = *rx.borrow_and_update();
            if progress.phase != UploadPhase::Uploading {
                break;
            }
            print!("\rUploading... {:>3}%", progress.percent());
            let _ = std::io::stdout().flush();
        }
        println!();
    })
}
