//! CLI command definitions and dispatch.

pub mod auth;
pub mod config;
pub mod file;
pub mod folder;
pub mod ls;
pub mod shell;
pub mod telegram;
pub mod trash;

use clap::{Parser, Subcommand};

use esbox_cache::CacheKey;
use esbox_core::config::ClientConfig;
use esbox_core::error::AppError;
use esbox_core::result::AppResult;
use esbox_core::types::{FileId, FolderId};
use esbox_entity::{File, Folder};
use esbox_service::{AppContext, Command, CommandOutcome, CommandRequest, NavPath, Route};

use crate::output::{self, OutputFormat};

/// ESBox: personal cloud storage from the terminal
#[derive(Debug, Parser)]
#[command(name = "esbox", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Profile overlay loaded next to the configuration file
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in, sign out, and manage the account
    Auth(auth::AuthArgs),
    /// List a folder, the starred view, or the trash
    Ls(ls::LsArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// File management
    File(file::FileArgs),
    /// Trash management
    Trash(trash::TrashArgs),
    /// Telegram account linking
    Telegram(telegram::TelegramArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Interactive browsing shell
    Shell,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: ClientConfig) -> AppResult<()> {
        if let Commands::Config(args) = &self.command {
            return config::execute(args, &config, &self.config, self.format).await;
        }

        let ctx = connect(config).await?;
        match &self.command {
            Commands::Auth(args) => auth::execute(args, &ctx, self.format).await,
            Commands::Ls(args) => ls::execute(args, &ctx, self.format).await,
            Commands::Folder(args) => folder::execute(args, &ctx, self.format).await,
            Commands::File(args) => file::execute(args, &ctx, self.format).await,
            Commands::Trash(args) => trash::execute(args, &ctx, self.format).await,
            Commands::Telegram(args) => telegram::execute(args, &ctx, self.format).await,
            Commands::Shell => shell::run(&ctx, self.format).await,
            Commands::Config(_) => Ok(()),
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(path: &str, profile: Option<&str>) -> AppResult<ClientConfig> {
    let profile = profile.map(|p| format!("{p}.toml"));
    ClientConfig::load(path, profile.as_deref())
}

/// Helper: build the application context and restore the saved session
async fn connect(config: ClientConfig) -> AppResult<AppContext> {
    let ctx = AppContext::connect(config).await?;
    ctx.auth.hydrate().await;
    Ok(ctx)
}

/// Helper: fail unless a session is active
async fn require_login(ctx: &AppContext) -> AppResult<()> {
    if ctx.auth.is_authenticated().await {
        Ok(())
    } else {
        Err(AppError::authentication(
            "Not signed in. Run `esbox auth login` first.",
        ))
    }
}

/// Helper: resolve a page path such as `/storage/12` to its listing key
fn view_for(route: &str) -> AppResult<CacheKey> {
    let route: Route = route.parse()?;
    Ok(route.cache_key(&NavPath::new()))
}

/// Helper: find a folder shown in `view`
async fn find_folder(ctx: &AppContext, view: &CacheKey, id: i64) -> AppResult<Folder> {
    let listing = ctx.cache.read(view).await?;
    listing
        .folder(FolderId(id))
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found in {view}")))
}

/// Helper: find a file shown in `view`
async fn find_file(ctx: &AppContext, view: &CacheKey, id: i64) -> AppResult<File> {
    let listing = ctx.cache.read(view).await?;
    listing
        .file(FileId(id))
        .cloned()
        .ok_or_else(|| AppError::not_found(format!("File {id} not found in {view}")))
}

/// Helper: submit a command and print its outcome
async fn submit(
    ctx: &AppContext,
    view: CacheKey,
    command: Command,
    format: OutputFormat,
) -> AppResult<()> {
    let response = ctx
        .dispatcher()
        .dispatch(CommandRequest::new(view, command))
        .await;
    if let CommandOutcome::Failed { kind, error } = &response.outcome {
        return Err(AppError::new(*kind, error.clone()));
    }
    output::print_response(&response, format);
    Ok(())
}
