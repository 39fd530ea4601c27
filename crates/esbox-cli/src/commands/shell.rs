//! Interactive browsing shell.
//!
//! The shell keeps the same state a browser session would: the current
//! page, the folder navigation stack, at most one open dialog, and the
//! preview shown by that dialog. Mutations are submitted through the
//! command dispatcher and reported through the toast queue.

use std::path::PathBuf;

use esbox_cache::CacheKey;
use esbox_core::error::{AppError, ErrorKind};
use esbox_core::result::AppResult;
use esbox_core::types::FolderId;
use esbox_entity::{File, Folder, TrashItem};
use esbox_service::preview::{self, Preview};
use esbox_service::{
    AppContext, Command, CommandOutcome, CommandRequest, Modal, ModalKind, ModalState, NavFolder,
    NavPath, Route,
};

use crate::output::{self, EntryRow, OutputFormat};

const HELP: &str = "\
Browsing:
  ls                      list the current page
  refresh                 fetch the current page again
  cd <folder>|..|/        enter a folder, go up, or go home
  crumbs                  show the breadcrumb trail
  jump <n>                go to breadcrumb n (0 is Home)
  go <page>               /storage, /storage/<id>, /starred or /trash
Changes:
  mkdir <name>            create a folder here
  rename <entry> [name]   rename a file or folder
  rm <entry>              move a file or folder to the trash
  star <entry>            star or unstar
  mv <file> <folder>|..|/ move a file
  upload <path> [name]    upload a local file here
  get <file> [dest]       download a file
Trash:
  restore <entry>         restore from the trash
  purge <entry>           delete permanently
  empty                   empty the trash
Preview:
  open <file>             preview an image, PDF or video
  zoom in|out|reset  rotate [left]  page next|prev|<n>
  play  seek <seconds>  skip fwd|back  speed  mute  volume <0-1>
  full  close
Account:
  whoami  telegram  logout  help  exit";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    Help,
    Exit,
    List,
    Refresh,
    Cd(String),
    Crumbs,
    Jump(usize),
    Go(Route),
    Mkdir(String),
    Rename { target: String, name: Option<String> },
    Remove(String),
    Star(String),
    Move { target: String, dest: String },
    Upload { path: PathBuf, name: Option<String> },
    Get { target: String, dest: Option<PathBuf> },
    Restore(String),
    Purge(String),
    Empty,
    Open(String),
    Close,
    View(ViewAction),
    Whoami,
    Telegram,
    Logout,
}

/// A control on the open preview.
#[derive(Debug, Clone, PartialEq)]
enum ViewAction {
    ZoomIn,
    ZoomOut,
    ZoomReset,
    Rotate { clockwise: bool },
    NextPage,
    PrevPage,
    Page(u32),
    Play,
    Seek(f64),
    Skip { forward: bool },
    Speed,
    Mute,
    Volume(f64),
    Fullscreen,
}

impl ShellCommand {
    /// Parse one input line; `Ok(None)` for a blank line.
    fn parse(line: &str) -> AppResult<Option<Self>> {
        let args = split_args(line)?;
        let Some((head, rest)) = args.split_first() else {
            return Ok(None);
        };
        let arg = |i: usize| rest.get(i).cloned();
        let required = |i: usize, what: &str| {
            arg(i).ok_or_else(|| AppError::validation(format!("Usage: {head} {what}")))
        };

        let command = match head.as_str() {
            "help" | "?" => Self::Help,
            "exit" | "quit" => Self::Exit,
            "ls" => Self::List,
            "refresh" => Self::Refresh,
            "cd" => Self::Cd(arg(0).unwrap_or_else(|| "/".to_string())),
            "crumbs" | "pwd" => Self::Crumbs,
            "jump" => Self::Jump(parse_number(&required(0, "<n>")?)?),
            "go" => Self::Go(required(0, "<page>")?.parse()?),
            "mkdir" => Self::Mkdir(rest.join(" ")),
            "rename" => Self::Rename {
                target: required(0, "<entry> [name]")?,
                name: (rest.len() > 1).then(|| rest[1..].join(" ")),
            },
            "rm" => Self::Remove(required(0, "<entry>")?),
            "star" => Self::Star(required(0, "<entry>")?),
            "mv" => Self::Move {
                target: required(0, "<file> <folder>")?,
                dest: required(1, "<file> <folder>")?,
            },
            "upload" => Self::Upload {
                path: PathBuf::from(required(0, "<path> [name]")?),
                name: arg(1),
            },
            "get" => Self::Get {
                target: required(0, "<file> [dest]")?,
                dest: arg(1).map(PathBuf::from),
            },
            "restore" => Self::Restore(required(0, "<entry>")?),
            "purge" => Self::Purge(required(0, "<entry>")?),
            "empty" => Self::Empty,
            "open" => Self::Open(required(0, "<file>")?),
            "close" => Self::Close,
            "zoom" => Self::View(match required(0, "in|out|reset")?.as_str() {
                "in" | "+" => ViewAction::ZoomIn,
                "out" | "-" => ViewAction::ZoomOut,
                _ => ViewAction::ZoomReset,
            }),
            "rotate" => Self::View(ViewAction::Rotate {
                clockwise: arg(0).as_deref() != Some("left"),
            }),
            "page" => Self::View(match required(0, "next|prev|<n>")?.as_str() {
                "next" => ViewAction::NextPage,
                "prev" => ViewAction::PrevPage,
                n => ViewAction::Page(parse_number(n)?),
            }),
            "play" | "pause" => Self::View(ViewAction::Play),
            "seek" => Self::View(ViewAction::Seek(parse_number(&required(0, "<seconds>")?)?)),
            "skip" => Self::View(ViewAction::Skip {
                forward: arg(0).as_deref() != Some("back"),
            }),
            "speed" => Self::View(ViewAction::Speed),
            "mute" => Self::View(ViewAction::Mute),
            "volume" => Self::View(ViewAction::Volume(parse_number(&required(0, "<0-1>")?)?)),
            "full" | "fullscreen" => Self::View(ViewAction::Fullscreen),
            "whoami" => Self::Whoami,
            "telegram" => Self::Telegram,
            "logout" => Self::Logout,
            other => {
                return Err(AppError::validation(format!(
                    "Unknown command '{other}'. Type `help` for a list."
                )));
            }
        };
        Ok(Some(command))
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> AppResult<T> {
    raw.parse()
        .map_err(|_| AppError::validation(format!("'{raw}' is not a number")))
}

/// Split a line on whitespace, keeping quoted runs together.
fn split_args(line: &str) -> AppResult<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_word = false;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(AppError::validation("Unclosed quote"));
    }
    if in_word {
        args.push(current);
    }
    Ok(args)
}

/// A listing entry picked by name or ID.
#[derive(Debug, Clone)]
enum Entry {
    Folder(Folder),
    File(File),
}

impl Entry {
    fn trash_item(&self) -> TrashItem {
        match self {
            Self::Folder(f) => TrashItem::folder(f.id),
            Self::File(f) => TrashItem::file(f.id),
        }
    }
}

/// Session state of one shell.
struct Shell<'a> {
    ctx: &'a AppContext,
    format: OutputFormat,
    route: Route,
    nav: NavPath,
    /// Folder opened by ID whose ancestors are unknown.
    detached: Option<FolderId>,
    modal: ModalState,
    preview: Option<Preview>,
}

/// Run the shell until `exit` or end of input.
pub async fn run(ctx: &AppContext, format: OutputFormat) -> AppResult<()> {
    super::require_login(ctx).await?;
    let mut shell = Shell::new(ctx, format);

    println!("ESBox shell. Type `help` for commands.");
    loop {
        let line = match output::input(&shell.prompt(), true) {
            Ok(line) => line,
            Err(_) => break,
        };
        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                output::print_error(&e.message);
                continue;
            }
        };
        if command == ShellCommand::Exit {
            break;
        }
        if let Err(e) = shell.handle(command).await {
            output::print_error(&e.message);
        }
        output::print_toasts(&ctx.notifications.drain());
        if command_ended_session(&shell).await {
            break;
        }
    }
    Ok(())
}

async fn command_ended_session(shell: &Shell<'_>) -> bool {
    !shell.ctx.auth.is_authenticated().await
}

impl<'a> Shell<'a> {
    fn new(ctx: &'a AppContext, format: OutputFormat) -> Self {
        Self {
            ctx,
            format,
            route: Route::Home,
            nav: NavPath::new(),
            detached: None,
            modal: ModalState::new(),
            preview: None,
        }
    }

    fn prompt(&self) -> String {
        let location = match self.route {
            Route::Home => self.nav.breadcrumbs().join(" / "),
            ref other => other.to_string(),
        };
        match self.modal.kind() {
            Some(kind) => format!("{location} [{kind}]"),
            None => location,
        }
    }

    fn view(&self) -> CacheKey {
        self.route.cache_key(&self.nav)
    }

    /// Folder that new folders and uploads land in.
    fn new_item_parent(&self) -> Option<FolderId> {
        self.view().folder_id()
    }

    /// Folder above the current one; `None` is the top level.
    fn parent_of_current(&self) -> AppResult<Option<FolderId>> {
        match self.nav.folders() {
            [] => Ok(None),
            [only] if self.detached == Some(only.id) => Err(AppError::validation(format!(
                "The folder above {} is unknown here; use `cd /`",
                only.name
            ))),
            [.., parent, _] => Ok(Some(parent.id)),
            [_] => Ok(None),
        }
    }

    fn reset_path(&mut self) {
        self.nav.jump_to_root();
        self.detached = None;
    }

    fn go(&mut self, route: Route) {
        self.route = route;
        match route {
            Route::Home => self.reset_path(),
            Route::Folder(id) => {
                self.reset_path();
                self.nav.enter(NavFolder::new(id, format!("#{id}")));
                self.detached = Some(id);
            }
            Route::Starred | Route::Trash => {}
        }
    }

    async fn handle(&mut self, command: ShellCommand) -> AppResult<()> {
        match command {
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Exit => {}
            ShellCommand::List => self.list(false).await?,
            ShellCommand::Refresh => self.list(true).await?,
            ShellCommand::Cd(target) => self.cd(&target).await?,
            ShellCommand::Crumbs => {
                for (i, crumb) in self.nav.breadcrumbs().iter().enumerate() {
                    println!("  {i}  {crumb}");
                }
            }
            ShellCommand::Jump(index) => self.jump(index)?,
            ShellCommand::Go(route) => {
                self.go(route);
                self.list(false).await?;
            }
            ShellCommand::Mkdir(name) => self.mkdir(&name).await?,
            ShellCommand::Rename { target, name } => self.rename(&target, name).await?,
            ShellCommand::Remove(target) => self.remove(&target).await?,
            ShellCommand::Star(target) => {
                let command = match self.resolve(&target).await? {
                    Entry::Folder(folder) => Command::ToggleStarFolder { folder },
                    Entry::File(file) => Command::ToggleStarFile { file },
                };
                self.submit(command).await;
            }
            ShellCommand::Move { target, dest } => self.move_file(&target, &dest).await?,
            ShellCommand::Upload { path, name } => self.upload(path, name).await?,
            ShellCommand::Get { target, dest } => self.get(&target, dest).await?,
            ShellCommand::Restore(target) => {
                self.require_trash()?;
                let item = self.resolve(&target).await?.trash_item();
                self.submit(Command::Restore { item }).await;
            }
            ShellCommand::Purge(target) => {
                self.require_trash()?;
                let item = self.resolve(&target).await?.trash_item();
                if output::confirm("This cannot be undone. Delete permanently?")? {
                    self.submit(Command::Purge { item }).await;
                }
            }
            ShellCommand::Empty => {
                if output::confirm("Permanently delete everything in the trash?")? {
                    let count = self.ctx.trash.empty().await?;
                    output::print_success(&format!("{count} item(s) permanently deleted"));
                }
            }
            ShellCommand::Open(target) => self.open(&target).await?,
            ShellCommand::Close => {
                self.modal.close();
                self.preview = None;
            }
            ShellCommand::View(action) => self.control(action)?,
            ShellCommand::Whoami => match self.ctx.auth.user().await {
                Some(user) => println!("{} <{}>", user.username, user.email),
                None => output::print_warning("Not signed in"),
            },
            ShellCommand::Telegram => self.telegram().await?,
            ShellCommand::Logout => self.ctx.auth.logout().await?,
        }
        Ok(())
    }

    async fn list(&self, fresh: bool) -> AppResult<()> {
        let view = self.view();
        let listing = if fresh {
            self.ctx.cache.revalidate(&view).await?
        } else {
            self.ctx.cache.read(&view).await?
        };
        output::print_list(&EntryRow::from_listing(&listing), self.format);
        Ok(())
    }

    /// Find an entry in the current page by exact name, then by ID.
    async fn resolve(&self, target: &str) -> AppResult<Entry> {
        let listing = self.ctx.cache.read(&self.view()).await?;
        if let Some(folder) = listing.folder_named(target) {
            return Ok(Entry::Folder(folder.clone()));
        }
        if let Some(file) = listing.file_named(target) {
            return Ok(Entry::File(file.clone()));
        }
        if let Ok(id) = target.parse::<i64>() {
            if let Some(folder) = listing.folders.iter().find(|f| f.id.get() == id) {
                return Ok(Entry::Folder(folder.clone()));
            }
            if let Some(file) = listing.files.iter().find(|f| f.id.get() == id) {
                return Ok(Entry::File(file.clone()));
            }
        }
        Err(AppError::not_found(format!("Nothing named '{target}' here")))
    }

    async fn resolve_file(&self, target: &str) -> AppResult<File> {
        match self.resolve(target).await? {
            Entry::File(file) => Ok(file),
            Entry::Folder(folder) => Err(AppError::validation(format!(
                "'{}' is a folder",
                folder.name
            ))),
        }
    }

    fn require_browsable(&self) -> AppResult<()> {
        if self.route.is_browsable() {
            Ok(())
        } else {
            Err(AppError::validation("Go to /storage to change folders"))
        }
    }

    fn require_trash(&self) -> AppResult<()> {
        if self.route == Route::Trash {
            Ok(())
        } else {
            Err(AppError::validation("Go to /trash first"))
        }
    }

    async fn cd(&mut self, target: &str) -> AppResult<()> {
        match target {
            "/" | "~" => {
                self.route = Route::Home;
                self.reset_path();
            }
            ".." => {
                self.require_browsable()?;
                self.parent_of_current()?;
                self.route = Route::Home;
                self.nav.up();
            }
            name => {
                let Entry::Folder(folder) = self.resolve(name).await? else {
                    return Err(AppError::validation(format!("'{name}' is not a folder")));
                };
                if !self.route.is_browsable() {
                    self.reset_path();
                }
                self.route = Route::Home;
                self.nav.enter(NavFolder::from(&folder));
            }
        }
        self.list(false).await
    }

    fn jump(&mut self, index: usize) -> AppResult<()> {
        if index == 0 {
            self.reset_path();
        } else {
            let folder = self
                .nav
                .folders()
                .get(index - 1)
                .cloned()
                .ok_or_else(|| AppError::validation(format!("No breadcrumb {index}")))?;
            self.nav.jump_to(&folder);
        }
        self.route = Route::Home;
        Ok(())
    }

    /// Open `modal`, collect its input, and submit what it produces.
    async fn run_dialog(&mut self, modal: Modal, input: Option<String>) -> AppResult<()> {
        self.preview = None;
        self.modal.open(modal);
        let title = self.modal.active().map(Modal::title).unwrap_or_default();

        let input = match (input, self.modal.kind()) {
            (Some(input), _) => input,
            (None, Some(kind)) if is_confirmation(kind) => {
                if !output::confirm(&title)? {
                    self.modal.close();
                    return Ok(());
                }
                String::new()
            }
            (None, _) => output::input(&title, false)?,
        };

        let Some(modal) = self.modal.take() else {
            return Ok(());
        };
        if let Some(command) = Command::from_dialog(&modal, &input) {
            self.submit(command).await;
        }
        Ok(())
    }

    /// Dispatch a command for the current page and report validation failures.
    ///
    /// Remote failures already raised an error toast.
    async fn submit(&self, command: Command) {
        let response = self
            .ctx
            .dispatcher()
            .dispatch(CommandRequest::new(self.view(), command))
            .await;
        match response.outcome {
            CommandOutcome::Failed {
                kind: ErrorKind::Validation,
                error,
            } => output::print_error(&error),
            CommandOutcome::NoOp => output::print_warning("Nothing to change"),
            CommandOutcome::Applied { .. } | CommandOutcome::Failed { .. } => {}
        }
    }

    async fn mkdir(&mut self, name: &str) -> AppResult<()> {
        self.require_browsable()?;
        let modal = Modal::NewFolder {
            parent_id: self.new_item_parent(),
        };
        let input = (!name.is_empty()).then(|| name.to_string());
        self.run_dialog(modal, input).await
    }

    async fn rename(&mut self, target: &str, name: Option<String>) -> AppResult<()> {
        let modal = match self.resolve(target).await? {
            Entry::Folder(folder) => Modal::RenameFolder { folder },
            Entry::File(file) => Modal::RenameFile { file },
        };
        self.run_dialog(modal, name).await
    }

    async fn remove(&mut self, target: &str) -> AppResult<()> {
        let modal = match self.resolve(target).await? {
            Entry::Folder(folder) => Modal::DeleteFolder { folder },
            Entry::File(file) => Modal::DeleteFile { file },
        };
        self.run_dialog(modal, None).await
    }

    async fn move_file(&mut self, target: &str, dest: &str) -> AppResult<()> {
        let file = self.resolve_file(target).await?;
        let parent_id = match dest {
            "/" | "~" => None,
            ".." => self.parent_of_current()?,
            name => match self.resolve(name).await? {
                Entry::Folder(folder) => Some(folder.id),
                Entry::File(_) => {
                    return Err(AppError::validation(format!("'{name}' is not a folder")));
                }
            },
        };
        self.submit(Command::MoveFile { file, parent_id }).await;
        Ok(())
    }

    async fn upload(&mut self, path: PathBuf, name: Option<String>) -> AppResult<()> {
        self.require_browsable()?;
        let reporter = super::file::report_progress(self.ctx);
        self.modal.open(Modal::UploadFile {
            parent_id: self.new_item_parent(),
        });
        let command = self
            .modal
            .take()
            .and_then(|modal| Command::from_dialog(&modal, &path.to_string_lossy()))
            .map(|command| match command {
                Command::UploadFile {
                    path, parent_id, ..
                } => Command::UploadFile {
                    path,
                    parent_id,
                    name,
                },
                other => other,
            });
        if let Some(command) = command {
            self.submit(command).await;
        }
        reporter.abort();
        self.ctx.uploads.reset();
        Ok(())
    }

    async fn get(&self, target: &str, dest: Option<PathBuf>) -> AppResult<()> {
        let file = self.resolve_file(target).await?;
        let dest = dest.unwrap_or_else(|| PathBuf::from(&file.filename));
        let written = preview::download(&*self.ctx.api, file.id, &dest).await?;
        output::print_success(&format!(
            "Saved {} to {}",
            output::format_size(written as i64),
            dest.display()
        ));
        Ok(())
    }

    async fn open(&mut self, target: &str) -> AppResult<()> {
        let file = self.resolve_file(target).await?;
        let url = self.ctx.stream_url(file.id);
        let (Some(modal), Some(mut viewer)) = (
            Modal::preview(file.clone(), url.clone()),
            Preview::for_file(&file, url),
        ) else {
            return Err(AppError::validation(format!(
                "No preview available for '{}'",
                file.filename
            )));
        };

        self.modal.open(modal);
        match preview::fetch(&*self.ctx.api, file.id).await {
            Ok(media) => viewer.on_media(&media),
            Err(e) => viewer.fail(e.message),
        }
        self.preview = Some(viewer);
        self.describe_preview();
        Ok(())
    }

    fn control(&mut self, action: ViewAction) -> AppResult<()> {
        let viewer = self
            .preview
            .as_mut()
            .ok_or_else(|| AppError::validation("Nothing is open. Use `open <file>` first."))?;

        match (viewer, action) {
            (Preview::Image(v), ViewAction::Fullscreen) => v.toggle_fullscreen(),
            (Preview::Pdf(v), ViewAction::Fullscreen) => v.toggle_fullscreen(),
            (Preview::Video(v), ViewAction::Fullscreen) => v.toggle_fullscreen(),
            (Preview::Image(v), ViewAction::ZoomIn) => v.zoom.zoom_in(),
            (Preview::Image(v), ViewAction::ZoomOut) => v.zoom.zoom_out(),
            (Preview::Image(v), ViewAction::ZoomReset) => v.reset_view(),
            (Preview::Image(v), ViewAction::Rotate { clockwise }) => {
                if clockwise {
                    v.rotation.rotate_cw()
                } else {
                    v.rotation.rotate_ccw()
                }
            }
            (Preview::Pdf(v), ViewAction::ZoomIn) => v.zoom.zoom_in(),
            (Preview::Pdf(v), ViewAction::ZoomOut) => v.zoom.zoom_out(),
            (Preview::Pdf(v), ViewAction::ZoomReset) => v.zoom.reset(),
            (Preview::Pdf(v), ViewAction::Rotate { clockwise }) => {
                if clockwise {
                    v.rotation.rotate_cw()
                } else {
                    v.rotation.rotate_ccw()
                }
            }
            (Preview::Pdf(v), ViewAction::NextPage) => v.next_page(),
            (Preview::Pdf(v), ViewAction::PrevPage) => v.prev_page(),
            (Preview::Pdf(v), ViewAction::Page(n)) => v.go_to(n),
            (Preview::Video(v), ViewAction::Play) => v.toggle_play(),
            (Preview::Video(v), ViewAction::Seek(delta)) => v.seek_by(delta),
            (Preview::Video(v), ViewAction::Skip { forward: true }) => v.skip_forward(),
            (Preview::Video(v), ViewAction::Skip { forward: false }) => v.skip_back(),
            (Preview::Video(v), ViewAction::Speed) => {
                v.cycle_speed();
            }
            (Preview::Video(v), ViewAction::Mute) => v.toggle_mute(),
            (Preview::Video(v), ViewAction::Volume(volume)) => v.set_volume(volume),
            _ => return Err(AppError::validation("Not available for this preview")),
        }
        self.describe_preview();
        Ok(())
    }

    fn describe_preview(&self) {
        let (Some(viewer), Some(modal)) = (&self.preview, self.modal.active()) else {
            return;
        };
        println!("{}", modal.title());
        output::print_kv("Source", viewer.url());
        if let preview::LoadState::Failed(reason) = viewer.load_state() {
            output::print_kv("Status", &format!("Failed to load: {reason}"));
            return;
        }
        match viewer {
            Preview::Image(v) => {
                output::print_kv("Zoom", &format!("{}%", v.zoom.percent()));
                output::print_kv("Rotation", &format!("{}°", v.rotation.degrees()));
                output::print_kv("Fullscreen", &v.fullscreen.to_string());
            }
            Preview::Pdf(v) => {
                let pages = v.pages().map(|p| p.to_string()).unwrap_or_else(|| "?".into());
                output::print_kv("Page", &format!("{} / {pages}", v.page()));
                output::print_kv("Zoom", &format!("{}%", v.zoom.percent()));
                output::print_kv("Rotation", &format!("{}°", v.rotation.degrees()));
            }
            Preview::Video(v) => {
                let state = if v.is_playing() { "playing" } else { "paused" };
                output::print_kv("Position", &format!("{} ({state})", v.time_label()));
                output::print_kv("Speed", &format!("{}x", v.speed()));
                let volume = if v.is_muted() {
                    "muted".to_string()
                } else {
                    format!("{:.0}%", v.volume() * 100.0)
                };
                output::print_kv("Volume", &volume);
            }
        }
    }

    async fn telegram(&mut self) -> AppResult<()> {
        self.preview = None;
        self.modal.open(Modal::TelegramLink);
        let result = self.link_telegram().await;
        self.modal.close();
        result
    }

    async fn link_telegram(&self) -> AppResult<()> {
        let phone = output::input("Phone number", false)?;
        let sent = self.ctx.telegram.send_code(&phone).await?;
        if !sent.success {
            return Ok(());
        }
        output::print_toasts(&self.ctx.notifications.drain());
        let code = output::input("Code", false)?;
        self.ctx.telegram.verify_code(&code).await?;
        Ok(())
    }
}

fn is_confirmation(kind: ModalKind) -> bool {
    matches!(kind, ModalKind::DeleteFile | ModalKind::DeleteFolder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use esbox_client::{HttpApiClient, TokenStore};
    use esbox_core::config::ClientConfig;

    fn context() -> AppContext {
        let config = ClientConfig::default();
        let tokens = TokenStore::in_memory();
        let api = HttpApiClient::new(&config.api, tokens.clone()).unwrap();
        AppContext::new(config, Arc::new(api), tokens)
    }

    #[test]
    fn test_go_to_folder_scopes_new_items() {
        let ctx = context();
        let mut shell = Shell::new(&ctx, OutputFormat::Table);
        assert_eq!(shell.new_item_parent(), None);

        shell.go(Route::Folder(FolderId(12)));
        assert_eq!(shell.view(), CacheKey::Folder(FolderId(12)));
        assert_eq!(shell.new_item_parent(), Some(FolderId(12)));
        assert!(shell.parent_of_current().is_err());

        shell.go(Route::Home);
        assert_eq!(shell.view(), CacheKey::Root);
        assert_eq!(shell.new_item_parent(), None);
        assert_eq!(shell.parent_of_current().unwrap(), None);
    }

    #[test]
    fn test_entering_below_opened_folder_knows_parent() {
        let ctx = context();
        let mut shell = Shell::new(&ctx, OutputFormat::Table);
        shell.go(Route::Folder(FolderId(12)));
        shell.nav.enter(NavFolder::new(FolderId(30), "drafts"));
        shell.route = Route::Home;

        assert_eq!(shell.view(), CacheKey::Folder(FolderId(30)));
        assert_eq!(shell.new_item_parent(), Some(FolderId(30)));
        assert_eq!(shell.parent_of_current().unwrap(), Some(FolderId(12)));
    }

    #[test]
    fn test_virtual_pages_have_no_upload_target() {
        let ctx = context();
        let mut shell = Shell::new(&ctx, OutputFormat::Table);
        shell.nav.enter(NavFolder::new(FolderId(4), "docs"));
        assert_eq!(shell.parent_of_current().unwrap(), None);

        shell.go(Route::Starred);
        assert_eq!(shell.new_item_parent(), None);
        assert!(shell.require_browsable().is_err());
    }

    #[test]
    fn test_split_args_keeps_quoted_names() {
        assert_eq!(
            split_args(r#"rename "My Report.pdf" 'Final v2.pdf'"#).unwrap(),
            ["rename", "My Report.pdf", "Final v2.pdf"]
        );
        assert_eq!(split_args("  ls   ").unwrap(), ["ls"]);
        assert_eq!(split_args(r#"mkdir """#).unwrap(), ["mkdir", ""]);
        assert!(split_args("rm \"open").is_err());
    }

    #[test]
    fn test_parse_navigation() {
        assert_eq!(ShellCommand::parse("   ").unwrap(), None);
        assert_eq!(
            ShellCommand::parse("cd").unwrap(),
            Some(ShellCommand::Cd("/".to_string()))
        );
        assert_eq!(
            ShellCommand::parse("go /storage/12").unwrap(),
            Some(ShellCommand::Go(Route::Folder(FolderId(12))))
        );
        assert_eq!(
            ShellCommand::parse("jump 2").unwrap(),
            Some(ShellCommand::Jump(2))
        );
        assert!(ShellCommand::parse("jump two").is_err());
    }

    #[test]
    fn test_parse_rename_joins_new_name() {
        assert_eq!(
            ShellCommand::parse("rename 7 quarterly report.pdf").unwrap(),
            Some(ShellCommand::Rename {
                target: "7".to_string(),
                name: Some("quarterly report.pdf".to_string()),
            })
        );
        assert_eq!(
            ShellCommand::parse("rename notes.txt").unwrap(),
            Some(ShellCommand::Rename {
                target: "notes.txt".to_string(),
                name: None,
            })
        );
    }

    #[test]
    fn test_parse_preview_controls() {
        assert_eq!(
            ShellCommand::parse("rotate left").unwrap(),
            Some(ShellCommand::View(ViewAction::Rotate { clockwise: false }))
        );
        assert_eq!(
            ShellCommand::parse("page 4").unwrap(),
            Some(ShellCommand::View(ViewAction::Page(4)))
        );
        assert_eq!(
            ShellCommand::parse("seek -10").unwrap(),
            Some(ShellCommand::View(ViewAction::Seek(-10.0)))
        );
        assert_eq!(
            ShellCommand::parse("skip back").unwrap(),
            Some(ShellCommand::View(ViewAction::Skip { forward: false }))
        );
    }

    #[test]
    fn test_parse_errors() {
        let err = ShellCommand::parse("frobnicate").unwrap_err();
        assert!(err.message.contains("Unknown command"));
        let err = ShellCommand::parse("mv a.txt").unwrap_err();
        assert_eq!(err.message, "Usage: mv <file> <folder>");
    }
}
