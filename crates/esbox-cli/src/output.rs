//! Table and JSON output formatting and interactive prompts.

use serde::Serialize;
use tabled::{Table, Tabled};

use esbox_core::error::AppError;
use esbox_core::result::AppResult;
use esbox_entity::Listing;
use esbox_service::{CommandOutcome, CommandResponse, Toast, ToastLevel};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One line of a folder, starred, or trash listing.
#[derive(Debug, Serialize, Tabled)]
pub struct EntryRow {
    /// Folder or file
    #[tabled(rename = "type")]
    kind: &'static str,
    /// Server ID
    id: i64,
    /// Display name
    name: String,
    /// Human-readable size (empty for folders)
    size: String,
    /// Starred marker
    #[tabled(rename = "★")]
    starred: &'static str,
}

impl EntryRow {
    /// Folders first, then files, each in server order.
    pub fn from_listing(listing: &Listing) -> Vec<Self> {
        let folders = listing.folders.iter().map(|f| Self {
            kind: "folder",
            id: f.id.get(),
            name: f.name.clone(),
            size: String::new(),
            starred: star_mark(f.is_starred),
        });
        let files = listing.files.iter().map(|f| Self {
            kind: "file",
            id: f.id.get(),
            name: f.filename.clone(),
            size: format_size(f.file_size),
            starred: star_mark(f.is_starred),
        });
        folders.chain(files).collect()
    }
}

fn star_mark(starred: bool) -> &'static str {
    if starred { "★" } else { "" }
}

/// Format a byte count with binary units.
pub fn format_size(bytes: i64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes.max(0) as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes.max(0), UNITS[0])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("This folder is empty.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{item:#?}"),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print the answer to a dispatched command.
pub fn print_response(response: &CommandResponse, format: OutputFormat) {
    if format == OutputFormat::Json {
        print_item(response, format);
        return;
    }
    match &response.outcome {
        CommandOutcome::Applied { message } => print_success(message),
        CommandOutcome::NoOp => print_warning("Nothing to change"),
        CommandOutcome::Failed { error, .. } => print_error(error),
    }
}

/// Print pending toasts, oldest first.
pub fn print_toasts(toasts: &[Toast]) {
    for toast in toasts {
        match toast.level {
            ToastLevel::Success => print_success(&toast.message),
            ToastLevel::Error => print_error(&toast.message),
            ToastLevel::Info => println!("ℹ {}", toast.message),
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}

/// Ask a yes/no question, defaulting to no.
pub fn confirm(prompt: &str) -> AppResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(input_error)
}

/// Read a line of text.
pub fn input(prompt: &str, allow_empty: bool) -> AppResult<String> {
    dialoguer::Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(allow_empty)
        .interact_text()
        .map_err(input_error)
}

/// Read a password without echo, optionally asking twice.
pub fn password(prompt: &str, confirmation: Option<&str>) -> AppResult<String> {
    let mut prompt = dialoguer::Password::new().with_prompt(prompt);
    if let Some(again) = confirmation {
        prompt = prompt.with_confirmation(again, "Passwords do not match");
    }
    prompt.interact().map_err(input_error)
}

fn input_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use esbox_core::types::{FileId, FolderId};
    use esbox_entity::{File, Folder};

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(-4), "0 B");
    }

    #[test]
    fn test_rows_put_folders_first() {
        let listing = Listing::new(
            vec![Folder {
                id: FolderId(3),
                name: "docs".to_string(),
                parent_id: None,
                is_starred: true,
                is_root: false,
                user_id: None,
                created_at: None,
                updated_at: None,
            }],
            vec![File {
                id: FileId(9),
                filename: "a.txt".to_string(),
                parent_id: None,
                mime_type: None,
                file_size: 2048,
                is_starred: false,
                uploaded_at: None,
                updated_at: None,
            }],
        );

        let rows = EntryRow::from_listing(&listing);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].kind, "folder");
        assert_eq!(rows[0].starred, "★");
        assert_eq!(rows[1].name, "a.txt");
        assert_eq!(rows[1].size, "2.0 KB");
    }
}
