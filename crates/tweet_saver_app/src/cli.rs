use std::path::PathBuf;

use clap::Parser;

/// Save a tweet as a markdown note.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Tweet URL; prompted for on stdin when omitted.
    pub url: Option<String>,

    /// Vault root the notes and settings live in.
    #[arg(long, default_value = ".")]
    pub vault: PathBuf,

    /// Folder under the vault root, overriding the stored setting for this run.
    #[arg(long)]
    pub folder: Option<String>,

    /// Do not copy the note link to the clipboard for this run.
    #[arg(long)]
    pub no_clipboard: bool,

    /// Also log to the terminal.
    #[arg(short, long)]
    pub verbose: bool,
}
