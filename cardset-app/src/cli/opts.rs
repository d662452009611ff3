use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[command(name = "cardset", version, about = "Create, browse, and review flashcard groups")]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding saved flashcards (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Create a flashcard group
    Create(CreateArgs),
    /// List saved groups
    List,
    /// Show a group and one of its terms
    Show(ShowArgs),
    /// Delete a group
    Delete(DeleteArgs),
    /// Write a group as text, JSON, CSV, or a printable page
    Export(ExportArgs),
    /// Print the share link for a group
    Share(ShareArgs),
    /// Add groups from an exported JSON file
    Import(ImportArgs),
    /// Launch Terminal UI
    Tui,
    /// Serve groups over HTTP so share links resolve
    Serve(ServeArgs),
}

#[derive(Debug, Args, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    /// Group image reference (e.g. a data URI)
    #[arg(long)]
    pub image: Option<String>,
    /// A card as TERM=DEFINITION; repeat for more cards
    #[arg(long = "term", value_name = "TERM=DEFINITION")]
    pub terms: Vec<String>,
    /// CSV with a `term,definition[,image]` header; rows are appended after --term cards
    #[arg(long)]
    pub from_csv: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    pub id: String,
    /// Card to show, starting at 1
    #[arg(long, default_value_t = 1)]
    pub term: usize,
}

#[derive(Debug, Args, Clone)]
pub struct DeleteArgs {
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Json,
    Csv,
    Print,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    pub id: String,
    #[arg(long, value_enum, default_value_t = ExportFormat::Txt)]
    pub format: ExportFormat,
    /// Output file; `txt` defaults to the download file name, others to stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ShareArgs {
    pub id: String,
    /// Origin for the link (overrides config)
    #[arg(long)]
    pub origin: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ImportArgs {
    pub path: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Bind address (host:port); overrides config
    #[arg(long)]
    pub addr: Option<String>,
}
