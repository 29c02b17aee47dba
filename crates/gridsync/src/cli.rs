//! Clap derive structures for the `gridsync` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use gridsync_core::SourceKind;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gridsync -- import cloud network inventory into an IPAM grid
#[derive(Debug, Parser)]
#[command(
    name = "gridsync",
    version,
    about = "Import cloud network inventory into an IPAM grid",
    long_about = "Parses network exports from AWS, Azure, GCP, Alibaba, or plain\n\
        spreadsheets, maps provider tags onto grid extended attributes, and\n\
        reconciles the result against the live grid: what's new, what changed,\n\
        what overlaps, what's broken -- preview first, apply when you're sure.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Grid profile to use
    #[arg(long, short = 'p', env = "GRIDSYNC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Grid master URL (overrides profile)
    #[arg(long, short = 'g', env = "GRIDSYNC_GRID_MASTER", global = true)]
    pub grid_master: Option<String>,

    /// API username (overrides profile)
    #[arg(long, short = 'u', env = "GRIDSYNC_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GRIDSYNC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "GRIDSYNC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "GRIDSYNC_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Input format, mirrored from the core's closed parser set.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SourceArg {
    Aws,
    Azure,
    Gcp,
    Alibaba,
    Properties,
    Custom,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Aws => SourceKind::Aws,
            SourceArg::Azure => SourceKind::Azure,
            SourceArg::Gcp => SourceKind::Gcp,
            SourceArg::Alibaba => SourceKind::Alibaba,
            SourceArg::Properties => SourceKind::Properties,
            SourceArg::Custom => SourceKind::Custom,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Preview and apply a network import
    #[command(alias = "imp", alias = "i")]
    Import(ImportArgs),

    /// Generate an EA mapping template document
    Template(TemplateArgs),

    /// Inspect extended-attribute definitions
    Eas(EasArgs),

    /// Inspect network views
    Views(ViewsArgs),

    /// Grid connectivity and info
    #[command(alias = "sys")]
    System(SystemArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Import ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Network inventory file (.csv, .tsv, .xlsx, .xls)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub file: PathBuf,

    /// Source format of the file
    #[arg(long, short = 's', value_enum)]
    pub source: SourceArg,

    /// EA mapping document (JSON); omit for verbatim tag pass-through
    #[arg(long, short = 'm', value_name = "PATH")]
    pub mapping_file: Option<PathBuf>,

    /// Target network view (overrides profile default)
    #[arg(long, value_name = "VIEW")]
    pub network_view: Option<String>,

    /// Preview only; apply nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Cap on the existing-network snapshot fetch
    #[arg(long, default_value = "1000")]
    pub max_results: u32,
}

// ── Template ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Source provider the template targets
    #[arg(long, short = 's', value_enum, default_value = "aws")]
    pub source: SourceArg,

    /// Where to write the template document
    #[arg(long, default_value = "ea_mappings.json", value_name = "PATH")]
    pub to: PathBuf,
}

// ── EAs ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EasArgs {
    #[command(subcommand)]
    pub command: EasCommand,
}

#[derive(Debug, Subcommand)]
pub enum EasCommand {
    /// List extended-attribute definitions on the grid
    List,
}

// ── Views ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ViewsArgs {
    #[command(subcommand)]
    pub command: ViewsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ViewsCommand {
    /// List network views on the grid
    List,
}

// ── System ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Probe grid connectivity and show grid identity
    Check,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactively create a profile
    Init,
    /// Show the resolved configuration (passwords redacted)
    Show,
    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
