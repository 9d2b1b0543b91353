//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "vellum",
    bin_name = "vellum",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Render pages from templates embedded in the binary",
    long_about = "Vellum ships a base layout and a set of page templates inside \
                  its own binary, composes them into pages and renders them. \
                  Without a subcommand it runs the demo.",
    after_help = "EXAMPLES:\n\
        \x20 vellum\n\
        \x20 vellum render about\n\
        \x20 vellum render home --context '{\"User\": \"ada\"}'\n\
        \x20 vellum stat pages/about.tmpl\n\
        \x20 vellum --assets-dir ./static render home",
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute; `demo` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render every demo page, then inspect the about page asset.
    #[command(about = "Render home and about, then dump the about asset")]
    Demo,

    /// Render one page inside the base layout.
    #[command(
        visible_alias = "r",
        about = "Render a page",
        after_help = "EXAMPLES:\n\
            \x20 vellum render about\n\
            \x20 vellum render home --context '{\"Name\": \"Ada\"}'\n\
            \x20 vellum render home --context-file ctx.json"
    )]
    Render(RenderArgs),

    /// Print an asset's raw bytes.
    #[command(about = "Print an asset's raw content")]
    Cat(AssetArgs),

    /// Print an asset's metadata and MD5 digest.
    #[command(about = "Show asset metadata")]
    Stat(StatArgs),

    /// List assets and pages.
    #[command(
        visible_alias = "ls",
        about = "List assets and pages",
        after_help = "EXAMPLES:\n\
            \x20 vellum list\n\
            \x20 vellum list --format plain\n\
            \x20 vellum list --format json"
    )]
    List(ListArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 vellum completions bash > ~/.local/share/bash-completion/completions/vellum\n\
            \x20 vellum completions zsh  > ~/.zfunc/_vellum\n\
            \x20 vellum completions fish > ~/.config/fish/completions/vellum.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the active configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 vellum config get assets.pages_dir\n\
            \x20 vellum config list\n\
            \x20 vellum config path"
    )]
    Config(ConfigCommands),
}

// ── render ────────────────────────────────────────────────────────────────────

/// Arguments for `vellum render`.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Page identifier, e.g. `about` for `pages/about.tmpl`.
    #[arg(value_name = "PAGE", help = "Page to render")]
    pub page: String,

    /// Render context as inline JSON.
    #[arg(
        long = "context",
        value_name = "JSON",
        conflicts_with = "context_file",
        help = "Render context as a JSON document"
    )]
    pub context: Option<String>,

    /// Render context read from a JSON file.
    #[arg(
        long = "context-file",
        value_name = "FILE",
        help = "Read the render context from a JSON file"
    )]
    pub context_file: Option<PathBuf>,
}

// ── cat / stat ────────────────────────────────────────────────────────────────

/// Arguments naming one asset.
#[derive(Debug, Args)]
pub struct AssetArgs {
    /// Asset path, e.g. `pages/about.tmpl`.
    #[arg(value_name = "PATH", help = "Asset path")]
    pub path: String,
}

/// Arguments for `vellum stat`.
#[derive(Debug, Args)]
pub struct StatArgs {
    #[command(flatten)]
    pub asset: AssetArgs,

    /// Emit JSON instead of text.
    #[arg(long = "json", help = "Print metadata as JSON")]
    pub json: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `vellum list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One asset path per line.
    Plain,
    /// JSON document.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `vellum completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `vellum config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `assets.pages_dir`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
