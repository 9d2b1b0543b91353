//! Flags accepted before or after any subcommand.

use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Repeat for more detail, up to `-vvv`.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Only warnings and errors
    -v      - Info level (one line per rendered page)
    -vv     - Debug level (asset resolution, template parsing)
    -vvv    - Trace level (template redefinitions)"
    )]
    pub verbose: u8,

    /// Only errors reach the terminal; payloads still print.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Also set through `NO_COLOR`; any value other than empty, `0`, `false`,
    /// `no` or `off` turns colour off.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Must exist when given; the default location is optional.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Read configuration from FILE"
    )]
    pub config: Option<PathBuf>,

    /// Serve assets from a directory instead of the embedded set.
    ///
    /// The directory must use the same layout as the embedded assets: a base
    /// layout at its root and one file per page under the pages directory.
    #[arg(
        long = "assets-dir",
        global = true,
        value_name = "DIR",
        help = "Read assets from DIR instead of the embedded set"
    )]
    pub assets_dir: Option<PathBuf>,
}
