//! `vellum`: render pages from the templates compiled into this binary.
//!
//! Without a subcommand the demo runs: `home` and `about` are rendered, then
//! the raw `about` asset is printed with its timestamp and MD5 digest.
//!
//! Startup loads `.env`, parses arguments, installs the tracing subscriber,
//! layers configuration and dispatches. Failures are reported on stderr and
//! mapped to an exit code:
//!
//! | Code | Meaning                      |
//! |------|------------------------------|
//! |  0   | Success                      |
//! |  1   | Internal or I/O error        |
//! |  2   | Bad arguments or input       |
//! |  3   | Asset or page not found      |
//! |  4   | Configuration error          |
//! |  5   | Template parse or execution  |

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // `.env` may set RUST_LOG or VELLUM__* before anything reads them.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive here too, with exit code 0.
            let _ = e.print();
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2));
        }
    };

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        assets_dir = ?cli.global.assets_dir,
        "CLI started"
    );

    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e:#}");
            eprintln!("Error: {e:#}");
            return ExitCode::from(4);
        }
    };

    let output = OutputManager::new(&cli.global, &config);
    let colored = output.supports_color() && std::io::stderr().is_terminal();
    let verbose = cli.global.verbose > 0;

    match run(cli, config, output) {
        Ok(()) => {
            info!("Vellum completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, colored, verbose),
    }
}

/// Run the selected command, `demo` when none was given.
#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Demo => commands::demo::execute(cli.global, config, output),
        Commands::Render(cmd) => commands::render::execute(cmd, cli.global, config, output),
        Commands::Cat(cmd) => commands::cat::execute(cmd, cli.global, config, output),
        Commands::Stat(cmd) => commands::stat::execute(cmd, cli.global, config, output),
        Commands::List(cmd) => commands::list::execute(cmd, cli.global, config, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
    }
}

/// Log the error, print its report and pick the exit code.
fn handle_error(err: CliError, colored: bool, verbose: bool) -> ExitCode {
    err.log();

    // stderr, so the message shows even when stdout is redirected.
    eprint!("{}", err.report(verbose, colored));

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_version_matches_cargo() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn cli_has_author() {
        let cmd = Cli::command();
        assert!(cmd.get_author().is_some());
    }
}
