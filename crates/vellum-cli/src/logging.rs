//! Tracing setup for the `vellum` binary.
//!
//! The library crates only emit events; this module installs the subscriber.
//! Without `RUST_LOG` the level comes from the flags: `--quiet` gives ERROR,
//! no flag WARN, then `-v` INFO, `-vv` DEBUG and `-vvv` TRACE.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Install the global subscriber. Call once, first thing after parsing.
///
/// Events go to stderr; stdout carries rendered pages.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(derive_level(args))));

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

/// One directive per workspace crate, all at `level`.
fn filter_directives(level: &str) -> String {
    format!("vellum={level},vellum_core={level},vellum_adapters={level}")
}

fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_follows_flags() {
        let cases = [
            (0, false, "warn"),
            (1, false, "info"),
            (2, false, "debug"),
            (3, false, "trace"),
            (9, false, "trace"),
            (0, true, "error"),
            (3, true, "error"),
        ];
        for (verbose, quiet, expected) in cases {
            let args = GlobalArgs {
                verbose,
                quiet,
                ..GlobalArgs::default()
            };
            assert_eq!(derive_level(&args), expected, "-v x{verbose}, quiet={quiet}");
        }
    }

    #[test]
    fn directives_cover_every_crate() {
        let directives = filter_directives("debug");
        for target in ["vellum=", "vellum_core=", "vellum_adapters="] {
            assert!(directives.contains(target), "{target}");
        }
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
