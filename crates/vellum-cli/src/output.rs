//! Terminal output for commands.
//!
//! Two kinds of output exist: messages (headers, key/value lines) that obey
//! `--quiet` and `--no-color`, and payloads (rendered pages, raw asset bytes,
//! JSON) that are written verbatim through [`OutputManager::raw`].

use std::io;

use console::Term;
use owo_colors::OwoColorize;

use crate::cli::GlobalArgs;
use crate::config::AppConfig;

/// Writes command output, honouring `--quiet` and colour settings.
pub struct OutputManager {
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Colour is off if either the flag or `output.no_color` says so.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        Self {
            quiet: args.quiet,
            no_color: args.no_color || config.output.no_color,
            term: Term::stdout(),
        }
    }

    /// One line of text; nothing in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Section heading, bold cyan when colour is on.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Aligned `key: value` line, the key dimmed when colours are on.
    pub fn kv(&self, key: &str, value: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let label = format!("{key}:");
        let line = if self.no_color {
            format!("{label:<10}{value}")
        } else {
            format!("{}{value}", format!("{label:<10}").dimmed())
        };
        self.term.write_line(&line)
    }

    /// Stdout for payloads that must reach the user byte-for-byte.
    /// Not affected by `--quiet`.
    pub fn raw(&self) -> io::StdoutLock<'static> {
        io::stdout().lock()
    }

    pub fn supports_color(&self) -> bool {
        !self.no_color
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
