//! `vellum` / `vellum demo`: render the built-in pages, then inspect one
//! asset directly.

use std::io::Write;

use serde_json::Value;
use tracing::instrument;

use crate::{
    cli::GlobalArgs,
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// Pages rendered by the demo, in order.
const PAGES: [&str; 2] = ["home", "about"];

/// Page whose asset is opened directly after rendering.
const INSPECTED_PAGE: &str = "about";

#[instrument(skip_all)]
pub fn execute(global: GlobalArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let renderer = super::renderer(&global, &config)?;
    let mut out = output.raw();

    for page in PAGES {
        renderer.render_page(page, &Value::Null, &mut out)?;
        out.write_all(b"\n\n")
            .with_cli_context(|| format!("writing page '{page}'"))?;
    }

    let path = renderer.layout().page_path(INSPECTED_PAGE);
    let mut file = renderer.provider().open(&path)?;
    let content = file.read_all();
    let info = file.stat();

    out.write_all(&content)
        .and_then(|()| writeln!(out))
        .and_then(|()| writeln!(out, "{}", info.modified))
        .and_then(|()| writeln!(out, "{}", file.digest()))
        .and_then(|()| out.flush())
        .with_cli_context(|| format!("writing asset '{path}'"))?;

    Ok(())
}
