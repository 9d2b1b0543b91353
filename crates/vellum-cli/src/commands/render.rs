//! `vellum render`: render one page inside the base layout.

use std::io::Write;

use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    cli::{GlobalArgs, RenderArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(page = %args.page))]
pub fn execute(
    args: RenderArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let context = load_context(&args)?;
    let renderer = super::renderer(&global, &config)?;

    let mut out = output.raw();
    renderer.render_page(&args.page, &context, &mut out)?;
    writeln!(out)
        .and_then(|()| out.flush())
        .with_cli_context(|| format!("writing page '{}'", args.page))?;

    info!("Rendered {}", args.page);
    Ok(())
}

/// The render context: inline JSON, a JSON file, or null.
fn load_context(args: &RenderArgs) -> CliResult<Value> {
    let (source, text) = match (&args.context, &args.context_file) {
        (Some(inline), _) => ("--context".to_string(), inline.clone()),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_cli_context(|| format!("reading context file {}", path.display()))?;
            (path.display().to_string(), text)
        }
        (None, None) => return Ok(Value::Null),
    };

    serde_json::from_str(&text).map_err(|e| CliError::InvalidInput {
        message: format!("{source} is not valid JSON: {e}"),
        source: Some(Box::new(e)),
    })
}
