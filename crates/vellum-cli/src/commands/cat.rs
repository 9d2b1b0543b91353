//! `vellum cat`: write an asset's raw bytes to stdout.

use std::io::Write;

use crate::{
    cli::{AssetArgs, GlobalArgs},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(
    args: AssetArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let provider = super::provider(&global, &config)?;
    let mut file = provider.open(&args.path)?;

    let mut out = output.raw();
    std::io::copy(&mut file, &mut out)
        .and_then(|_| out.flush())
        .with_cli_context(|| format!("writing asset '{}'", args.path))?;
    Ok(())
}
