//! `vellum list`: assets and pages.

use std::io::Write;

use serde::Serialize;

use vellum_core::prelude::*;

use crate::{
    cli::{GlobalArgs, ListArgs, ListFormat},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct AssetEntry {
    path: String,
    size: u64,
    md5: ContentDigest,
}

#[derive(Debug, Serialize)]
struct Listing {
    assets: Vec<AssetEntry>,
    pages: Vec<String>,
}

pub fn execute(
    args: ListArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let renderer = super::renderer(&global, &config)?;
    let listing = collect(&renderer)?;

    match args.format {
        ListFormat::Table => {
            output.header("Assets:")?;
            for asset in &listing.assets {
                output.print(&format!(
                    "  {:<24} {:>6} B  {}",
                    asset.path, asset.size, asset.md5
                ))?;
            }
            output.print("")?;
            output.header("Pages:")?;
            for page in &listing.pages {
                output.print(&format!("  {page}"))?;
            }
        }

        ListFormat::Plain => {
            let mut out = output.raw();
            for asset in &listing.assets {
                writeln!(out, "{}", asset.path).with_cli_context(|| "writing listing")?;
            }
        }

        // JSON goes straight to stdout so it stays parseable in pipes.
        ListFormat::Json => {
            let json = serde_json::to_string_pretty(&listing)
                .map_err(std::io::Error::from)
                .with_cli_context(|| "serialising listing")?;
            writeln!(output.raw(), "{json}").with_cli_context(|| "writing listing")?;
        }
    }

    Ok(())
}

fn collect(renderer: &PageRenderer) -> CliResult<Listing> {
    let provider = renderer.provider();
    let mut assets = Vec::new();
    for path in provider.paths() {
        let file = provider.open(&path)?;
        assets.push(AssetEntry {
            size: file.size(),
            md5: file.digest(),
            path,
        });
    }
    Ok(Listing {
        assets,
        pages: renderer.pages(),
    })
}
