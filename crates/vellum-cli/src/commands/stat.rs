//! `vellum stat`: asset metadata and MD5 digest.

use std::io::Write;

use serde::Serialize;

use vellum_core::domain::{AssetInfo, ContentDigest};

use crate::{
    cli::{GlobalArgs, StatArgs},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// JSON shape of `vellum stat --json`.
#[derive(Debug, Serialize)]
struct StatReport<'a> {
    #[serde(flatten)]
    info: &'a AssetInfo,
    md5: &'a ContentDigest,
}

pub fn execute(
    args: StatArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let provider = super::provider(&global, &config)?;
    let file = provider.open(&args.asset.path)?;
    let info = file.stat();
    let digest = file.digest();

    if args.json {
        let report = StatReport {
            info: &info,
            md5: &digest,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(std::io::Error::from)
            .with_cli_context(|| "serialising metadata")?;
        writeln!(output.raw(), "{json}").with_cli_context(|| "writing metadata")?;
        return Ok(());
    }

    output.kv("path", &info.path)?;
    output.kv("size", &format!("{} bytes", info.size))?;
    output.kv("modified", &info.modified.to_string())?;
    output.kv("md5", digest.as_str())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_core::domain::{AssetFile, ModifiedTime};

    #[test]
    fn report_flattens_info() {
        let file = AssetFile::new("a.tmpl", b"abc".as_slice(), ModifiedTime::unknown());
        let info = file.stat();
        let digest = file.digest();
        let json = serde_json::to_value(StatReport {
            info: &info,
            md5: &digest,
        })
        .unwrap();

        assert_eq!(json["path"], "a.tmpl");
        assert_eq!(json["size"], 3);
        assert_eq!(json["md5"], "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(json["modified"], "0001-01-01T00:00:00Z");
    }
}
