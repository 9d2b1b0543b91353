//! `vellum config`: inspect configuration values.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&value)?;
        }

        ConfigCommands::List => {
            output.header(&format!("# {}", AppConfig::config_path().display()))?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("cannot encode configuration as TOML: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

const KEYS: [&str; 5] = [
    "assets.dir",
    "assets.layout",
    "assets.pages_dir",
    "assets.extension",
    "output.no_color",
];

/// Value of a dotted key, as it would be written in the config file.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    match key {
        "assets.dir" => Ok(config
            .assets
            .dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_default()),
        "assets.layout" => Ok(config.assets.layout.clone()),
        "assets.pages_dir" => Ok(config.assets.pages_dir.clone()),
        "assets.extension" => Ok(config.assets.extension.clone()),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        _ => Err(CliError::ConfigError {
            message: format!("unknown key '{key}' (known: {})", KEYS.join(", ")),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_keys() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "assets.layout").unwrap(), "base.tmpl");
        assert_eq!(get_config_value(&cfg, "assets.pages_dir").unwrap(), "pages");
        assert_eq!(get_config_value(&cfg, "assets.dir").unwrap(), "");
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn list_serialises_as_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(text.contains("[assets]"));
        assert!(text.contains("pages_dir = \"pages\""));
    }
}
