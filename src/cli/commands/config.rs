//! Config command implementation

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::app::App;
use crate::config::{ConfigLoader, WireConfig};
use crate::error::ConfigError;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Initialize configuration file
    Init {
        /// Initialize global config (~/.config/lsp-wire)
        #[arg(long)]
        global: bool,

        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show effective configuration and where it came from
    Show,

    /// Show config file path
    Path {
        /// Show global config path
        #[arg(long)]
        global: bool,
    },
}

#[derive(Serialize)]
struct ConfigInitResponse {
    status: String,
    path: String,
    level: &'static str,
}

#[derive(Serialize)]
struct ConfigShowResponse<'a> {
    level: &'static str,
    config: &'a WireConfig,
    sources: Vec<String>,
}

#[derive(Serialize)]
struct ConfigPathResponse {
    level: &'static str,
    path: String,
    exists: bool,
}

fn config_path(app: &App, global: bool) -> PathBuf {
    if global {
        ConfigLoader::global_config_path()
    } else {
        ConfigLoader::new(app.root()).project_config_path().to_path_buf()
    }
}

/// Write the default configuration, refusing to clobber an existing file.
pub fn write_default_config(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            key: "config".to_string(),
            message: format!(
                "Config already exists: {}. Use --force to overwrite.",
                path.display()
            ),
        });
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(&WireConfig::default())
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn execute(args: ConfigArgs, app: &App) -> Result<()> {
    let ctx = &app.output;

    match args.command {
        ConfigCommand::Init { global, force } => {
            let level = if global { "global" } else { "project" };
            let path = config_path(app, global);
            write_default_config(&path, force)?;
            ctx.print_success_flat(ConfigInitResponse {
                status: "created".to_string(),
                path: ctx.relative_path(&path),
                level,
            });
        }

        ConfigCommand::Show => {
            ctx.print_success_flat(ConfigShowResponse {
                level: "merged",
                config: app.config(),
                sources: app
                    .loaded
                    .sources
                    .iter()
                    .map(|p| ctx.relative_path(p))
                    .collect(),
            });
        }

        ConfigCommand::Path { global } => {
            let level = if global { "global" } else { "project" };
            let path = config_path(app, global);
            ctx.print_success_flat(ConfigPathResponse {
                level,
                path: ctx.relative_path(&path),
                exists: path.exists(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_default_config_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        write_default_config(&path, false).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: WireConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed, WireConfig::default());
    }

    #[test]
    fn test_write_default_config_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\npretty = false\n").unwrap();

        assert!(matches!(
            write_default_config(&path, false),
            Err(ConfigError::InvalidValue { .. })
        ));
        write_default_config(&path, true).unwrap();
        let parsed: WireConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(parsed.output.pretty);
    }
}
