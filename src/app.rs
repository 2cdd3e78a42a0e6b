//! Application container for the lsp-wire CLI

use std::path::{Path, PathBuf};

use crate::cli::OutputContext;
use crate::config::{ConfigLoader, LoadedConfig, WireConfig};

pub struct App {
    root: PathBuf,
    pub(crate) output: OutputContext,
    pub(crate) loaded: LoadedConfig,
}

impl App {
    /// Load configuration for the current directory. `compact` wins over the
    /// configured `output.pretty`.
    pub fn new(compact: bool) -> anyhow::Result<Self> {
        let root = std::env::current_dir()?;
        tracing::debug!("Initializing lsp-wire at {:?}", root);

        let loaded = ConfigLoader::new(&root).load()?;
        Ok(Self::with_config(root, loaded, compact))
    }

    pub fn with_config(root: PathBuf, loaded: LoadedConfig, compact: bool) -> Self {
        let pretty = loaded.config.output.pretty && !compact;
        Self {
            output: OutputContext::new(root.clone(), pretty),
            root,
            loaded,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &WireConfig {
        &self.loaded.config
    }
}
