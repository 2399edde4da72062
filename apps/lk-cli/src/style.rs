//! Print settings shared by every measurement a command prints.

use crate::error::CliResult;
use lk_measure::{Measurement, PrintConfig};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Style {
    config: Arc<PrintConfig>,
    mode: String,
}

impl Style {
    /// Load `path` if given, otherwise the standard modes.
    pub fn load(path: Option<&Path>, mode: &str) -> CliResult<Self> {
        let config = match path {
            Some(path) => PrintConfig::load_yaml(path)?,
            None => PrintConfig::standard(),
        };
        Ok(Self {
            config: Arc::new(config),
            mode: mode.to_string(),
        })
    }

    pub fn config(&self) -> &PrintConfig {
        &self.config
    }

    pub fn apply(&self, m: Measurement) -> Measurement {
        m.with_config(Arc::clone(&self.config))
            .with_print_mode(&self.mode)
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            config: Arc::new(PrintConfig::standard()),
            mode: lk_measure::DEFAULT_MODE.to_string(),
        }
    }
}
