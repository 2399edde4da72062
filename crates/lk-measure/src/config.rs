//! Print configuration for measurements.
//!
//! A [`PrintConfig`] maps print-mode names to display templates and fixes how
//! many significant digits of the error are shown. Measurements hold the
//! configuration behind an `Arc`, so one loaded file can be shared by every
//! value derived from it.
//!
//! Templates substitute these placeholders:
//! - `{value}`: the rounded central value
//! - `{error}`: the rounded error
//! - `{error_sig}`: only the significant digits of the rounded error, as used by
//!   `siunitx` (`\SI{9.81(5)}{m}`)
//! - `{name}` and `{units}`: the display labels
//!
//! Anything else, braces included, is copied through unchanged.

use crate::error::{MeasureError, MeasureResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Name of the mode every configuration must provide.
pub const DEFAULT_MODE: &str = "default";

/// Template used by the `default` mode unless overridden.
pub const DEFAULT_TEMPLATE: &str = "{value} ± {error} {units} ({name})";

/// Most significant digits of an error worth printing for an `f64`.
pub const MAX_ERROR_DIGITS: u32 = 17;

static BUILTIN: LazyLock<Arc<PrintConfig>> = LazyLock::new(|| Arc::new(PrintConfig::default()));

/// Named display templates plus rounding settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintConfig {
    /// Significant digits kept in the printed error.
    #[serde(default = "default_error_digits")]
    pub error_digits: u32,

    /// Mode name to template.
    #[serde(default = "default_modes")]
    pub modes: BTreeMap<String, String>,
}

fn default_error_digits() -> u32 {
    1
}

fn default_modes() -> BTreeMap<String, String> {
    BTreeMap::from([(DEFAULT_MODE.to_string(), DEFAULT_TEMPLATE.to_string())])
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            error_digits: default_error_digits(),
            modes: default_modes(),
        }
    }
}

impl PrintConfig {
    /// Built-in configuration plus the LaTeX flavoured modes `latex` and `latexSI`.
    pub fn standard() -> Self {
        Self::default()
            .with_mode("latex", "${value} \\pm {error}$ {units} ({name})")
            .with_mode("latexSI", "\\SI{{value}({error_sig})}{{units}}")
    }

    /// Add or replace a mode.
    pub fn with_mode(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.modes.insert(name.into(), template.into());
        self
    }

    pub fn with_error_digits(mut self, digits: u32) -> Self {
        self.error_digits = digits;
        self
    }

    pub fn has_mode(&self, mode: &str) -> bool {
        self.modes.contains_key(mode)
    }

    pub fn template(&self, mode: &str) -> Option<&str> {
        self.modes.get(mode).map(String::as_str)
    }

    /// Configured mode names in sorted order.
    pub fn mode_names(&self) -> Vec<String> {
        self.modes.keys().cloned().collect()
    }

    pub fn validate(&self) -> MeasureResult<()> {
        if !(1..=MAX_ERROR_DIGITS).contains(&self.error_digits) {
            return Err(MeasureError::InvalidConfig {
                what: format!(
                    "error_digits must be between 1 and {MAX_ERROR_DIGITS}, got {}",
                    self.error_digits
                ),
            });
        }
        if !self.has_mode(DEFAULT_MODE) {
            return Err(MeasureError::InvalidConfig {
                what: format!("mode '{DEFAULT_MODE}' is missing"),
            });
        }
        Ok(())
    }

    pub fn from_yaml_str(content: &str) -> MeasureResult<Self> {
        let config: PrintConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_yaml(path: &Path) -> MeasureResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Shared handle to the built-in configuration.
    pub fn builtin() -> Arc<PrintConfig> {
        Arc::clone(&BUILTIN)
    }
}

/// Values substituted into a template.
pub(crate) struct TemplateFields<'a> {
    pub value: &'a str,
    pub error: &'a str,
    pub error_sig: &'a str,
    pub name: &'a str,
    pub units: &'a str,
}

/// Single pass substitution, so labels containing placeholder text are left alone.
pub(crate) fn render_template(template: &str, fields: &TemplateFields<'_>) -> String {
    let slots: [(&str, &str); 5] = [
        ("{value}", fields.value),
        ("{error}", fields.error),
        ("{error_sig}", fields.error_sig),
        ("{name}", fields.name),
        ("{units}", fields.units),
    ];

    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    'scan: while let Some(ch) = rest.chars().next() {
        if ch == '{' {
            for (token, text) in slots {
                if let Some(tail) = rest.strip_prefix(token) {
                    out.push_str(text);
                    rest = tail;
                    continue 'scan;
                }
            }
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}
