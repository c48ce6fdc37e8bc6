#![forbid(unsafe_code)]

//! Session configuration.
//!
//! ```toml
//! readonly = false
//! popups = true
//! tooltips = true
//! offset = 10.0
//!
//! [markup]
//! class_prefix = "annotate-text"
//! id_attribute = "data-annotation-id"
//! ```
//!
//! ```rust,ignore
//! let config = AnnotateConfig::from_toml_file("annotext.toml")?;
//! let config = AnnotateConfig::from_json_str(json)?;
//! ```
//!
//! Every field has a default, so partial files are fine. Loading does not
//! validate; [`AnnotateText::new`](crate::AnnotateText::new) does.

#[cfg(feature = "config")]
use std::path::Path;

use annotext_layout::position::DEFAULT_OFFSET;
use annotext_text::MarkupConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateConfig {
    /// Selections never create annotations and popups cannot edit.
    pub readonly: bool,
    /// Open a popup for new and clicked annotations.
    pub popups: bool,
    /// Show a tooltip when hovering an annotation with a comment or points.
    pub tooltips: bool,
    /// Gap between an overlay and its anchor, and between an overlay and the
    /// viewport edges.
    pub offset: f64,
    pub markup: MarkupConfig,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            readonly: false,
            popups: true,
            tooltips: true,
            offset: DEFAULT_OFFSET,
            markup: MarkupConfig::default(),
        }
    }
}

impl AnnotateConfig {
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Problems with the current values; empty when the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.offset.is_finite() || self.offset < 0.0 {
            errors.push(format!(
                "offset must be a finite, non-negative number, got {}",
                self.offset
            ));
        }

        let prefix = &self.markup.class_prefix;
        if prefix.is_empty() {
            errors.push("markup.class_prefix must not be empty".to_string());
        } else if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            errors.push(format!(
                "markup.class_prefix may only contain [A-Za-z0-9_-], got {prefix:?}"
            ));
        }

        let attr = &self.markup.id_attribute;
        if attr.is_empty() {
            errors.push("markup.id_attribute must not be empty".to_string());
        } else if attr
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '=' | '<' | '>' | '/'))
        {
            errors.push(format!(
                "markup.id_attribute is not a valid attribute name, got {attr:?}"
            ));
        }

        errors
    }

    /// [`validate`](Self::validate) as a `Result`.
    pub fn check(&self) -> Result<(), ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid { errors })
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {}", errors.join("; "))]
    Invalid { errors: Vec<String> },
}
